mod ingest;
mod preview;
mod queue;
mod result;
mod submission;
mod types;

pub use ingest::{ingest, read_images, IngestOutcome};
pub use preview::{HeadlessPreviews, PreviewBackend, PreviewHandle};
pub use queue::{QueueEntry, UploadQueue, MAX_ITEMS};
pub use result::{effective_result, ErrorKind, ErrorRow, ResultView};
pub use submission::{build_request, rank_file_name, HttpTransport, Transport};
pub use types::{ImageFile, RenamedFile, SubmissionRequest};
