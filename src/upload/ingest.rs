use crate::error::{AppendError, Error};
use crate::notice::Notice;
use crate::upload::preview::PreviewBackend;
use crate::upload::queue::{UploadQueue, MAX_ITEMS};
use crate::upload::types::ImageFile;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Default, PartialEq)]
pub struct IngestOutcome {
    pub accepted: usize,
    pub notices: Vec<Notice>,
    /// Summary and preview grid need redrawing
    pub refresh: bool,
}

/// Adds a dropped or picked batch to the queue.
///
/// A batch that would overflow the queue is refused as a whole. Otherwise
/// each file stands on its own: non-images are skipped with a notice and
/// the rest are appended.
pub fn ingest<P: PreviewBackend>(
    queue: &mut UploadQueue<P>,
    incoming: Vec<ImageFile>,
) -> IngestOutcome {
    let mut outcome = IngestOutcome::default();
    if incoming.is_empty() {
        return outcome;
    }

    let total = queue.len() + incoming.len();
    if total > MAX_ITEMS {
        warn!(
            "Rejecting batch of {} files, queue already holds {}",
            incoming.len(),
            queue.len()
        );
        outcome
            .notices
            .push(Notice::CapacityExceeded { limit: MAX_ITEMS });
        return outcome;
    }

    for file in incoming {
        match queue.append(file) {
            Ok(()) => outcome.accepted += 1,
            Err(AppendError::NotAnImage { name }) => {
                warn!("Skipping non-image file {}", name);
                outcome.notices.push(Notice::UnsupportedType { name });
            }
            Err(AppendError::Preview { name, source }) => {
                warn!("Skipping {}: {}", name, source);
                outcome.notices.push(Notice::PreviewFailed {
                    name,
                    reason: source.to_string(),
                });
            }
            Err(AppendError::QueueFull { limit }) => {
                outcome.notices.push(Notice::CapacityExceeded { limit });
            }
        }
    }

    info!(
        "Ingested {} files, queue now holds {}",
        outcome.accepted,
        queue.len()
    );
    outcome.refresh = true;
    outcome
}

/// Loads picked files from disk. Unreadable files become notices.
pub fn read_images(paths: &[PathBuf]) -> (Vec<ImageFile>, Vec<Notice>) {
    let mut files = Vec::with_capacity(paths.len());
    let mut notices = Vec::new();

    for path in paths {
        match ImageFile::from_path(path) {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!("{}", e);
                let reason = match e {
                    Error::Read { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                notices.push(Notice::ReadFailed {
                    name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.display().to_string()),
                    reason,
                });
            }
        }
    }
    (files, notices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::preview::HeadlessPreviews;

    fn image(name: &str) -> ImageFile {
        ImageFile::with_mime(name, "image/jpeg", vec![0xFF, 0xD8])
    }

    fn text(name: &str) -> ImageFile {
        ImageFile::with_mime(name, "text/plain", b"hi".to_vec())
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut queue = UploadQueue::new(HeadlessPreviews::new());
        assert_eq!(ingest(&mut queue, Vec::new()), IngestOutcome::default());
    }

    #[test]
    fn test_overflowing_batch_rejected_whole() {
        let mut queue = UploadQueue::new(HeadlessPreviews::new());
        ingest(&mut queue, (0..8).map(|i| image(&format!("{}.jpg", i))).collect());

        let outcome = ingest(&mut queue, vec![image("a.jpg"), image("b.jpg"), image("c.jpg")]);
        assert_eq!(outcome.accepted, 0);
        assert_eq!(outcome.notices, vec![Notice::CapacityExceeded { limit: 10 }]);
        assert!(!outcome.refresh);
        assert_eq!(queue.len(), 8);
    }

    #[test]
    fn test_batch_filling_exactly_to_capacity() {
        let mut queue = UploadQueue::new(HeadlessPreviews::new());
        let outcome = ingest(&mut queue, (0..10).map(|i| image(&format!("{}.jpg", i))).collect());
        assert_eq!(outcome.accepted, 10);
        assert_eq!(queue.len(), MAX_ITEMS);
    }

    #[test]
    fn test_non_images_skipped_individually() {
        let mut queue = UploadQueue::new(HeadlessPreviews::new());
        let outcome = ingest(
            &mut queue,
            vec![image("a.jpg"), text("notes.txt"), image("b.jpg")],
        );

        assert_eq!(outcome.accepted, 2);
        assert_eq!(
            outcome.notices,
            vec![Notice::UnsupportedType {
                name: "notes.txt".to_string()
            }]
        );
        assert!(outcome.refresh);
        let names: Vec<_> = queue.files().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_capacity_counts_non_images_too() {
        let mut queue = UploadQueue::new(HeadlessPreviews::new());
        ingest(&mut queue, (0..9).map(|i| image(&format!("{}.jpg", i))).collect());

        let outcome = ingest(&mut queue, vec![image("a.jpg"), text("b.txt")]);
        assert_eq!(outcome.notices, vec![Notice::CapacityExceeded { limit: 10 }]);
        assert_eq!(queue.len(), 9);
    }
}
