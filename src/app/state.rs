use crate::error::SubmitError;
use crate::notice::{Notice, NoticeBoard};
use crate::upload::{
    build_request, effective_result, ingest, ImageFile, PreviewBackend, ResultView,
    SubmissionRequest, Transport, UploadQueue,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{error, info, warn};

/// User interactions the controller reacts to
#[derive(Debug)]
pub enum Event {
    Ingest(Vec<ImageFile>),
    Remove(usize),
    Clear,
    Submit { game_id: String, stage: String },
    Copy,
}

/// What the host has to do after an event
#[derive(Debug)]
pub enum Effect {
    Idle,
    RedrawPreviews,
    /// Issue the request, then report back through `submission_settled`
    Send(SubmissionRequest),
    /// Put the text on the clipboard, then report back through `copy_settled`
    Copy(String),
}

/// The one controller behind a session: queue, result view, loading flag
/// and notices. Hosts own it and feed it events.
pub struct UploadState<P> {
    queue: UploadQueue<P>,
    result: ResultView,
    loading: bool,
    notices: NoticeBoard,
}

impl<P: PreviewBackend> UploadState<P> {
    pub fn new(previews: P) -> Self {
        Self {
            queue: UploadQueue::new(previews),
            result: ResultView::default(),
            loading: false,
            notices: NoticeBoard::default(),
        }
    }

    pub fn queue(&self) -> &UploadQueue<P> {
        &self.queue
    }

    pub fn result(&self) -> &ResultView {
        &self.result
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn dispatch(&mut self, event: Event) -> Effect {
        match event {
            Event::Ingest(files) => {
                let outcome = ingest(&mut self.queue, files);
                for notice in outcome.notices {
                    self.notices.push(notice);
                }
                if outcome.refresh {
                    Effect::RedrawPreviews
                } else {
                    Effect::Idle
                }
            }
            Event::Remove(index) => match self.queue.remove_at(index) {
                Ok(file) => {
                    info!("Removed {} from the queue", file.name());
                    Effect::RedrawPreviews
                }
                Err(e) => {
                    warn!("Ignoring remove: {}", e);
                    Effect::Idle
                }
            },
            Event::Clear => {
                self.queue.clear();
                Effect::RedrawPreviews
            }
            Event::Submit { game_id, stage } => self.begin_submission(&game_id, &stage),
            Event::Copy => match self.result.copyable_text() {
                Some(text) => Effect::Copy(text.to_string()),
                None => {
                    self.notices.push(Notice::NothingToCopy);
                    Effect::Idle
                }
            },
        }
    }

    fn begin_submission(&mut self, game_id: &str, stage: &str) -> Effect {
        if self.loading {
            warn!("Submission already in flight, ignoring submit");
            return Effect::Idle;
        }

        match build_request(game_id, stage, self.queue.files()) {
            Ok(request) => {
                info!(
                    "Submitting {} images for game {} stage {}",
                    request.files.len(),
                    request.game_id,
                    request.stage
                );
                self.loading = true;
                Effect::Send(request)
            }
            Err(notice) => {
                self.notices.push(notice);
                Effect::Idle
            }
        }
    }

    /// Ends a submission. Leaves the loading state before anything else.
    pub fn submission_settled(&mut self, outcome: Result<Value, SubmitError>) {
        self.loading = false;

        match outcome {
            Ok(response) => {
                self.result = ResultView::interpret(Some(effective_result(&response)));
                self.notices.push(Notice::UploadSucceeded);
            }
            Err(e) => {
                error!("Submission failed: {}", e);
                let message = e.to_string();
                self.result = ResultView::failed(message.clone());
                self.notices.push(Notice::RequestFailed { message });
            }
        }
    }

    pub fn copy_settled(&mut self, outcome: Result<(), String>) {
        match outcome {
            Ok(()) => self.notices.push(Notice::Copied),
            Err(reason) => {
                warn!("Clipboard write failed: {}", reason);
                self.notices.push(Notice::CopyFailed);
            }
        }
    }

    /// Runs a whole submission against `transport` and settles it.
    pub async fn submit(&mut self, transport: Arc<dyn Transport>, game_id: &str, stage: &str) {
        let Effect::Send(request) = self.dispatch(Event::Submit {
            game_id: game_id.to_string(),
            stage: stage.to_string(),
        }) else {
            return;
        };

        let outcome = send_detached(transport, request).await;
        self.submission_settled(outcome);
    }
}

/// Sends on its own task so a panicking transport still yields an outcome.
pub async fn send_detached(
    transport: Arc<dyn Transport>,
    request: SubmissionRequest,
) -> Result<Value, SubmitError> {
    let joined = tokio::spawn(async move { transport.send(request).await }).await;
    flatten_join(joined)
}

pub fn flatten_join(
    joined: Result<Result<Value, SubmitError>, JoinError>,
) -> Result<Value, SubmitError> {
    joined.unwrap_or_else(|e| Err(SubmitError::Aborted(e.to_string())))
}
