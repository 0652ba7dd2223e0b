use std::fmt;
use std::time::{Duration, Instant};

/// How long a toast stays visible
pub const TOAST_DURATION: Duration = Duration::from_millis(2400);

/// Undrained notices kept before the oldest are dropped
pub const HISTORY_LIMIT: usize = 32;

/// Short-lived user-facing message
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    CapacityExceeded { limit: usize },
    UnsupportedType { name: String },
    ReadFailed { name: String, reason: String },
    PreviewFailed { name: String, reason: String },
    MissingGameId,
    MissingStage,
    EmptyQueue,
    NothingToCopy,
    CopyFailed,
    Copied,
    UploadSucceeded,
    RequestFailed { message: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::CapacityExceeded { limit } => {
                write!(f, "You can upload at most {} images", limit)
            }
            Notice::UnsupportedType { name } => {
                write!(f, "Only image files are supported ({})", name)
            }
            Notice::ReadFailed { name, reason } => write!(f, "Could not read {}: {}", name, reason),
            Notice::PreviewFailed { name, reason } => {
                write!(f, "Could not preview {}: {}", name, reason)
            }
            Notice::MissingGameId => write!(f, "Please enter a Game ID"),
            Notice::MissingStage => write!(f, "Please enter a Stage"),
            Notice::EmptyQueue => write!(f, "Please select at least one image"),
            Notice::NothingToCopy => write!(f, "Nothing to copy yet"),
            Notice::CopyFailed => write!(f, "Copy failed"),
            Notice::Copied => write!(f, "Copied to clipboard"),
            Notice::UploadSucceeded => write!(f, "Uploaded and validated"),
            Notice::RequestFailed { message } => write!(f, "Request failed: {}", message),
        }
    }
}

#[derive(Debug, Clone)]
struct Toast {
    notice: Notice,
    shown_at: Instant,
}

/// Holds the one toast on screen. A newer notice replaces the older one.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Option<Toast>,
    history: Vec<Notice>,
}

impl NoticeBoard {
    pub fn push(&mut self, notice: Notice) {
        self.push_at(notice, Instant::now());
    }

    pub fn push_at(&mut self, notice: Notice, now: Instant) {
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(notice.clone());
        self.current = Some(Toast {
            notice,
            shown_at: now,
        });
    }

    /// The toast to show at `now`, if it has not expired yet.
    pub fn visible(&self, now: Instant) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|t| now.saturating_duration_since(t.shown_at) < TOAST_DURATION)
            .map(|t| &t.notice)
    }

    /// Time left before the current toast hides.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.current
            .as_ref()
            .map(|t| TOAST_DURATION.saturating_sub(now.saturating_duration_since(t.shown_at)))
            .filter(|d| !d.is_zero())
    }

    /// Notices raised since the last drain, oldest first. Holds at most
    /// `HISTORY_LIMIT`.
    pub fn history(&self) -> &[Notice] {
        &self.history
    }

    /// Hands over notices raised since the last drain.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.history)
    }
}
