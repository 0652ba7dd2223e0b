//! Error types for rank_uploader
//!
//! Each stage of the upload flow has its own error so callers can tell a
//! rejected file from a failed request without string matching.

use thiserror::Error;

/// Failure to build a display preview for a queued image
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreviewError {
    #[error("could not decode image: {0}")]
    Decode(String),
}

/// Why a single file was not appended to the queue
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppendError {
    #[error("the queue holds at most {limit} images")]
    QueueFull { limit: usize },

    #[error("{name} is not an image")]
    NotAnImage { name: String },

    #[error("no preview for {name}: {source}")]
    Preview {
        name: String,
        #[source]
        source: PreviewError,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueueError {
    #[error("index {index} out of range for queue of length {len}")]
    OutOfRange { index: usize, len: usize },
}

/// Failure of an issued submission request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("request failed: {0}")]
    Transport(String),

    /// Non-2xx answer. The body is shown verbatim when the server sent one.
    #[error("{}", status_message(.status, .body))]
    Status { status: u16, body: String },

    #[error("invalid JSON response: {0}")]
    Decode(String),

    #[error("request aborted: {0}")]
    Aborted(String),
}

fn status_message(status: &u16, body: &str) -> String {
    if body.is_empty() {
        format!("upload failed: {}", status)
    } else {
        body.to_string()
    }
}

impl From<reqwest::Error> for SubmitError {
    fn from(e: reqwest::Error) -> Self {
        SubmitError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for SubmitError {
    fn from(e: serde_json::Error) -> Self {
        SubmitError::Decode(e.to_string())
    }
}

/// Crate-level error for the shells
#[derive(Error, Debug)]
pub enum Error {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_prefers_body() {
        let err = SubmitError::Status {
            status: 500,
            body: "error checking game result".to_string(),
        };
        assert_eq!(err.to_string(), "error checking game result");
    }

    #[test]
    fn status_error_falls_back_to_code() {
        let err = SubmitError::Status {
            status: 502,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "upload failed: 502");
    }
}
