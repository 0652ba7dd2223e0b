use crate::error::{Result, SubmitError};
use crate::notice::Notice;
use crate::upload::types::{ImageFile, RenamedFile, SubmissionRequest};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, info};

const DEFAULT_EXTENSION: &str = "jpg";

/// Name a queued file is uploaded under: `{game_id}_rank_{position}.{ext}`.
pub fn rank_file_name(game_id: &str, position: usize, file: &ImageFile) -> String {
    let ext = file
        .extension()
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    format!("{}_rank_{}.{}", game_id, position, ext)
}

/// Checks the form and renames the queued files in order.
///
/// Fails with the notice to show when a field is blank or nothing is queued.
pub fn build_request<'a>(
    game_id: &str,
    stage: &str,
    files: impl ExactSizeIterator<Item = &'a ImageFile>,
) -> std::result::Result<SubmissionRequest, Notice> {
    let game_id = game_id.trim();
    let stage = stage.trim();
    if game_id.is_empty() {
        return Err(Notice::MissingGameId);
    }
    if stage.is_empty() {
        return Err(Notice::MissingStage);
    }
    if files.len() == 0 {
        return Err(Notice::EmptyQueue);
    }

    let files = files
        .enumerate()
        .map(|(idx, file)| RenamedFile {
            file_name: rank_file_name(game_id, idx + 1, file),
            mime: file.mime().map(str::to_string),
            bytes: file.bytes().clone(),
        })
        .collect();

    Ok(SubmissionRequest {
        game_id: game_id.to_string(),
        stage: stage.to_string(),
        files,
    })
}

/// Sends a submission and hands back the parsed JSON answer.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: SubmissionRequest) -> std::result::Result<Value, SubmitError>;
}

/// Multipart `POST {server}/upload` over reqwest
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    upload_url: String,
}

impl HttpTransport {
    pub fn new(server: &str) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            upload_url: format!("{}/upload", server.trim_end_matches('/')),
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    fn form(request: SubmissionRequest) -> std::result::Result<Form, SubmitError> {
        let mut form = Form::new()
            .text("game_id", request.game_id)
            .text("stage", request.stage);

        for file in request.files {
            let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.file_name);
            if let Some(mime) = &file.mime {
                part = part.mime_str(mime)?;
            }
            form = form.part("files", part);
        }
        Ok(form)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: SubmissionRequest) -> std::result::Result<Value, SubmitError> {
        info!(
            "Uploading {} files for game {} to {}",
            request.files.len(),
            request.game_id,
            self.upload_url
        );
        let form = Self::form(request)?;

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SubmitError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        debug!("Received {} byte response", body.len());
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> ImageFile {
        ImageFile::with_mime(name, "image/png", vec![7])
    }

    #[test]
    fn test_rename_is_ordered_and_lowercased() {
        let files = vec![image("a.png"), image("b.JPG"), image("c")];
        let request = build_request("G1", "2", files.iter()).unwrap();
        let names: Vec<_> = request.files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["G1_rank_1.png", "G1_rank_2.jpg", "G1_rank_3.jpg"]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let files = vec![image("a.png")];
        let request = build_request("  G7 ", " 3\n", files.iter()).unwrap();
        assert_eq!(request.game_id, "G7");
        assert_eq!(request.stage, "3");
        assert_eq!(request.files[0].file_name, "G7_rank_1.png");
    }

    #[test]
    fn test_preconditions_checked_in_order() {
        let files = vec![image("a.png")];
        let none: Vec<ImageFile> = Vec::new();

        assert_eq!(
            build_request("  ", "", none.iter()).unwrap_err(),
            Notice::MissingGameId
        );
        assert_eq!(
            build_request("G1", " ", files.iter()).unwrap_err(),
            Notice::MissingStage
        );
        assert_eq!(
            build_request("G1", "1", none.iter()).unwrap_err(),
            Notice::EmptyQueue
        );
    }

    #[test]
    fn test_upload_url_joins_server() {
        let transport = HttpTransport::new("http://127.0.0.1:8008/").unwrap();
        assert_eq!(transport.upload_url(), "http://127.0.0.1:8008/upload");
    }
}
