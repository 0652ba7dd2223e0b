use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// An image picked or dropped by the user.
///
/// The MIME type is sniffed from the content, never taken from the name.
#[derive(Clone)]
pub struct ImageFile {
    name: String,
    mime: Option<String>,
    bytes: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        let mime = infer::get(&bytes).map(|kind| kind.mime_type().to_string());
        Self {
            name: name.into(),
            mime,
            bytes,
        }
    }

    /// Builds a file with an explicit MIME type, skipping sniffing.
    pub fn with_mime(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime: Some(mime.into()),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| Error::Read {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn is_image(&self) -> bool {
        self.mime.as_deref().is_some_and(|m| m.starts_with("image/"))
    }

    /// Lowercased text after the last '.', or None when there is none.
    pub fn extension(&self) -> Option<String> {
        match self.name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => Some(ext.to_lowercase()),
            _ => None,
        }
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A queued file under the name it is uploaded with.
#[derive(Debug, Clone)]
pub struct RenamedFile {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Arc<[u8]>,
}

/// Everything one `POST /upload` carries. Built fresh on every submit.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub game_id: String,
    pub stage: String,
    pub files: Vec<RenamedFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn sniffs_png_content() {
        let file = ImageFile::new("shot.txt", PNG_MAGIC.to_vec());
        assert_eq!(file.mime(), Some("image/png"));
        assert!(file.is_image());
    }

    #[test]
    fn unknown_content_is_not_an_image() {
        let file = ImageFile::new("notes.png", b"hello world".to_vec());
        assert_eq!(file.mime(), None);
        assert!(!file.is_image());
    }

    #[test]
    fn extension_is_lowercased() {
        let file = ImageFile::with_mime("b.JPG", "image/jpeg", Vec::new());
        assert_eq!(file.extension().as_deref(), Some("jpg"));
    }

    #[test]
    fn extension_uses_last_dot() {
        let file = ImageFile::with_mime("round.1.final.PNG", "image/png", Vec::new());
        assert_eq!(file.extension().as_deref(), Some("png"));
    }

    #[test]
    fn missing_or_empty_extension() {
        let bare = ImageFile::with_mime("c", "image/png", Vec::new());
        let trailing = ImageFile::with_mime("c.", "image/png", Vec::new());
        assert_eq!(bare.extension(), None);
        assert_eq!(trailing.extension(), None);
    }
}
