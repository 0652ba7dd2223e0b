//! Ordered, capacity-bounded collection of images waiting to be submitted.
//!
//! Insertion order is submission order is display order. Positions are
//! never stored; the 1-based rank is derived from the index on every read.

use crate::error::{AppendError, QueueError};
use crate::upload::preview::{PreviewBackend, PreviewHandle};
use crate::upload::types::ImageFile;
use tracing::debug;

/// Most images a single submission may carry
pub const MAX_ITEMS: usize = 10;

#[derive(Debug)]
struct QueueItem {
    file: ImageFile,
    preview: PreviewHandle,
}

/// Read-only view of one queued image
#[derive(Debug)]
pub struct QueueEntry<'a> {
    pub file: &'a ImageFile,
    pub preview: &'a PreviewHandle,
    /// 1-based rank position
    pub display_index: usize,
}

pub struct UploadQueue<P> {
    items: Vec<QueueItem>,
    previews: P,
}

impl<P: PreviewBackend> UploadQueue<P> {
    pub fn new(previews: P) -> Self {
        Self {
            items: Vec::with_capacity(MAX_ITEMS),
            previews,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn previews(&self) -> &P {
        &self.previews
    }

    /// Appends one image. Leaves the queue untouched on any error.
    pub fn append(&mut self, file: ImageFile) -> Result<(), AppendError> {
        if self.items.len() + 1 > MAX_ITEMS {
            return Err(AppendError::QueueFull { limit: MAX_ITEMS });
        }
        if !file.is_image() {
            return Err(AppendError::NotAnImage {
                name: file.name().to_string(),
            });
        }

        let preview = self
            .previews
            .acquire(&file)
            .map_err(|source| AppendError::Preview {
                name: file.name().to_string(),
                source,
            })?;
        debug!("Acquired preview {} for {}", preview.id(), file.name());

        self.items.push(QueueItem { file, preview });
        Ok(())
    }

    /// Removes the image at `index`, releasing its preview. Later entries
    /// move up one rank.
    pub fn remove_at(&mut self, index: usize) -> Result<ImageFile, QueueError> {
        if index >= self.items.len() {
            return Err(QueueError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }

        let item = self.items.remove(index);
        debug!("Releasing preview {} for {}", item.preview.id(), item.file.name());
        self.previews.release(item.preview);
        Ok(item.file)
    }

    pub fn clear(&mut self) {
        for item in std::mem::take(&mut self.items) {
            self.previews.release(item.preview);
        }
    }

    pub fn snapshot(&self) -> Vec<QueueEntry<'_>> {
        self.items
            .iter()
            .enumerate()
            .map(|(idx, item)| QueueEntry {
                file: &item.file,
                preview: &item.preview,
                display_index: idx + 1,
            })
            .collect()
    }

    pub fn files(&self) -> impl ExactSizeIterator<Item = &ImageFile> + '_ {
        self.items.iter().map(|item| &item.file)
    }
}
