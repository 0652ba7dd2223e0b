use crate::error::PreviewError;
use crate::upload::types::ImageFile;

/// Display reference for one queued image.
///
/// Not `Clone`: `release` consumes the handle.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PreviewHandle(u64);

impl PreviewHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Creates and frees preview resources for queued files.
///
/// Implementations must hand out a distinct id for every live handle.
pub trait PreviewBackend {
    fn acquire(&mut self, file: &ImageFile) -> Result<PreviewHandle, PreviewError>;

    /// Frees the resource. Anything still displaying it must be gone by now.
    fn release(&mut self, handle: PreviewHandle);
}

/// Previews for hosts that never display them (the terminal shell, tests).
/// Only counts what it hands out.
#[derive(Debug, Default)]
pub struct HeadlessPreviews {
    next_id: u64,
    acquired: usize,
    released: usize,
}

impl HeadlessPreviews {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquired(&self) -> usize {
        self.acquired
    }

    pub fn released(&self) -> usize {
        self.released
    }

    pub fn live(&self) -> usize {
        self.acquired - self.released
    }
}

impl PreviewBackend for HeadlessPreviews {
    fn acquire(&mut self, _file: &ImageFile) -> Result<PreviewHandle, PreviewError> {
        self.next_id += 1;
        self.acquired += 1;
        Ok(PreviewHandle::new(self.next_id))
    }

    fn release(&mut self, _handle: PreviewHandle) {
        self.released += 1;
    }
}
