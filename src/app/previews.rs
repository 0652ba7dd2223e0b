use crate::error::PreviewError;
use crate::upload::{ImageFile, PreviewBackend, PreviewHandle};
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use std::collections::HashMap;

/// Longest edge of a preview thumbnail, in pixels
const THUMBNAIL_SIZE: u32 = 256;

/// Previews backed by egui textures. Releasing a handle drops its texture.
pub struct TexturePreviews {
    ctx: egui::Context,
    textures: HashMap<u64, TextureHandle>,
    next_id: u64,
}

impl TexturePreviews {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            textures: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn texture(&self, handle: &PreviewHandle) -> Option<&TextureHandle> {
        self.textures.get(&handle.id())
    }
}

impl PreviewBackend for TexturePreviews {
    fn acquire(&mut self, file: &ImageFile) -> Result<PreviewHandle, PreviewError> {
        let img = image::load_from_memory(&file.bytes()[..])
            .map_err(|e| PreviewError::Decode(e.to_string()))?;

        let thumb = img.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE).to_rgba8();
        let size = [thumb.width() as usize, thumb.height() as usize];
        let pixels = ColorImage::from_rgba_unmultiplied(size, thumb.as_raw());

        self.next_id += 1;
        let id = self.next_id;
        let texture = self
            .ctx
            .load_texture(format!("preview-{}", id), pixels, TextureOptions::LINEAR);
        self.textures.insert(id, texture);

        Ok(PreviewHandle::new(id))
    }

    fn release(&mut self, handle: PreviewHandle) {
        self.textures.remove(&handle.id());
    }
}
