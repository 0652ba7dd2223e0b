mod previews;
mod state;
mod ui;

use crate::error::SubmitError;
use crate::upload::{read_images, ImageFile, Transport};
use eframe::{egui, App};
pub use previews::TexturePreviews;
use serde_json::Value;
pub use state::{flatten_join, send_detached, Effect, Event, UploadState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub struct RankUploader {
    game_id: String,
    stage: String,
    state: UploadState<TexturePreviews>,
    transport: Arc<dyn Transport>,
    runtime: Runtime,
    pending: Option<JoinHandle<Result<Value, SubmitError>>>,
}

impl RankUploader {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        transport: Arc<dyn Transport>,
        runtime: Runtime,
    ) -> Self {
        info!("Initializing rank uploader window");
        Self {
            game_id: String::new(),
            stage: String::new(),
            state: UploadState::new(TexturePreviews::new(cc.egui_ctx.clone())),
            transport,
            runtime,
            pending: None,
        }
    }

    pub fn handle(&mut self, ctx: &egui::Context, event: Event) {
        let effect = self.state.dispatch(event);
        self.apply(ctx, effect);
    }

    fn apply(&mut self, ctx: &egui::Context, effect: Effect) {
        match effect {
            Effect::Idle | Effect::RedrawPreviews => {}
            Effect::Send(request) => {
                let task = send_detached(self.transport.clone(), request);
                self.pending = Some(self.runtime.spawn(task));
            }
            Effect::Copy(text) => {
                ctx.output_mut(|o| o.copied_text = text);
                self.state.copy_settled(Ok(()));
            }
        }
        ctx.request_repaint();
    }

    pub fn add_paths(&mut self, ctx: &egui::Context, paths: Vec<PathBuf>) {
        let (files, notices) = read_images(&paths);
        for notice in notices {
            self.state.notify(notice);
        }
        self.handle(ctx, Event::Ingest(files));
    }

    fn collect_dropped(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }

        let mut files = Vec::with_capacity(dropped.len());
        let mut paths = Vec::new();
        for file in dropped {
            match (file.bytes, file.path) {
                (Some(bytes), _) => files.push(ImageFile::new(file.name, bytes)),
                (None, Some(path)) => paths.push(path),
                (None, None) => {}
            }
        }

        let (from_disk, notices) = read_images(&paths);
        for notice in notices {
            self.state.notify(notice);
        }
        files.extend(from_disk);
        self.handle(ctx, Event::Ingest(files));
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        if let Some(task) = self.pending.take() {
            if task.is_finished() {
                let outcome = flatten_join(self.runtime.block_on(task));
                self.state.submission_settled(outcome);
                ctx.request_repaint();
            } else {
                self.pending = Some(task);
                ctx.request_repaint_after(Duration::from_millis(100));
            }
        }

        // The window only shows the current toast.
        for notice in self.state.notices_mut().drain() {
            debug!("Notice: {}", notice);
        }

        if let Some(left) = self.state.notices().remaining(Instant::now()) {
            ctx.request_repaint_after(left);
        }
    }
}

impl App for RankUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.collect_dropped(ctx);
        self.update_state(ctx);
        self.render(ctx);
    }
}
