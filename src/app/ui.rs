use super::{Event, RankUploader};
use crate::upload::{ErrorKind, ResultView, MAX_ITEMS};
use eframe::egui::{self, Align2, Color32, RichText};
use rfd::FileDialog;
use std::time::Instant;

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const FAILURE: Color32 = Color32::from_rgb(220, 50, 50);
const MUTED: Color32 = Color32::from_rgb(150, 150, 150);

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];

impl RankUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        let mut events = Vec::new();
        let mut pick_files = false;
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading("Rank Screenshot Validator");
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Upload end-of-game rank screenshots and check them against the API")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });
                ui.add_space(20.0);

                self.render_drop_zone(ui, hovering, &mut pick_files);
                ui.add_space(10.0);
                self.render_queue(ui, &mut events);
                ui.add_space(20.0);
                self.render_form(ui, &mut events);
                ui.add_space(20.0);
                self.render_result(ui, &mut events);
                ui.add_space(20.0);
            });
        });

        if self.state.is_loading() {
            render_overlay(ctx);
        }
        self.render_toast(ctx);

        if pick_files {
            if let Some(paths) = FileDialog::new()
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_files()
            {
                self.add_paths(ctx, paths);
            }
        }
        for event in events {
            self.handle(ctx, event);
        }
    }

    fn render_drop_zone(&self, ui: &mut egui::Ui, hovering: bool, pick_files: &mut bool) {
        let stroke = if hovering {
            egui::Stroke::new(2.0, ACCENT)
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke
        };

        egui::Frame::group(ui.style())
            .stroke(stroke)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(format!("Drop up to {} images here", MAX_ITEMS));
                    ui.add_space(8.0);
                    if ui.button("🖼 Add Images").clicked() {
                        *pick_files = true;
                    }
                });
            });
    }

    fn render_queue(&self, ui: &mut egui::Ui, events: &mut Vec<Event>) {
        let queue = self.state.queue();
        if queue.is_empty() {
            return;
        }

        ui.horizontal(|ui| {
            ui.label(format!("{} selected", queue.len()));
            if ui.button("🗑 Clear").clicked() {
                events.push(Event::Clear);
            }
        });
        ui.add_space(8.0);

        ui.horizontal_wrapped(|ui| {
            for entry in queue.snapshot() {
                ui.group(|ui| {
                    ui.vertical(|ui| {
                        if let Some(texture) = queue.previews().texture(entry.preview) {
                            ui.add(
                                egui::Image::from_texture(egui::load::SizedTexture::from_handle(
                                    texture,
                                ))
                                .max_size(egui::vec2(120.0, 120.0)),
                            );
                        }
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(format!("Rank {}", entry.display_index)).strong());
                            if ui.small_button("×").on_hover_text(entry.file.name()).clicked() {
                                events.push(Event::Remove(entry.display_index - 1));
                            }
                        });
                    });
                });
            }
        });
    }

    fn render_form(&mut self, ui: &mut egui::Ui, events: &mut Vec<Event>) {
        ui.group(|ui| {
            egui::Grid::new("submission_form")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Game ID");
                    ui.add(egui::TextEdit::singleline(&mut self.game_id).hint_text("e.g. 10086"));
                    ui.end_row();

                    ui.label("Stage");
                    ui.add(egui::TextEdit::singleline(&mut self.stage).hint_text("e.g. 1"));
                    ui.end_row();
                });
        });

        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            let button = egui::Button::new("📤 Upload & Validate").min_size(egui::vec2(200.0, 40.0));
            if ui.add_enabled(!self.state.is_loading(), button).clicked() {
                events.push(Event::Submit {
                    game_id: self.game_id.clone(),
                    stage: self.stage.clone(),
                });
            }
        });
    }

    fn render_result(&self, ui: &mut egui::Ui, events: &mut Vec<Event>) {
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.strong("Result");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("📋 Copy JSON").clicked() {
                        events.push(Event::Copy);
                    }
                });
            });
            ui.separator();

            match self.state.result() {
                ResultView::Idle => {
                    ui.colored_label(MUTED, "Results appear here after upload");
                }
                ResultView::Invalid { failure: None } => {
                    ui.colored_label(MUTED, "No valid error list was returned");
                }
                ResultView::Invalid {
                    failure: Some(message),
                } => {
                    ui.colored_label(FAILURE, format!("Request failed: {}", message));
                }
                ResultView::AllValid => {
                    ui.colored_label(SUCCESS, "✅ Validation passed, no errors found.");
                }
                ResultView::Itemized { rows, raw_json } => {
                    egui::Grid::new("error_table")
                        .striped(true)
                        .num_columns(5)
                        .show(ui, |ui| {
                            for header in ["#", "Type", "Team", "Original", "Correct"] {
                                ui.strong(header);
                            }
                            ui.end_row();

                            for row in rows {
                                ui.colored_label(kind_color(row.kind), format!("#{}", row.position));
                                ui.label(row.kind.label());
                                ui.label(&row.team);
                                ui.label(&row.original_data);
                                ui.label(&row.correct_data);
                                ui.end_row();
                            }
                        });

                    ui.add_space(10.0);
                    egui::CollapsingHeader::new("Raw response JSON").show(ui, |ui| {
                        ui.add(egui::Label::new(RichText::new(raw_json).monospace()).wrap(true));
                    });
                }
            }
        });
    }

    fn render_toast(&self, ctx: &egui::Context) {
        let Some(notice) = self.state.notices().visible(Instant::now()) else {
            return;
        };

        egui::Area::new("toast")
            .order(egui::Order::Tooltip)
            .anchor(Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(notice.to_string());
                });
            });
    }
}

fn kind_color(kind: ErrorKind) -> Color32 {
    match kind {
        ErrorKind::FinalRanking => FAILURE,
        ErrorKind::InGameRanking => Color32::from_rgb(230, 140, 30),
        ErrorKind::EliminationCount => ACCENT,
        ErrorKind::Unknown => MUTED,
    }
}

/// Dims the window and swallows input while a request is in flight.
fn render_overlay(ctx: &egui::Context) {
    let screen = ctx.screen_rect();
    egui::Area::new("loading_overlay")
        .order(egui::Order::Foreground)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            ui.painter()
                .rect_filled(screen, 0.0, Color32::from_black_alpha(160));
            ui.allocate_rect(screen, egui::Sense::click_and_drag());
            ui.allocate_ui_at_rect(screen, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            });
        });
}
