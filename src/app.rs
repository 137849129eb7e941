use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, TryRecvError};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use tracing::{debug, error, info};

use crate::clipboard::Clipboard;
use crate::config::AppSettings;
use crate::error::{PickerError, Result};
use crate::export::{all_lines, box_line, spawn_send, SheetPayload, DEFAULT_BATCH_NAME};
use crate::geometry::{
    available_area, fit_to_viewport, image_box_to_screen_rect, ImageFrame, ScreenPoint,
    ScreenRect, Size,
};
use crate::image_input::{load_image, ImageSource, LoadedImage, IMAGE_EXTENSIONS};
use crate::rulers::{ticks, RULER_THICKNESS};
use crate::store::{BoxStore, StoreEvent};

const GOLD: egui::Color32 = egui::Color32::from_rgb(242, 214, 133);
const RULER_BG: egui::Color32 = egui::Color32::from_rgb(38, 20, 20);
const CANVAS_BG: egui::Color32 = egui::Color32::from_gray(40);

const ROW_FEEDBACK: Duration = Duration::from_millis(1000);
const COPY_ALL_FEEDBACK: Duration = Duration::from_millis(1500);
const SENT_FEEDBACK: Duration = Duration::from_millis(2000);
const SEND_POLL: Duration = Duration::from_millis(100);

const BADGE_SIZE: f32 = 18.0;

// ── Transient button feedback ───────────────────────────────────────────────

#[derive(Default)]
struct Feedback {
    row_copied: Option<(u32, Instant)>,
    all_copied: Option<Instant>,
    sent: Option<Instant>,
}

fn still_showing(at: Option<Instant>, dur: Duration) -> bool {
    at.is_some_and(|t| t.elapsed() < dur)
}

impl Feedback {
    fn row_done(&self, id: u32) -> bool {
        matches!(self.row_copied, Some((row, at)) if row == id && at.elapsed() < ROW_FEEDBACK)
    }

    fn any_active(&self) -> bool {
        still_showing(self.row_copied.map(|(_, t)| t), ROW_FEEDBACK)
            || still_showing(self.all_copied, COPY_ALL_FEEDBACK)
            || still_showing(self.sent, SENT_FEEDBACK)
    }
}

// ── App ─────────────────────────────────────────────────────────────────────

pub struct App {
    settings: AppSettings,
    settings_path: PathBuf,
    settings_dirty: bool,

    store: BoxStore,

    image: Option<LoadedImage>,
    texture: Option<egui::TextureHandle>,

    /// Message of the alert window; the rest of the UI is inert while set.
    alert: Option<String>,
    feedback: Feedback,
    pending_send: Option<Receiver<Result<()>>>,
    scroll_to_newest: bool,
    clipboard: Clipboard,
}

impl App {
    pub fn new(settings: AppSettings, settings_path: PathBuf, image_path: Option<PathBuf>) -> Self {
        let mut app = Self {
            settings,
            settings_path,
            settings_dirty: false,
            store: BoxStore::new(),
            image: None,
            texture: None,
            alert: None,
            feedback: Feedback::default(),
            pending_send: None,
            scroll_to_newest: false,
            clipboard: Clipboard::default(),
        };
        if let Some(path) = image_path {
            app.open(ImageSource::Path(path));
        }
        app
    }

    fn report(&mut self, e: PickerError) {
        error!("{}", e);
        self.alert = Some(e.alert_message());
    }

    fn open(&mut self, source: ImageSource) {
        match load_image(source) {
            Ok(loaded) => {
                self.store.clear_all();
                self.image = Some(loaded);
                self.texture = None;
            }
            Err(e) => self.report(e),
        }
    }

    fn pick_file(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file();
        if let Some(path) = picked {
            self.open(ImageSource::Path(path));
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        if let Some(ref loaded) = self.image {
            let rgba = loaded.image.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture = Some(ctx.load_texture(
                loaded.name.clone(),
                color_image,
                egui::TextureOptions::LINEAR,
            ));
        }
    }

    /// Fit the loaded image into a canvas of the given size.
    fn image_frame(&self, canvas: egui::Vec2) -> ImageFrame {
        let original = self
            .image
            .as_ref()
            .map(LoadedImage::original_size)
            .unwrap_or_default();
        let displayed = fit_to_viewport(available_area(Size::new(canvas.x, canvas.y)), original)
            .unwrap_or_default();
        ImageFrame::new(displayed, original)
    }

    // ── Export actions ──────────────────────────────────────────────────────

    fn copy_all(&mut self) {
        let res = all_lines(&self.store, self.settings.export_scale())
            .and_then(|t| self.clipboard.copy_text(&t));
        match res {
            Ok(()) => self.feedback.all_copied = Some(Instant::now()),
            Err(e) => self.report(e),
        }
    }

    fn copy_row(&mut self, id: u32, line: &str) {
        match self.clipboard.copy_text(line) {
            Ok(()) => self.feedback.row_copied = Some((id, Instant::now())),
            Err(e) => self.report(e),
        }
    }

    fn start_send(&mut self) {
        if self.settings.sheet_url.trim().is_empty() {
            self.report(PickerError::MissingEndpoint);
            return;
        }
        let payload = match SheetPayload::from_store(
            &self.store,
            &self.settings.batch_name,
            self.settings.export_scale(),
        ) {
            Ok(p) => p,
            Err(e) => return self.report(e),
        };
        info!(
            "sending {} boxes as {:?}",
            payload.rows.len(),
            payload.batch_name
        );
        self.pending_send = Some(spawn_send(self.settings.sheet_url.clone(), payload));
    }

    fn poll_send(&mut self, ctx: &egui::Context) {
        let res = match self.pending_send.as_ref().map(|rx| rx.try_recv()) {
            None => return,
            Some(Err(TryRecvError::Empty)) => {
                ctx.request_repaint_after(SEND_POLL);
                return;
            }
            Some(Err(TryRecvError::Disconnected)) => Err(PickerError::UnexpectedResponse(
                "export worker exited without a result".to_string(),
            )),
            Some(Ok(res)) => res,
        };
        self.pending_send = None;
        match res {
            Ok(()) => self.feedback.sent = Some(Instant::now()),
            Err(e) => self.report(e),
        }
    }

    fn save_settings_if_idle(&mut self, ctx: &egui::Context) {
        if !self.settings_dirty || ctx.memory(|m| m.focused().is_some()) {
            return;
        }
        self.settings_dirty = false;
        match self.settings.save_to_file(&self.settings_path) {
            Ok(()) => debug!("settings saved to {}", self.settings_path.display()),
            Err(e) => error!("failed to save settings: {:#}", e),
        }
    }

    fn handle_store_events(&mut self) {
        for event in self.store.take_events() {
            match event {
                StoreEvent::Added(id) => debug!("box {} added", id),
                StoreEvent::Evicted(id) => debug!("box {} evicted", id),
                StoreEvent::Removed(id) => debug!("box {} removed", id),
                StoreEvent::Cleared => debug!("boxes cleared"),
            }
            self.scroll_to_newest = true;
        }
    }

    // ── Panels ──────────────────────────────────────────────────────────────

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            if ui.button("Open…").clicked() {
                self.pick_file();
            }
            if ui.button("Clear").clicked() {
                self.store.clear_all();
            }
            let copy_label = if still_showing(self.feedback.all_copied, COPY_ALL_FEEDBACK) {
                "Copied!"
            } else {
                "Copy all"
            };
            if ui.button(copy_label).clicked() {
                self.copy_all();
            }

            ui.separator();
            ui.label("Scale X:");
            let sx = ui.add(
                egui::TextEdit::singleline(&mut self.settings.scale_x)
                    .desired_width(48.0)
                    .hint_text("1.0"),
            );
            ui.label("Y:");
            let sy = ui.add(
                egui::TextEdit::singleline(&mut self.settings.scale_y)
                    .desired_width(48.0)
                    .hint_text("1.0"),
            );

            ui.separator();
            ui.label("Sheet URL:");
            let url = ui.add(
                egui::TextEdit::singleline(&mut self.settings.sheet_url)
                    .desired_width(260.0)
                    .hint_text("https://script.google.com/…/exec"),
            );
            ui.label("Batch:");
            let batch = ui.add(
                egui::TextEdit::singleline(&mut self.settings.batch_name)
                    .desired_width(120.0)
                    .hint_text(DEFAULT_BATCH_NAME),
            );
            if sx.changed() || sy.changed() || url.changed() || batch.changed() {
                self.settings_dirty = true;
            }

            let sending = self.pending_send.is_some();
            let send_label = if sending {
                "Sending…"
            } else if still_showing(self.feedback.sent, SENT_FEEDBACK) {
                "Success!"
            } else {
                "Send to sheet"
            };
            let can_send = !sending && !still_showing(self.feedback.sent, SENT_FEEDBACK);
            if ui
                .add_enabled(can_send, egui::Button::new(send_label))
                .clicked()
            {
                self.start_send();
            }
        });
    }

    fn coord_list(&mut self, ui: &mut egui::Ui) {
        ui.heading(format!("Boxes ({})", self.store.len()));
        if self.store.is_empty() {
            ui.label("Drag over the image to add a box.");
            return;
        }

        let scale = self.settings.export_scale();
        let scroll = std::mem::take(&mut self.scroll_to_newest);
        let mut copy: Option<(u32, String)> = None;

        let mut table = TableBuilder::new(ui)
            .striped(true)
            .column(Column::exact(32.0))
            .column(Column::remainder())
            .column(Column::auto());
        if scroll {
            table = table.scroll_to_row(self.store.len() - 1, Some(egui::Align::BOTTOM));
        }

        let store = &self.store;
        let feedback = &self.feedback;
        table
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                header.col(|ui| {
                    ui.strong("x, y, w, h");
                });
                header.col(|_ui| {});
            })
            .body(|mut body| {
                for b in store.list() {
                    let line = box_line(b, scale);
                    body.row(22.0, |mut row| {
                        row.col(|ui| {
                            ui.label(b.id.to_string());
                        });
                        row.col(|ui| {
                            ui.monospace(&line);
                        });
                        row.col(|ui| {
                            let label = if feedback.row_done(b.id) { "Done" } else { "Copy" };
                            if ui.small_button(label).clicked() {
                                copy = Some((b.id, line.clone()));
                            }
                        });
                    });
                }
            });

        if let Some((id, line)) = copy {
            self.copy_row(id, &line);
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui, interactive: bool) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas_rect = response.rect;
        painter.rect_filled(canvas_rect, 0.0, CANVAS_BG);

        let hovering_files = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        if hovering_files {
            painter.rect_stroke(
                canvas_rect.shrink(2.0),
                4.0,
                egui::Stroke::new(2.0, GOLD),
                egui::StrokeKind::Inside,
            );
        }

        let frame = self.image_frame(canvas_rect.size());
        let Some(ref tex) = self.texture else {
            painter.text(
                canvas_rect.center(),
                egui::Align2::CENTER_CENTER,
                "Open an image or drop one here",
                egui::FontId::proportional(18.0),
                GOLD,
            );
            return;
        };
        if frame.is_empty() {
            return;
        }

        let img_rect = image_rect_on_screen(canvas_rect, frame.displayed);
        painter.image(
            tex.id(),
            img_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
        draw_rulers(&painter, img_rect, frame);

        // Stored boxes, with their close buttons
        let mut remove: Option<u32> = None;
        for b in self.store.list() {
            let Some(rect) = image_box_to_screen_rect(b.geometry, frame.displayed, frame.original)
            else {
                continue;
            };
            let rect = to_screen(rect, img_rect);
            draw_box(&painter, rect, b.id);

            let close_rect = close_button_rect(rect);
            let close = ui.interact(
                close_rect,
                egui::Id::new(("close-box", b.id)),
                egui::Sense::click(),
            );
            let close_color = if close.hovered() {
                egui::Color32::from_rgb(220, 70, 70)
            } else {
                RULER_BG
            };
            painter.rect_filled(close_rect, 3.0, close_color);
            painter.text(
                close_rect.center(),
                egui::Align2::CENTER_CENTER,
                "×",
                egui::FontId::proportional(14.0),
                GOLD,
            );
            if interactive && close.clicked() {
                remove = Some(b.id);
            }
        }
        if let Some(id) = remove {
            self.store.remove(id);
        }

        // Drag preview
        if let Some(pending) = self.store.pending_rect() {
            draw_box(&painter, to_screen(pending, img_rect), self.store.next_id());
        }

        if !interactive {
            return;
        }

        let pointer = response
            .interact_pointer_pos()
            .or(ui.ctx().input(|i| i.pointer.latest_pos()));

        // Drag is reported after a few points of travel; the box starts at the press.
        if response.drag_started_by(egui::PointerButton::Primary) {
            let origin = ui.ctx().input(|i| i.pointer.press_origin());
            if let Some(pos) = origin.filter(|p| img_rect.contains(*p)) {
                self.store.start_drag(to_local(pos, img_rect));
            }
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = pointer {
                self.store.update_drag(to_local(pos, img_rect), frame.bounds());
            }
        }

        if response.drag_stopped_by(egui::PointerButton::Primary) {
            if let Some(pos) = pointer {
                self.store.update_drag(to_local(pos, img_rect), frame.bounds());
            }
            if let Some(id) = self.store.finalize_drag(frame) {
                info!("created box {}", id);
            }
        }
    }

    fn alert_window(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert.clone() else {
            return;
        };
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    self.alert = None;
                }
            });
    }
}

// ── Painting helpers ────────────────────────────────────────────────────────

/// Center the image plus its rulers in the canvas.
fn image_rect_on_screen(canvas_rect: egui::Rect, displayed: Size) -> egui::Rect {
    let size = egui::vec2(displayed.width, displayed.height);
    let with_rulers = size + egui::vec2(RULER_THICKNESS, RULER_THICKNESS);
    let min = canvas_rect.center() - with_rulers * 0.5
        + egui::vec2(RULER_THICKNESS, RULER_THICKNESS);
    egui::Rect::from_min_size(min.round(), size)
}

fn to_local(pos: egui::Pos2, img_rect: egui::Rect) -> ScreenPoint {
    ScreenPoint::new(pos.x - img_rect.min.x, pos.y - img_rect.min.y)
}

fn to_screen(rect: ScreenRect, img_rect: egui::Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        img_rect.min + egui::vec2(rect.left, rect.top),
        egui::vec2(rect.width, rect.height),
    )
}

fn close_button_rect(box_rect: egui::Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(box_rect.max.x - BADGE_SIZE, box_rect.min.y - BADGE_SIZE),
        egui::vec2(BADGE_SIZE, BADGE_SIZE),
    )
}

fn draw_box(painter: &egui::Painter, rect: egui::Rect, id: u32) {
    painter.rect_filled(rect, 0.0, GOLD.gamma_multiply(0.15));
    painter.rect_stroke(rect, 0.0, egui::Stroke::new(2.0, GOLD), egui::StrokeKind::Middle);

    let badge = egui::Rect::from_min_size(
        egui::pos2(rect.min.x, rect.min.y - BADGE_SIZE),
        egui::vec2(BADGE_SIZE + 4.0, BADGE_SIZE),
    );
    painter.rect_filled(badge, 3.0, GOLD);
    painter.text(
        badge.center(),
        egui::Align2::CENTER_CENTER,
        id.to_string(),
        egui::FontId::monospace(12.0),
        RULER_BG,
    );
}

fn draw_rulers(painter: &egui::Painter, img_rect: egui::Rect, frame: ImageFrame) {
    let stroke = egui::Stroke::new(1.0, GOLD);
    let font = egui::FontId::proportional(10.0);
    let sx = frame.displayed.width / frame.original.width;
    let sy = frame.displayed.height / frame.original.height;

    let top = egui::Rect::from_min_size(
        img_rect.min - egui::vec2(0.0, RULER_THICKNESS),
        egui::vec2(img_rect.width(), RULER_THICKNESS),
    );
    painter.rect_filled(top, 0.0, RULER_BG);
    for tick in ticks(frame.original.width as u32) {
        let x = top.min.x + tick.position as f32 * sx + 0.5;
        painter.line_segment(
            [egui::pos2(x, top.min.y), egui::pos2(x, top.min.y + tick.length as f32)],
            stroke,
        );
        if tick.labelled {
            painter.text(
                egui::pos2(x + 2.0, top.max.y - 2.0),
                egui::Align2::LEFT_BOTTOM,
                tick.position.to_string(),
                font.clone(),
                GOLD,
            );
        }
    }

    let left = egui::Rect::from_min_size(
        img_rect.min - egui::vec2(RULER_THICKNESS, 0.0),
        egui::vec2(RULER_THICKNESS, img_rect.height()),
    );
    painter.rect_filled(left, 0.0, RULER_BG);
    for tick in ticks(frame.original.height as u32) {
        let y = left.min.y + tick.position as f32 * sy + 0.5;
        painter.line_segment(
            [egui::pos2(left.min.x, y), egui::pos2(left.min.x + tick.length as f32, y)],
            stroke,
        );
        if tick.labelled {
            let galley = painter.layout_no_wrap(tick.position.to_string(), font.clone(), GOLD);
            let pos = egui::pos2(left.max.x - galley.size().y - 2.0, y + 2.0 + galley.size().x);
            painter.add(
                egui::epaint::TextShape::new(pos, galley, GOLD)
                    .with_angle(-std::f32::consts::FRAC_PI_2),
            );
        }
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl App {
    /// One frame of the whole window.
    fn show(&mut self, ctx: &egui::Context) {
        let interactive = self.alert.is_none();

        if interactive {
            let dropped = ctx.input(|i| i.raw.dropped_files.clone());
            if let Some(file) = dropped.into_iter().next() {
                self.open(ImageSource::Dropped {
                    name: file.name,
                    mime: file.mime,
                    path: file.path,
                    bytes: file.bytes,
                });
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.store.cancel_drag();
            }
        } else {
            // No release reaches the canvas under an alert.
            self.store.cancel_drag();
        }

        self.ensure_texture(ctx);
        self.poll_send(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_enabled_ui(interactive, |ui| self.toolbar(ui));
        });

        egui::SidePanel::right("coords")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(interactive, |ui| self.coord_list(ui));
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::default())
            .show(ctx, |ui| self.canvas(ui, interactive));

        self.alert_window(ctx);
        self.handle_store_events();
        self.save_settings_if_idle(ctx);

        if self.feedback.any_active() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with_image(width: u32, height: u32) -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plate.png");
        image::DynamicImage::new_rgba8(width, height)
            .save(&path)
            .unwrap();
        let app = App::new(
            AppSettings::default(),
            dir.path().join("settings.toml"),
            Some(path),
        );
        assert!(app.alert.is_none());
        (app, dir)
    }

    /// Run one frame with only the canvas, filling a 1100x900 screen.
    fn canvas_frame(ctx: &egui::Context, app: &mut App, events: Vec<egui::Event>) {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1100.0, 900.0),
            )),
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            app.ensure_texture(ctx);
            egui::CentralPanel::default()
                .frame(egui::Frame::default())
                .show(ctx, |ui| app.canvas(ui, true));
        });
    }

    fn button(pos: egui::Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::default(),
        }
    }

    #[test]
    fn dragged_box_starts_at_press_point() {
        // 1000x800 fits the 1100x900 canvas at 1:1, image top-left at (65, 65).
        let (mut app, _dir) = app_with_image(1000, 800);
        let ctx = egui::Context::default();
        let start = egui::pos2(165.0, 165.0);
        let end = start + egui::vec2(100.0, 80.0);

        canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(start)]);
        canvas_frame(&ctx, &mut app, vec![button(start, true)]);
        for step in 1..=20 {
            let p = start + egui::vec2(5.0, 4.0) * step as f32;
            canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(p)]);
        }
        canvas_frame(&ctx, &mut app, vec![button(end, false)]);
        canvas_frame(&ctx, &mut app, vec![]);

        assert_eq!(app.store.len(), 1);
        let g = app.store.list()[0].geometry;
        assert_eq!((g.x, g.y, g.w, g.h), (150.0, 140.0, 100.0, 80.0));
    }

    #[test]
    fn press_near_image_edge_dragged_outward_still_counts() {
        let (mut app, _dir) = app_with_image(1000, 800);
        let ctx = egui::Context::default();
        // Local (995, 795), five pixels in from the bottom-right corner.
        let start = egui::pos2(1060.0, 860.0);

        canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(start)]);
        canvas_frame(&ctx, &mut app, vec![button(start, true)]);
        for step in 1..=3 {
            let p = start + egui::vec2(10.0, 10.0) * step as f32;
            canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(p)]);
        }
        canvas_frame(&ctx, &mut app, vec![button(egui::pos2(1090.0, 890.0), false)]);

        assert_eq!(app.store.len(), 1);
        let g = app.store.list()[0].geometry;
        assert_eq!((g.x, g.y, g.w, g.h), (997.5, 797.5, 5.0, 5.0));
    }

    #[test]
    fn alert_cancels_drag_in_progress() {
        let (mut app, _dir) = app_with_image(200, 100);
        app.store.start_drag(ScreenPoint::new(10.0, 10.0));
        app.store.update_drag(
            ScreenPoint::new(60.0, 60.0),
            ScreenRect::new(0.0, 0.0, 200.0, 100.0),
        );
        app.alert = Some("Sending failed".to_string());

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| app.show(ctx));

        assert!(!app.store.is_dragging());
        assert_eq!(app.store.pending_rect(), None);
        assert!(app.store.is_empty());
    }

    #[test]
    fn image_is_centered_with_rulers() {
        let canvas = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(630.0, 530.0));
        let rect = image_rect_on_screen(canvas, Size::new(500.0, 400.0));
        assert_eq!(rect.min, egui::pos2(80.0, 80.0));
        assert_eq!(rect.size(), egui::vec2(500.0, 400.0));
    }

    #[test]
    fn local_and_screen_coordinates_agree() {
        let img_rect = egui::Rect::from_min_size(egui::pos2(80.0, 60.0), egui::vec2(500.0, 400.0));
        let p = to_local(egui::pos2(180.0, 160.0), img_rect);
        assert_eq!(p, ScreenPoint::new(100.0, 100.0));

        let r = to_screen(ScreenRect::new(100.0, 100.0, 100.0, 80.0), img_rect);
        assert_eq!(r.min, egui::pos2(180.0, 160.0));
        assert_eq!(r.max, egui::pos2(280.0, 240.0));
    }

    #[test]
    fn row_feedback_expires() {
        let mut fb = Feedback::default();
        assert!(!fb.row_done(1));
        fb.row_copied = Some((1, Instant::now()));
        assert!(fb.row_done(1));
        assert!(!fb.row_done(2));
        assert!(fb.any_active());
    }
}
