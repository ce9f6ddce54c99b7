use crate::config::{EditorConfig, ToolStyles};
use crate::editor::Editor;
use crate::error::EditorError;
use crate::mapper::{CoordinateMapper, ImagePoint};
use crate::raster::LabelFont;
use crate::render::{self, Preview};
use crate::shapes::Annotation;
use crate::tools::{Gesture, Tool, ToolAction, ToolDispatcher};
use eframe::egui;
use std::path::{Path, PathBuf};

const APP_TITLE: &str = "Image Annotation Tool";

// ── Modal state ─────────────────────────────────────────────────────────────

struct TextPrompt {
    position: ImagePoint,
    buffer: String,
}

#[derive(Clone, Copy, PartialEq)]
enum NoticeKind {
    Info,
    Error,
}

struct Notice {
    kind: NoticeKind,
    title: String,
    message: String,
}

#[derive(Clone, Copy)]
enum Shortcut {
    Undo,
    Redo,
    Open,
    Save,
    Cancel,
}

// ── App ─────────────────────────────────────────────────────────────────────

pub struct AnnotatorApp {
    config: EditorConfig,
    editor: Editor,
    tools: ToolDispatcher,
    font: Option<LabelFont>,

    preview: Option<Preview>,
    texture: Option<egui::TextureHandle>,
    // transient drag shape, painted in screen space only
    live: Option<Annotation>,

    text_prompt: Option<TextPrompt>,
    notice: Option<Notice>,
    last_distance: Option<f32>,
    title_dirty: bool,
}

impl AnnotatorApp {
    pub fn new(config: EditorConfig, image_path: Option<PathBuf>) -> Self {
        let font = LabelFont::egui_default();
        if font.is_none() {
            log::warn!("No label font available; text stamps will be skipped");
        }
        let mut app = Self {
            editor: Editor::new(config.max_history),
            config,
            tools: ToolDispatcher::default(),
            font,
            preview: None,
            texture: None,
            live: None,
            text_prompt: None,
            notice: None,
            last_distance: None,
            title_dirty: true,
        };
        if let Some(path) = image_path {
            app.load_path(&path);
        }
        app
    }

    fn modal_open(&self) -> bool {
        self.text_prompt.is_some() || self.notice.is_some()
    }

    fn report(&mut self, err: EditorError) {
        log::error!("{err}");
        self.notice = Some(Notice {
            kind: NoticeKind::Error,
            title: err.title().to_string(),
            message: err.to_string(),
        });
    }

    /// Rebuild the scaled preview; the texture is re-uploaded next frame.
    fn refresh(&mut self) {
        self.preview = self
            .editor
            .image()
            .map(|img| render::refresh(img, self.config.viewport));
        self.texture = None;
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        if let Some(ref preview) = self.preview {
            self.texture = Some(ctx.load_texture(
                "preview",
                preview.to_color_image(),
                egui::TextureOptions::LINEAR,
            ));
        }
    }

    // ── File operations ─────────────────────────────────────────────────────

    fn load_path(&mut self, path: &Path) {
        match self.editor.load(path) {
            Ok(()) => {
                self.tools.cancel();
                self.live = None;
                self.last_distance = None;
                self.title_dirty = true;
                self.refresh();
            }
            Err(err) => self.report(err),
        }
    }

    fn open_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file();
        if let Some(path) = picked {
            self.load_path(&path);
        }
    }

    fn save_dialog(&mut self) {
        if self.editor.image().is_none() {
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("annotated.png")
            .add_filter("PNG", &["png"])
            .add_filter("JPEG", &["jpg", "jpeg"])
            .save_file()
        else {
            return;
        };
        match self.editor.save(&path) {
            Ok(written) => {
                self.notice = Some(Notice {
                    kind: NoticeKind::Info,
                    title: "Saved".to_string(),
                    message: format!("Annotated image saved to {}", written.display()),
                });
            }
            Err(err) => self.report(err),
        }
    }

    // ── Editing ─────────────────────────────────────────────────────────────

    fn select_tool(&mut self, tool: Option<Tool>) {
        self.tools.select(tool);
        self.live = None;
    }

    fn undo(&mut self) {
        if self.editor.undo() {
            self.live = None;
            self.refresh();
        }
    }

    fn redo(&mut self) {
        if self.editor.redo() {
            self.live = None;
            self.refresh();
        }
    }

    fn reset(&mut self) {
        if self.editor.reset() {
            self.tools.cancel();
            self.live = None;
            self.refresh();
        }
    }

    fn commit(&mut self, annotation: Annotation) {
        let styles = &self.config.styles;
        let font = self.font.as_ref();
        if self.editor.commit(|img| annotation.stamp(img, styles, font)) {
            if let Some(distance) = annotation.measured_distance() {
                log::info!("Measured {distance:.2}px");
                self.last_distance = Some(distance);
            }
            log::info!("Committed {}", annotation.name());
            self.refresh();
        }
    }

    fn apply(&mut self, action: ToolAction) {
        match action {
            ToolAction::Nothing => {}
            ToolAction::Preview(shape) => self.live = Some(shape),
            ToolAction::Commit(shape) => {
                self.live = None;
                self.commit(shape);
            }
            ToolAction::PromptText(position) => {
                self.text_prompt = Some(TextPrompt {
                    position,
                    buffer: String::new(),
                });
            }
        }
    }

    // ── Input ───────────────────────────────────────────────────────────────

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.modal_open() {
            return;
        }
        let shortcut = ctx.input(|i| {
            let command = i.modifiers.command;
            if command && i.key_pressed(egui::Key::Z) {
                Some(if i.modifiers.shift {
                    Shortcut::Redo
                } else {
                    Shortcut::Undo
                })
            } else if command && i.key_pressed(egui::Key::Y) {
                Some(Shortcut::Redo)
            } else if command && i.key_pressed(egui::Key::O) {
                Some(Shortcut::Open)
            } else if command && i.key_pressed(egui::Key::S) {
                Some(Shortcut::Save)
            } else if i.key_pressed(egui::Key::Escape) {
                Some(Shortcut::Cancel)
            } else {
                None
            }
        });
        match shortcut {
            Some(Shortcut::Undo) => self.undo(),
            Some(Shortcut::Redo) => self.redo(),
            Some(Shortcut::Open) => self.open_dialog(),
            Some(Shortcut::Save) => self.save_dialog(),
            Some(Shortcut::Cancel) => {
                self.tools.cancel();
                self.live = None;
            }
            None => {}
        }
    }

    fn handle_pointer(
        &mut self,
        ctx: &egui::Context,
        response: &egui::Response,
        origin: egui::Pos2,
        mapper: CoordinateMapper,
    ) {
        let (pressed, down, released, pos) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.latest_pos(),
            )
        });
        let Some(pos) = pos else {
            return;
        };
        let point = mapper.to_image_space(pos.x - origin.x, pos.y - origin.y);

        if pressed && response.contains_pointer() {
            let action = self.tools.press(point);
            self.apply(action);
        } else if down && matches!(self.tools.gesture(), Gesture::Dragging { .. }) {
            let action = self.tools.drag(point);
            self.apply(action);
        }
        if released {
            let action = self.tools.release(point);
            self.apply(action);
        }
    }

    // ── Painting ────────────────────────────────────────────────────────────

    fn paint_live(
        &self,
        painter: &egui::Painter,
        origin: egui::Pos2,
        mapper: CoordinateMapper,
    ) {
        let to_screen = |p: ImagePoint| {
            let (x, y) = mapper.to_screen_space(p);
            origin + egui::vec2(x, y)
        };

        if let Gesture::AwaitingSecondPoint { first } = self.tools.gesture() {
            let color = self.config.styles.measure_line.color.to_egui();
            painter.circle_filled(to_screen(first), 3.0, color);
        }

        let Some(ref shape) = self.live else {
            return;
        };
        let styles: &ToolStyles = &self.config.styles;
        match shape {
            Annotation::Rectangle { corner_a, corner_b } => {
                painter.rect_stroke(
                    egui::Rect::from_two_pos(to_screen(*corner_a), to_screen(*corner_b)),
                    0.0,
                    egui::Stroke::new(1.5, styles.rectangle.color.to_egui()),
                    egui::StrokeKind::Middle,
                );
            }
            Annotation::Line { start, end } => {
                painter.line_segment(
                    [to_screen(*start), to_screen(*end)],
                    egui::Stroke::new(1.5, styles.line.color.to_egui()),
                );
            }
            Annotation::Circle { center, radius } => {
                painter.circle_stroke(
                    to_screen(*center),
                    mapper.to_screen_length(*radius),
                    egui::Stroke::new(1.5, styles.circle.color.to_egui()),
                );
            }
            Annotation::Text { .. } | Annotation::Measurement { .. } => {}
        }
    }

    // ── Panels and windows ──────────────────────────────────────────────────

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Load Image").clicked() {
                self.open_dialog();
            }
            ui.separator();
            for tool in Tool::ALL {
                let active = self.tools.tool() == Some(tool);
                if ui.selectable_label(active, tool.label()).clicked() {
                    self.select_tool(if active { None } else { Some(tool) });
                }
            }
            ui.separator();
            if ui
                .add_enabled(self.editor.can_undo(), egui::Button::new("Undo"))
                .clicked()
            {
                self.undo();
            }
            if ui
                .add_enabled(self.editor.can_redo(), egui::Button::new("Redo"))
                .clicked()
            {
                self.redo();
            }
            let loaded = self.editor.image().is_some();
            if ui.add_enabled(loaded, egui::Button::new("Reset")).clicked() {
                self.reset();
            }
            if ui
                .add_enabled(loaded, egui::Button::new("Save image"))
                .clicked()
            {
                self.save_dialog();
            }
        });
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let tool = self.tools.tool().map_or("None", Tool::label);
            ui.label(format!("Tool: {tool}"));
            if let Some(ref preview) = self.preview {
                let (width, height) = preview.mapper.image_size();
                ui.separator();
                ui.label(format!("{width}x{height}"));
                ui.separator();
                ui.label(format!("Scale: {:.0}%", preview.mapper.scale() * 100.0));
            }
            ui.separator();
            ui.label(format!(
                "History: {} undo / {} redo",
                self.editor.undo_len(),
                self.editor.redo_len()
            ));
            if let Some(distance) = self.last_distance {
                ui.separator();
                ui.label(format!("Last measurement: {distance:.2}px"));
            }
        });
    }

    fn canvas(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let viewport = self.config.viewport;
        let (response, painter) = ui.allocate_painter(
            egui::vec2(viewport.width, viewport.height),
            egui::Sense::click_and_drag(),
        );
        let canvas_rect = response.rect;
        let origin = canvas_rect.min;

        painter.rect_filled(canvas_rect, 0.0, egui::Color32::GRAY);

        let Some(mapper) = self.preview.as_ref().map(|p| p.mapper) else {
            painter.text(
                canvas_rect.center(),
                egui::Align2::CENTER_CENTER,
                "Load an image to start annotating",
                egui::FontId::proportional(18.0),
                egui::Color32::from_gray(40),
            );
            return;
        };

        if let Some(ref tex) = self.texture {
            let (width, height) = mapper.display_size();
            painter.image(
                tex.id(),
                egui::Rect::from_min_size(origin, egui::vec2(width as f32, height as f32)),
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        if !self.modal_open() {
            self.handle_pointer(ctx, &response, origin, mapper);
        }
        self.paint_live(&painter, origin, mapper);
    }

    fn show_text_prompt(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.text_prompt.as_mut() else {
            return;
        };
        let mut confirmed = None;
        egui::Window::new("Text")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Enter label:");
                let field = ui.text_edit_singleline(&mut prompt.buffer);
                let entered = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                field.request_focus();
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() || entered {
                        confirmed = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        confirmed = Some(false);
                    }
                });
            });
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            confirmed = Some(false);
        }

        if let Some(confirmed) = confirmed {
            self.finish_text_prompt(confirmed);
        }
    }

    /// Close the text prompt. Only a confirmed, non-empty label is stamped.
    fn finish_text_prompt(&mut self, confirmed: bool) {
        let Some(prompt) = self.text_prompt.take() else {
            return;
        };
        if confirmed && !prompt.buffer.is_empty() {
            self.commit(Annotation::Text {
                position: prompt.position,
                content: prompt.buffer,
            });
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(ref notice) = self.notice else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let text = egui::RichText::new(notice.message.as_str());
                ui.label(match notice.kind {
                    NoticeKind::Error => text.color(egui::Color32::from_rgb(200, 40, 40)),
                    NoticeKind::Info => text,
                });
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if ctx.input(|i| i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Escape)) {
            dismissed = true;
        }
        if dismissed {
            self.notice = None;
        }
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        if !self.title_dirty {
            return;
        }
        self.title_dirty = false;
        let title = match self.editor.source_path().and_then(|p| p.file_name()) {
            Some(name) => format!("{APP_TITLE} - {}", name.to_string_lossy()),
            None => APP_TITLE.to_string(),
        };
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_title(ctx);
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_bar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ensure_texture(ctx);
            self.canvas(ctx, ui);
        });

        self.show_text_prompt(ctx);
        self.show_notice(ctx);

        if self.texture.is_none() && self.preview.is_some() {
            ctx.request_repaint();
        }
    }
}
