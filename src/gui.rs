// src/gui.rs
use eframe::egui;
use egui::{Color32, ColorImage, Pos2, Rect, Stroke, TextureHandle, TextureOptions, Vec2};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use crate::drivers::{render_waterfall_png, Palette, PlotStyle, SpectrogramSession};
use crate::engine;
use crate::settings::ViewerSettings;
use crate::snapshot::save_snapshot;
use crate::types::*;

const LOG_LINES: usize = 8;

pub struct WaterfallApp {
    // state
    is_connected: bool,
    connection_mode: ConnectionMode,
    stream_url: String,
    palette: Palette,
    session: SpectrogramSession,

    // display
    texture: Option<TextureHandle>,
    texture_dirty: bool,

    // settings / log
    settings: ViewerSettings,
    settings_path: PathBuf,
    log_messages: Vec<String>,

    // channels
    rx: Receiver<EngineMessage>,
    tx_cmd: Sender<GuiCommand>,
}

impl WaterfallApp {
    pub fn new(settings: ViewerSettings, settings_path: PathBuf) -> Self {
        let (tx, rx) = channel();
        let (tx_cmd, rx_cmd) = channel();

        // background engine
        engine::spawn_thread(tx, rx_cmd, settings.read_timeout());

        let palette = settings.palette();
        Self {
            is_connected: false,
            connection_mode: settings.connection_mode,
            stream_url: settings.stream_url.clone(),
            palette,
            // sized on the first frame
            session: SpectrogramSession::new(0, 0, Box::new(palette)),
            texture: None,
            texture_dirty: true,
            settings,
            settings_path,
            log_messages: vec!["Echo waterfall ready.".to_owned()],
            rx,
            tx_cmd,
        }
    }

    fn log(&mut self, msg: &str) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > LOG_LINES {
            self.log_messages.remove(0);
        }
    }

    fn drain_engine(&mut self) {
        // Every column is applied in arrival order; nothing is skipped.
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                EngineMessage::Log(s) => self.log(&s),
                EngineMessage::Status(b) => self.is_connected = b,
                EngineMessage::Column(column) => match self.session.handle_message(&column) {
                    Ok(()) => self.texture_dirty = true,
                    Err(e) => {
                        log::warn!("update dropped: {e}");
                        self.log(&format!("Update dropped: {e}"));
                    }
                },
            }
        }
    }

    fn take_snapshot(&self) -> anyhow::Result<PathBuf> {
        let png = render_waterfall_png(
            self.session.frame(),
            &self.session.mapper(),
            &PlotStyle::default(),
        )?;
        save_snapshot(&png, &self.settings.snapshot_dir())
    }

    fn save_settings(&mut self) -> anyhow::Result<&Path> {
        self.settings.stream_url = self.stream_url.clone();
        self.settings.connection_mode = self.connection_mode;
        self.settings.colormap = self.palette.name().to_owned();
        self.settings.save(&self.settings_path)?;
        Ok(&self.settings_path)
    }

    fn upload_texture(&mut self, ctx: &egui::Context) {
        let frame = self.session.frame();
        let (w, h) = frame.size();
        if w == 0 || h == 0 {
            self.texture = None;
            return;
        }
        if !self.texture_dirty && self.texture.is_some() {
            return;
        }
        let image = ColorImage::from_rgba_unmultiplied([w, h], frame.as_rgba());
        match &mut self.texture {
            Some(handle) => handle.set(image, TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("waterfall", image, TextureOptions::NEAREST))
            }
        }
        self.texture_dirty = false;
    }

    fn side_panel(&mut self, ui: &mut egui::Ui) {
        ui.add_space(10.0);
        ui.heading("Echo Waterfall");
        ui.label("Live sonar spectrogram");
        ui.separator();

        ui.horizontal(|ui| {
            for mode in [ConnectionMode::Live, ConnectionMode::Simulation] {
                ui.selectable_value(&mut self.connection_mode, mode, mode.label());
            }
        });
        ui.add_enabled(
            self.connection_mode == ConnectionMode::Live && !self.is_connected,
            egui::TextEdit::singleline(&mut self.stream_url),
        );

        let btn_txt = if self.is_connected { "DISCONNECT" } else { "CONNECT" };
        if ui.button(btn_txt).clicked() {
            let cmd = if self.is_connected {
                GuiCommand::Disconnect
            } else {
                GuiCommand::Connect {
                    mode: self.connection_mode,
                    url: self.stream_url.trim().to_owned(),
                }
            };
            self.tx_cmd.send(cmd).ok();
        }

        ui.add_space(10.0);
        let before = self.palette;
        egui::ComboBox::from_label("Colormap")
            .selected_text(self.palette.name())
            .show_ui(ui, |ui| {
                for p in Palette::ALL {
                    ui.selectable_value(&mut self.palette, p, p.name());
                }
            });
        if self.palette != before {
            self.session.set_colormap(Box::new(self.palette));
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui.button("ZOOM IN").clicked() && self.session.zoom_in() {
                self.texture_dirty = true;
            }
            if ui.button("ZOOM OUT").clicked() && self.session.zoom_out() {
                self.texture_dirty = true;
            }
        });
        ui.label(format!(
            "Range: {} m ({})",
            self.session.range_label(),
            self.session.zoom_mode().label()
        ));
        ui.label(self.session.depth_label());
        let telemetry = self.session.telemetry();
        ui.label(match telemetry.temperature {
            Some(t) => format!("Temp: {:.1} °C", t),
            None => "Temp: -- °C".to_owned(),
        });
        ui.label(match telemetry.drive_voltage {
            Some(v) => format!("Drive: {:.2} V", v),
            None => "Drive: -- V".to_owned(),
        });

        ui.add_space(10.0);
        if ui.button("CLEAR VIEW").clicked() {
            self.session.clear();
            self.texture_dirty = true;
        }
        if ui.button("SNAPSHOT").clicked() {
            match self.take_snapshot() {
                Ok(path) => self.log(&format!("Saved {}", path.display())),
                Err(e) => {
                    log::error!("snapshot failed: {e:#}");
                    self.log(&format!("Snapshot failed: {e}"));
                }
            }
        }
        if ui.button("SAVE SETTINGS").clicked() {
            let result = self.save_settings().map(|p| p.display().to_string());
            match result {
                Ok(path) => self.log(&format!("Settings saved to {path}")),
                Err(e) => {
                    log::error!("saving settings failed: {e:#}");
                    self.log(&format!("Save failed: {e}"));
                }
            }
        }

        ui.add_space(10.0);
        egui::ScrollArea::vertical().max_height(140.0).show(ui, |ui| {
            for m in &self.log_messages {
                ui.monospace(m);
            }
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let size = ui.available_size();
        let (width, height) = (size.x.max(0.0) as usize, size.y.max(0.0) as usize);
        // a panel size change is a viewport resize
        if self.session.frame().size() != (width, height) {
            self.session.resize(width, height);
            self.texture_dirty = true;
        }
        self.upload_texture(ui.ctx());

        let (rect, response) =
            ui.allocate_exact_size(Vec2::new(width as f32, height as f32), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::BLACK);
        if let Some(texture) = &self.texture {
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }

        let font = egui::FontId::monospace(12.0);
        for tick in self.session.ticks() {
            let y = rect.top() + tick.row as f32;
            painter.line_segment(
                [Pos2::new(rect.left(), y), Pos2::new(rect.left() + 8.0, y)],
                Stroke::new(1.0, Color32::WHITE),
            );
            let align = if tick.row == 0 {
                egui::Align2::LEFT_TOP
            } else if tick.row + 1 >= height {
                egui::Align2::LEFT_BOTTOM
            } else {
                egui::Align2::LEFT_CENTER
            };
            painter.text(Pos2::new(rect.left() + 10.0, y), align, &tick.label, font.clone(), Color32::WHITE);
        }

        let pointer_row = response
            .hover_pos()
            .map(|pos| (pos.y - rect.top()).clamp(0.0, rect.height()) as f64);
        let readout = self.session.cursor(pointer_row);
        if let Some(row) = readout.row {
            let y = rect.top() + row as f32;
            painter.line_segment(
                [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 200)),
            );
        }
        painter.text(
            rect.right_top() + Vec2::new(-10.0, 10.0),
            egui::Align2::RIGHT_TOP,
            &readout.label,
            egui::FontId::monospace(14.0),
            Color32::YELLOW,
        );
    }
}

impl eframe::App for WaterfallApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 1. engine messages
        self.drain_engine();
        if self.is_connected {
            ctx.request_repaint();
        }

        // 2. UI
        let mut visuals = egui::Visuals::dark();
        visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(10, 10, 15);
        ctx.set_visuals(visuals);

        egui::SidePanel::left("controls").min_width(240.0).show(ctx, |ui| {
            self.side_panel(ui);
        });
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| self.canvas(ui));
    }
}
