// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod drivers;
mod engine;
mod gui;
mod settings;
mod snapshot;
mod types;
use std::path::PathBuf;
use eframe::egui;
use settings::{ViewerSettings, DEFAULT_SETTINGS_FILE};
fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let settings_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let settings = ViewerSettings::load_or_default(&settings_path);
    log::info!(
        "stream {} ({:?}), colormap {}",
        settings.stream_url,
        settings.connection_mode,
        settings.colormap
    );
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1280.0, 800.0])
        .with_min_inner_size([800.0, 500.0])
        .with_title("Echo Waterfall");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "echoview",
        options,
        Box::new(move |_cc| Box::new(gui::WaterfallApp::new(settings, settings_path))),
    )
}
