mod app;
mod config;
mod data;
mod error;
mod playback;
mod render;
mod review;
mod state;
mod ui;

use std::path::Path;

use app::SignalReviewerApp;
use config::{CONFIG_FILE_NAME, ReviewConfig};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ReviewConfig::load_or_default(Path::new(CONFIG_FILE_NAME));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Review",
        options,
        Box::new(|_cc| Ok(Box::new(SignalReviewerApp::new(config)))),
    )
}
