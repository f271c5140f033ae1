mod app;
mod state;
mod ui;

use std::path::PathBuf;

use app::LimeSodaApp;
use eframe::egui;

/// Environment variable naming the folder with dataset containers.
const DATA_DIR_ENV: &str = "LIMESODA_DATA";

fn main() -> eframe::Result {
    env_logger::init();

    let data_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from));

    let mut app = LimeSodaApp::default();
    if let Some(dir) = &data_dir {
        app.state.open_dir(dir);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "LimeSoDa – Soil Dataset Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
