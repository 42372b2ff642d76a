mod app;
mod color;
mod dashboards;
mod engine;
mod export;
mod state;
mod ui;

use app::DataHubApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 840.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Analytics Hub",
        options,
        Box::new(|_cc| Ok(Box::new(DataHubApp::default()))),
    )
}
