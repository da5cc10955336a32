use eframe::egui;
use log::{
    error,
    info,
};
use sentiment_dashboard::gui::DashboardApp;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting Sentiment Dashboard v{}", env!("CARGO_PKG_VERSION"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Sentiment Dashboard")
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([800.0, 560.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "Sentiment Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc)))),
    ) {
        error!("Failed to start the dashboard: {}", e);
        std::process::exit(1);
    }
}
