#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod toolbar;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("egui", log::LevelFilter::Info)
        .filter_module("eframe", log::LevelFilter::Warn)
        .format_timestamp_millis()
        .init();
    log::info!("gantt timeline demo starting");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Gantt Timeline"),
        ..Default::default()
    };

    eframe::run_native(
        "Gantt Timeline",
        options,
        Box::new(|cc| Ok(Box::new(app::TimelineDemoApp::new(cc)))),
    )
}
