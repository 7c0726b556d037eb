use clap::Parser;
use eframe::egui;

use rusty_gigs::app::RustyGigsApp;
use rusty_gigs::config::Config;
use rusty_gigs::data::loader::load_file;
use rusty_gigs::state::AppState;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    // The table is read once here and shared read-only from then on.
    let loaded = load_file(&config.data);
    if let Err(e) = &loaded {
        log::error!("Failed to load {}: {e}", config.data.display());
    }
    let state = AppState::new(config, loaded);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Gigs – Job Market Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(RustyGigsApp::new(state)))),
    )
}
