use std::path::PathBuf;

use anyhow::{anyhow, Result};
use eframe::egui;
use tracing::{info, warn};

use box_picker::app::App;
use box_picker::config::{AppSettings, SETTINGS_FILE};
use box_picker::logging;

// ── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    logging::init_logs()?;

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: box-picker [image.png|jpg]");
        std::process::exit(1);
    }

    let image_path = args.get(1).map(PathBuf::from);
    if let Some(ref path) = image_path {
        if !path.exists() {
            warn!("File not found: {}", path.display());
        }
    }

    let settings_path = PathBuf::from(SETTINGS_FILE);
    let settings = AppSettings::load_or_default(&settings_path);
    info!("box-picker {} starting", env!("CARGO_PKG_VERSION"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([640.0, 400.0])
            .with_drag_and_drop(true)
            .with_title("box-picker"),
        ..Default::default()
    };

    eframe::run_native(
        "box-picker",
        options,
        Box::new(move |_cc| Ok(Box::new(App::new(settings, settings_path, image_path)))),
    )
    .map_err(|e| anyhow!("Failed to run eframe: {e}"))
}
