mod app;

use anyhow::{anyhow, Context as _};
use app::DualPlayerApp;
use dual_video::ShellConfig;
use eframe::NativeOptions;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("dual_video=info"))
        .init();

    ffmpeg_next::init().context("Failed to initialize FFmpeg")?;

    let config = ShellConfig::default();
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Dual Video Player")
            .with_inner_size(config.initial_window)
            .with_min_inner_size(config.min_window),
        ..Default::default()
    };

    eframe::run_native(
        "Dual Video Player",
        options,
        Box::new(|cc| Ok(Box::new(DualPlayerApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("Failed to run app: {e}"))
}
