use anyhow::Context;
use cylinder_viewer::{ViewerApp, ViewerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::from_env().context("invalid viewer configuration")?;
    log::info!(
        "Starting viewer: {} segments, height {}",
        config.cylinder.segments,
        config.cylinder.height
    );

    ViewerApp::new(config)
        .context("failed to build the scene")?
        .run()
        .context("viewer stopped with an error")
}
