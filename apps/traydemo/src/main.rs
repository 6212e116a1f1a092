//! traydemo entry point.

mod clipboard;
mod config;
mod desktop;
mod notification;
mod resources;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting traydemo");

    run().inspect_err(|e| tracing::error!("fatal: {e:#}"))
}

fn run() -> anyhow::Result<()> {
    let config = config::Config::load()?;
    tracing::info!(app = %config.app_name, "configuration loaded");

    // Resources are opened relative to the executable, not the launch directory.
    let dir = resources::enter_resource_dir(&config.resource_dir)?;
    tracing::info!(dir = %dir.display(), "entered resource directory");

    let icons = traydemo_icons::load_icns(&config.icon_file).with_context(|| {
        format!(
            "failed to load icon container {}",
            config.icon_file.display()
        )
    })?;
    tracing::info!(entries = icons.len(), "icon container loaded");

    let rt = tokio::runtime::Runtime::new()?;
    let tray = desktop::DesktopRuntime::new();
    traydemo_tray::launch(tray, icons, &config.launch_options(), rt.handle())?;

    tracing::info!("traydemo shut down cleanly");
    Ok(())
}
