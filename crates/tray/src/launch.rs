//! Startup sequence: menu, host registration, animator, host loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use traydemo_icons::IconSet;

use crate::TrayError;
use crate::animator::{DEFAULT_INTERVAL, StatusAnimator};
use crate::controller::{ReportFn, TrayController, stdout_reporter};
use crate::host::TrayRuntime;

/// Settings for one tray session.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Name registered with the host.
    pub app_name: String,
    /// Delay between status icon pushes.
    pub animation_interval: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            app_name: "Example App".into(),
            animation_interval: DEFAULT_INTERVAL,
        }
    }
}

/// Runs the tray until the host loop exits, reporting to stdout.
pub fn launch<R: TrayRuntime>(
    runtime: R,
    icons: IconSet,
    options: &LaunchOptions,
    handle: &Handle,
) -> Result<(), TrayError> {
    launch_with_reporter(runtime, icons, options, handle, stdout_reporter())
}

/// Runs the tray until the host loop exits.
///
/// The icon set is fully loaded before anything can read it; the host is
/// initialized before the animator starts; the animator is cancelled and
/// joined once the loop returns. Must be called outside the tokio runtime.
pub fn launch_with_reporter<R: TrayRuntime>(
    mut runtime: R,
    icons: IconSet,
    options: &LaunchOptions,
    handle: &Handle,
    report: ReportFn,
) -> Result<(), TrayError> {
    let icons = Arc::new(icons);
    let host = runtime.host();

    let menu = TrayController::new(Arc::clone(&host), Arc::clone(&icons))
        .with_reporter(report)
        .build_menu();
    runtime.initialize(&options.app_name, icons.default_icon().data(), menu)?;
    tracing::info!(app = %options.app_name, icons = icons.len(), "tray initialized");

    let cancel = CancellationToken::new();
    let animator = StatusAnimator::new(
        host,
        icons.default_icon().data().to_vec(),
        options.animation_interval,
    )
    .spawn(handle, cancel.clone());

    let result = runtime.enter_loop();
    tracing::info!("tray loop exited, stopping animator");

    cancel.cancel();
    let joined = handle.block_on(animator);

    // A loop failure outranks an animator failure.
    if let Err(e) = result {
        if let Err(join_err) = joined {
            tracing::error!("status animator failed: {join_err}");
        }
        return Err(e.into());
    }
    joined?;
    Ok(())
}
