//! Desktop notifications backed by `notify-rust`.

use std::fmt::Display;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tempfile::TempPath;
use traydemo_tray::{HostError, Image, Notification};

/// Whether the platform backend reports clicks and dismissals.
pub const REPORTS_ACTIVATION: bool = cfg!(all(unix, not(target_os = "macos")));

/// How long a staged image outlives the notification where the backend
/// cannot tell when it went away.
#[cfg(not(all(unix, not(target_os = "macos"))))]
const IMAGE_LINGER: Duration = Duration::from_secs(30);

/// Shows `notification`.
///
/// `finished` runs on a helper thread once the notification goes away, with
/// `true` when the user clicked it. It never runs unless
/// [`REPORTS_ACTIVATION`] is set.
pub fn show(
    notification: &Notification,
    id: u64,
    finished: impl FnOnce(bool) + Send + 'static,
) -> Result<(), HostError> {
    let mut native = notify_rust::Notification::new();
    native
        .summary(&notification.title)
        .body(&notification.body)
        .timeout(timeout(notification.timeout));

    let staged = stage_image(&notification.image, &std::env::temp_dir(), id);
    if let Some(path) = &staged {
        native.icon(&path.to_string_lossy());
    }

    dispatch(native, staged, finished)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn dispatch(
    mut native: notify_rust::Notification,
    staged: Option<TempPath>,
    finished: impl FnOnce(bool) + Send + 'static,
) -> Result<(), HostError> {
    native.action("default", "Open");
    let (handle, staged) = display(staged, || native.show())?;

    // Blocks until the notification is closed, so it gets its own thread.
    std::thread::spawn(move || {
        handle.wait_for_action(|action| finished(action == "default"));
        drop(staged);
    });
    Ok(())
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn dispatch(
    native: notify_rust::Notification,
    staged: Option<TempPath>,
    _finished: impl FnOnce(bool) + Send + 'static,
) -> Result<(), HostError> {
    let (_, staged) = display(staged, || native.show())?;
    if let Some(staged) = staged {
        std::thread::spawn(move || {
            std::thread::sleep(IMAGE_LINGER);
            drop(staged);
        });
    }
    Ok(())
}

/// Runs `show`, handing the staged image back on success. On failure the
/// image is removed before the error is returned.
fn display<T, E: Display>(
    staged: Option<TempPath>,
    show: impl FnOnce() -> Result<T, E>,
) -> Result<(T, Option<TempPath>), HostError> {
    match show() {
        Ok(shown) => Ok((shown, staged)),
        Err(e) => {
            drop(staged);
            Err(HostError::Notification(e.to_string()))
        }
    }
}

fn timeout(duration: Duration) -> notify_rust::Timeout {
    if duration.is_zero() {
        return notify_rust::Timeout::Default;
    }
    let ms = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
    notify_rust::Timeout::Milliseconds(ms)
}

/// Writes the image to a temporary file in `dir` so the notification server
/// can load it by path. The file is deleted when the returned path drops.
///
/// Returns `None` for an empty image or when the file cannot be written.
fn stage_image(image: &Image, dir: &Path, id: u64) -> Option<TempPath> {
    if image.is_empty() || image.bytes.is_empty() {
        return None;
    }

    let ext: String = image
        .kind
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    let ext = if ext.is_empty() { "img".to_string() } else { ext };

    let staged = tempfile::Builder::new()
        .prefix(&format!("traydemo-{id}-"))
        .suffix(&format!(".{ext}"))
        .tempfile_in(dir)
        .and_then(|mut file| {
            file.write_all(&image.bytes)?;
            file.flush()?;
            Ok(file.into_temp_path())
        });

    match staged {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), "failed to stage notification image: {e}");
            None
        }
    }
}
