//! Contract between the tray controller and the host tray runtime.
//!
//! The host owns the OS integration and the main loop. The controller only
//! hands it a menu once, then reacts to the callbacks the host invokes.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::HostError;
use crate::menu::MenuItem;

/// Zero-argument callback invoked by the host on its own loop.
pub type Callback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Encoded image bytes tagged with their format.
///
/// An empty `kind` means no image is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    /// Format tag, e.g. `"png"`.
    pub kind: String,
    pub bytes: Vec<u8>,
}

impl Image {
    pub fn new(kind: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            kind: kind.into(),
            bytes,
        }
    }

    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new("png", bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }
}

/// Snapshot of the clipboard, produced on demand by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardContent {
    pub text: String,
    pub image: Image,
    pub files: Vec<PathBuf>,
}

/// A desktop notification handed to the host for display.
#[derive(Clone)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub timeout: Duration,
    pub image: Image,
    /// Invoked on the host loop when the user clicks the notification.
    pub on_click: Option<Callback>,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            timeout: Duration::ZERO,
            image: Image::default(),
            on_click: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.image = image;
        self
    }

    pub fn with_on_click(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(f));
        self
    }

    /// Runs the click callback, if any.
    pub fn click(&self) {
        if let Some(f) = &self.on_click {
            f();
        }
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("title", &self.title)
            .field("body", &self.body)
            .field("timeout", &self.timeout)
            .field("image_kind", &self.image.kind)
            .field("image_len", &self.image.bytes.len())
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// Operations the controller and animator call on the running host.
///
/// Shared across the host loop and the animator task, so implementations
/// must be thread-safe and must not block for long.
pub trait TrayHost: Send + Sync {
    /// Replaces the visible status icon with PNG bytes. Last write wins.
    fn set_status_icon(&self, png: &[u8]) -> Result<(), HostError>;

    fn clipboard_content(&self) -> Result<ClipboardContent, HostError>;

    fn set_clipboard_text(&self, text: &str) -> Result<(), HostError>;

    fn display_notification(&self, notification: Notification) -> Result<(), HostError>;

    /// Requests loop termination. No handler runs after the loop stops.
    fn exit(&self);
}

/// Lifecycle of the host runtime: initialize once, then run the loop.
pub trait TrayRuntime {
    /// Handle captured by menu handlers and the animator.
    fn host(&self) -> Arc<dyn TrayHost>;

    /// Registers the application name, default icon and menu.
    ///
    /// Called exactly once, before [`TrayRuntime::enter_loop`].
    fn initialize(
        &mut self,
        app_name: &str,
        icon: &[u8],
        menu: Vec<MenuItem>,
    ) -> Result<(), HostError>;

    /// Runs the host loop until [`TrayHost::exit`] is requested.
    fn enter_loop(self) -> Result<(), HostError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn default_image_is_empty() {
        assert!(Image::default().is_empty());
        assert!(!Image::png(vec![1, 2, 3]).is_empty());
    }

    #[test]
    fn notification_builder() {
        let n = Notification::new("Title", "Body")
            .with_timeout(Duration::from_secs(3))
            .with_image(Image::png(vec![0xAB]));

        assert_eq!(n.title, "Title");
        assert_eq!(n.body, "Body");
        assert_eq!(n.timeout, Duration::from_secs(3));
        assert_eq!(n.image.kind, "png");
        assert!(n.on_click.is_none());
        n.click(); // Should not panic.
    }

    #[test]
    fn notification_click_runs_callback() {
        let clicks = Arc::new(AtomicU32::new(0));
        let clicks2 = Arc::clone(&clicks);
        let n = Notification::new("t", "b").with_on_click(move || {
            clicks2.fetch_add(1, Ordering::SeqCst);
        });

        n.click();
        n.clone().click();
        assert_eq!(clicks.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn notification_debug_hides_callback() {
        let n = Notification::new("t", "b").with_on_click(|| {});
        let dbg = format!("{n:?}");
        assert!(dbg.contains("on_click: true"));
    }
}
