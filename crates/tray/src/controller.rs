//! Menu declaration and handlers.
//!
//! Handlers run on the host loop and never fail outward: clipboard and
//! notification errors are reported through the [`ReportFn`] and logged.

use std::sync::Arc;
use std::time::Duration;

use traydemo_icons::IconSet;

use crate::host::{Image, Notification, TrayHost};
use crate::menu::MenuItem;

/// Human-readable output channel for handler results.
pub type ReportFn = Arc<dyn Fn(&str) + Send + Sync + 'static>;

pub const EXAMPLE_ITEM: &str = "Example Item";
pub const GET_CLIPBOARD_ITEM: &str = "Get Clipboard Content";
pub const SET_CLIPBOARD_ITEM: &str = "Set Clipboard Text";
pub const NOTIFICATION_ITEM: &str = "Display Notification";
pub const QUIT_ITEM: &str = "Quit";

/// Text written by the "Set Clipboard Text" action.
pub const COPIED_TEXT: &str = "this text gets copied";

const NOTIFICATION_TITLE: &str = "Example Notification";
const NOTIFICATION_BODY: &str = "Notification body text is here.";
const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(3);

/// Reporter that prints each line to stdout.
pub fn stdout_reporter() -> ReportFn {
    Arc::new(|line: &str| println!("{line}"))
}

/// Builds the tray menu and wires each entry to the host.
pub struct TrayController {
    host: Arc<dyn TrayHost>,
    icons: Arc<IconSet>,
    report: ReportFn,
}

impl TrayController {
    pub fn new(host: Arc<dyn TrayHost>, icons: Arc<IconSet>) -> Self {
        Self {
            host,
            icons,
            report: stdout_reporter(),
        }
    }

    pub fn with_reporter(mut self, report: ReportFn) -> Self {
        self.report = report;
        self
    }

    /// Returns the menu in display order. Every call yields the same layout.
    pub fn build_menu(&self) -> Vec<MenuItem> {
        vec![
            MenuItem::action(EXAMPLE_ITEM, {
                let report = Arc::clone(&self.report);
                move || report("do stuff")
            }),
            MenuItem::action(GET_CLIPBOARD_ITEM, {
                let host = Arc::clone(&self.host);
                let report = Arc::clone(&self.report);
                move || report_clipboard(host.as_ref(), &report)
            }),
            MenuItem::action(SET_CLIPBOARD_ITEM, {
                let host = Arc::clone(&self.host);
                let report = Arc::clone(&self.report);
                move || copy_text(host.as_ref(), &report)
            }),
            MenuItem::action(NOTIFICATION_ITEM, {
                let host = Arc::clone(&self.host);
                let icons = Arc::clone(&self.icons);
                let report = Arc::clone(&self.report);
                move || {
                    let notification = build_notification(host.as_ref(), &icons, &report);
                    if let Err(e) = host.display_notification(notification) {
                        tracing::warn!("failed to display notification: {e}");
                        report(&format!("DisplayNotification() error: {e}"));
                    }
                }
            }),
            MenuItem::separator(),
            MenuItem::quit(QUIT_ITEM, {
                let host = Arc::clone(&self.host);
                move || {
                    tracing::info!("quit requested via tray");
                    host.exit();
                }
            }),
        ]
    }
}

fn report_clipboard(host: &dyn TrayHost, report: &ReportFn) {
    let content = match host.clipboard_content() {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("clipboard read failed: {e}");
            report(&format!("GetClipboardContent() error: {e}"));
            return;
        }
    };

    report(&format!("Text: {:?}", content.text));
    report(&format!(
        "Image: {} len({})",
        content.image.kind,
        content.image.bytes.len()
    ));
    let files: Vec<String> = content
        .files
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    report(&format!("Files: len({}) [{}]", files.len(), files.join(" ")));
}

fn copy_text(host: &dyn TrayHost, report: &ReportFn) {
    match host.set_clipboard_text(COPIED_TEXT) {
        Ok(()) => report(&format!(
            "Text {COPIED_TEXT:?} got copied into your clipboard."
        )),
        Err(e) => {
            tracing::warn!("clipboard write failed: {e}");
            report(&format!("SetClipboardText() error: {e}"));
        }
    }
}

/// Assembles the demo notification.
///
/// The bundled default icon is the image unless the clipboard currently
/// holds an image, which then takes precedence.
fn build_notification(host: &dyn TrayHost, icons: &IconSet, report: &ReportFn) -> Notification {
    let default_icon = icons.default_icon();
    let mut image = Image::new(default_icon.format().kind(), default_icon.data().to_vec());

    match host.clipboard_content() {
        Ok(content) if !content.image.is_empty() => {
            tracing::debug!(kind = %content.image.kind, "using clipboard image for notification");
            image = content.image;
        }
        Ok(_) => {}
        Err(e) => tracing::debug!("clipboard unavailable, keeping default image: {e}"),
    }

    let report = Arc::clone(report);
    Notification::new(NOTIFICATION_TITLE, NOTIFICATION_BODY)
        .with_timeout(NOTIFICATION_TIMEOUT)
        .with_image(image)
        .with_on_click(move || report("do stuff when notification is clicked"))
}
