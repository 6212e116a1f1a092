//! Status tray controller for the traydemo app.
//!
//! The tray itself (menu bar integration, clipboard, notifications, event
//! delivery) belongs to a host runtime reached through the [`TrayRuntime`]
//! and [`TrayHost`] traits. This crate supplies what runs on top of it:
//! - [`TrayController`]: the static menu and its handlers
//! - [`StatusAnimator`]: a background task cycling the status icon
//! - [`launch`]: the startup sequence tying both to a host

mod animator;
mod controller;
mod error;
mod host;
mod launch;
mod menu;

#[cfg(test)]
mod testing;

pub use animator::{
    DEFAULT_INTERVAL, ICON_SIZE, StatusAnimator, encode_png, placeholder_color, placeholder_raster,
};
pub use controller::{ReportFn, TrayController, stdout_reporter};
pub use error::{HostError, TrayError};
pub use host::{Callback, ClipboardContent, Image, Notification, TrayHost, TrayRuntime};
pub use launch::{LaunchOptions, launch, launch_with_reporter};
pub use menu::{MenuItem, MenuKind};
