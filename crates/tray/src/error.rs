//! Error types for the tray controller and its host.

/// Errors reported by a tray host implementation.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("clipboard error: {0}")]
    Clipboard(String),

    #[error("notification error: {0}")]
    Notification(String),

    #[error("invalid icon: {0}")]
    Icon(String),

    #[error("tray initialization failed: {0}")]
    Init(String),

    #[error("tray event loop is closed")]
    Closed,
}

/// Errors that end the tray lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum TrayError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("status animator failed: {0}")]
    Animator(#[from] tokio::task::JoinError),
}
