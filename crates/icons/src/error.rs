//! Error types for icon container loading.

/// Errors produced while reading an icon container.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid icon container: {0}")]
    Format(String),

    #[error("icon container holds no images")]
    Empty,
}
