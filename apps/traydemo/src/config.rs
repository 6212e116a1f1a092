//! Application configuration.
//!
//! Read from TOML if present, never written:
//! - Linux: `~/.config/traydemo/traydemo.toml`
//! - Windows: `%APPDATA%/traydemo/traydemo.toml`
//! - macOS: `~/Library/Application Support/traydemo/traydemo.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use traydemo_tray::{DEFAULT_INTERVAL, LaunchOptions};

/// traydemo configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name registered with the tray host.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Resource directory, relative to the executable's directory.
    #[serde(default = "default_resource_dir")]
    pub resource_dir: PathBuf,

    /// Icon container, relative to the resource directory.
    #[serde(default = "default_icon_file")]
    pub icon_file: PathBuf,

    /// Status icon animation interval in milliseconds (0 = default).
    #[serde(default = "default_animation_interval")]
    pub animation_interval_ms: u64,
}

fn default_app_name() -> String {
    "Example App".into()
}

fn default_resource_dir() -> PathBuf {
    // App bundle layout: Contents/MacOS/<exe> next to Contents/Resources.
    PathBuf::from("../Resources")
}

fn default_icon_file() -> PathBuf {
    PathBuf::from("AppIcon.icns")
}

fn default_animation_interval() -> u64 {
    DEFAULT_INTERVAL.as_millis() as u64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            resource_dir: default_resource_dir(),
            icon_file: default_icon_file(),
            animation_interval_ms: default_animation_interval(),
        }
    }
}

impl Config {
    /// Loads configuration from the platform path, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Loads configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "configuration read");
        Ok(config)
    }

    pub fn animation_interval(&self) -> Duration {
        match self.animation_interval_ms {
            0 => DEFAULT_INTERVAL,
            ms => Duration::from_millis(ms),
        }
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            app_name: self.app_name.clone(),
            animation_interval: self.animation_interval(),
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("traydemo")
            .join("traydemo.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("traydemo").join("traydemo.toml"))
    }

    #[cfg(target_os = "macos")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join("Library")
            .join("Application Support")
            .join("traydemo")
            .join("traydemo.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        Ok(PathBuf::from("/tmp/traydemo/traydemo.toml"))
    }
}
