//! Resource directory relative to the installed executable.
//!
//! When launched from an app bundle the working directory is `/`, so the
//! process moves into its resource directory before opening any file.

use std::path::{Path, PathBuf};

use anyhow::Context;

/// Joins `relative` onto the directory containing `exe`.
pub fn resolve_resource_dir(exe: &Path, relative: &Path) -> anyhow::Result<PathBuf> {
    let base = exe
        .parent()
        .with_context(|| format!("executable path {} has no parent", exe.display()))?;
    Ok(base.join(relative))
}

/// Changes the working directory to the resource directory.
pub fn enter_resource_dir(relative: &Path) -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to resolve executable path")?;
    let dir = resolve_resource_dir(&exe, relative)?;
    std::env::set_current_dir(&dir)
        .with_context(|| format!("failed to enter resource directory {}", dir.display()))?;
    Ok(dir)
}
