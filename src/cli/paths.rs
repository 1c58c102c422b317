use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Name of the per-user directory under the home directory
const DEFAULT_CACHE_DIR_NAME: &str = ".commitwise";

/// Resolve the cache directory: explicit path, else `~/.commitwise`.
pub fn resolve_cache_dir(cache_dir: Option<PathBuf>) -> Result<PathBuf> {
    match cache_dir {
        Some(dir) => Ok(dir),
        None => Ok(dirs::home_dir()
            .context("Could not determine home directory")?
            .join(DEFAULT_CACHE_DIR_NAME)),
    }
}

/// Name of the directory a suggestion is produced in.
pub fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Name of the current working directory, recorded with cache entries.
pub fn current_folder_name() -> Result<String> {
    let current = std::env::current_dir().context("Failed to get current directory")?;
    Ok(folder_name(&current))
}
