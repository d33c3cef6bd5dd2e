//! Configuration file reading and writing.
//!
//! # File Formats
//!
//! JSON5 (`.json5`) is preferred since it allows comments and trailing
//! commas; plain JSON (`.json`) is read by the same parser. Files are always
//! written back as pretty-printed JSON.
//!
//! # File Locations
//!
//! Configuration is searched in the following order:
//!
//! 1. Local: `./tripboard.json5` or `./tripboard.json`
//! 2. User: `~/.config/tripboard/config.json5` or `~/.config/tripboard/config.json`

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, Result};

/// Local configuration file names, in priority order.
const LOCAL_FILE_NAMES: &[&str] = &["tripboard.json5", "tripboard.json"];

/// User config directory name.
const USER_CONFIG_DIR: &str = "tripboard";

/// User configuration file names, in priority order.
const USER_FILE_NAMES: &[&str] = &["config.json5", "config.json"];

/// Returns every candidate configuration path, in priority order.
///
/// `local_dir` is searched first, then `user_dir` (the tripboard directory
/// inside the platform config directory) when given.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tripboard_config::persistence::candidate_paths;
///
/// let paths = candidate_paths(Path::new("."), Some(Path::new("/home/me/.config/tripboard")));
/// assert_eq!(paths.len(), 4);
/// assert!(paths[0].ends_with("tripboard.json5"));
/// ```
#[must_use]
pub fn candidate_paths(local_dir: &Path, user_dir: Option<&Path>) -> Vec<PathBuf> {
    let local = LOCAL_FILE_NAMES.iter().map(|name| local_dir.join(name));
    let user = user_dir
        .into_iter()
        .flat_map(|dir| USER_FILE_NAMES.iter().map(move |name| dir.join(name)));
    local.chain(user).collect()
}

/// Finds the configuration file in the default locations.
///
/// # Returns
///
/// Returns `Some(path)` for the first existing candidate, `None` otherwise.
#[must_use]
pub fn find_config_file() -> Option<PathBuf> {
    let user_dir = user_config_dir()
        .inspect_err(|err| debug!(error = %err, "skipping user config directory"))
        .ok();
    find_in(Path::new("."), user_dir.as_deref())
}

/// Finds the first existing configuration file among the candidates for the
/// given directories.
#[must_use]
pub fn find_in(local_dir: &Path, user_dir: Option<&Path>) -> Option<PathBuf> {
    let found = candidate_paths(local_dir, user_dir)
        .into_iter()
        .find(|path| path.is_file());
    match &found {
        Some(path) => debug!(path = %path.display(), "found config file"),
        None => debug!("no config file found, using defaults"),
    }
    found
}

/// Returns the default user configuration directory.
///
/// This is typically `~/.config/tripboard/` on Unix systems.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn user_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join(USER_CONFIG_DIR))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Reads and parses a JSON5 or JSON configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its content cannot be
/// parsed into `T`.
pub fn read_config_file<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json5::from_str(&content).map_err(ConfigError::from)
}

/// Writes a configuration to a file as pretty-printed JSON.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be written, or
/// the value cannot be serialized.
pub fn write_config_file<T: serde::Serialize>(path: impl AsRef<Path>, config: &T) -> Result<()> {
    let path = path.as_ref();
    let write_error = |source| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty() && !p.exists()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(write_error)
}
