//! Settings file locations, fragment discovery, and atomic writes.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::PersistenceError;

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "TERM_SETTINGS_CONFIG_DIR";

const SETTINGS_FILE: &str = "settings.json";
const FRAGMENTS_DIR: &str = "fragments";

/// A fragment document and the name of the extension that contributed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFragment {
    /// Extension name (the fragment's directory under `fragments/`)
    pub source: String,
    pub content: String,
}

/// Get the configuration directory path
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    #[cfg(target_os = "windows")]
    {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("term-settings")
        } else {
            PathBuf::from(".")
        }
    }
    #[cfg(not(target_os = "windows"))]
    {
        // XDG convention on all other platforms: ~/.config/term-settings
        if let Some(home_dir) = dirs::home_dir() {
            home_dir.join(".config").join("term-settings")
        } else {
            PathBuf::from(".")
        }
    }
}

/// Get the user settings file path
pub fn settings_path() -> PathBuf {
    config_dir().join(SETTINGS_FILE)
}

/// Fragment files under `<config dir>/fragments/<extension>/*.json`, sorted.
pub fn fragment_paths() -> Vec<PathBuf> {
    fragment_paths_in(&config_dir().join(FRAGMENTS_DIR))
}

pub(crate) fn fragment_paths_in(root: &Path) -> Vec<PathBuf> {
    let Ok(extensions) = fs::read_dir(root) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = extensions
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|dir| fs::read_dir(dir).ok())
        .flat_map(|files| files.filter_map(|entry| entry.ok()).map(|entry| entry.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    paths
}

/// Read one fragment file; its source is the name of its parent directory.
pub fn read_fragment(path: &Path) -> Result<SettingsFragment> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read fragment {}", path.display()))?;
    let source = path
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Fragment {} has no extension directory", path.display()))?;
    Ok(SettingsFragment { source, content })
}

/// Read every fragment under `root`. Unreadable files are skipped with a
/// warning.
pub(crate) fn read_fragments_in(root: &Path) -> Vec<SettingsFragment> {
    fragment_paths_in(root)
        .iter()
        .filter_map(|path| match read_fragment(path) {
            Ok(fragment) => Some(fragment),
            Err(e) => {
                log::warn!("Skipping fragment: {e:#}");
                None
            }
        })
        .collect()
}

/// Read every fragment in the configuration directory.
pub fn read_fragments() -> Vec<SettingsFragment> {
    read_fragments_in(&config_dir().join(FRAGMENTS_DIR))
}

/// Read a file that may not exist yet. `Ok(None)` when it is absent.
pub fn read_optional(path: &Path) -> Result<Option<String>, PersistenceError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PersistenceError::io(path, e)),
    }
}

/// Replace `path` with `contents` in one step: write `<file>.json.tmp` next to
/// it, then rename over the original. Parent directories are created.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
    }

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, contents).map_err(|e| PersistenceError::io(&temp_path, e))?;
    if let Err(e) = fs::rename(&temp_path, path) {
        log::error!("Failed to replace {}: {e}", path.display());
        // The original file is untouched when the rename fails.
        let _ = fs::remove_file(&temp_path);
        return Err(PersistenceError::io(path, e));
    }
    log::info!("Wrote settings to {}", path.display());
    Ok(())
}
