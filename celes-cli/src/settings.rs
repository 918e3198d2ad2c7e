//! Shared CLI settings (store root location).
//!
//! The settings file is always `~/.config/celes/settings.toml` so every
//! invocation resolves the same store, whatever directory it runs from.

use std::io;
use std::path::{Path, PathBuf};

/// Canonical path to the settings file: `~/.config/celes/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("celes").join("settings.toml")
}

/// Resolve the store root using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. Saved `store.root` in `settings.toml`
/// 3. The platform data directory
pub fn resolve_root_path(cli_override: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_override {
        return path;
    }
    if let Some(path) = load_root_path() {
        return path;
    }
    dirs::data_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Read `store.root` from `settings.toml`, if set.
fn load_root_path() -> Option<PathBuf> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    let root = doc.get("store")?.get("root")?.as_str()?;
    if root.is_empty() {
        None
    } else {
        Some(PathBuf::from(root))
    }
}

/// Save (or clear) the store root in `settings.toml`.
///
/// Uses `toml::Value` for a surgical update so unrelated fields are
/// preserved.
pub fn save_root_path(path: Option<&Path>) -> io::Result<()> {
    let settings = settings_path();
    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(&settings) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let store = table
        .entry("store")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let store_table = store
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[store] is not a table"))?;

    match path {
        Some(p) => {
            store_table.insert(
                "root".to_string(),
                toml::Value::String(p.to_string_lossy().into_owned()),
            );
        }
        None => {
            store_table.remove("root");
        }
    }

    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, &settings)?;

    Ok(())
}
