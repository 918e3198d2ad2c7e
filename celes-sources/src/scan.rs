//! Filesystem scanning shared by the file-backed adapters.

use std::fs;
use std::path::{Path, PathBuf};

use celes_core::ScrapError;

/// Expand search roots into candidate game directories.
///
/// Each immediate subdirectory of a root is a candidate game (its name
/// is the app id); a directory is accepted only if at least one of the
/// dialect's candidate files exists inside it. That existence check is
/// what keeps directories that merely look like app-id folders out of
/// the results. Roots that do not exist are skipped silently — most
/// well-known install paths are absent on any given machine.
pub fn scan_game_dirs(roots: &[PathBuf], candidates: &[&str]) -> Vec<(String, PathBuf)> {
    let mut found = Vec::new();
    for root in roots {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        let mut dirs: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();

        for dir in dirs {
            if !candidates.iter().any(|c| dir.join(c).is_file()) {
                continue;
            }
            if let Some(name) = dir.file_name().and_then(|n| n.to_str()) {
                found.push((name.to_string(), dir.clone()));
            }
        }
    }
    found
}

/// Probe every candidate file under `dir` and keep the result of the
/// last one that parses successfully.
///
/// Per-file failures are recoverable (the next candidate is probed); a
/// later successful parse overwrites an earlier one. When nothing
/// parses, a wrong-source observation takes precedence over the last
/// generic error so callers can skip the game silently.
pub fn probe_candidates<T>(
    dir: &Path,
    candidates: &[&str],
    mut parse: impl FnMut(&Path) -> Result<T, ScrapError>,
) -> Result<T, ScrapError> {
    let mut kept: Option<T> = None;
    let mut last_error: Option<ScrapError> = None;
    let mut wrong_source = false;

    for candidate in candidates {
        let path = dir.join(candidate);
        if !path.is_file() {
            continue;
        }
        match parse(&path) {
            Ok(value) => kept = Some(value),
            Err(ScrapError::WrongSource) => wrong_source = true,
            Err(error) => {
                log::debug!("candidate {} failed: {error}", path.display());
                last_error = Some(error);
            }
        }
    }

    match kept {
        Some(value) => Ok(value),
        None if wrong_source => Err(ScrapError::WrongSource),
        None => Err(last_error.unwrap_or_else(|| {
            ScrapError::parse(format!(
                "no parseable achievement data in {}",
                dir.display()
            ))
        })),
    }
}
