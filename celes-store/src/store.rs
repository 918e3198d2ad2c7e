//! Per-game JSON store.
//!
//! One file per `(platform, app_id)` under `<root>/celes/db/<platform>/
//! <appId>.json`, holding stats only — the schema is rejoined from the
//! resolver at read time, so the store stays small and the schema format
//! can evolve independently.
//!
//! The store is not internally safe under concurrent read-modify-write;
//! callers bracket every load→merge→persist sequence with
//! [`crate::StoreLock`]. Writes go through a temp file and rename, but
//! the store makes no atomicity promise to callers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use celes_core::{
    API_VERSION, GameRecord, Platform, ProgressReporter, SchemaResolver, ScrapError, SourceStats,
    Stats,
};

/// On-disk record shape: dynamic stats only, never the schema.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredGame {
    api_version: String,
    app_id: String,
    sources: Vec<SourceStats>,
    playtime: u64,
}

pub struct LocalStore {
    db_dir: PathBuf,
    resolver: Arc<dyn SchemaResolver>,
}

impl LocalStore {
    pub fn new(root: &Path, resolver: Arc<dyn SchemaResolver>) -> Self {
        Self {
            db_dir: root.join("celes").join("db"),
            resolver,
        }
    }

    fn game_path(&self, platform: Platform, app_id: &str) -> PathBuf {
        self.db_dir
            .join(platform.canonical_name())
            .join(format!("{app_id}.json"))
    }

    /// Read one record, enforcing the exact store version, and rejoin it
    /// with a freshly resolved schema.
    pub fn get_game(
        &self,
        app_id: &str,
        platform: Platform,
        lang: &str,
    ) -> Result<GameRecord, ScrapError> {
        let contents = fs::read_to_string(self.game_path(platform, app_id))?;
        let stored: StoredGame = serde_json::from_str(&contents)?;
        if stored.api_version != API_VERSION {
            return Err(ScrapError::InvalidStoreVersion {
                expected: API_VERSION.to_string(),
                found: stored.api_version,
            });
        }

        let schema = self.resolver.schema(app_id, platform, lang)?;
        Ok(GameRecord {
            api_version: stored.api_version,
            app_id: stored.app_id,
            platform,
            schema,
            stats: Stats {
                sources: stored.sources,
                playtime: stored.playtime,
            },
        })
    }

    /// Read the whole store. A missing root directory is an empty store;
    /// any other enumeration or read error aborts the call with no
    /// partial result.
    pub fn get_all(
        &self,
        lang: &str,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<Vec<GameRecord>, ScrapError> {
        let platform_dirs = match fs::read_dir(&self.db_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys: Vec<(Platform, String)> = Vec::new();
        for entry in platform_dirs {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            let platform: Platform = name
                .parse()
                .map_err(|_| ScrapError::parse(format!("unknown platform directory '{name}'")))?;

            for file in fs::read_dir(&path)? {
                let file_path = file?.path();
                let is_json = file_path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("json"));
                if !is_json {
                    continue;
                }
                if let Some(app_id) = file_path.file_stem().and_then(|s| s.to_str()) {
                    keys.push((platform, app_id.to_string()));
                }
            }
        }
        keys.sort_by(|a, b| (a.0.canonical_name(), &a.1).cmp(&(b.0.canonical_name(), &b.1)));

        let total = keys.len();
        let mut games = Vec::with_capacity(total);
        for (index, (platform, app_id)) in keys.iter().enumerate() {
            games.push(self.get_game(app_id, *platform, lang)?);
            progress.report((((index + 1) * 100) / total) as u8);
        }
        Ok(games)
    }

    /// Overwrite the single file for a record, creating directories as
    /// needed.
    pub fn update_game(&self, record: &GameRecord) -> Result<(), ScrapError> {
        let path = self.game_path(record.platform, &record.app_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let stored = StoredGame {
            api_version: record.api_version.clone(),
            app_id: record.app_id.clone(),
            sources: record.stats.sources.clone(),
            playtime: record.stats.playtime,
        };
        let contents = serde_json::to_string_pretty(&stored)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Persist records sequentially. Unlike `get_all`, a per-game write
    /// failure is logged and does not abort the remaining writes.
    /// Returns the number of records written.
    pub fn update_all(&self, records: &[GameRecord]) -> usize {
        let mut written = 0;
        for record in records {
            match self.update_game(record) {
                Ok(()) => written += 1,
                Err(e) => log::warn!(
                    "failed to persist app {} ({}): {e}",
                    record.app_id,
                    record.platform
                ),
            }
        }
        written
    }
}
