//! Cached schema retrieval.
//!
//! One cache file per (app id, language) under
//! `<root>/steam_cache/schema/<lang>/<appId>.json`. A cache file whose
//! modification time is within the staleness window is served without a
//! remote request; everything else triggers a fetch and a cache
//! write-back.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use celes_core::{GameSchema, Platform, SchemaResolver, ScrapError};

/// Cache entries older than this are refetched.
const STALE_AFTER_DAYS: i64 = 30;

const DEFAULT_SCHEMA_API: &str = "https://api.xan105.com/steam/ach";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Schema provider backed by the remote achievement-schema endpoint with
/// an on-disk cache.
pub struct SteamSchemaProvider {
    cache_dir: PathBuf,
    base_url: String,
    http: reqwest::blocking::Client,
}

impl SteamSchemaProvider {
    /// Create a provider rooted at `root` (the same root the store
    /// lives under), using the default remote endpoint.
    pub fn new(root: &Path) -> Result<Self, ScrapError> {
        Self::with_base_url(root, DEFAULT_SCHEMA_API)
    }

    pub fn with_base_url(root: &Path, base_url: impl Into<String>) -> Result<Self, ScrapError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ScrapError::http)?;
        Ok(Self {
            cache_dir: root.join("steam_cache").join("schema"),
            base_url: base_url.into(),
            http,
        })
    }

    fn cache_path(&self, app_id: &str, lang: &str) -> PathBuf {
        self.cache_dir.join(lang).join(format!("{app_id}.json"))
    }

    /// Resolve a game's schema, serving the cache when it is fresh and
    /// refetching (plus writing back) otherwise.
    pub fn get_schema(&self, app_id: &str, lang: &str) -> Result<GameSchema, ScrapError> {
        let path = self.cache_path(app_id, lang);
        if cache_is_fresh(&path, Utc::now()) {
            let contents = fs::read_to_string(&path)?;
            let schema: GameSchema = serde_json::from_str(&contents)?;
            return Ok(schema);
        }

        let schema = self.fetch_remote(app_id, lang)?;
        self.update_cache(app_id, lang, &schema)?;
        Ok(schema)
    }

    /// Write a schema into the cache, creating directories as needed.
    pub fn update_cache(
        &self,
        app_id: &str,
        lang: &str,
        schema: &GameSchema,
    ) -> Result<(), ScrapError> {
        let path = self.cache_path(app_id, lang);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(schema)?;
        fs::write(&path, contents)?;
        Ok(())
    }

    fn fetch_remote(&self, app_id: &str, lang: &str) -> Result<GameSchema, ScrapError> {
        let url = format!("{}/{app_id}", self.base_url);
        log::debug!("fetching schema for app {app_id} ({lang}) from {url}");

        let response = self
            .http
            .get(&url)
            .query(&[("lang", lang)])
            .send()
            .map_err(ScrapError::http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapError::http(format!(
                "HTTP {status} fetching schema for app {app_id}"
            )));
        }

        let text = response.text().map_err(ScrapError::http)?;
        let schema: GameSchema = serde_json::from_str(&text)?;
        Ok(schema)
    }
}

impl SchemaResolver for SteamSchemaProvider {
    fn schema(
        &self,
        app_id: &str,
        platform: Platform,
        lang: &str,
    ) -> Result<GameSchema, ScrapError> {
        match platform {
            Platform::Steam => self.get_schema(app_id, lang),
            other => Err(ScrapError::PlatformNotSupported(other.to_string())),
        }
    }
}

/// A cache file is fresh when it exists and was modified within the
/// staleness window. Unreadable metadata counts as stale.
fn cache_is_fresh(path: &Path, now: DateTime<Utc>) -> bool {
    let Ok(meta) = fs::metadata(path) else {
        return false;
    };
    let Ok(modified) = meta.modified() else {
        return false;
    };
    let modified: DateTime<Utc> = modified.into();
    now.signed_duration_since(modified) < TimeDelta::days(STALE_AFTER_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use celes_core::{AchievementCatalog, SchemaImages};

    fn sample_schema() -> GameSchema {
        GameSchema {
            name: "Celeste".to_string(),
            images: SchemaImages::default(),
            achievement_catalog: AchievementCatalog::default(),
            binary_name: Some("Celeste.exe".to_string()),
        }
    }

    #[test]
    fn missing_cache_file_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!cache_is_fresh(&dir.path().join("nope.json"), Utc::now()));
    }

    #[test]
    fn recent_cache_file_is_fresh_and_old_one_is_not() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("220.json");
        fs::write(&path, "{}").unwrap();

        assert!(cache_is_fresh(&path, Utc::now()));
        assert!(!cache_is_fresh(
            &path,
            Utc::now() + TimeDelta::days(STALE_AFTER_DAYS + 1)
        ));
    }

    #[test]
    fn fresh_cache_is_served_without_touching_the_network() {
        let dir = tempfile::tempdir().unwrap();
        // Unroutable endpoint: any network attempt would fail loudly.
        let provider =
            SteamSchemaProvider::with_base_url(dir.path(), "http://127.0.0.1:1/none").unwrap();
        provider
            .update_cache("382890", "english", &sample_schema())
            .unwrap();

        let schema = provider.get_schema("382890", "english").unwrap();
        assert_eq!(schema.name, "Celeste");
        assert_eq!(schema.binary_name.as_deref(), Some("Celeste.exe"));
    }

    #[test]
    fn resolver_answers_for_steam() {
        let dir = tempfile::tempdir().unwrap();
        let provider =
            SteamSchemaProvider::with_base_url(dir.path(), "http://127.0.0.1:1/none").unwrap();
        provider
            .update_cache("220", "english", &sample_schema())
            .unwrap();
        let result = provider.schema("220", Platform::Steam, "english");
        assert!(result.is_ok());
    }
}
