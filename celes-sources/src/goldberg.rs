//! Goldberg Steam emulator adapter.
//!
//! Goldberg stores per-game saves under a single roaming directory, one
//! folder per app id, with achievements in a structured
//! `achievements.json` keyed by achievement name.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use celes_core::{
    AchievementSource, ActiveAchievement, GameSchema, Locator, Platform, ScanResult,
    SchemaResolver, ScrapError, SourceTag,
};

use crate::norm::{RawProgress, normalize_entries};
use crate::scan::{probe_candidates, scan_game_dirs};

const CANDIDATE_FILES: &[&str] = &["achievements.json"];

#[derive(Debug, Deserialize)]
struct GoldbergEntry {
    #[serde(default)]
    earned: bool,
    #[serde(default)]
    earned_time: u64,
    #[serde(default)]
    progress: u32,
    #[serde(default)]
    max_progress: u32,
}

pub struct GoldbergSource {
    resolver: Arc<dyn SchemaResolver>,
}

impl GoldbergSource {
    pub fn new(resolver: Arc<dyn SchemaResolver>) -> Self {
        Self { resolver }
    }

    fn search_roots(extra: &[PathBuf]) -> Vec<PathBuf> {
        let mut roots = Vec::new();
        if let Some(config) = dirs::config_dir() {
            roots.push(config.join("Goldberg SteamEmu Saves"));
            roots.push(config.join("GSE Saves"));
        }
        roots.extend(extra.iter().cloned());
        roots
    }

    fn parse_file(path: &Path) -> Result<Vec<ActiveAchievement>, ScrapError> {
        let text = fs::read_to_string(path)?;
        Self::parse_text(&text)
    }

    fn parse_text(text: &str) -> Result<Vec<ActiveAchievement>, ScrapError> {
        let map: BTreeMap<String, GoldbergEntry> = serde_json::from_str(text)?;
        let entries = map
            .into_iter()
            .map(|(name, entry)| {
                let raw = RawProgress {
                    achieved: entry.earned,
                    current: entry.progress,
                    max: entry.max_progress,
                    unlock_time: entry.earned_time,
                };
                (name, raw)
            })
            .collect();
        Ok(normalize_entries(entries, &[]))
    }
}

impl AchievementSource for GoldbergSource {
    fn name(&self) -> &'static str {
        "goldberg"
    }

    fn platform(&self) -> Platform {
        Platform::Steam
    }

    fn source(&self) -> SourceTag {
        SourceTag::Goldberg
    }

    fn scan(&self, extra_search_roots: &[PathBuf]) -> Result<Vec<ScanResult>, ScrapError> {
        let roots = Self::search_roots(extra_search_roots);
        Ok(scan_game_dirs(&roots, CANDIDATE_FILES)
            .into_iter()
            .map(|(app_id, dir)| ScanResult {
                app_id,
                source: SourceTag::Goldberg,
                platform: Platform::Steam,
                locator: Locator::GameDir(dir),
            })
            .collect())
    }

    fn fetch_schema(&self, app_id: &str, lang: &str) -> Result<GameSchema, ScrapError> {
        self.resolver.schema(app_id, Platform::Steam, lang)
    }

    fn fetch_active_achievements(
        &self,
        scan: &ScanResult,
    ) -> Result<Vec<ActiveAchievement>, ScrapError> {
        let Locator::GameDir(dir) = &scan.locator else {
            return Err(ScrapError::parse("goldberg adapter expects a game directory"));
        };
        probe_candidates(dir, CANDIDATE_FILES, |path| Self::parse_file(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "ACH_DONE": {"earned": true, "earned_time": 1600000000},
        "ACH_GRIND": {"earned": false, "progress": 30, "max_progress": 120},
        "ACH_UNTOUCHED": {"earned": false}
    }"#;

    #[test]
    fn parses_earned_and_partial_entries() {
        let achievements = GoldbergSource::parse_text(SAMPLE).unwrap();
        assert_eq!(achievements.len(), 2);

        let done = achievements.iter().find(|a| a.name == "ACH_DONE").unwrap();
        assert!(done.achieved);
        assert_eq!(done.unlock_time, 1_600_000_000);

        let grind = achievements.iter().find(|a| a.name == "ACH_GRIND").unwrap();
        assert!(!grind.achieved);
        assert_eq!((grind.current_progress, grind.max_progress), (25, 100));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = GoldbergSource::parse_text("not json").unwrap_err();
        assert_eq!(err.kind(), celes_core::ErrorKind::Json);
    }
}
