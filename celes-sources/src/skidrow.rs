//! Skidrow adapter.
//!
//! Skidrow writes a single flat `[Achievements]` listing where each
//! remaining key is an achievement name with a 0|1 unlocked flag, plus a
//! `Count` aggregate. No unlock times, no partial progress.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use celes_core::{
    AchievementSource, ActiveAchievement, GameSchema, Locator, Platform, ScanResult,
    SchemaResolver, ScrapError, SourceTag,
};

use crate::ini::IniDocument;
use crate::norm::{RawProgress, normalize_entries};
use crate::scan::{probe_candidates, scan_game_dirs};

const CANDIDATE_FILES: &[&str] = &["achieve.dat", "achievements.ini"];

const LISTING_SECTION: &str = "Achievements";

const DROP_KEYS: &[&str] = &["Count"];

pub struct SkidrowSource {
    resolver: Arc<dyn SchemaResolver>,
}

impl SkidrowSource {
    pub fn new(resolver: Arc<dyn SchemaResolver>) -> Self {
        Self { resolver }
    }

    fn search_roots(extra: &[PathBuf]) -> Vec<PathBuf> {
        let mut roots = Vec::new();
        if let Some(documents) = dirs::document_dir() {
            roots.push(documents.join("SKIDROW"));
        }
        roots.extend(extra.iter().cloned());
        roots
    }

    fn parse_file(path: &Path) -> Result<Vec<ActiveAchievement>, ScrapError> {
        let text = fs::read_to_string(path)?;
        Self::parse_text(&text)
    }

    fn parse_text(text: &str) -> Result<Vec<ActiveAchievement>, ScrapError> {
        let doc = IniDocument::parse(text)?;
        let Some(listing) = doc.section(LISTING_SECTION) else {
            return Err(ScrapError::parse(format!(
                "missing [{LISTING_SECTION}] listing section"
            )));
        };
        let entries = listing
            .entries
            .iter()
            .map(|(name, value)| {
                (name.clone(), RawProgress {
                    achieved: value != "0",
                    ..RawProgress::default()
                })
            })
            .collect();
        Ok(normalize_entries(entries, DROP_KEYS))
    }
}

impl AchievementSource for SkidrowSource {
    fn name(&self) -> &'static str {
        "skidrow"
    }

    fn platform(&self) -> Platform {
        Platform::Steam
    }

    fn source(&self) -> SourceTag {
        SourceTag::Skidrow
    }

    fn scan(&self, extra_search_roots: &[PathBuf]) -> Result<Vec<ScanResult>, ScrapError> {
        let roots = Self::search_roots(extra_search_roots);
        Ok(scan_game_dirs(&roots, CANDIDATE_FILES)
            .into_iter()
            .map(|(app_id, dir)| ScanResult {
                app_id,
                source: SourceTag::Skidrow,
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
            return Err(ScrapError::parse("skidrow adapter expects a game directory"));
        };
        probe_candidates(dir, CANDIDATE_FILES, |path| Self::parse_file(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_listing_parses_unlocked_entries_only() {
        let text = "[Achievements]\nCount=3\nACH_A=1\nACH_B=0\nACH_C=1\n";
        let achievements = SkidrowSource::parse_text(text).unwrap();
        assert_eq!(achievements.len(), 2);
        assert!(achievements.iter().all(|a| a.achieved));
        assert!(achievements.iter().all(|a| a.name != "Count"));
    }

    #[test]
    fn missing_listing_section_fails_to_parse() {
        assert!(SkidrowSource::parse_text("[Nope]\nA=1\n").is_err());
    }
}
