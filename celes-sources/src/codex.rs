//! Codex achievement-file adapter.
//!
//! Codex writes one INI section per achievement with `Achieved`,
//! `CurProgress`, `MaxProgress`, and `UnlockTime` keys, plus a `Steam`
//! identity section. The sibling SmartSteamEmu dialect is structurally
//! close enough that its files land in the same folders; its flat
//! `SteamAchievements` listing section is the tell.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use celes_core::{
    AchievementSource, ActiveAchievement, GameSchema, Locator, Platform, ScanResult,
    SchemaResolver, ScrapError, SourceTag,
};

use crate::ini::IniDocument;
use crate::norm::{RawProgress, normalize_entries, parse_count};
use crate::scan::{probe_candidates, scan_game_dirs};

/// Candidate achievement files, probed in order inside a game directory.
const CANDIDATE_FILES: &[&str] = &["achievements.ini", "stats/achievements.ini"];

/// Sections carrying identity data rather than achievements.
const DROP_SECTIONS: &[&str] = &["Steam"];

/// Flat listing section written by the sibling SmartSteamEmu dialect.
const SIBLING_MARKER_SECTION: &str = "SteamAchievements";

pub struct CodexSource {
    resolver: Arc<dyn SchemaResolver>,
}

impl CodexSource {
    pub fn new(resolver: Arc<dyn SchemaResolver>) -> Self {
        Self { resolver }
    }

    fn search_roots(extra: &[PathBuf]) -> Vec<PathBuf> {
        let mut roots = Vec::new();
        if let Some(documents) = dirs::document_dir() {
            roots.push(documents.join("Steam").join("CODEX"));
        }
        if let Some(config) = dirs::config_dir() {
            roots.push(config.join("Steam").join("CODEX"));
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
        if doc.has_section(SIBLING_MARKER_SECTION) {
            return Err(ScrapError::WrongSource);
        }

        let entries = doc
            .sections()
            .iter()
            .map(|section| {
                let raw = RawProgress {
                    achieved: section.get("Achieved").map(|v| v != "0").unwrap_or(false),
                    current: section.get("CurProgress").map(parse_count).unwrap_or(0),
                    max: section.get("MaxProgress").map(parse_count).unwrap_or(0),
                    unlock_time: section
                        .get("UnlockTime")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0),
                };
                (section.name.clone(), raw)
            })
            .collect();

        Ok(normalize_entries(entries, DROP_SECTIONS))
    }
}

impl AchievementSource for CodexSource {
    fn name(&self) -> &'static str {
        "codex"
    }

    fn platform(&self) -> Platform {
        Platform::Steam
    }

    fn source(&self) -> SourceTag {
        SourceTag::Codex
    }

    fn scan(&self, extra_search_roots: &[PathBuf]) -> Result<Vec<ScanResult>, ScrapError> {
        let roots = Self::search_roots(extra_search_roots);
        Ok(scan_game_dirs(&roots, CANDIDATE_FILES)
            .into_iter()
            .map(|(app_id, dir)| ScanResult {
                app_id,
                source: SourceTag::Codex,
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
            return Err(ScrapError::parse("codex adapter expects a game directory"));
        };
        probe_candidates(dir, CANDIDATE_FILES, |path| Self::parse_file(path))
    }
}
