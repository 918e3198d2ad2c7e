//! SmartSteamEmu adapter.
//!
//! SmartSteamEmu keeps two generations of per-game stats side by side:
//! a fixed-layout `stats.bin` whose records key achievements by CRC32 of
//! their internal name, and a newer flat `stats.ini` listing. Both are
//! probed; the last parseable candidate wins. Binary identifiers are
//! resolved against the schema catalog, so the adapter needs a language
//! to resolve schemas with (catalog internal names are language
//! independent; any configured language works).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use celes_core::{
    AchievementSource, ActiveAchievement, GameSchema, Locator, Platform, ScanResult,
    SchemaResolver, ScrapError, SourceTag,
};

use crate::ini::IniDocument;
use crate::norm::{RawProgress, normalize_entries};
use crate::record_bin::parse_records;
use crate::scan::{probe_candidates, scan_game_dirs};

const CANDIDATE_FILES: &[&str] = &["stats.bin", "stats.ini"];

/// Flat unlocked-achievements listing: every remaining key is an
/// achievement name.
const LISTING_SECTION: &str = "SteamAchievements";

/// Aggregate counter key inside the listing section.
const DROP_KEYS: &[&str] = &["SteamAchievementCount"];

pub struct SmartSteamEmuSource {
    resolver: Arc<dyn SchemaResolver>,
    language: String,
}

impl SmartSteamEmuSource {
    pub fn new(resolver: Arc<dyn SchemaResolver>, language: impl Into<String>) -> Self {
        Self {
            resolver,
            language: language.into(),
        }
    }

    fn search_roots(extra: &[PathBuf]) -> Vec<PathBuf> {
        let mut roots = Vec::new();
        if let Some(config) = dirs::config_dir() {
            roots.push(config.join("SmartSteamEmu"));
        }
        roots.extend(extra.iter().cloned());
        roots
    }

    /// CRC32-of-internal-name index over the catalog.
    fn catalog_idents(schema: &GameSchema) -> HashMap<u32, String> {
        schema
            .achievement_catalog
            .list
            .iter()
            .map(|entry| (crc32fast::hash(entry.name.as_bytes()), entry.name.clone()))
            .collect()
    }

    fn parse_bin(
        data: &[u8],
        idents: &HashMap<u32, String>,
    ) -> Result<Vec<ActiveAchievement>, ScrapError> {
        let records = parse_records(data)?;
        // Unresolved identifiers are the emulator's stat counters, not
        // achievements; skip them.
        let entries = records
            .into_iter()
            .filter_map(|record| {
                idents.get(&record.ident).map(|name| {
                    let raw = RawProgress {
                        achieved: record.achieved,
                        current: 0,
                        max: 0,
                        unlock_time: u64::from(record.unlock_time),
                    };
                    (name.clone(), raw)
                })
            })
            .collect();
        Ok(normalize_entries(entries, &[]))
    }

    fn parse_ini(text: &str) -> Result<Vec<ActiveAchievement>, ScrapError> {
        let doc = IniDocument::parse(text)?;
        let Some(listing) = doc.section(LISTING_SECTION) else {
            return Err(ScrapError::parse(format!(
                "missing [{LISTING_SECTION}] listing section"
            )));
        };
        let entries = listing
            .entries
            .iter()
            .map(|(name, value)| (name.clone(), RawProgress {
                achieved: value != "0",
                ..RawProgress::default()
            }))
            .collect();
        Ok(normalize_entries(entries, DROP_KEYS))
    }
}

impl AchievementSource for SmartSteamEmuSource {
    fn name(&self) -> &'static str {
        "smartsteamemu"
    }

    fn platform(&self) -> Platform {
        Platform::Steam
    }

    fn source(&self) -> SourceTag {
        SourceTag::SmartSteamEmu
    }

    fn scan(&self, extra_search_roots: &[PathBuf]) -> Result<Vec<ScanResult>, ScrapError> {
        let roots = Self::search_roots(extra_search_roots);
        Ok(scan_game_dirs(&roots, CANDIDATE_FILES)
            .into_iter()
            .map(|(app_id, dir)| ScanResult {
                app_id,
                source: SourceTag::SmartSteamEmu,
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
            return Err(ScrapError::parse(
                "smartsteamemu adapter expects a game directory",
            ));
        };
        let schema = self.fetch_schema(&scan.app_id, &self.language)?;
        let idents = Self::catalog_idents(&schema);
        probe_candidates(dir, CANDIDATE_FILES, |path| {
            let is_binary = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("bin"));
            if is_binary {
                Self::parse_bin(&fs::read(path)?, &idents)
            } else {
                Self::parse_ini(&fs::read_to_string(path)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use celes_core::{AchievementCatalog, CatalogEntry, SchemaImages};

    fn schema_with(names: &[&str]) -> GameSchema {
        GameSchema {
            name: "Test Game".to_string(),
            images: SchemaImages::default(),
            achievement_catalog: AchievementCatalog {
                total: names.len() as u32,
                list: names
                    .iter()
                    .map(|name| CatalogEntry {
                        name: name.to_string(),
                        display_name: name.to_string(),
                        description: String::new(),
                        hidden: false,
                        icon: String::new(),
                        icon_gray: String::new(),
                    })
                    .collect(),
            },
            binary_name: None,
        }
    }

    fn encode_record(ident: u32, unlock_time: u32, achieved: bool) -> [u8; 24] {
        let mut record = [0u8; 24];
        let mut id = ident.to_le_bytes();
        id.reverse();
        record[0..4].copy_from_slice(&id);
        let mut time = unlock_time.to_le_bytes();
        time.reverse();
        record[8..12].copy_from_slice(&time);
        record[20] = u8::from(achieved);
        record
    }

    #[test]
    fn binary_records_resolve_to_catalog_names() {
        let schema = schema_with(&["ACH_FIRST", "ACH_SECOND"]);
        let idents = SmartSteamEmuSource::catalog_idents(&schema);

        let mut data = vec![0u8, 0, 0, 2];
        data.extend_from_slice(&encode_record(
            crc32fast::hash(b"ACH_FIRST"),
            1_600_000_000,
            true,
        ));
        // A stat counter the catalog does not know about.
        data.extend_from_slice(&encode_record(crc32fast::hash(b"stat_kills"), 0, true));

        let achievements = SmartSteamEmuSource::parse_bin(&data, &idents).unwrap();
        assert_eq!(achievements.len(), 1);
        assert_eq!(achievements[0].name, "ACH_FIRST");
        assert_eq!(achievements[0].unlock_time, 1_600_000_000);
        assert!(achievements[0].achieved);
    }

    #[test]
    fn ini_listing_drops_the_aggregate_counter() {
        let text = "[SteamAchievements]\nSteamAchievementCount=2\nACH_A=1\nACH_B=1\n";
        let achievements = SmartSteamEmuSource::parse_ini(text).unwrap();
        assert_eq!(achievements.len(), 2);
        assert!(achievements.iter().all(|a| a.achieved));
    }

    #[test]
    fn ini_without_listing_section_fails_to_parse() {
        let err = SmartSteamEmuSource::parse_ini("[Other]\nA=1\n").unwrap_err();
        assert_eq!(err.kind(), celes_core::ErrorKind::Parse);
    }
}
