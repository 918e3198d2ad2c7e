//! Reloaded adapter.
//!
//! Reloaded keeps achievement state in a registry tree: one key per app
//! id under its SOFTWARE branch, one subkey per achievement carrying
//! `Achieved`/`CurProgress`/`MaxProgress`/`UnlockTime` values, and a
//! `Stats` subkey for the aggregate block.

use std::path::PathBuf;
use std::sync::Arc;

use celes_core::{
    AchievementSource, ActiveAchievement, GameSchema, Locator, Platform, ScanResult,
    SchemaResolver, ScrapError, SourceTag,
};

use crate::norm::{RawProgress, normalize_entries};
use crate::registry::RegistryView;

const BASE_KEY: &str = "HKEY_CURRENT_USER/SOFTWARE/Reloaded";

/// Aggregate subkey, not an achievement.
const DROP_SUBKEYS: &[&str] = &["Stats"];

pub struct ReloadedSource {
    resolver: Arc<dyn SchemaResolver>,
    registry: Arc<dyn RegistryView>,
}

impl ReloadedSource {
    pub fn new(resolver: Arc<dyn SchemaResolver>, registry: Arc<dyn RegistryView>) -> Self {
        Self { resolver, registry }
    }

    fn numeric_value(
        values: &[(String, crate::registry::RegistryValue)],
        name: &str,
    ) -> u64 {
        values
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.as_u64())
            .unwrap_or(0)
    }
}

impl AchievementSource for ReloadedSource {
    fn name(&self) -> &'static str {
        "reloaded"
    }

    fn platform(&self) -> Platform {
        Platform::Steam
    }

    fn source(&self) -> SourceTag {
        SourceTag::Reloaded
    }

    /// Registry-backed: extra filesystem roots do not apply.
    fn scan(&self, _extra_search_roots: &[PathBuf]) -> Result<Vec<ScanResult>, ScrapError> {
        let mut results = Vec::new();
        for app_id in self.registry.subkeys(BASE_KEY)? {
            let key = format!("{BASE_KEY}/{app_id}");
            // An app key with no achievement subkeys is just a leftover
            // identity entry, not a game.
            if self.registry.subkeys(&key)?.is_empty() {
                continue;
            }
            results.push(ScanResult {
                app_id,
                source: SourceTag::Reloaded,
                platform: Platform::Steam,
                locator: Locator::RegistryKey(key),
            });
        }
        Ok(results)
    }

    fn fetch_schema(&self, app_id: &str, lang: &str) -> Result<GameSchema, ScrapError> {
        self.resolver.schema(app_id, Platform::Steam, lang)
    }

    fn fetch_active_achievements(
        &self,
        scan: &ScanResult,
    ) -> Result<Vec<ActiveAchievement>, ScrapError> {
        let Locator::RegistryKey(key) = &scan.locator else {
            return Err(ScrapError::parse("reloaded adapter expects a registry key"));
        };

        let mut entries = Vec::new();
        for subkey in self.registry.subkeys(key)? {
            let values = self.registry.values(&format!("{key}/{subkey}"))?;
            let raw = RawProgress {
                achieved: Self::numeric_value(&values, "Achieved") != 0,
                current: Self::numeric_value(&values, "CurProgress") as u32,
                max: Self::numeric_value(&values, "MaxProgress") as u32,
                unlock_time: Self::numeric_value(&values, "UnlockTime"),
            };
            entries.push((subkey, raw));
        }
        Ok(normalize_entries(entries, DROP_SUBKEYS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{InMemoryRegistry, RegistryValue};
    use celes_core::{AchievementCatalog, GameSchema, SchemaImages};

    struct StubResolver;

    impl SchemaResolver for StubResolver {
        fn schema(
            &self,
            app_id: &str,
            _platform: Platform,
            _lang: &str,
        ) -> Result<GameSchema, ScrapError> {
            Ok(GameSchema {
                name: format!("game {app_id}"),
                images: SchemaImages::default(),
                achievement_catalog: AchievementCatalog::default(),
                binary_name: None,
            })
        }
    }

    fn sample_registry() -> InMemoryRegistry {
        let mut registry = InMemoryRegistry::new();
        let app = "HKEY_CURRENT_USER/SOFTWARE/Reloaded/220";
        registry.insert_value(&format!("{app}/ACH_DONE"), "Achieved", RegistryValue::Dword(1));
        registry.insert_value(
            &format!("{app}/ACH_DONE"),
            "UnlockTime",
            RegistryValue::Dword(1_600_000_000),
        );
        registry.insert_value(
            &format!("{app}/ACH_GRIND"),
            "CurProgress",
            RegistryValue::Dword(3),
        );
        registry.insert_value(
            &format!("{app}/ACH_GRIND"),
            "MaxProgress",
            RegistryValue::Dword(12),
        );
        registry.insert_value(&format!("{app}/Stats"), "Kills", RegistryValue::Dword(99));
        // Leftover identity key with no achievement subkeys.
        registry.insert_value(
            "HKEY_CURRENT_USER/SOFTWARE/Reloaded/400",
            "Language",
            RegistryValue::Text("english".to_string()),
        );
        registry
    }

    #[test]
    fn scan_accepts_only_keys_with_achievement_subkeys() {
        let source = ReloadedSource::new(Arc::new(StubResolver), Arc::new(sample_registry()));
        let results = source.scan(&[]).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].app_id, "220");
    }

    #[test]
    fn fetch_normalizes_the_registry_tree_and_drops_stats() {
        let source = ReloadedSource::new(Arc::new(StubResolver), Arc::new(sample_registry()));
        let scan = source.scan(&[]).unwrap().remove(0);
        let achievements = source.fetch_active_achievements(&scan).unwrap();

        assert_eq!(achievements.len(), 2);
        let done = achievements.iter().find(|a| a.name == "ACH_DONE").unwrap();
        assert!(done.achieved);
        assert_eq!(done.unlock_time, 1_600_000_000);

        let grind = achievements.iter().find(|a| a.name == "ACH_GRIND").unwrap();
        assert_eq!((grind.current_progress, grind.max_progress), (25, 100));
        assert!(achievements.iter().all(|a| a.name != "Stats"));
    }
}
