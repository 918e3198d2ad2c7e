//! Achievement-data sources: one adapter per emulator/platform dialect,
//! plus the shared parsing and normalization machinery they build on.

use std::sync::Arc;

pub mod codex;
pub mod goldberg;
pub mod ini;
pub mod norm;
pub mod record_bin;
pub mod registry;
pub mod reloaded;
pub mod scan;
pub mod skidrow;
pub mod sse;
pub mod steam;

pub use codex::CodexSource;
pub use goldberg::GoldbergSource;
pub use record_bin::{BinaryRecord, parse_records};
pub use registry::{InMemoryRegistry, RegistryValue, RegistryView};
pub use reloaded::ReloadedSource;
pub use skidrow::SkidrowSource;
pub use sse::SmartSteamEmuSource;
pub use steam::SteamSource;

use celes_core::{AchievementSource, CelesConfig, SchemaResolver, SourceTag};
use celes_steam::profile::ProfileLookup;

/// Source tags enabled by default, in scrape order.
pub fn default_sources() -> Vec<SourceTag> {
    vec![
        SourceTag::Steam,
        SourceTag::Codex,
        SourceTag::Goldberg,
        SourceTag::SmartSteamEmu,
        SourceTag::Reloaded,
        SourceTag::Skidrow,
    ]
}

/// Explicit compiled registry mapping configured source tags to adapter
/// instances. The synthetic `Merge` tag has no adapter and is skipped.
pub fn build_sources(
    tags: &[SourceTag],
    config: &CelesConfig,
    resolver: Arc<dyn SchemaResolver>,
    registry: Arc<dyn RegistryView>,
    profile: Arc<dyn ProfileLookup>,
) -> Vec<Box<dyn AchievementSource>> {
    let mut sources: Vec<Box<dyn AchievementSource>> = Vec::new();
    for tag in tags {
        match tag {
            SourceTag::Codex => sources.push(Box::new(CodexSource::new(resolver.clone()))),
            SourceTag::Goldberg => sources.push(Box::new(GoldbergSource::new(resolver.clone()))),
            SourceTag::SmartSteamEmu => sources.push(Box::new(SmartSteamEmuSource::new(
                resolver.clone(),
                config.language.clone(),
            ))),
            SourceTag::Reloaded => sources.push(Box::new(ReloadedSource::new(
                resolver.clone(),
                registry.clone(),
            ))),
            SourceTag::Skidrow => sources.push(Box::new(SkidrowSource::new(resolver.clone()))),
            SourceTag::Steam => sources.push(Box::new(SteamSource::new(
                resolver.clone(),
                profile.clone(),
                registry.clone(),
                config.steam_listing,
                config.steam_account_id.clone(),
            ))),
            SourceTag::Merge => {
                log::warn!("'Merge' is a synthetic source and cannot be scraped; skipping");
            }
        }
    }
    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use celes_core::{
        AchievementCatalog, ActiveAchievement, GameSchema, Platform, SchemaImages, ScrapError,
    };
    use celes_steam::profile::OwnedGame;

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

    struct StubProfile;

    impl ProfileLookup for StubProfile {
        fn owned_games(&self, _account_id: &str) -> Result<Vec<OwnedGame>, ScrapError> {
            Ok(Vec::new())
        }

        fn achievements(
            &self,
            _account_id: &str,
            _app_id: &str,
        ) -> Result<Vec<ActiveAchievement>, ScrapError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn registry_builds_adapters_in_declared_order_and_skips_merge() {
        let config = CelesConfig::new("/tmp/celes-root");
        let tags = [SourceTag::Codex, SourceTag::Merge, SourceTag::Goldberg];
        let sources = build_sources(
            &tags,
            &config,
            Arc::new(StubResolver),
            Arc::new(InMemoryRegistry::new()),
            Arc::new(StubProfile),
        );
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["codex", "goldberg"]);
    }

    #[test]
    fn default_sources_exclude_merge() {
        assert!(!default_sources().contains(&SourceTag::Merge));
    }
}
