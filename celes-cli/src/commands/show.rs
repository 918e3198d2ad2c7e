use std::path::PathBuf;
use std::sync::Arc;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use celes_core::{Platform, SourceTag};
use celes_steam::SteamSchemaProvider;
use celes_store::LocalStore;

use crate::settings;

use super::format_playtime;

pub(crate) fn run_show(
    root_override: Option<PathBuf>,
    app_id: &str,
    platform: Platform,
    lang: &str,
) {
    let root = settings::resolve_root_path(root_override);

    let resolver = match SteamSchemaProvider::new(&root) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            log::error!("failed to set up the schema provider: {e}");
            std::process::exit(1);
        }
    };
    let store = LocalStore::new(&root, resolver);

    let game = match store.get_game(app_id, platform, lang) {
        Ok(game) => game,
        Err(e) => {
            log::error!("failed to read app {app_id}: {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "{} [{} / {}]",
        game.schema.name.if_supports_color(Stdout, |t| t.bold()),
        game.app_id.if_supports_color(Stdout, |t| t.cyan()),
        game.platform,
    );
    log::info!(
        "{} catalog achievement(s), playtime {}",
        game.schema.achievement_catalog.total,
        format_playtime(game.stats.playtime),
    );

    for source in &game.stats.sources {
        log::info!("");
        let heading = if source.source == SourceTag::Merge {
            format!("{} (reconciled)", source.source)
        } else {
            source.source.to_string()
        };
        log::info!("{}:", heading.if_supports_color(Stdout, |t| t.bold()));

        for achievement in &source.active_achievements {
            let marker = if achievement.achieved {
                "✔".if_supports_color(Stdout, |t| t.green()).to_string()
            } else {
                "·".if_supports_color(Stdout, |t| t.dimmed()).to_string()
            };
            let progress = if achievement.max_progress > 0 {
                format!(
                    " ({}/{})",
                    achievement.current_progress, achievement.max_progress
                )
            } else {
                String::new()
            };
            log::info!("  {marker} {}{progress}", achievement.name);
        }
    }
}
