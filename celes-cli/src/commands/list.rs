use std::path::PathBuf;
use std::sync::Arc;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use celes_core::ProgressReporter;
use celes_steam::SteamSchemaProvider;
use celes_store::LocalStore;

use crate::settings;

use super::{format_playtime, unlocked_count};

pub(crate) fn run_list(root_override: Option<PathBuf>, lang: &str) {
    let root = settings::resolve_root_path(root_override);

    let resolver = match SteamSchemaProvider::new(&root) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            log::error!("failed to set up the schema provider: {e}");
            std::process::exit(1);
        }
    };
    let store = LocalStore::new(&root, resolver);

    let games = match store.get_all(lang, &mut ProgressReporter::none()) {
        Ok(games) => games,
        Err(e) => {
            log::error!("failed to read the store: {e}");
            std::process::exit(1);
        }
    };

    if games.is_empty() {
        log::info!(
            "{}",
            "The store is empty.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        log::info!("Run 'celes scan' to scrape achievement data.");
        return;
    }

    for game in &games {
        log::info!(
            "  {} [{} / {}]",
            game.schema.name.if_supports_color(Stdout, |t| t.bold()),
            game.app_id.if_supports_color(Stdout, |t| t.cyan()),
            game.platform,
        );
        log::info!(
            "    {} / {} unlocked, playtime {}",
            unlocked_count(game),
            game.schema.achievement_catalog.total,
            format_playtime(game.stats.playtime),
        );
    }
    log::info!("");
    log::info!("{} game(s) in the store", games.len());
}
