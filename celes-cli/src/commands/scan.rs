use std::path::PathBuf;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use celes_core::{
    CelesConfig, ProgressRange, ProgressReporter, SourceTag, SteamListing, UnlockTimePolicy,
};
use celes_merge::merge_collections;
use celes_sources::{InMemoryRegistry, RegistryView, build_sources, default_sources};
use celes_steam::profile::ProfileLookup;
use celes_steam::{SteamCommunityClient, SteamSchemaProvider};
use celes_store::{LocalStore, StoreLock};

use crate::settings;

use super::unlocked_count;

pub(crate) fn run_scan(
    root_override: Option<PathBuf>,
    sources: Option<Vec<SourceTag>>,
    search_roots: Vec<PathBuf>,
    lang: String,
    prefer_oldest_unlock: bool,
    steam_account: Option<String>,
    owned: bool,
    save_root: bool,
) {
    if save_root {
        if let Some(path) = &root_override {
            if let Err(e) = settings::save_root_path(Some(path)) {
                log::warn!("failed to save root setting: {e}");
            }
        }
    }
    let root = settings::resolve_root_path(root_override);

    let mut config = CelesConfig::new(&root).language(lang);
    for search_root in search_roots {
        config = config.search_root(search_root);
    }
    if prefer_oldest_unlock {
        config = config.unlock_time_policy(UnlockTimePolicy::PreferOldest);
    }
    if let Some(account) = steam_account {
        config = config.steam_account(account);
    }
    if owned {
        config = config.steam_listing(SteamListing::Owned);
    }

    let resolver = match SteamSchemaProvider::new(&root) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            log::error!("failed to set up the schema provider: {e}");
            std::process::exit(1);
        }
    };
    let profile: Arc<dyn ProfileLookup> = match SteamCommunityClient::new() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            log::error!("failed to set up the profile client: {e}");
            std::process::exit(1);
        }
    };
    // OS-backed registry views plug in here; the default sees no keys.
    let registry: Arc<dyn RegistryView> = Arc::new(InMemoryRegistry::new());

    let tags = sources.unwrap_or_else(default_sources);
    let adapters = build_sources(&tags, &config, resolver.clone(), registry, profile);

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("  {bar:40.cyan/blue} {pos:>3}% {msg}")
            .expect("static pattern"),
    );
    bar.set_message("scraping");
    let mut on_progress = |value: u8| bar.set_position(u64::from(value));
    let outcome = celes_scraper::run_sources(
        &adapters,
        &config,
        ProgressRange::default(),
        &mut ProgressReporter::new(&mut on_progress),
    );
    bar.finish_and_clear();

    log::info!(
        "scraped {} game(s) from {} source(s), {} error(s)",
        outcome.games.len(),
        adapters.len(),
        outcome.errors.len()
    );

    // The whole load -> merge -> persist sequence stays under the lock.
    let guard = match StoreLock::acquire(&root) {
        Ok(guard) => guard,
        Err(e) => {
            log::error!("failed to lock the store: {e}");
            std::process::exit(1);
        }
    };
    let store = LocalStore::new(&root, resolver);
    let stored = match store.get_all(&config.language, &mut ProgressReporter::none()) {
        Ok(stored) => stored,
        Err(e) => {
            log::error!("failed to read the store: {e}");
            std::process::exit(1);
        }
    };
    let merged = merge_collections(
        vec![stored, outcome.games],
        config.unlock_time_policy,
    );
    let written = store.update_all(&merged);
    guard.unlock();

    log::info!("");
    for game in &merged {
        log::info!(
            "  {} [{}] {} / {} unlocked",
            game.schema.name.if_supports_color(Stdout, |t| t.bold()),
            game.app_id.if_supports_color(Stdout, |t| t.cyan()),
            unlocked_count(game),
            game.schema.achievement_catalog.total,
        );
    }
    log::info!("");
    log::info!("persisted {written} of {} game(s)", merged.len());

    if !outcome.errors.is_empty() {
        log::info!("");
        log::info!(
            "{}",
            format!("{} game(s) could not be scraped:", outcome.errors.len())
                .if_supports_color(Stdout, |t| t.yellow()),
        );
        for failure in &outcome.errors {
            log::info!("  {}", failure.to_string().if_supports_color(Stdout, |t| t.red()));
        }
    }

    if merged.is_empty() && !outcome.errors.is_empty() {
        std::process::exit(1);
    }
}
