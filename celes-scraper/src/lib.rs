//! Orchestrator: runs enabled adapters in caller-declared order,
//! isolating per-game failures so one game never aborts the batch.

use celes_core::{
    API_VERSION, AchievementSource, CelesConfig, ErrorKind, GameRecord, ProgressRange,
    ProgressReporter, ScanResult, ScrapError, ScrapeFailure, SourceStats, Stats, scrape_progress,
};

/// Everything a scrape run produced: assembled records plus the error
/// side list (scan order preserved within each plugin).
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub games: Vec<GameRecord>,
    pub errors: Vec<ScrapeFailure>,
}

/// Run every adapter in declared order.
///
/// Per adapter: `scan`, then per game in scan order fetch the schema and
/// the active achievements and assemble a [`GameRecord`]. Failures are
/// tagged and collected rather than propagated, with two exceptions to
/// plain collection: a wrong-source signal is swallowed entirely (the
/// data belongs to another, separately-covered adapter), and an adapter
/// that cannot even run is captured once, tagged by plugin name only.
///
/// Progress is reported through the optional callback after each game
/// and once more at the top of the window after each adapter completes.
pub fn run_sources(
    sources: &[Box<dyn AchievementSource>],
    config: &CelesConfig,
    range: ProgressRange,
    progress: &mut ProgressReporter<'_>,
) -> ScrapeOutcome {
    let mut outcome = ScrapeOutcome::default();
    let total_plugins = sources.len();

    for (plugin_index, source) in sources.iter().enumerate() {
        let scans = match source.scan(&config.extra_search_roots) {
            Ok(scans) => scans,
            Err(error) => {
                if error.kind() != ErrorKind::WrongSource {
                    log::warn!("[{}] adapter failed to run: {error}", source.name());
                    outcome
                        .errors
                        .push(ScrapeFailure::for_plugin(source.name(), error));
                }
                progress.report(range.end());
                continue;
            }
        };

        let games_in_plugin = scans.len();
        for (game_index, scan) in scans.iter().enumerate() {
            match scrape_game(source.as_ref(), scan, &config.language) {
                Ok(record) => outcome.games.push(record),
                Err(ScrapError::WrongSource) => {
                    log::debug!(
                        "[{}] app {}: data belongs to another source, skipping",
                        source.name(),
                        scan.app_id
                    );
                }
                Err(error) => outcome.errors.push(ScrapeFailure::for_game(
                    source.name(),
                    scan.platform,
                    scan.source,
                    &scan.app_id,
                    error,
                )),
            }
            progress.report(scrape_progress(
                range,
                plugin_index,
                total_plugins,
                game_index,
                games_in_plugin,
            ));
        }
        progress.report(range.end());
    }

    outcome
}

fn scrape_game(
    source: &dyn AchievementSource,
    scan: &ScanResult,
    lang: &str,
) -> Result<GameRecord, ScrapError> {
    let schema = source.fetch_schema(&scan.app_id, lang)?;
    let active_achievements = source.fetch_active_achievements(scan)?;
    Ok(GameRecord {
        api_version: API_VERSION.to_string(),
        app_id: scan.app_id.clone(),
        platform: scan.platform,
        schema,
        stats: Stats {
            sources: vec![SourceStats {
                source: scan.source,
                active_achievements,
            }],
            playtime: source.playtime(scan),
        },
    })
}
