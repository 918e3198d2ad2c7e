pub(crate) mod list;
pub(crate) mod scan;
pub(crate) mod show;

use celes_core::GameRecord;

/// Seconds → "3h 21m" style display.
pub(crate) fn format_playtime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m")
    }
}

/// Unlocked count according to the synthetic Merge source.
pub(crate) fn unlocked_count(game: &GameRecord) -> usize {
    game.stats
        .sources
        .iter()
        .find(|s| s.source == celes_core::SourceTag::Merge)
        .map(|s| s.active_achievements.iter().filter(|a| a.achieved).count())
        .unwrap_or_else(|| {
            // Unmerged single-source record: count across its sources.
            game.stats
                .sources
                .iter()
                .flat_map(|s| &s.active_achievements)
                .filter(|a| a.achieved)
                .count()
        })
}
