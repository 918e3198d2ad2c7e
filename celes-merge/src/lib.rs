//! Pure reconciliation of game-data collections.
//!
//! `merge_collections` folds any number of collections keyed by
//! `(app_id, platform)`. No I/O; the result depends only on the inputs,
//! their order, and the unlock-time policy. After the fold, every record
//! gets a freshly regenerated synthetic `Merge` source — regeneration
//! happens strictly after folding so merge output is never folded into
//! itself.

use celes_core::{ActiveAchievement, GameRecord, SourceStats, SourceTag, UnlockTimePolicy};

/// Fold all input collections into one reconciled collection.
///
/// Rules per `(app_id, platform)` key:
/// - the schema of the record with the strictly larger catalog `total`
///   wins entirely; ties keep the earliest-seen record's schema;
/// - sources are unioned by tag, same-tag lists merged entrywise by
///   achievement name under the collision rule;
/// - playtime is the maximum across folded records;
/// - any pre-existing `Merge` source is discarded and regenerated from
///   the other sources of the final record.
pub fn merge_collections(
    collections: Vec<Vec<GameRecord>>,
    policy: UnlockTimePolicy,
) -> Vec<GameRecord> {
    let mut merged: Vec<GameRecord> = Vec::new();

    for collection in collections {
        for record in collection {
            let existing = merged
                .iter_mut()
                .find(|m| m.app_id == record.app_id && m.platform == record.platform);
            match existing {
                Some(existing) => fold_record(existing, record, policy),
                None => merged.push(record),
            }
        }
    }

    for record in &mut merged {
        regenerate_merge_source(record, policy);
    }

    merged
}

fn fold_record(existing: &mut GameRecord, incoming: GameRecord, policy: UnlockTimePolicy) {
    if incoming.schema.achievement_catalog.total > existing.schema.achievement_catalog.total {
        existing.schema = incoming.schema;
    }

    existing.stats.playtime = existing.stats.playtime.max(incoming.stats.playtime);

    for source in incoming.stats.sources {
        let current = existing
            .stats
            .sources
            .iter_mut()
            .find(|s| s.source == source.source);
        match current {
            Some(current) => merge_achievement_lists(
                &mut current.active_achievements,
                source.active_achievements,
                policy,
            ),
            None => existing.stats.sources.push(source),
        }
    }
}

/// Merge `incoming` into `current` entrywise by achievement name.
fn merge_achievement_lists(
    current: &mut Vec<ActiveAchievement>,
    incoming: Vec<ActiveAchievement>,
    policy: UnlockTimePolicy,
) {
    for achievement in incoming {
        match current.iter_mut().find(|a| a.name == achievement.name) {
            Some(existing) => {
                if candidate_wins(existing, &achievement, policy) {
                    *existing = achievement;
                }
            }
            None => current.push(achievement),
        }
    }
}

/// Collision rule between two same-name observations: strictly greater
/// progress wins outright; an exact tie breaks on unlock time by policy.
/// Under oldest-first semantics a known (non-zero) time beats an unknown
/// one.
fn candidate_wins(
    existing: &ActiveAchievement,
    candidate: &ActiveAchievement,
    policy: UnlockTimePolicy,
) -> bool {
    if candidate.current_progress != existing.current_progress {
        return candidate.current_progress > existing.current_progress;
    }
    match policy {
        UnlockTimePolicy::PreferOldest => {
            if existing.unlock_time == 0 {
                candidate.unlock_time != 0
            } else if candidate.unlock_time == 0 {
                false
            } else {
                candidate.unlock_time < existing.unlock_time
            }
        }
        UnlockTimePolicy::PreferNewest => candidate.unlock_time > existing.unlock_time,
    }
}

/// Discard any `Merge`-tagged source and rebuild it as the union-merge
/// of all other sources under the same collision rule.
fn regenerate_merge_source(record: &mut GameRecord, policy: UnlockTimePolicy) {
    record.stats.sources.retain(|s| s.source != SourceTag::Merge);

    let mut combined: Vec<ActiveAchievement> = Vec::new();
    for source in &record.stats.sources {
        merge_achievement_lists(&mut combined, source.active_achievements.clone(), policy);
    }

    record.stats.sources.push(SourceStats {
        source: SourceTag::Merge,
        active_achievements: combined,
    });
}
