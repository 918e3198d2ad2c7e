use celes_core::{
    AchievementCatalog, ActiveAchievement, CatalogEntry, GameRecord, GameSchema, Platform,
    SchemaImages, SourceStats, SourceTag, Stats, UnlockTimePolicy,
};
use celes_merge::merge_collections;

fn schema(name: &str, total: u32) -> GameSchema {
    GameSchema {
        name: name.to_string(),
        images: SchemaImages::default(),
        achievement_catalog: AchievementCatalog {
            total,
            list: (0..total)
                .map(|i| CatalogEntry {
                    name: format!("ACH_{i}"),
                    display_name: format!("Achievement {i}"),
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

fn achievement(name: &str, progress: u32, unlock_time: u64) -> ActiveAchievement {
    ActiveAchievement {
        name: name.to_string(),
        achieved: unlock_time > 0,
        current_progress: progress,
        max_progress: if progress > 0 { 100 } else { 0 },
        unlock_time,
    }
}

fn record(
    app_id: &str,
    schema: GameSchema,
    source: SourceTag,
    achievements: Vec<ActiveAchievement>,
    playtime: u64,
) -> GameRecord {
    GameRecord {
        api_version: "v1".to_string(),
        app_id: app_id.to_string(),
        platform: Platform::Steam,
        schema,
        stats: Stats {
            sources: vec![SourceStats {
                source,
                active_achievements: achievements,
            }],
            playtime,
        },
    }
}

fn source_of<'a>(game: &'a GameRecord, tag: SourceTag) -> &'a SourceStats {
    game.stats
        .sources
        .iter()
        .find(|s| s.source == tag)
        .unwrap_or_else(|| panic!("missing {tag} source"))
}

/// Normalize ordering that merge legitimately leaves input-dependent, so
/// order-independence can be asserted on the reconciled content.
fn canonicalize(mut games: Vec<GameRecord>) -> Vec<GameRecord> {
    for game in &mut games {
        game.stats
            .sources
            .sort_by_key(|s| s.source.canonical_name());
        for source in &mut game.stats.sources {
            source.active_achievements.sort_by(|a, b| a.name.cmp(&b.name));
        }
    }
    games.sort_by(|a, b| a.app_id.cmp(&b.app_id));
    games
}

#[test]
fn larger_catalog_total_wins_schema_selection() {
    let small = record(
        "382890",
        schema("Celeste (stale)", 1),
        SourceTag::Codex,
        vec![],
        0,
    );
    let large = record(
        "382890",
        schema("Celeste", 2),
        SourceTag::Goldberg,
        vec![],
        0,
    );
    let expected = large.schema.clone();

    let merged = merge_collections(
        vec![vec![small], vec![large]],
        UnlockTimePolicy::PreferNewest,
    );
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].schema, expected);
}

#[test]
fn schema_tie_keeps_the_earliest_seen_record() {
    let first = record("220", schema("First", 2), SourceTag::Codex, vec![], 0);
    let second = record("220", schema("Second", 2), SourceTag::Goldberg, vec![], 0);

    let merged = merge_collections(
        vec![vec![first], vec![second]],
        UnlockTimePolicy::PreferNewest,
    );
    assert_eq!(merged[0].schema.name, "First");
}

#[test]
fn greater_progress_wins_collisions() {
    let a = record(
        "220",
        schema("G", 1),
        SourceTag::Codex,
        vec![achievement("progressCollisionTest", 5, 0)],
        0,
    );
    let b = record(
        "220",
        schema("G", 1),
        SourceTag::Codex,
        vec![achievement("progressCollisionTest", 6, 0)],
        0,
    );

    let merged = merge_collections(vec![vec![a], vec![b]], UnlockTimePolicy::PreferNewest);
    let codex = source_of(&merged[0], SourceTag::Codex);
    assert_eq!(codex.active_achievements.len(), 1);
    assert_eq!(codex.active_achievements[0].current_progress, 6);
}

#[test]
fn unlock_time_breaks_ties_by_policy() {
    for (policy, expected) in [
        (UnlockTimePolicy::PreferOldest, 5),
        (UnlockTimePolicy::PreferNewest, 6),
    ] {
        let a = record(
            "220",
            schema("G", 1),
            SourceTag::Codex,
            vec![achievement("unlockTimeCollisionTest", 0, 5)],
            0,
        );
        let b = record(
            "220",
            schema("G", 1),
            SourceTag::Codex,
            vec![achievement("unlockTimeCollisionTest", 0, 6)],
            0,
        );

        let merged = merge_collections(vec![vec![a], vec![b]], policy);
        let codex = source_of(&merged[0], SourceTag::Codex);
        assert_eq!(
            codex.active_achievements[0].unlock_time, expected,
            "policy {policy:?}"
        );
    }
}

#[test]
fn merging_is_order_independent() {
    let a = vec![record(
        "220",
        schema("G", 3),
        SourceTag::Codex,
        vec![achievement("ACH_0", 5, 10), achievement("ACH_1", 0, 7)],
        100,
    )];
    let b = vec![record(
        "220",
        schema("G (older dump)", 1),
        SourceTag::Codex,
        vec![achievement("ACH_0", 6, 3), achievement("ACH_2", 0, 9)],
        350,
    )];

    for policy in [UnlockTimePolicy::PreferOldest, UnlockTimePolicy::PreferNewest] {
        let forward = merge_collections(vec![a.clone(), b.clone()], policy);
        let backward = merge_collections(vec![b.clone(), a.clone()], policy);
        assert_eq!(canonicalize(forward), canonicalize(backward));
    }
}

#[test]
fn sources_union_by_tag_and_playtime_takes_the_maximum() {
    let codex = record(
        "220",
        schema("G", 1),
        SourceTag::Codex,
        vec![achievement("ACH_0", 0, 10)],
        120,
    );
    let goldberg = record(
        "220",
        schema("G", 1),
        SourceTag::Goldberg,
        vec![achievement("ACH_0", 0, 99)],
        3600,
    );

    let merged = merge_collections(
        vec![vec![codex], vec![goldberg]],
        UnlockTimePolicy::PreferNewest,
    );
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].stats.playtime, 3600);
    // Both observing sources survive untouched.
    assert_eq!(
        source_of(&merged[0], SourceTag::Codex).active_achievements[0].unlock_time,
        10
    );
    assert_eq!(
        source_of(&merged[0], SourceTag::Goldberg).active_achievements[0].unlock_time,
        99
    );
    // The synthetic union picks the policy winner.
    assert_eq!(
        source_of(&merged[0], SourceTag::Merge).active_achievements[0].unlock_time,
        99
    );
}

#[test]
fn stale_merge_sources_are_discarded_and_regenerated() {
    let mut stale = record(
        "220",
        schema("G", 1),
        SourceTag::Codex,
        vec![achievement("ACH_0", 0, 10)],
        0,
    );
    stale.stats.sources.push(SourceStats {
        source: SourceTag::Merge,
        active_achievements: vec![achievement("ACH_GONE", 0, 1)],
    });

    let merged = merge_collections(vec![vec![stale]], UnlockTimePolicy::PreferNewest);
    let merge_source = source_of(&merged[0], SourceTag::Merge);
    assert_eq!(merge_source.active_achievements.len(), 1);
    assert_eq!(merge_source.active_achievements[0].name, "ACH_0");
    // Exactly one Merge source, regenerated after the fold.
    let merge_count = merged[0]
        .stats
        .sources
        .iter()
        .filter(|s| s.source == SourceTag::Merge)
        .count();
    assert_eq!(merge_count, 1);
}

#[test]
fn distinct_keys_do_not_fold_together() {
    let a = record("220", schema("A", 1), SourceTag::Codex, vec![], 0);
    let b = record("440", schema("B", 1), SourceTag::Codex, vec![], 0);

    let merged = merge_collections(vec![vec![a], vec![b]], UnlockTimePolicy::PreferNewest);
    assert_eq!(merged.len(), 2);
}
