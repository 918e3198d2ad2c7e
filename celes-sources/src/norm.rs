//! Normalization shared by the registry/INI-style dialects.
//!
//! Every dialect funnels into the same raw shape, then through the same
//! rules: known non-achievement keys are dropped, progress is rescaled
//! to a 0–100 range (or zeroed when the dialect declares no maximum),
//! and an entry is surfaced as active when it is either achieved or
//! carries partial progress worth reporting.

use celes_core::ActiveAchievement;

/// Raw dialect observation before normalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawProgress {
    pub achieved: bool,
    pub current: u32,
    pub max: u32,
    pub unlock_time: u64,
}

impl RawProgress {
    pub fn achieved_at(unlock_time: u64) -> Self {
        Self {
            achieved: true,
            unlock_time,
            ..Self::default()
        }
    }
}

/// Rescale declared progress: a zero max means no progress data at all,
/// anything else maps onto a 0–100 scale (floored, clamped).
pub fn normalize_progress(current: u32, max: u32) -> (u32, u32) {
    if max == 0 {
        (0, 0)
    } else {
        let scaled = (u64::from(current) * 100 / u64::from(max)).min(100) as u32;
        (scaled, 100)
    }
}

/// Parse a dialect count value; the dialects write plain integers but
/// the occasional tool emits floats.
pub fn parse_count(value: &str) -> u32 {
    if let Ok(n) = value.parse::<u32>() {
        return n;
    }
    value.parse::<f64>().map(|f| f.max(0.0) as u32).unwrap_or(0)
}

/// Drop non-achievement keys and normalize the rest, keeping only
/// entries that are active.
pub fn normalize_entries(
    entries: Vec<(String, RawProgress)>,
    drop_keys: &[&str],
) -> Vec<ActiveAchievement> {
    entries
        .into_iter()
        .filter(|(name, _)| !drop_keys.iter().any(|key| key.eq_ignore_ascii_case(name)))
        .filter_map(|(name, raw)| {
            let (current_progress, max_progress) = normalize_progress(raw.current, raw.max);
            if !raw.achieved && max_progress == 0 {
                return None;
            }
            Some(ActiveAchievement {
                name,
                achieved: raw.achieved,
                current_progress,
                max_progress,
                unlock_time: raw.unlock_time,
            })
        })
        .collect()
}
