use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::platform::Platform;
use crate::source::SourceTag;

/// Serialize a bool as the 0|1 integer the on-disk JSON contract uses;
/// accept either an integer or a bool when reading.
pub(crate) mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Int(u8),
            Bool(bool),
        }
        Ok(match Flag::deserialize(de)? {
            Flag::Int(n) => n != 0,
            Flag::Bool(b) => b,
        })
    }
}

/// One reconciled game entry: static catalog plus per-source dynamic stats.
///
/// Uniquely identified by `(app_id, platform)` — the merge and store key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub api_version: String,
    pub app_id: String,
    pub platform: Platform,
    pub schema: GameSchema,
    pub stats: Stats,
}

impl GameRecord {
    /// The merge/store identity key.
    pub fn key(&self) -> (&str, Platform) {
        (self.app_id.as_str(), self.platform)
    }
}

/// Static achievement catalog for a game, sourced from the remote
/// provider (cached on disk). Never persisted inside the local store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSchema {
    pub name: String,
    #[serde(default)]
    pub images: SchemaImages,
    pub achievement_catalog: AchievementCatalog,
    /// Game binary filename, when the provider knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaImages {
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AchievementCatalog {
    pub total: u32,
    pub list: Vec<CatalogEntry>,
}

/// One catalog achievement. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "flag", default)]
    pub hidden: bool,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub icon_gray: String,
}

/// Dynamic per-game stats: one entry per observing source, plus playtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub sources: Vec<SourceStats>,
    /// Monotonic playtime counter, seconds.
    pub playtime: u64,
}

/// Achievement observations from a single source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStats {
    pub source: SourceTag,
    pub active_achievements: Vec<ActiveAchievement>,
}

/// A source-observed progress/unlock record for one catalog achievement.
///
/// Invariants: when `max_progress` is 100 (the normalized scale),
/// `current_progress` is within [0, 100]; when `max_progress` is 0,
/// `current_progress` is 0. `unlock_time` is epoch seconds, 0 = unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveAchievement {
    pub name: String,
    #[serde(with = "flag")]
    pub achieved: bool,
    pub current_progress: u32,
    pub max_progress: u32,
    pub unlock_time: u64,
}

impl ActiveAchievement {
    /// An unlocked achievement with no partial-progress data.
    pub fn unlocked(name: impl Into<String>, unlock_time: u64) -> Self {
        Self {
            name: name.into(),
            achieved: true,
            current_progress: 0,
            max_progress: 0,
            unlock_time,
        }
    }
}

/// A game located by `scan`, to be consumed by the active-achievements
/// fetch of the same adapter. Transient; never persisted.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub app_id: String,
    pub source: SourceTag,
    pub platform: Platform,
    pub locator: Locator,
}

/// Adapter-opaque locator for where a scanned game's data lives.
#[derive(Debug, Clone)]
pub enum Locator {
    /// Directory holding the adapter's candidate achievement files.
    GameDir(PathBuf),
    /// Registry key path holding the game's achievement tree.
    RegistryKey(String),
    /// Platform account reference; carries the playtime observed at scan
    /// time so the fetch step needs no second profile round-trip.
    Profile { account_id: String, playtime: u64 },
}
