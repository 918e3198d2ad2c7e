//! Shared data model, error taxonomy, and the source/schema traits for
//! the celes achievement aggregator.

use std::path::PathBuf;

pub mod config;
pub mod error;
pub mod platform;
pub mod progress;
pub mod source;
pub mod types;

pub use config::{CelesConfig, SteamListing, UnlockTimePolicy};
pub use error::{ErrorKind, ScrapError, ScrapeFailure};
pub use platform::{Platform, PlatformParseError};
pub use progress::{ProgressRange, ProgressReporter, scrape_progress};
pub use source::{SourceParseError, SourceTag};
pub use types::{
    AchievementCatalog, ActiveAchievement, CatalogEntry, GameRecord, GameSchema, Locator,
    ScanResult, SchemaImages, SourceStats, Stats,
};

/// Store format version written into every record. Persisted files whose
/// version differs are rejected outright — no migration, no best-effort
/// recovery.
pub const API_VERSION: &str = "v1";

/// One achievement-data source (an emulator dialect or the platform
/// itself).
///
/// Implementors form a closed set selected through an explicit compiled
/// registry; the capability set is fixed to scan / fetch-schema /
/// fetch-active-achievements plus identity accessors.
pub trait AchievementSource {
    /// Plugin name used to tag adapter-level failures.
    fn name(&self) -> &'static str;

    /// The platform this source observes games for.
    fn platform(&self) -> Platform;

    /// The tag attached to this source's observations.
    fn source(&self) -> SourceTag;

    /// Locate games this source has data for. `extra_search_roots` are
    /// probed in addition to the adapter's well-known install paths.
    fn scan(&self, extra_search_roots: &[PathBuf]) -> Result<Vec<ScanResult>, ScrapError>;

    /// Resolve the static achievement catalog for a game. Cache-aware:
    /// delegates to the schema provider, which only refetches stale
    /// entries.
    fn fetch_schema(&self, app_id: &str, lang: &str) -> Result<GameSchema, ScrapError>;

    /// Read and normalize the dynamic achievement observations for one
    /// scanned game.
    fn fetch_active_achievements(
        &self,
        scan: &ScanResult,
    ) -> Result<Vec<ActiveAchievement>, ScrapError>;

    /// Playtime observed for the scanned game, in seconds. Most sources
    /// have no playtime data.
    fn playtime(&self, _scan: &ScanResult) -> u64 {
        0
    }
}

/// Cache-aware resolver for static achievement catalogs, keyed by app id
/// and language. The store uses it to rejoin persisted stats with a fresh
/// schema; adapters use it to answer `fetch_schema`.
pub trait SchemaResolver: Send + Sync {
    fn schema(&self, app_id: &str, platform: Platform, lang: &str)
    -> Result<GameSchema, ScrapError>;
}
