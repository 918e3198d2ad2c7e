//! Steam platform adapter.
//!
//! Two listing modes: `Installed` enumerates `appmanifest_*.acf` files
//! under the detected installation (registry `SteamPath` value first,
//! then well-known paths); `Owned` enumerates the configured account's
//! public profile, which also observes playtime. Achievement state comes
//! from the profile lookup in both modes — the platform does not expose
//! it locally in a stable format.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use celes_core::{
    AchievementSource, ActiveAchievement, GameSchema, Locator, Platform, ScanResult,
    SchemaResolver, ScrapError, SourceTag, SteamListing,
};
use celes_steam::profile::ProfileLookup;

use crate::registry::RegistryView;

const STEAM_REGISTRY_KEY: &str = "HKEY_CURRENT_USER/Software/Valve/Steam";
const STEAM_PATH_VALUE: &str = "SteamPath";

pub struct SteamSource {
    resolver: Arc<dyn SchemaResolver>,
    profile: Arc<dyn ProfileLookup>,
    registry: Arc<dyn RegistryView>,
    listing: SteamListing,
    account_id: Option<String>,
}

impl SteamSource {
    pub fn new(
        resolver: Arc<dyn SchemaResolver>,
        profile: Arc<dyn ProfileLookup>,
        registry: Arc<dyn RegistryView>,
        listing: SteamListing,
        account_id: Option<String>,
    ) -> Self {
        Self {
            resolver,
            profile,
            registry,
            listing,
            account_id,
        }
    }

    /// Locate the Steam installation: registry value first, then
    /// well-known paths, then caller-supplied roots. A root counts only
    /// if its `steamapps` directory exists.
    fn install_root(&self, extra: &[PathBuf]) -> Result<Option<PathBuf>, ScrapError> {
        if let Some(value) = self.registry.value(STEAM_REGISTRY_KEY, STEAM_PATH_VALUE)? {
            if let Some(path) = value.as_str() {
                let path = PathBuf::from(path);
                if path.join("steamapps").is_dir() {
                    return Ok(Some(path));
                }
            }
        }

        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".steam").join("steam"));
        }
        if let Some(data) = dirs::data_dir() {
            candidates.push(data.join("Steam"));
        }
        candidates.push(PathBuf::from("C:/Program Files (x86)/Steam"));
        candidates.extend(extra.iter().cloned());

        Ok(candidates
            .into_iter()
            .find(|path| path.join("steamapps").is_dir()))
    }

    /// App ids of installed games, read from manifest filenames.
    fn installed_app_ids(root: &Path) -> Result<Vec<String>, ScrapError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(root.join("steamapps"))?.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(id) = name
                .strip_prefix("appmanifest_")
                .and_then(|n| n.strip_suffix(".acf"))
            {
                if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
                    ids.push(id.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn scan_result(&self, app_id: String, account_id: String, playtime: u64) -> ScanResult {
        ScanResult {
            app_id,
            source: SourceTag::Steam,
            platform: Platform::Steam,
            locator: Locator::Profile {
                account_id,
                playtime,
            },
        }
    }
}

impl AchievementSource for SteamSource {
    fn name(&self) -> &'static str {
        "steam"
    }

    fn platform(&self) -> Platform {
        Platform::Steam
    }

    fn source(&self) -> SourceTag {
        SourceTag::Steam
    }

    fn scan(&self, extra_search_roots: &[PathBuf]) -> Result<Vec<ScanResult>, ScrapError> {
        match self.listing {
            SteamListing::Installed => {
                let Some(root) = self.install_root(extra_search_roots)? else {
                    return Err(ScrapError::precondition("no Steam installation found"));
                };
                let account = self.account_id.clone().unwrap_or_default();
                Ok(Self::installed_app_ids(&root)?
                    .into_iter()
                    .map(|app_id| self.scan_result(app_id, account.clone(), 0))
                    .collect())
            }
            SteamListing::Owned => {
                let Some(account) = self.account_id.clone() else {
                    return Ok(Vec::new());
                };
                Ok(self
                    .profile
                    .owned_games(&account)?
                    .into_iter()
                    .map(|game| self.scan_result(game.app_id, account.clone(), game.playtime))
                    .collect())
            }
        }
    }

    fn fetch_schema(&self, app_id: &str, lang: &str) -> Result<GameSchema, ScrapError> {
        self.resolver.schema(app_id, Platform::Steam, lang)
    }

    fn fetch_active_achievements(
        &self,
        scan: &ScanResult,
    ) -> Result<Vec<ActiveAchievement>, ScrapError> {
        let Locator::Profile { account_id, .. } = &scan.locator else {
            return Err(ScrapError::parse("steam adapter expects a profile locator"));
        };
        if account_id.is_empty() {
            return Ok(Vec::new());
        }
        self.profile.achievements(account_id, &scan.app_id)
    }

    fn playtime(&self, scan: &ScanResult) -> u64 {
        match &scan.locator {
            Locator::Profile { playtime, .. } => *playtime,
            _ => 0,
        }
    }
}
