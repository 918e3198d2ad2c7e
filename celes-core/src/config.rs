use std::path::PathBuf;

/// How same-name achievement collisions break exact progress ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnlockTimePolicy {
    /// The smaller known unlock time wins (oldest-first semantics; a
    /// known time always beats an unknown one).
    PreferOldest,
    /// The larger unlock time wins (most-recent semantics).
    #[default]
    PreferNewest,
}

/// Which games the Steam adapter lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SteamListing {
    /// Locally installed games only. Requires a Steam installation;
    /// scanning without one is a precondition failure.
    #[default]
    Installed,
    /// Games owned by the configured account, via its public profile.
    /// No installation required.
    Owned,
}

/// Explicit configuration threaded through constructors — no
/// process-wide mutable path state.
#[derive(Debug, Clone)]
pub struct CelesConfig {
    /// Root under which the store (`celes/`) and schema cache
    /// (`steam_cache/`) live.
    pub root_path: PathBuf,
    /// Caller-supplied search roots probed in addition to each adapter's
    /// well-known install paths.
    pub extra_search_roots: Vec<PathBuf>,
    /// Language for schema requests (e.g., "english").
    pub language: String,
    pub unlock_time_policy: UnlockTimePolicy,
    pub steam_listing: SteamListing,
    /// Platform account id for the Steam adapter's profile lookups.
    pub steam_account_id: Option<String>,
}

impl Default for CelesConfig {
    fn default() -> Self {
        Self {
            root_path: dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")),
            extra_search_roots: Vec::new(),
            language: "english".to_string(),
            unlock_time_policy: UnlockTimePolicy::default(),
            steam_listing: SteamListing::default(),
            steam_account_id: None,
        }
    }
}

impl CelesConfig {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            ..Self::default()
        }
    }

    pub fn search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.extra_search_roots.push(root.into());
        self
    }

    pub fn language(mut self, lang: impl Into<String>) -> Self {
        self.language = lang.into();
        self
    }

    pub fn unlock_time_policy(mut self, policy: UnlockTimePolicy) -> Self {
        self.unlock_time_policy = policy;
        self
    }

    pub fn steam_listing(mut self, listing: SteamListing) -> Self {
        self.steam_listing = listing;
        self
    }

    pub fn steam_account(mut self, account_id: impl Into<String>) -> Self {
        self.steam_account_id = Some(account_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_search_roots() {
        let config = CelesConfig::new("/tmp/celes-root")
            .search_root("/mnt/games")
            .search_root("/mnt/more-games")
            .language("french");
        assert_eq!(config.extra_search_roots.len(), 2);
        assert_eq!(config.language, "french");
        assert_eq!(config.unlock_time_policy, UnlockTimePolicy::PreferNewest);
    }
}
