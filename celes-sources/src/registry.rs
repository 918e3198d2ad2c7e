//! Read-only registry access behind a narrow trait.
//!
//! The core never links an OS registry API; registry-backed adapters
//! consume this trait, and embedders supply an implementation for their
//! platform. `InMemoryRegistry` serves tests and headless use.
//!
//! Key paths use `/` separators (a leading hive name like
//! `HKEY_CURRENT_USER` is part of the path); `\` is accepted and
//! normalized. Lookups are case-insensitive, like the registry itself.

use std::collections::BTreeMap;

use celes_core::ScrapError;

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryValue {
    Dword(u32),
    Text(String),
    Binary(Vec<u8>),
}

impl RegistryValue {
    /// Numeric reading of a value, for the dialects that store counters
    /// as either DWORDs or decimal strings.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Dword(n) => Some(u64::from(*n)),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Binary(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Read-only registry queries. A missing key is an empty result, not an
/// error — scans probe keys that usually do not exist.
pub trait RegistryView: Send + Sync {
    /// Immediate subkey names under `path`.
    fn subkeys(&self, path: &str) -> Result<Vec<String>, ScrapError>;

    /// Name/value pairs stored directly under `path`.
    fn values(&self, path: &str) -> Result<Vec<(String, RegistryValue)>, ScrapError>;

    /// Single named value under `path`.
    fn value(&self, path: &str, name: &str) -> Result<Option<RegistryValue>, ScrapError> {
        Ok(self
            .values(path)?
            .into_iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v))
    }
}

fn canonical_path(path: &str) -> String {
    path.replace('\\', "/").trim_matches('/').to_string()
}

fn fold_path(path: &str) -> String {
    canonical_path(path).to_lowercase()
}

/// In-memory registry tree for tests and embedders without an OS
/// registry. Key names preserve their inserted case; lookups fold case.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRegistry {
    // case-folded path -> (original-case path, value entries)
    keys: BTreeMap<String, (String, Vec<(String, RegistryValue)>)>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a key exists (with no values).
    pub fn insert_key(&mut self, path: &str) {
        self.keys
            .entry(fold_path(path))
            .or_insert_with(|| (canonical_path(path), Vec::new()));
    }

    pub fn insert_value(&mut self, path: &str, name: &str, value: RegistryValue) {
        self.keys
            .entry(fold_path(path))
            .or_insert_with(|| (canonical_path(path), Vec::new()))
            .1
            .push((name.to_string(), value));
    }
}

impl RegistryView for InMemoryRegistry {
    fn subkeys(&self, path: &str) -> Result<Vec<String>, ScrapError> {
        let prefix = format!("{}/", fold_path(path));
        let mut names: Vec<String> = self
            .keys
            .iter()
            .filter(|(folded, _)| folded.starts_with(&prefix))
            .filter_map(|(_, (original, _))| {
                original
                    .split('/')
                    .nth(prefix.matches('/').count())
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn values(&self, path: &str) -> Result<Vec<(String, RegistryValue)>, ScrapError> {
        Ok(self
            .keys
            .get(&fold_path(path))
            .map(|(_, values)| values.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subkeys_are_immediate_children_only() {
        let mut registry = InMemoryRegistry::new();
        registry.insert_key("HKEY_CURRENT_USER/SOFTWARE/Reloaded/220/ACH_A");
        registry.insert_key("HKEY_CURRENT_USER/SOFTWARE/Reloaded/220/ACH_B");
        registry.insert_key("HKEY_CURRENT_USER/SOFTWARE/Reloaded/400");

        let apps = registry
            .subkeys("HKEY_CURRENT_USER\\SOFTWARE\\Reloaded")
            .unwrap();
        assert_eq!(apps, vec!["220".to_string(), "400".to_string()]);
    }

    #[test]
    fn missing_key_yields_empty_results() {
        let registry = InMemoryRegistry::new();
        assert!(registry.subkeys("HKEY_CURRENT_USER/nope").unwrap().is_empty());
        assert!(registry.values("HKEY_CURRENT_USER/nope").unwrap().is_empty());
    }

    #[test]
    fn value_lookup_is_case_insensitive() {
        let mut registry = InMemoryRegistry::new();
        registry.insert_value(
            "HKEY_CURRENT_USER/Software/Valve/Steam",
            "SteamPath",
            RegistryValue::Text("/opt/steam".to_string()),
        );
        let value = registry
            .value("hkey_current_user/software/valve/steam", "steampath")
            .unwrap()
            .unwrap();
        assert_eq!(value.as_str(), Some("/opt/steam"));
    }
}
