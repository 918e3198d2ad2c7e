use serde::{Deserialize, Serialize};

/// Distribution/runtime platform a game belongs to.
///
/// This enum centralizes platform identity — the canonical name used in
/// store paths, merge keys, and error messages — in one place, replacing
/// ad-hoc string matching. Marked non-exhaustive: the schema provider
/// only serves Steam today, but store files already carry the platform
/// name so new platforms can appear without a format change.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Steam,
}

/// All platform variants in registration order.
const ALL_PLATFORMS: &[Platform] = &[Platform::Steam];

impl Platform {
    /// Canonical name used for store directories and serialized records.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::Steam => "Steam",
        }
    }

    /// All supported platform variants.
    pub fn all() -> &'static [Platform] {
        ALL_PLATFORMS
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

/// Error returned when a string cannot be parsed into a `Platform`.
#[derive(Debug, Clone)]
pub struct PlatformParseError(pub String);

impl std::fmt::Display for PlatformParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown platform: '{}'", self.0)
    }
}

impl std::error::Error for PlatformParseError {}

impl std::str::FromStr for Platform {
    type Err = PlatformParseError;

    /// Parse a platform name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        for &platform in ALL_PLATFORMS {
            if platform.canonical_name().to_lowercase() == lower {
                return Ok(platform);
            }
        }
        Err(PlatformParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_round_trip() {
        for &platform in Platform::all() {
            let parsed: Platform = platform.canonical_name().parse().unwrap();
            assert_eq!(parsed, platform);
        }
    }

    #[test]
    fn parsing_is_case_insensitive() {
        let parsed: Platform = "steam".parse().unwrap();
        assert_eq!(parsed, Platform::Steam);
    }

    #[test]
    fn unknown_string_returns_err() {
        let result: Result<Platform, _> = "gog".parse();
        assert!(result.is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Platform::Steam).unwrap();
        assert_eq!(json, "\"Steam\"");
        let back: Platform = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Platform::Steam);
    }
}
