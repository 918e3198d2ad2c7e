use serde::{Deserialize, Serialize};

/// The tool/emulator/origin that produced an observed set of achievement
/// data for a game.
///
/// `Merge` is synthetic: it never comes from a scraper and is regenerated
/// from the other sources every time records are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceTag {
    Codex,
    Goldberg,
    SmartSteamEmu,
    Reloaded,
    Skidrow,
    Steam,
    Merge,
}

/// All source variants in registration order.
const ALL_SOURCES: &[SourceTag] = &[
    SourceTag::Codex,
    SourceTag::Goldberg,
    SourceTag::SmartSteamEmu,
    SourceTag::Reloaded,
    SourceTag::Skidrow,
    SourceTag::Steam,
    SourceTag::Merge,
];

impl SourceTag {
    /// Canonical name used in serialized records and error messages.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::Codex => "Codex",
            Self::Goldberg => "Goldberg",
            Self::SmartSteamEmu => "SmartSteamEmu",
            Self::Reloaded => "Reloaded",
            Self::Skidrow => "Skidrow",
            Self::Steam => "Steam",
            Self::Merge => "Merge",
        }
    }

    /// Accepted aliases for CLI parsing (case-insensitive).
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Codex => &["codex"],
            Self::Goldberg => &["goldberg", "goldberg steamemu"],
            Self::SmartSteamEmu => &["smartsteamemu", "sse"],
            Self::Reloaded => &["reloaded"],
            Self::Skidrow => &["skidrow"],
            Self::Steam => &["steam"],
            Self::Merge => &["merge"],
        }
    }

    /// All source variants.
    pub fn all() -> &'static [SourceTag] {
        ALL_SOURCES
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

/// Error returned when a string cannot be parsed into a `SourceTag`.
#[derive(Debug, Clone)]
pub struct SourceParseError(pub String);

impl std::fmt::Display for SourceParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown source: '{}'", self.0)
    }
}

impl std::error::Error for SourceParseError {}

impl std::str::FromStr for SourceTag {
    type Err = SourceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        for &source in ALL_SOURCES {
            if source.canonical_name().to_lowercase() == lower {
                return Ok(source);
            }
            for alias in source.aliases() {
                if *alias == lower {
                    return Ok(source);
                }
            }
        }
        Err(SourceParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_round_trip() {
        for &source in SourceTag::all() {
            let parsed: SourceTag = source.canonical_name().parse().unwrap();
            assert_eq!(parsed, source);
        }
    }

    #[test]
    fn aliases_resolve() {
        let parsed: SourceTag = "sse".parse().unwrap();
        assert_eq!(parsed, SourceTag::SmartSteamEmu);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&SourceTag::SmartSteamEmu).unwrap();
        assert_eq!(json, "\"SmartSteamEmu\"");
    }

    #[test]
    fn unknown_string_returns_err() {
        assert!("hoodlum".parse::<SourceTag>().is_err());
    }
}
