use thiserror::Error;

use crate::platform::Platform;
use crate::source::SourceTag;

/// Errors that can occur while scraping, merging, or persisting
/// achievement data.
#[derive(Debug, Error)]
pub enum ScrapError {
    /// I/O error while reading source files or the store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in a source file, cache file, or store file
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote schema or profile request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Persisted record was written by an incompatible store version
    #[error("invalid store version: expected {expected}, found {found}")]
    InvalidStoreVersion { expected: String, found: String },

    /// Schema requested for a platform the provider does not serve
    #[error("platform not supported: {0}")]
    PlatformNotSupported(String),

    /// A precondition of the source is missing (e.g., platform not installed)
    #[error("source precondition unmet: {0}")]
    SourcePreconditionUnmet(String),

    /// Declared and actual record counts disagree in a binary file
    #[error("record count mismatch: header declares {declared}, found {actual}")]
    ContentIntegrity { declared: usize, actual: usize },

    /// The probed data belongs to another, separately-covered source.
    /// Callers treat this as a silent skip, never a reportable error.
    #[error("data belongs to another source")]
    WrongSource,

    /// Malformed source data with message
    #[error("parse error: {0}")]
    Parse(String),

    /// Registry query failed
    #[error("registry error: {0}")]
    Registry(String),
}

impl ScrapError {
    pub fn http(msg: impl ToString) -> Self {
        Self::Http(msg.to_string())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn registry(msg: impl Into<String>) -> Self {
        Self::Registry(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::SourcePreconditionUnmet(msg.into())
    }

    /// Explicit discriminant so call sites branch on a tagged kind rather
    /// than matching full variants or inspecting messages.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::Json(_) => ErrorKind::Json,
            Self::Http(_) => ErrorKind::Http,
            Self::InvalidStoreVersion { .. } => ErrorKind::InvalidStoreVersion,
            Self::PlatformNotSupported(_) => ErrorKind::PlatformNotSupported,
            Self::SourcePreconditionUnmet(_) => ErrorKind::SourcePreconditionUnmet,
            Self::ContentIntegrity { .. } => ErrorKind::ContentIntegrity,
            Self::WrongSource => ErrorKind::WrongSource,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Registry(_) => ErrorKind::Registry,
        }
    }
}

/// Error-kind discriminant for `ScrapError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Json,
    Http,
    InvalidStoreVersion,
    PlatformNotSupported,
    SourcePreconditionUnmet,
    ContentIntegrity,
    WrongSource,
    Parse,
    Registry,
}

/// A scrape error plus the context it occurred in. Collected by the
/// orchestrator into a side list alongside successfully scraped records;
/// never persisted.
#[derive(Debug)]
pub struct ScrapeFailure {
    pub error: ScrapError,
    pub plugin: Option<String>,
    pub platform: Option<Platform>,
    pub source: Option<SourceTag>,
    pub app_id: Option<String>,
}

impl ScrapeFailure {
    /// An adapter-level failure, tagged by plugin name only.
    pub fn for_plugin(plugin: &str, error: ScrapError) -> Self {
        Self {
            error,
            plugin: Some(plugin.to_string()),
            platform: None,
            source: None,
            app_id: None,
        }
    }

    /// A per-game failure with full context.
    pub fn for_game(
        plugin: &str,
        platform: Platform,
        source: SourceTag,
        app_id: &str,
        error: ScrapError,
    ) -> Self {
        Self {
            error,
            plugin: Some(plugin.to_string()),
            platform: Some(platform),
            source: Some(source),
            app_id: Some(app_id.to_string()),
        }
    }
}

impl std::fmt::Display for ScrapeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(plugin) = &self.plugin {
            write!(f, "[{plugin}] ")?;
        }
        if let Some(app_id) = &self.app_id {
            write!(f, "app {app_id}: ")?;
        }
        write!(f, "{}", self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let err = ScrapError::ContentIntegrity {
            declared: 3,
            actual: 2,
        };
        assert_eq!(err.kind(), ErrorKind::ContentIntegrity);
        assert_eq!(ScrapError::WrongSource.kind(), ErrorKind::WrongSource);
    }

    #[test]
    fn failure_display_includes_context() {
        let failure = ScrapeFailure::for_game(
            "codex",
            Platform::Steam,
            SourceTag::Codex,
            "382890",
            ScrapError::parse("bad ini"),
        );
        let text = failure.to_string();
        assert!(text.contains("codex"));
        assert!(text.contains("382890"));
        assert!(text.contains("bad ini"));
    }
}
