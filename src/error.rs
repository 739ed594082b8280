use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the theme inspector.
///
/// Per-file problems (unreadable file, malformed schema) are not errors here: they are
/// logged and the file is flagged or skipped. Only failures that make a whole collection
/// impossible to enumerate reach the caller.
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Cannot read theme directory {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ThemeError>;

impl From<config::ConfigError> for ThemeError {
    fn from(err: config::ConfigError) -> Self {
        ThemeError::Config(err.to_string())
    }
}

/// Which report a failure belongs to. Each maps to a fixed category string that
/// callers may rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Scan,
    SectionsByPage,
    BlocksBySection,
}

impl FailureKind {
    pub fn category(&self) -> &'static str {
        match self {
            FailureKind::Scan => "Error scanning liquid files",
            FailureKind::SectionsByPage => "Error analyzing sections by page",
            FailureKind::BlocksBySection => "Error analyzing blocks by section",
        }
    }
}

/// Structured failure handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Failure {
    pub fn new(kind: FailureKind, details: Option<String>) -> Self {
        Self {
            error: kind.category().to_string(),
            details,
        }
    }

    pub fn from_error(kind: FailureKind, err: &ThemeError) -> Self {
        let details = match err {
            // Only the underlying I/O message, not our own wrapping
            ThemeError::RootUnreadable { source, .. } => source.to_string(),
            other => other.to_string(),
        };
        Self::new(kind, Some(details))
    }
}
