use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HintError>;

/// Why a single candidate could not be used. Never fatal on its own: the
/// resolver records it and moves on to the next candidate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateError {
    #[error("{}: unavailable ({reason})", .path.display())]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("{}: not valid {encoding}", .path.display())]
    DecodeFailure { path: PathBuf, encoding: &'static str },

    #[error("{}: no hints", .path.display())]
    EmptyCatalog { path: PathBuf },
}

impl CandidateError {
    /// Short machine-readable name, used in protocol responses.
    pub fn kind(&self) -> &'static str {
        match self {
            CandidateError::SourceUnavailable { .. } => "source_unavailable",
            CandidateError::DecodeFailure { .. } => "decode_failure",
            CandidateError::EmptyCatalog { .. } => "empty_catalog",
        }
    }
}

/// Every candidate, the base catalog included, failed. Fatal to the hint
/// feature only; the caller hides the hint bar for the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no hint catalog available for locale '{locale}' ({} candidates tried)", .attempts.len())]
pub struct CatalogUnavailable {
    pub locale: String,
    pub attempts: Vec<CandidateError>,
}

#[derive(Error, Debug)]
pub enum HintError {
    #[error(transparent)]
    CatalogUnavailable(#[from] CatalogUnavailable),

    #[error("unknown encoding label '{0}'")]
    UnknownEncoding(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HintError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            HintError::CatalogUnavailable(_) => "catalog_unavailable",
            HintError::UnknownEncoding(_) => "unknown_encoding",
            HintError::Config(_) => "config",
            HintError::Io(_) => "io",
            HintError::Json(_) => "json",
        }
    }

    pub fn is_catalog_unavailable(&self) -> bool {
        matches!(self, HintError::CatalogUnavailable(_))
    }
}
