use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dossier operations
pub type Result<T> = std::result::Result<T, DossierError>;

/// Errors that can occur while gathering a domain report
#[derive(Error, Debug)]
pub enum DossierError {
    /// The target host does not resolve. Aborts the whole run; no
    /// partial document is cached.
    #[error("unresolvable host: {0}")]
    UnresolvableHost(String),

    /// An explicit output root was given but is not an existing directory
    #[error("invalid output path: {}", .0.display())]
    InvalidOutputPath(PathBuf),

    /// A previously persisted document exists but cannot be parsed
    #[error("corrupt cache file {}: {detail}", .path.display())]
    CorruptCache {
        /// Path of the unparsable `data.json`
        path: PathBuf,
        /// Parser diagnostic
        detail: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A lookup step failed in a way the orchestrator does not recover from
    #[error("lookup failed: {0}")]
    Lookup(String),
}

impl DossierError {
    /// Returns true if the error is raised before any lookup runs
    #[must_use]
    pub const fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidOutputPath(_) | Self::CorruptCache { .. }
        )
    }
}
