use thiserror::Error;

/// Result type alias for lookup operations
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// Errors from individual lookup steps
#[derive(Error, Debug)]
pub enum LookupError {
    /// Request-level transport failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// The target hostname did not resolve
    #[error("host could not be resolved: {0}")]
    UnresolvedHost(String),

    /// Request timed out
    #[error("request timed out")]
    Timeout,

    /// Upstream answered with a non-success status
    #[error("HTTP status {0}")]
    Status(u16),

    /// DNS resolution error
    #[error("DNS error: {0}")]
    Dns(String),

    /// WHOIS query error
    #[error("WHOIS error: {0}")]
    Whois(String),

    /// An expected marker is missing from a scraped page; the page
    /// structure probably changed upstream
    #[error("expected page marker missing: {0}")]
    StructureChanged(String),

    /// Transient scrape failure on the map-tile lookup; retried once
    #[error("map tile marker missing from response")]
    Hiccup,

    /// A structured API answered with a shape we do not recognize
    #[error("upstream API contract violated: {0}")]
    ApiContract(String),

    /// Filesystem error while saving a downloaded artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LookupError> for dossier_core::DossierError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::UnresolvedHost(host) | LookupError::Dns(host) => {
                Self::UnresolvableHost(host)
            }
            LookupError::Transport(msg) | LookupError::Connect(msg) => Self::Http(msg),
            LookupError::Timeout => Self::Http("request timed out".to_string()),
            LookupError::Status(code) => Self::Http(format!("HTTP status {code}")),
            LookupError::Io(e) => Self::Io(e),
            other => Self::Lookup(other.to_string()),
        }
    }
}
