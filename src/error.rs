use thiserror::Error;

/// Errors that can occur during content resolution
#[derive(Error, Debug)]
pub enum ContentError {
    /// No document resolves at the given logical path. Recoverable:
    /// callers surface this as "no content", not as a failure.
    #[error("No content found at path: {path}")]
    PathNotFound { path: String },

    /// The remote path resolves to a single file where a directory listing
    /// was requested. A protocol signal, not a fatal error: the path
    /// resolver reinterprets it during parent-directory walks.
    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    /// The remote API returned a shape violating its documented contract
    /// (unknown entry type, unrecognized blob encoding). Fatal: aborts
    /// the call and bubbles up unmodified.
    #[error("Remote API contract violation: {message}")]
    ProtocolViolation { message: String },

    #[error("Rate limited by remote service: {message}")]
    RateLimited { message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for content operations
pub type Result<T> = std::result::Result<T, ContentError>;
