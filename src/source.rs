use async_trait::async_trait;

use crate::{error::Result, types::DirectoryEntry};

/// Core abstraction over the remote content tree
///
/// Implementors provide read-only access to a version-controlled tree that
/// exposes shallow directory listings and content-addressed blob retrieval.
/// Each call is one external request; retry policy, if any, belongs to the
/// caller.
#[async_trait]
pub trait TreeClient: Send + Sync {
    /// List the immediate contents of a directory (not recursive)
    ///
    /// Returns `ContentError::NotADirectory` if the remote path resolves to
    /// a single file, and `ContentError::PathNotFound` if it resolves to
    /// nothing at all.
    async fn list_directory(&self, path: &str) -> Result<Vec<DirectoryEntry>>;

    /// Fetch a blob's decoded text content by its hash
    ///
    /// Hashes come from `list_directory` entries. The transfer encoding is
    /// whatever the remote reports, never assumed.
    async fn fetch_blob(&self, sha: &str) -> Result<String>;

    /// Get a human-readable identifier for this source (for logging/debugging)
    fn identifier(&self) -> String;
}
