use serde::{Deserialize, Serialize};

/// Represents an entry in a remote directory listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Name of the file or folder
    pub name: String,
    /// Path relative to the content root
    pub path: String,
    /// Type of entry
    pub entry_type: EntryType,
    /// Content hash used to fetch the entry's blob
    pub sha: String,
}

/// Type of directory entry
///
/// Decided immediately after the listing call; an API entry whose type is
/// neither of these never makes it past the remote client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Dir,
}

/// A fully downloaded document's decoded text, keyed by its logical path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    /// Path relative to the content root
    pub path: String,
    /// Decoded text content
    pub content: String,
}

/// A resolved listing member: a document plus its derived identity
///
/// Only constructed when `frontmatter` is non-empty; documents with absent
/// or unparseable frontmatter are dropped from listings, not surfaced as
/// errors.
#[derive(Debug, Clone)]
pub struct ListItem {
    /// Path of the resolved document file
    pub path: String,
    /// Raw text content, frontmatter included
    pub content: String,
    /// Identifier relative to the queried directory, extension stripped
    pub slug: String,
    /// Parsed frontmatter fields
    pub frontmatter: serde_yaml::Mapping,
}
