use std::sync::Arc;

use futures::future::try_join_all;

use crate::{
    error::{ContentError, Result},
    extension::{resolve_first, MDX_EXTENSIONS},
    frontmatter,
    source::TreeClient,
    tree::download_tree,
    types::{DirectoryEntry, EntryType, ListItem, RawFile},
};

/// Resolves logical content paths against a remote tree
///
/// A logical path may denote a single document file (`about` -> `about.mdx`),
/// a directory holding an index document (`about/index.mdx`), or a directory
/// of many documents. All three shapes resolve through the same machinery.
pub struct ContentResolver {
    client: Arc<dyn TreeClient>,
}

/// Parent directory of a logical path; empty string at the tree root
fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Final segment of a logical path
fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

impl ContentResolver {
    pub fn new(client: Arc<dyn TreeClient>) -> Self {
        Self { client }
    }

    /// Resolve a logical path to exactly one document
    ///
    /// Returns `PathNotFound` when nothing resolves; single-document callers
    /// treat absence as an error, unlike the listing path.
    pub async fn resolve_document(&self, path: &str) -> Result<RawFile> {
        match self.find_document(path).await? {
            Some(raw) => Ok(raw),
            None => Err(ContentError::PathNotFound {
                path: path.to_string(),
            }),
        }
    }

    /// Resolve a logical path to the set of files backing it
    ///
    /// A direct file match yields a single-element result with its path
    /// rewritten to `{path}/index.mdx`, so downstream consumers see the
    /// same layout whether the content is one file or a whole directory.
    /// A directory match downloads the full subtree. An empty result means
    /// nothing resolved; tree callers treat absence as a normal outcome.
    pub async fn resolve_tree(&self, path: &str) -> Result<Vec<RawFile>> {
        let entries = self.list_parent(path).await?;
        let base = basename(path);

        if let Some(entry) = resolve_first(&entries, base, MDX_EXTENSIONS) {
            let content = self.client.fetch_blob(&entry.sha).await?;
            return Ok(vec![RawFile {
                path: format!("{path}/index.mdx"),
                content,
            }]);
        }

        let directory = entries
            .iter()
            .find(|e| e.entry_type == EntryType::Dir && e.name == base);
        match directory {
            Some(dir) => download_tree(self.client.as_ref(), dir.path.clone()).await,
            None => Ok(Vec::new()),
        }
    }

    /// List the documents directly under a directory
    ///
    /// Each entry resolves concurrently through the file-or-index machine.
    /// Entries named `README.md`, entries that resolve to nothing, and
    /// documents without usable frontmatter are dropped (with a diagnostic);
    /// one malformed document never fails the whole listing.
    pub async fn list_documents(&self, dir: &str) -> Result<Vec<ListItem>> {
        let entries = self.client.list_directory(dir).await?;

        let tasks = entries
            .into_iter()
            .filter(|e| e.name != "README.md")
            .map(|entry| async move {
                match self.find_document(&entry.path).await? {
                    Some(raw) => Ok::<_, ContentError>(frontmatter::extract_listing(raw, dir)),
                    None => {
                        tracing::warn!(path = %entry.path, "no document found for listing entry");
                        Ok(None)
                    }
                }
            });

        let items = try_join_all(tasks).await?;
        Ok(items.into_iter().flatten().collect())
    }

    /// List `path`'s parent directory, reinterpreting `NotADirectory` at the
    /// tree root as `PathNotFound`; anywhere deeper it propagates so callers
    /// can tell a file-shadowed path from a missing one.
    async fn list_parent(&self, path: &str) -> Result<Vec<DirectoryEntry>> {
        let parent = parent_dir(path);
        match self.client.list_directory(parent).await {
            Ok(entries) => Ok(entries),
            Err(ContentError::NotADirectory { .. }) if parent.is_empty() => {
                Err(ContentError::PathNotFound {
                    path: path.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// The file-or-index state machine over one logical path
    ///
    /// `Ok(None)` is the NotFound terminal state: a normal outcome for
    /// listing callers, an error for single-document callers.
    async fn find_document(&self, path: &str) -> Result<Option<RawFile>> {
        let entries = self.list_parent(path).await?;
        let base = basename(path);

        // Direct-file branch: basename plus preferred extension
        if let Some(entry) = resolve_first(&entries, base, MDX_EXTENSIONS) {
            let content = self.client.fetch_blob(&entry.sha).await?;
            return Ok(Some(RawFile {
                path: entry.path.clone(),
                content,
            }));
        }

        // Directory branch: an exactly-named folder searched for an index
        let Some(directory) = entries
            .iter()
            .find(|e| e.entry_type == EntryType::Dir && e.name == base)
        else {
            return Ok(None);
        };

        let dir_entries = self.client.list_directory(&directory.path).await?;
        match resolve_first(&dir_entries, "index", MDX_EXTENSIONS) {
            Some(entry) => {
                let content = self.client.fetch_blob(&entry.sha).await?;
                Ok(Some(RawFile {
                    path: entry.path.clone(),
                    content,
                }))
            }
            None => Ok(None),
        }
    }
}
