use crate::types::{DirectoryEntry, EntryType};

/// Default extension priority: `.mdx` wins over `.md`
pub const MDX_EXTENSIONS: &[&str] = &[".mdx", ".md"];

/// Find the first file entry matching a basename and an accepted extension
///
/// Filters `entries` to files whose name starts with `basename`, then walks
/// `extensions` in priority order and returns the first entry (in listing
/// order) whose name ends with that extension. Listing order makes the
/// result stable when several entries share a prefix and extension.
pub fn resolve_first<'a>(
    entries: &'a [DirectoryEntry],
    basename: &str,
    extensions: &[&str],
) -> Option<&'a DirectoryEntry> {
    let candidates: Vec<&DirectoryEntry> = entries
        .iter()
        .filter(|e| e.entry_type == EntryType::File && e.name.starts_with(basename))
        .collect();

    for extension in extensions {
        if let Some(entry) = candidates.iter().copied().find(|e| e.name.ends_with(extension)) {
            return Some(entry);
        }
    }
    None
}
