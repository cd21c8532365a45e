use crate::{
    extension::MDX_EXTENSIONS,
    types::{ListItem, RawFile},
};

/// Parse the frontmatter block at the top of a document
///
/// The block is fenced by `---` lines and holds YAML key-value pairs.
/// Returns `None` when the block is absent, unterminated, empty, or not a
/// mapping; callers treat that as "no usable metadata", never as an error.
pub fn parse(content: &str) -> Option<serde_yaml::Mapping> {
    let mut lines = content.lines();
    if lines.next()?.trim_end() != "---" {
        return None;
    }

    let mut block = String::new();
    let mut closed = false;
    for line in lines {
        if line.trim_end() == "---" {
            closed = true;
            break;
        }
        block.push_str(line);
        block.push('\n');
    }
    if !closed {
        return None;
    }

    match serde_yaml::from_str::<serde_yaml::Value>(&block) {
        Ok(serde_yaml::Value::Mapping(map)) if !map.is_empty() => Some(map),
        _ => None,
    }
}

/// Derive a document's slug from its path relative to the queried directory
///
/// Strips the directory prefix, the matched extension, and a trailing
/// `/index` segment, so a folder's index document and a standalone file at
/// the same logical path produce the same slug.
pub fn slug_for(path: &str, query_dir: &str) -> String {
    let mut slug = path.strip_prefix(query_dir).unwrap_or(path).to_string();

    for extension in MDX_EXTENSIONS {
        if let Some(stripped) = slug.strip_suffix(extension) {
            slug = stripped.to_string();
            break;
        }
    }
    if let Some(stripped) = slug.strip_suffix("/index") {
        slug = stripped.to_string();
    }
    slug
}

/// Turn a downloaded document into a listing member
///
/// Returns `None` (with a diagnostic) when the document carries no usable
/// frontmatter; a malformed document is dropped from the listing rather
/// than failing the batch.
pub fn extract_listing(raw: RawFile, query_dir: &str) -> Option<ListItem> {
    let Some(frontmatter) = parse(&raw.content) else {
        tracing::warn!(path = %raw.path, "could not parse frontmatter, dropping from listing");
        return None;
    };

    Some(ListItem {
        slug: slug_for(&raw.path, query_dir),
        path: raw.path,
        content: raw.content,
        frontmatter,
    })
}
