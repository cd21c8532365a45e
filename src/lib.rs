pub mod error;
pub mod extension;
pub mod frontmatter;
pub mod github;
pub mod resolver;
pub mod source;
pub mod tree;
pub mod types;

pub use error::{ContentError, Result};
pub use extension::{resolve_first, MDX_EXTENSIONS};
pub use github::GitHubTree;
pub use resolver::ContentResolver;
pub use source::TreeClient;
pub use tree::download_tree;
pub use types::{DirectoryEntry, EntryType, ListItem, RawFile};
