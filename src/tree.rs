use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;

use crate::{
    error::Result,
    source::TreeClient,
    types::{EntryType, RawFile},
};

/// Recursively download every file under a directory
///
/// Sibling entries are fetched concurrently and the nested results are
/// flattened after all sibling work completes. The first failure aborts the
/// whole call: no partial tree is ever returned. Output order is not
/// guaranteed to match remote listing order; callers that need a specific
/// order sort by a stable field afterwards.
pub fn download_tree<'a>(
    client: &'a dyn TreeClient,
    path: String,
) -> BoxFuture<'a, Result<Vec<RawFile>>> {
    async move {
        let entries = client.list_directory(&path).await?;

        let tasks = entries.into_iter().map(|entry| async move {
            match entry.entry_type {
                EntryType::File => {
                    let content = client.fetch_blob(&entry.sha).await?;
                    Ok(vec![RawFile {
                        path: entry.path,
                        content,
                    }])
                }
                EntryType::Dir => download_tree(client, entry.path).await,
            }
        });

        let nested = try_join_all(tasks).await?;
        Ok(nested.into_iter().flatten().collect())
    }
    .boxed()
}
