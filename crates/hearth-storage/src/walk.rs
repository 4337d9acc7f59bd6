//! Bucket walking over a non-recursive `list`.
//!
//! Objects live one level down (`{owner}/{filename}`), so a walk lists the root
//! for owner folders and then lists each folder. Both levels are paged until a
//! short page comes back. Nothing is fetched until the stream is polled.

use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use hearth_core::models::StoredObject;

use crate::traits::{EntryKind, ListEntry, ListOptions, Storage, StorageError, StorageResult};

/// All entries directly under `prefix`, fetched one page at a time.
pub fn list_all<'a, S>(
    storage: &'a S,
    prefix: String,
    page_size: usize,
) -> impl Stream<Item = StorageResult<ListEntry>> + Send + 'a
where
    S: Storage + ?Sized,
{
    let page_size = page_size.max(1);
    stream::try_unfold(Some(0usize), move |offset| {
        let prefix = prefix.clone();
        async move {
            let Some(offset) = offset else {
                return Ok(None);
            };
            let options = ListOptions {
                limit: page_size,
                offset,
                ..ListOptions::default()
            };
            let page = storage.list(&prefix, &options).await?;
            let next = (page.len() >= page_size).then_some(offset + page.len());
            let entries = stream::iter(page.into_iter().map(Ok::<ListEntry, StorageError>));
            Ok::<_, StorageError>(Some((entries, next)))
        }
    })
    .try_flatten()
}

/// Every object one level below the bucket root.
pub fn walk_folders<'a, S>(
    storage: &'a S,
    page_size: usize,
) -> BoxStream<'a, StorageResult<StoredObject>>
where
    S: Storage + ?Sized,
{
    list_all(storage, String::new(), page_size)
        .try_filter_map(|entry| async move {
            Ok::<_, StorageError>((entry.kind == EntryKind::Folder).then_some(entry.name))
        })
        .map_ok(move |folder| {
            let owner = folder.clone();
            list_all(storage, folder, page_size).try_filter_map(move |entry| {
                let owner = owner.clone();
                async move {
                    Ok::<_, StorageError>((entry.kind == EntryKind::Object).then(|| StoredObject {
                        owner,
                        filename: entry.name,
                        created_at: entry.created_at,
                    }))
                }
            })
        })
        .try_flatten()
        .boxed()
}
