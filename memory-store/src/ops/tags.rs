//! Tag creation, association, and cascade delete (`spec.md` §4.8).

use std::sync::Arc;

use redb::ReadableTable;
use reasoning_core::error::{Error, Result};
use uuid::Uuid;

use crate::model::{Memory, Tag};
use crate::normalize::{last_segment, normalize_path};
use crate::store::MemoryStore;
use crate::tables::{ASSOC_BY_MEMORY_TABLE, ASSOC_BY_TAG_TABLE, ASSOC_CREATED_AT_TABLE, MEMORIES_TABLE, TAGS_TABLE, TAG_PATH_INDEX};

fn tag_path_key(user_id: &str, path: &str) -> String {
    format!("{user_id}\0{path}")
}

/// Verifies `(memory_id, user_id)` exists, within `write_txn`, before any
/// mutation is attempted (`spec.md` §4.8 "Ownership checks").
fn verify_memory_owned(write_txn: &redb::WriteTransaction, user_id: &str, memory_id: Uuid) -> Result<()> {
    let memories = write_txn.open_table(MEMORIES_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
    let bytes = memories
        .get(memory_id.to_string().as_str())
        .map_err(|e| Error::Storage(e.to_string()))?
        .ok_or_else(|| Error::NotFound(format!("memory {memory_id} not found")))?;
    let memory: Memory = postcard::from_bytes(bytes.value()).map_err(|e| Error::Storage(format!("failed to decode memory: {e}")))?;
    if memory.user_id != user_id {
        return Err(Error::NotFound(format!("memory {memory_id} not found")));
    }
    Ok(())
}

/// Looks up `(user_id, normalized)` within an already-open write
/// transaction, creating the tag row if absent. `normalized` must already
/// be normalised and non-empty; callers resolve that before entering a
/// transaction.
fn get_or_create_tag_in_txn(write_txn: &redb::WriteTransaction, user_id: &str, normalized: &str) -> Result<Uuid> {
    let index_key = tag_path_key(user_id, normalized);
    let existing = {
        let path_index = write_txn.open_table(TAG_PATH_INDEX).map_err(|e| Error::Storage(e.to_string()))?;
        path_index.get(index_key.as_str()).map_err(|e| Error::Storage(e.to_string()))?.map(|v| v.value().to_string())
    };

    if let Some(existing_id) = existing {
        return Uuid::parse_str(&existing_id).map_err(|e| Error::Storage(format!("corrupt tag id in index: {e}")));
    }

    let id = Uuid::new_v4();
    let name = last_segment(normalized).to_string();
    let tag = Tag { id, user_id: user_id.to_string(), name, path: normalized.to_string(), color: None, created_at: chrono::Utc::now() };
    let bytes = postcard::to_allocvec(&tag).map_err(|e| Error::Storage(format!("failed to encode tag: {e}")))?;
    {
        let mut tags = write_txn.open_table(TAGS_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
        tags.insert(id.to_string().as_str(), bytes.as_slice()).map_err(|e| Error::Storage(e.to_string()))?;
    }
    {
        let mut path_index = write_txn.open_table(TAG_PATH_INDEX).map_err(|e| Error::Storage(e.to_string()))?;
        path_index.insert(index_key.as_str(), id.to_string().as_str()).map_err(|e| Error::Storage(e.to_string()))?;
    }
    Ok(id)
}

/// Looks up `(user_id, path)`, creating the tag if absent. Silently
/// returns `None` if `path` normalises to empty.
pub async fn get_or_create_tag(store: &MemoryStore, user_id: &str, path: &str) -> Result<Option<Uuid>> {
    let Some(normalized) = normalize_path(path) else { return Ok(None) };

    let db = Arc::clone(&store.db);
    let user_id = user_id.to_string();

    let id = tokio::task::spawn_blocking(move || {
        let write_txn = db.begin_write().map_err(|e| Error::Storage(e.to_string()))?;
        let id = get_or_create_tag_in_txn(&write_txn, &user_id, &normalized)?;
        write_txn.commit().map_err(|e| Error::Storage(e.to_string()))?;
        Ok::<Uuid, Error>(id)
    })
    .await
    .map_err(|e| Error::Storage(format!("task join error: {e}")))??;

    Ok(Some(id))
}

/// Adds tags to a memory, normalising each path and skipping empties.
/// Adding a tag already present on the memory is a no-op (conflict-ignore
/// on the `(memory_id, tag_id)` uniqueness invariant). Ownership of
/// `memory_id` is verified first; tag creation and association writes then
/// run under that same transaction, so a failure anywhere rolls back the
/// whole call with no orphaned tag rows.
pub async fn add_tags(store: &MemoryStore, user_id: &str, memory_id: Uuid, paths: &[String]) -> Result<()> {
    let normalized_paths: Vec<String> = paths.iter().filter_map(|p| normalize_path(p)).collect();

    let db = Arc::clone(&store.db);
    let user_id = user_id.to_string();
    let memory_key = memory_id.to_string();

    tokio::task::spawn_blocking(move || {
        let write_txn = db.begin_write().map_err(|e| Error::Storage(e.to_string()))?;
        verify_memory_owned(&write_txn, &user_id, memory_id)?;

        if normalized_paths.is_empty() {
            write_txn.commit().map_err(|e| Error::Storage(e.to_string()))?;
            return Ok(());
        }

        let mut tag_ids = Vec::new();
        for normalized in &normalized_paths {
            tag_ids.push(get_or_create_tag_in_txn(&write_txn, &user_id, normalized)?);
        }

        {
            let mut assoc_by_memory = write_txn.open_table(ASSOC_BY_MEMORY_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            let mut assoc_by_tag = write_txn.open_table(ASSOC_BY_TAG_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            let mut created_at = write_txn.open_table(ASSOC_CREATED_AT_TABLE).map_err(|e| Error::Storage(e.to_string()))?;

            let mut memory_tags: Vec<String> = assoc_by_memory
                .get(memory_key.as_str())
                .map_err(|e| Error::Storage(e.to_string()))?
                .map(|v| postcard::from_bytes(v.value()).unwrap_or_default())
                .unwrap_or_default();

            for tag_id in &tag_ids {
                let tag_key = tag_id.to_string();
                if memory_tags.contains(&tag_key) {
                    continue;
                }
                memory_tags.push(tag_key.clone());

                let mut tag_members: Vec<String> = assoc_by_tag
                    .get(tag_key.as_str())
                    .map_err(|e| Error::Storage(e.to_string()))?
                    .map(|v| postcard::from_bytes(v.value()).unwrap_or_default())
                    .unwrap_or_default();
                if !tag_members.contains(&memory_key) {
                    tag_members.push(memory_key.clone());
                }
                let members_bytes = postcard::to_allocvec(&tag_members).map_err(|e| Error::Storage(e.to_string()))?;
                assoc_by_tag.insert(tag_key.as_str(), members_bytes.as_slice()).map_err(|e| Error::Storage(e.to_string()))?;

                let assoc_key = format!("{memory_key}\0{tag_key}");
                let created_bytes = postcard::to_allocvec(&chrono::Utc::now()).map_err(|e| Error::Storage(e.to_string()))?;
                created_at.insert(assoc_key.as_str(), created_bytes.as_slice()).map_err(|e| Error::Storage(e.to_string()))?;
            }

            let memory_tags_bytes = postcard::to_allocvec(&memory_tags).map_err(|e| Error::Storage(e.to_string()))?;
            assoc_by_memory.insert(memory_key.as_str(), memory_tags_bytes.as_slice()).map_err(|e| Error::Storage(e.to_string()))?;
        }
        write_txn.commit().map_err(|e| Error::Storage(e.to_string()))?;
        Ok::<(), Error>(())
    })
    .await
    .map_err(|e| Error::Storage(format!("task join error: {e}")))??;

    Ok(())
}

/// Removes tags from a memory. Removing a tag not present is a no-op.
/// Ownership of `memory_id` is verified first, and the tag-id lookups plus
/// the association removals run under that same transaction.
pub async fn remove_tags(store: &MemoryStore, user_id: &str, memory_id: Uuid, paths: &[String]) -> Result<()> {
    let normalized_paths: Vec<String> = paths.iter().filter_map(|p| normalize_path(p)).collect();

    let db = Arc::clone(&store.db);
    let user_id = user_id.to_string();
    let memory_key = memory_id.to_string();

    tokio::task::spawn_blocking(move || {
        let write_txn = db.begin_write().map_err(|e| Error::Storage(e.to_string()))?;
        verify_memory_owned(&write_txn, &user_id, memory_id)?;

        let mut tag_ids = Vec::new();
        {
            let path_index = write_txn.open_table(TAG_PATH_INDEX).map_err(|e| Error::Storage(e.to_string()))?;
            for normalized in &normalized_paths {
                let index_key = tag_path_key(&user_id, normalized);
                if let Some(existing) = path_index.get(index_key.as_str()).map_err(|e| Error::Storage(e.to_string()))? {
                    tag_ids.push(existing.value().to_string());
                }
            }
        }

        if tag_ids.is_empty() {
            write_txn.commit().map_err(|e| Error::Storage(e.to_string()))?;
            return Ok(());
        }

        {
            let mut assoc_by_memory = write_txn.open_table(ASSOC_BY_MEMORY_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            let mut assoc_by_tag = write_txn.open_table(ASSOC_BY_TAG_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            let mut created_at = write_txn.open_table(ASSOC_CREATED_AT_TABLE).map_err(|e| Error::Storage(e.to_string()))?;

            let mut memory_tags: Vec<String> = assoc_by_memory
                .get(memory_key.as_str())
                .map_err(|e| Error::Storage(e.to_string()))?
                .map(|v| postcard::from_bytes(v.value()).unwrap_or_default())
                .unwrap_or_default();

            for tag_key in &tag_ids {
                memory_tags.retain(|t| t != tag_key);

                if let Some(existing) = assoc_by_tag.get(tag_key.as_str()).map_err(|e| Error::Storage(e.to_string()))? {
                    let mut members: Vec<String> = postcard::from_bytes(existing.value()).unwrap_or_default();
                    drop(existing);
                    members.retain(|m| m != &memory_key);
                    let bytes = postcard::to_allocvec(&members).map_err(|e| Error::Storage(e.to_string()))?;
                    assoc_by_tag.insert(tag_key.as_str(), bytes.as_slice()).map_err(|e| Error::Storage(e.to_string()))?;
                }

                let assoc_key = format!("{memory_key}\0{tag_key}");
                created_at.remove(assoc_key.as_str()).map_err(|e| Error::Storage(e.to_string()))?;
            }

            let memory_tags_bytes = postcard::to_allocvec(&memory_tags).map_err(|e| Error::Storage(e.to_string()))?;
            assoc_by_memory.insert(memory_key.as_str(), memory_tags_bytes.as_slice()).map_err(|e| Error::Storage(e.to_string()))?;
        }
        write_txn.commit().map_err(|e| Error::Storage(e.to_string()))?;
        Ok::<(), Error>(())
    })
    .await
    .map_err(|e| Error::Storage(format!("task join error: {e}")))??;

    Ok(())
}

/// Cascade-deletes a tag: verifies ownership, removes every association,
/// then the tag row itself. Any failure rolls back the whole transaction.
pub async fn delete_tag(store: &MemoryStore, user_id: &str, tag_id: Uuid) -> Result<()> {
    let db = Arc::clone(&store.db);
    let user_id = user_id.to_string();
    let tag_key = tag_id.to_string();

    tokio::task::spawn_blocking(move || {
        let write_txn = db.begin_write().map_err(|e| Error::Storage(e.to_string()))?;

        let tag: Tag = {
            let tags = write_txn.open_table(TAGS_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            let bytes = tags
                .get(tag_key.as_str())
                .map_err(|e| Error::Storage(e.to_string()))?
                .ok_or_else(|| Error::NotFound(format!("tag {tag_id} not found")))?;
            let tag: Tag = postcard::from_bytes(bytes.value()).map_err(|e| Error::Storage(format!("failed to decode tag: {e}")))?;
            if tag.user_id != user_id {
                return Err(Error::NotFound(format!("tag {tag_id} not found")));
            }
            tag
        };

        let members: Vec<String> = {
            let mut assoc_by_tag = write_txn.open_table(ASSOC_BY_TAG_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            assoc_by_tag
                .remove(tag_key.as_str())
                .map_err(|e| Error::Storage(e.to_string()))?
                .map(|v| postcard::from_bytes(v.value()).unwrap_or_default())
                .unwrap_or_default()
        };

        {
            let mut assoc_by_memory = write_txn.open_table(ASSOC_BY_MEMORY_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            let mut created_at = write_txn.open_table(ASSOC_CREATED_AT_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            for memory_key in &members {
                if let Some(existing) = assoc_by_memory.get(memory_key.as_str()).map_err(|e| Error::Storage(e.to_string()))? {
                    let mut tags: Vec<String> = postcard::from_bytes(existing.value()).unwrap_or_default();
                    drop(existing);
                    tags.retain(|t| t != &tag_key);
                    let bytes = postcard::to_allocvec(&tags).map_err(|e| Error::Storage(e.to_string()))?;
                    assoc_by_memory.insert(memory_key.as_str(), bytes.as_slice()).map_err(|e| Error::Storage(e.to_string()))?;
                }
                let assoc_key = format!("{memory_key}\0{tag_key}");
                created_at.remove(assoc_key.as_str()).map_err(|e| Error::Storage(e.to_string()))?;
            }
        }

        {
            let mut path_index = write_txn.open_table(TAG_PATH_INDEX).map_err(|e| Error::Storage(e.to_string()))?;
            path_index.remove(tag_path_key(&tag.user_id, &tag.path).as_str()).map_err(|e| Error::Storage(e.to_string()))?;
        }
        {
            let mut tags = write_txn.open_table(TAGS_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            tags.remove(tag_key.as_str()).map_err(|e| Error::Storage(e.to_string()))?;
        }

        write_txn.commit().map_err(|e| Error::Storage(e.to_string()))?;
        Ok::<(), Error>(())
    })
    .await
    .map_err(|e| Error::Storage(format!("task join error: {e}")))??;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sector;
    use crate::ops::memories::create_memory;

    async fn store() -> MemoryStore {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.redb");
        std::mem::forget(dir);
        MemoryStore::open(&path).await.unwrap()
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let store = store().await;
        let first = get_or_create_tag(&store, "alice", "Work/Projects").await.unwrap().unwrap();
        let second = get_or_create_tag(&store, "alice", "work//projects/").await.unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn empty_path_is_skipped() {
        let store = store().await;
        assert_eq!(get_or_create_tag(&store, "alice", "   ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn adding_the_same_tag_twice_is_a_no_op() {
        let store = store().await;
        let memory = Memory::new("alice", "note", Sector::Episodic);
        let id = create_memory(&store, memory).await.unwrap();
        add_tags(&store, "alice", id, &["work".to_string()]).await.unwrap();
        add_tags(&store, "alice", id, &["work".to_string()]).await.unwrap();
    }

    #[tokio::test]
    async fn delete_tag_cascades_associations() {
        let store = store().await;
        let memory = Memory::new("alice", "note", Sector::Episodic);
        let id = create_memory(&store, memory).await.unwrap();
        let tag_id = get_or_create_tag(&store, "alice", "work").await.unwrap().unwrap();
        add_tags(&store, "alice", id, &["work".to_string()]).await.unwrap();
        delete_tag(&store, "alice", tag_id).await.unwrap();
        assert!(matches!(delete_tag(&store, "alice", tag_id).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn add_tags_rejects_nonexistent_memory() {
        let store = store().await;
        let missing = Uuid::new_v4();
        assert!(matches!(add_tags(&store, "alice", missing, &["work".to_string()]).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn add_tags_rejects_wrong_owner() {
        let store = store().await;
        let memory = Memory::new("alice", "note", Sector::Episodic);
        let id = create_memory(&store, memory).await.unwrap();
        assert!(matches!(add_tags(&store, "mallory", id, &["work".to_string()]).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn remove_tags_rejects_wrong_owner() {
        let store = store().await;
        let memory = Memory::new("alice", "note", Sector::Episodic);
        let id = create_memory(&store, memory).await.unwrap();
        add_tags(&store, "alice", id, &["work".to_string()]).await.unwrap();
        assert!(matches!(remove_tags(&store, "mallory", id, &["work".to_string()]).await, Err(Error::NotFound(_))));
    }
}
