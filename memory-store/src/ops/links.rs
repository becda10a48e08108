//! Directed graph links between memories (`spec.md` §4.8 "Memory links").

use std::sync::Arc;

use redb::ReadableTable;
use reasoning_core::error::{Error, Result};
use uuid::Uuid;

use crate::model::{LinkType, MemoryLink};
use crate::ops::memories::get_memory;
use crate::store::MemoryStore;
use crate::tables::LINKS_TABLE;

fn link_key(source_id: Uuid, target_id: Uuid, link_type: LinkType) -> String {
    format!("{source_id}\0{target_id}\0{link_type:?}")
}

/// Creates (or overwrites) a link between two memories owned by `user_id`.
/// `source_id` and `target_id` must differ.
pub async fn create_link(store: &MemoryStore, user_id: &str, source_id: Uuid, target_id: Uuid, link_type: LinkType, weight: f64) -> Result<MemoryLink> {
    if source_id == target_id {
        return Err(Error::Validation("a memory cannot be linked to itself".to_string()));
    }
    // ownership check for both endpoints before the link is created.
    get_memory(store, user_id, source_id).await?;
    get_memory(store, user_id, target_id).await?;

    let link = MemoryLink { source_id, target_id, link_type, weight, created_at: chrono::Utc::now(), traversal_count: 0 };
    let db = Arc::clone(&store.db);
    let key = link_key(source_id, target_id, link_type);
    let bytes = postcard::to_allocvec(&link).map_err(|e| Error::Storage(format!("failed to encode link: {e}")))?;

    tokio::task::spawn_blocking(move || {
        let write_txn = db.begin_write().map_err(|e| Error::Storage(e.to_string()))?;
        {
            let mut links = write_txn.open_table(LINKS_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            links.insert(key.as_str(), bytes.as_slice()).map_err(|e| Error::Storage(e.to_string()))?;
        }
        write_txn.commit().map_err(|e| Error::Storage(e.to_string()))?;
        Ok::<(), Error>(())
    })
    .await
    .map_err(|e| Error::Storage(format!("task join error: {e}")))??;

    Ok(link)
}

/// Every link where `memory_id` is either endpoint, scanning the full
/// table (see `tables.rs` for why no adjacency index is kept).
pub async fn links_for_memory(store: &MemoryStore, user_id: &str, memory_id: Uuid) -> Result<Vec<MemoryLink>> {
    get_memory(store, user_id, memory_id).await?;

    let db = Arc::clone(&store.db);
    tokio::task::spawn_blocking(move || {
        let read_txn = db.begin_read().map_err(|e| Error::Storage(e.to_string()))?;
        let links = read_txn.open_table(LINKS_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
        let mut result = Vec::new();
        for entry in links.iter().map_err(|e| Error::Storage(e.to_string()))? {
            let (_, value) = entry.map_err(|e| Error::Storage(e.to_string()))?;
            let link: MemoryLink = postcard::from_bytes(value.value()).map_err(|e| Error::Storage(format!("failed to decode link: {e}")))?;
            if link.source_id == memory_id || link.target_id == memory_id {
                result.push(link);
            }
        }
        Ok::<Vec<MemoryLink>, Error>(result)
    })
    .await
    .map_err(|e| Error::Storage(format!("task join error: {e}")))?
}

/// Increments `traversal_count` on a link, returning the updated row.
pub async fn record_traversal(store: &MemoryStore, source_id: Uuid, target_id: Uuid, link_type: LinkType) -> Result<MemoryLink> {
    let db = Arc::clone(&store.db);
    let key = link_key(source_id, target_id, link_type);

    tokio::task::spawn_blocking(move || {
        let write_txn = db.begin_write().map_err(|e| Error::Storage(e.to_string()))?;
        let updated = {
            let mut links = write_txn.open_table(LINKS_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            let bytes = links
                .get(key.as_str())
                .map_err(|e| Error::Storage(e.to_string()))?
                .ok_or_else(|| Error::NotFound(format!("link {source_id}->{target_id} not found")))?;
            let mut link: MemoryLink = postcard::from_bytes(bytes.value()).map_err(|e| Error::Storage(format!("failed to decode link: {e}")))?;
            drop(bytes);
            link.traversal_count += 1;
            let encoded = postcard::to_allocvec(&link).map_err(|e| Error::Storage(format!("failed to encode link: {e}")))?;
            links.insert(key.as_str(), encoded.as_slice()).map_err(|e| Error::Storage(e.to_string()))?;
            link
        };
        write_txn.commit().map_err(|e| Error::Storage(e.to_string()))?;
        Ok::<MemoryLink, Error>(updated)
    })
    .await
    .map_err(|e| Error::Storage(format!("task join error: {e}")))?
}

/// Removes a link outright.
pub async fn delete_link(store: &MemoryStore, source_id: Uuid, target_id: Uuid, link_type: LinkType) -> Result<()> {
    let db = Arc::clone(&store.db);
    let key = link_key(source_id, target_id, link_type);

    tokio::task::spawn_blocking(move || {
        let write_txn = db.begin_write().map_err(|e| Error::Storage(e.to_string()))?;
        {
            let mut links = write_txn.open_table(LINKS_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            if links.remove(key.as_str()).map_err(|e| Error::Storage(e.to_string()))?.is_none() {
                return Err(Error::NotFound(format!("link {source_id}->{target_id} not found")));
            }
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
    use crate::model::{Memory, Sector};
    use crate::ops::memories::create_memory;

    async fn store() -> MemoryStore {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.redb");
        std::mem::forget(dir);
        MemoryStore::open(&path).await.unwrap()
    }

    #[tokio::test]
    async fn rejects_self_links() {
        let store = store().await;
        let a = create_memory(&store, Memory::new("alice", "one", Sector::Episodic)).await.unwrap();
        assert!(matches!(create_link(&store, "alice", a, a, LinkType::Semantic, 0.5).await, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn links_for_memory_finds_both_directions() {
        let store = store().await;
        let a = create_memory(&store, Memory::new("alice", "one", Sector::Episodic)).await.unwrap();
        let b = create_memory(&store, Memory::new("alice", "two", Sector::Episodic)).await.unwrap();
        create_link(&store, "alice", a, b, LinkType::Causal, 0.8).await.unwrap();

        let from_a = links_for_memory(&store, "alice", a).await.unwrap();
        let from_b = links_for_memory(&store, "alice", b).await.unwrap();
        assert_eq!(from_a.len(), 1);
        assert_eq!(from_b.len(), 1);
    }

    #[tokio::test]
    async fn traversal_count_increments() {
        let store = store().await;
        let a = create_memory(&store, Memory::new("alice", "one", Sector::Episodic)).await.unwrap();
        let b = create_memory(&store, Memory::new("alice", "two", Sector::Episodic)).await.unwrap();
        create_link(&store, "alice", a, b, LinkType::Temporal, 0.3).await.unwrap();
        let updated = record_traversal(&store, a, b, LinkType::Temporal).await.unwrap();
        assert_eq!(updated.traversal_count, 1);
    }
}
