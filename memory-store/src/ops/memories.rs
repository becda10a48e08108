//! Ownership-checked CRUD over `Memory` rows (`spec.md` §4.8 "Ownership checks").

use std::sync::Arc;

use redb::ReadableTable;
use reasoning_core::error::{Error, Result};
use uuid::Uuid;

use crate::model::Memory;
use crate::store::MemoryStore;
use crate::tables::{ASSOC_BY_MEMORY_TABLE, ASSOC_BY_TAG_TABLE, ASSOC_CREATED_AT_TABLE, LINKS_TABLE, MEMORIES_TABLE};

/// Inserts a new memory, returning its id.
pub async fn create_memory(store: &MemoryStore, memory: Memory) -> Result<Uuid> {
    let db = Arc::clone(&store.db);
    let id = memory.id;
    let bytes = postcard::to_allocvec(&memory).map_err(|e| Error::Storage(format!("failed to encode memory: {e}")))?;

    tokio::task::spawn_blocking(move || {
        let write_txn = db.begin_write().map_err(|e| Error::Storage(e.to_string()))?;
        {
            let mut table = write_txn.open_table(MEMORIES_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            table.insert(id.to_string().as_str(), bytes.as_slice()).map_err(|e| Error::Storage(e.to_string()))?;
        }
        write_txn.commit().map_err(|e| Error::Storage(e.to_string()))?;
        Ok::<(), Error>(())
    })
    .await
    .map_err(|e| Error::Storage(format!("task join error: {e}")))??;

    Ok(id)
}

/// Fetches a memory, verifying `(memory_id, user_id)` ownership.
pub async fn get_memory(store: &MemoryStore, user_id: &str, memory_id: Uuid) -> Result<Memory> {
    let db = Arc::clone(&store.db);
    let user_id = user_id.to_string();

    tokio::task::spawn_blocking(move || {
        let read_txn = db.begin_read().map_err(|e| Error::Storage(e.to_string()))?;
        let table = read_txn.open_table(MEMORIES_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
        let bytes = table
            .get(memory_id.to_string().as_str())
            .map_err(|e| Error::Storage(e.to_string()))?
            .ok_or_else(|| Error::NotFound(format!("memory {memory_id} not found")))?;
        let memory: Memory = postcard::from_bytes(bytes.value()).map_err(|e| Error::Storage(format!("failed to decode memory: {e}")))?;
        if memory.user_id != user_id {
            return Err(Error::NotFound(format!("memory {memory_id} not found")));
        }
        Ok(memory)
    })
    .await
    .map_err(|e| Error::Storage(format!("task join error: {e}")))?
}

/// Applies `mutate` to the owned memory and persists the result.
pub async fn update_memory<F>(store: &MemoryStore, user_id: &str, memory_id: Uuid, mutate: F) -> Result<Memory>
where
    F: FnOnce(&mut Memory) + Send + 'static,
{
    let mut memory = get_memory(store, user_id, memory_id).await?;
    mutate(&mut memory);

    let db = Arc::clone(&store.db);
    let bytes = postcard::to_allocvec(&memory).map_err(|e| Error::Storage(format!("failed to encode memory: {e}")))?;
    let id = memory.id;

    tokio::task::spawn_blocking(move || {
        let write_txn = db.begin_write().map_err(|e| Error::Storage(e.to_string()))?;
        {
            let mut table = write_txn.open_table(MEMORIES_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            table.insert(id.to_string().as_str(), bytes.as_slice()).map_err(|e| Error::Storage(e.to_string()))?;
        }
        write_txn.commit().map_err(|e| Error::Storage(e.to_string()))?;
        Ok::<(), Error>(())
    })
    .await
    .map_err(|e| Error::Storage(format!("task join error: {e}")))??;

    Ok(memory)
}

/// Deletes a memory and cascades: every tag association, every link with
/// this memory as an endpoint. Ownership is verified first; any failure
/// rolls the whole transaction back.
pub async fn delete_memory(store: &MemoryStore, user_id: &str, memory_id: Uuid) -> Result<()> {
    // ownership check outside the write transaction, mirroring the
    // teacher's read-then-write shape; the write below re-verifies
    // presence so a concurrent delete cannot leave a partial cascade.
    let _ = get_memory(store, user_id, memory_id).await?;

    let db = Arc::clone(&store.db);
    let memory_key = memory_id.to_string();

    tokio::task::spawn_blocking(move || {
        let write_txn = db.begin_write().map_err(|e| Error::Storage(e.to_string()))?;
        {
            let mut memories = write_txn.open_table(MEMORIES_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            if memories.remove(memory_key.as_str()).map_err(|e| Error::Storage(e.to_string()))?.is_none() {
                return Err(Error::NotFound(format!("memory {memory_id} not found")));
            }
        }

        let associated_tags: Vec<String> = {
            let mut assoc_by_memory = write_txn.open_table(ASSOC_BY_MEMORY_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            let tags = assoc_by_memory
                .remove(memory_key.as_str())
                .map_err(|e| Error::Storage(e.to_string()))?
                .map(|v| postcard::from_bytes::<Vec<String>>(v.value()).unwrap_or_default())
                .unwrap_or_default();
            tags
        };

        {
            let mut assoc_by_tag = write_txn.open_table(ASSOC_BY_TAG_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            let mut created_at = write_txn.open_table(ASSOC_CREATED_AT_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            for tag_id in &associated_tags {
                if let Some(existing) = assoc_by_tag.get(tag_id.as_str()).map_err(|e| Error::Storage(e.to_string()))? {
                    let mut members: Vec<String> = postcard::from_bytes(existing.value()).unwrap_or_default();
                    members.retain(|m| m != &memory_key);
                    drop(existing);
                    let bytes = postcard::to_allocvec(&members).map_err(|e| Error::Storage(e.to_string()))?;
                    assoc_by_tag.insert(tag_id.as_str(), bytes.as_slice()).map_err(|e| Error::Storage(e.to_string()))?;
                }
                let assoc_key = format!("{memory_key}\0{tag_id}");
                created_at.remove(assoc_key.as_str()).map_err(|e| Error::Storage(e.to_string()))?;
            }
        }

        {
            let mut links = write_txn.open_table(LINKS_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            let stale_keys: Vec<String> = links
                .iter()
                .map_err(|e| Error::Storage(e.to_string()))?
                .filter_map(|entry| {
                    let (key, value) = entry.ok()?;
                    let link: crate::model::MemoryLink = postcard::from_bytes(value.value()).ok()?;
                    if link.source_id == memory_id || link.target_id == memory_id {
                        Some(key.value().to_string())
                    } else {
                        None
                    }
                })
                .collect();
            for key in stale_keys {
                links.remove(key.as_str()).map_err(|e| Error::Storage(e.to_string()))?;
            }
        }

        write_txn.commit().map_err(|e| Error::Storage(e.to_string()))?;
        Ok::<(), Error>(())
    })
    .await
    .map_err(|e| Error::Storage(format!("task join error: {e}")))??;

    Ok(())
}
