//! Opening and closing the underlying redb database.

use std::path::Path;
use std::sync::Arc;

use redb::Database;
use reasoning_core::error::{Error, Result};
use tracing::info;

use crate::tables::{ASSOC_BY_MEMORY_TABLE, ASSOC_BY_TAG_TABLE, ASSOC_CREATED_AT_TABLE, LINKS_TABLE, MEMORIES_TABLE, TAGS_TABLE, TAG_PATH_INDEX};

/// A redb-backed memory store. Cheap to clone: the `Database` handle is
/// shared via `Arc` and redb serialises writes internally.
#[derive(Clone)]
pub struct MemoryStore {
    pub(crate) db: Arc<Database>,
}

impl MemoryStore {
    /// Opens (creating if absent) the database at `path` and ensures every
    /// table exists.
    pub async fn open(path: &Path) -> Result<Self> {
        info!("opening memory store at {}", path.display());
        let path_buf = path.to_path_buf();
        let db = tokio::task::spawn_blocking(move || {
            Database::create(&path_buf).map_err(|e| Error::Storage(format!("failed to open memory store: {e}")))
        })
        .await
        .map_err(|e| Error::Storage(format!("task join error: {e}")))??;

        let store = Self { db: Arc::new(db) };
        store.initialize_tables().await?;
        Ok(store)
    }

    async fn initialize_tables(&self) -> Result<()> {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let write_txn = db.begin_write().map_err(|e| Error::Storage(format!("failed to begin write transaction: {e}")))?;
            {
                write_txn.open_table(MEMORIES_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
                write_txn.open_table(TAGS_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
                write_txn.open_table(TAG_PATH_INDEX).map_err(|e| Error::Storage(e.to_string()))?;
                write_txn.open_table(ASSOC_BY_MEMORY_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
                write_txn.open_table(ASSOC_BY_TAG_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
                write_txn.open_table(ASSOC_CREATED_AT_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
                write_txn.open_table(LINKS_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
            }
            write_txn.commit().map_err(|e| Error::Storage(format!("failed to commit table initialisation: {e}")))?;
            Ok::<(), Error>(())
        })
        .await
        .map_err(|e| Error::Storage(format!("task join error: {e}")))??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_and_initializes_tables() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::open(&dir.path().join("memory.redb")).await.unwrap();
        drop(store);
    }
}
