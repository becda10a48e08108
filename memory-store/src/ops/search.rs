//! Tag-based search and tag statistics (`spec.md` §4.8 "Search").

use std::collections::HashSet;
use std::sync::Arc;

use redb::ReadableTable;
use reasoning_core::error::{Error, Result};

use crate::model::{Memory, Tag, TagSearchOp, TagStat};
use crate::normalize::normalize_path;
use crate::store::MemoryStore;
use crate::tables::{ASSOC_BY_TAG_TABLE, ASSOC_CREATED_AT_TABLE, MEMORIES_TABLE, TAGS_TABLE};

fn member_ids(assoc_by_tag: &impl ReadableTable<&'static str, &'static [u8]>, tag_id: &str) -> Result<Vec<String>> {
    Ok(assoc_by_tag
        .get(tag_id)
        .map_err(|e| Error::Storage(e.to_string()))?
        .map(|v| postcard::from_bytes(v.value()).unwrap_or_default())
        .unwrap_or_default())
}

/// Finds memories carrying any (`Or`) or all (`And`) of `tag_paths`.
/// An empty normalised tag set returns an empty result without querying
/// the database.
pub async fn search_by_tags(store: &MemoryStore, user_id: &str, tag_paths: &[String], op: TagSearchOp) -> Result<Vec<Memory>> {
    let normalized: Vec<String> = tag_paths.iter().filter_map(|p| normalize_path(p)).collect();
    if normalized.is_empty() {
        return Ok(Vec::new());
    }

    let db = Arc::clone(&store.db);
    let user_id = user_id.to_string();

    tokio::task::spawn_blocking(move || {
        let read_txn = db.begin_read().map_err(|e| Error::Storage(e.to_string()))?;
        let tags_table = read_txn.open_table(TAGS_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
        let assoc_by_tag = read_txn.open_table(ASSOC_BY_TAG_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
        let memories_table = read_txn.open_table(MEMORIES_TABLE).map_err(|e| Error::Storage(e.to_string()))?;

        let mut tag_ids = Vec::new();
        for entry in tags_table.iter().map_err(|e| Error::Storage(e.to_string()))? {
            let (_, value) = entry.map_err(|e| Error::Storage(e.to_string()))?;
            let tag: Tag = postcard::from_bytes(value.value()).map_err(|e| Error::Storage(format!("failed to decode tag: {e}")))?;
            if tag.user_id == user_id && normalized.contains(&tag.path) {
                tag_ids.push(tag.id);
            }
        }

        let member_sets: Vec<HashSet<String>> = tag_ids
            .iter()
            .map(|id| member_ids(&assoc_by_tag, id.to_string().as_str()).map(|v| v.into_iter().collect()))
            .collect::<Result<_>>()?;

        let matched: HashSet<String> = match op {
            TagSearchOp::Or => member_sets.into_iter().flatten().collect(),
            TagSearchOp::And => {
                if tag_ids.len() != normalized.len() {
                    // at least one requested tag path doesn't exist for this user;
                    // an AND search can never match.
                    HashSet::new()
                } else {
                    let mut iter = member_sets.into_iter();
                    match iter.next() {
                        Some(first) => iter.fold(first, |acc, set| acc.intersection(&set).cloned().collect()),
                        None => HashSet::new(),
                    }
                }
            }
        };

        let mut memories = Vec::new();
        for memory_key in matched {
            if let Some(bytes) = memories_table.get(memory_key.as_str()).map_err(|e| Error::Storage(e.to_string()))? {
                let memory: Memory = postcard::from_bytes(bytes.value()).map_err(|e| Error::Storage(format!("failed to decode memory: {e}")))?;
                if memory.user_id == user_id {
                    memories.push(memory);
                }
            }
        }
        memories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok::<Vec<Memory>, Error>(memories)
    })
    .await
    .map_err(|e| Error::Storage(format!("task join error: {e}")))?
}

/// Finds memories tagged with `prefix` itself or any path nested under it.
pub async fn search_by_tag_prefix(store: &MemoryStore, user_id: &str, prefix: &str) -> Result<Vec<Memory>> {
    let Some(normalized_prefix) = normalize_path(prefix) else { return Ok(Vec::new()) };

    let db = Arc::clone(&store.db);
    let user_id = user_id.to_string();

    tokio::task::spawn_blocking(move || {
        let read_txn = db.begin_read().map_err(|e| Error::Storage(e.to_string()))?;
        let tags_table = read_txn.open_table(TAGS_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
        let assoc_by_tag = read_txn.open_table(ASSOC_BY_TAG_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
        let memories_table = read_txn.open_table(MEMORIES_TABLE).map_err(|e| Error::Storage(e.to_string()))?;

        let nested_prefix = format!("{normalized_prefix}/");
        let mut matched: HashSet<String> = HashSet::new();
        for entry in tags_table.iter().map_err(|e| Error::Storage(e.to_string()))? {
            let (_, value) = entry.map_err(|e| Error::Storage(e.to_string()))?;
            let tag: Tag = postcard::from_bytes(value.value()).map_err(|e| Error::Storage(format!("failed to decode tag: {e}")))?;
            if tag.user_id != user_id {
                continue;
            }
            if tag.path == normalized_prefix || tag.path.starts_with(&nested_prefix) {
                matched.extend(member_ids(&assoc_by_tag, tag.id.to_string().as_str())?);
            }
        }

        let mut memories = Vec::new();
        for memory_key in matched {
            if let Some(bytes) = memories_table.get(memory_key.as_str()).map_err(|e| Error::Storage(e.to_string()))? {
                let memory: Memory = postcard::from_bytes(bytes.value()).map_err(|e| Error::Storage(format!("failed to decode memory: {e}")))?;
                if memory.user_id == user_id {
                    memories.push(memory);
                }
            }
        }
        memories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok::<Vec<Memory>, Error>(memories)
    })
    .await
    .map_err(|e| Error::Storage(format!("task join error: {e}")))?
}

/// Every tag the user owns, unordered.
pub async fn get_all_tags(store: &MemoryStore, user_id: &str) -> Result<Vec<Tag>> {
    let db = Arc::clone(&store.db);
    let user_id = user_id.to_string();

    tokio::task::spawn_blocking(move || {
        let read_txn = db.begin_read().map_err(|e| Error::Storage(e.to_string()))?;
        let tags_table = read_txn.open_table(TAGS_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
        let mut tags = Vec::new();
        for entry in tags_table.iter().map_err(|e| Error::Storage(e.to_string()))? {
            let (_, value) = entry.map_err(|e| Error::Storage(e.to_string()))?;
            let tag: Tag = postcard::from_bytes(value.value()).map_err(|e| Error::Storage(format!("failed to decode tag: {e}")))?;
            if tag.user_id == user_id {
                tags.push(tag);
            }
        }
        Ok::<Vec<Tag>, Error>(tags)
    })
    .await
    .map_err(|e| Error::Storage(format!("task join error: {e}")))?
}

/// Per-tag usage counts and last-used timestamps, ordered by `memory_count`
/// descending then `path` ascending.
pub async fn get_tag_stats(store: &MemoryStore, user_id: &str) -> Result<Vec<TagStat>> {
    let db = Arc::clone(&store.db);
    let user_id = user_id.to_string();

    let mut stats = tokio::task::spawn_blocking(move || {
        let read_txn = db.begin_read().map_err(|e| Error::Storage(e.to_string()))?;
        let tags_table = read_txn.open_table(TAGS_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
        let assoc_by_tag = read_txn.open_table(ASSOC_BY_TAG_TABLE).map_err(|e| Error::Storage(e.to_string()))?;
        let created_at_table = read_txn.open_table(ASSOC_CREATED_AT_TABLE).map_err(|e| Error::Storage(e.to_string()))?;

        let mut stats = Vec::new();
        for entry in tags_table.iter().map_err(|e| Error::Storage(e.to_string()))? {
            let (_, value) = entry.map_err(|e| Error::Storage(e.to_string()))?;
            let tag: Tag = postcard::from_bytes(value.value()).map_err(|e| Error::Storage(format!("failed to decode tag: {e}")))?;
            if tag.user_id != user_id {
                continue;
            }
            let members = member_ids(&assoc_by_tag, tag.id.to_string().as_str())?;
            let mut last_used = tag.created_at;
            for memory_key in &members {
                let assoc_key = format!("{memory_key}\0{}", tag.id);
                if let Some(bytes) = created_at_table.get(assoc_key.as_str()).map_err(|e| Error::Storage(e.to_string()))? {
                    let created: chrono::DateTime<chrono::Utc> =
                        postcard::from_bytes(bytes.value()).map_err(|e| Error::Storage(format!("failed to decode timestamp: {e}")))?;
                    if created > last_used {
                        last_used = created;
                    }
                }
            }
            stats.push(TagStat { path: tag.path, memory_count: members.len(), last_used });
        }
        Ok::<Vec<TagStat>, Error>(stats)
    })
    .await
    .map_err(|e| Error::Storage(format!("task join error: {e}")))??;

    stats.sort_by(|a, b| b.memory_count.cmp(&a.memory_count).then_with(|| a.path.cmp(&b.path)));
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sector;
    use crate::ops::memories::create_memory;
    use crate::ops::tags::add_tags;

    async fn store() -> MemoryStore {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.redb");
        std::mem::forget(dir);
        MemoryStore::open(&path).await.unwrap()
    }

    #[tokio::test]
    async fn and_search_requires_all_tags() {
        let store = store().await;
        let a = create_memory(&store, Memory::new("alice", "has both", Sector::Episodic)).await.unwrap();
        let b = create_memory(&store, Memory::new("alice", "has one", Sector::Episodic)).await.unwrap();
        add_tags(&store, "alice", a, &["work".to_string(), "urgent".to_string()]).await.unwrap();
        add_tags(&store, "alice", b, &["work".to_string()]).await.unwrap();

        let and_results = search_by_tags(&store, "alice", &["work".to_string(), "urgent".to_string()], TagSearchOp::And).await.unwrap();
        assert_eq!(and_results.len(), 1);
        assert_eq!(and_results[0].id, a);

        let or_results = search_by_tags(&store, "alice", &["work".to_string(), "urgent".to_string()], TagSearchOp::Or).await.unwrap();
        assert_eq!(or_results.len(), 2);
    }

    #[tokio::test]
    async fn prefix_search_matches_nested_paths() {
        let store = store().await;
        let a = create_memory(&store, Memory::new("alice", "nested", Sector::Episodic)).await.unwrap();
        add_tags(&store, "alice", a, &["work/projects/alpha".to_string()]).await.unwrap();

        let results = search_by_tag_prefix(&store, "alice", "work/projects").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, a);
    }

    #[tokio::test]
    async fn tag_stats_are_ordered_by_count_desc() {
        let store = store().await;
        let a = create_memory(&store, Memory::new("alice", "one", Sector::Episodic)).await.unwrap();
        let b = create_memory(&store, Memory::new("alice", "two", Sector::Episodic)).await.unwrap();
        add_tags(&store, "alice", a, &["popular".to_string()]).await.unwrap();
        add_tags(&store, "alice", b, &["popular".to_string()]).await.unwrap();
        add_tags(&store, "alice", b, &["rare".to_string()]).await.unwrap();

        let stats = get_tag_stats(&store, "alice").await.unwrap();
        assert_eq!(stats[0].path, "popular");
        assert_eq!(stats[0].memory_count, 2);
    }
}
