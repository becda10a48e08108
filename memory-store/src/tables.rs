//! redb table definitions for the memory store.
//!
//! Modelled after the teacher's `memory-storage-redb` crate: every table
//! is `TableDefinition<&str, &[u8]>`, keys are string-encoded identifiers,
//! values are postcard-serialised domain structs.

use redb::TableDefinition;

pub(crate) const MEMORIES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("memories");
pub(crate) const TAGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("tags");

/// `"{user_id}\0{path}"` → tag id, enforcing the `(user_id, path)`
/// uniqueness invariant without a secondary scan.
pub(crate) const TAG_PATH_INDEX: TableDefinition<&str, &str> = TableDefinition::new("tag_path_index");

/// `memory_id` → postcard-encoded `Vec<String>` of tag ids currently
/// associated with it.
pub(crate) const ASSOC_BY_MEMORY_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("assoc_by_memory");

/// `tag_id` → postcard-encoded `Vec<String>` of memory ids currently
/// carrying it.
pub(crate) const ASSOC_BY_TAG_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("assoc_by_tag");

/// `"{memory_id}\0{tag_id}"` → postcard-encoded `created_at`, the
/// association's own timestamp for `get_tag_stats`'s `last_used`.
pub(crate) const ASSOC_CREATED_AT_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("assoc_created_at");

/// `"{source_id}\0{target_id}\0{link_type}"` → postcard-encoded
/// `MemoryLink`. Scanned in full per query rather than indexed by
/// endpoint, since the graph is read far less often than it is written
/// and cyclic references make a maintained adjacency index more trouble
/// than it is worth at this scale.
pub(crate) const LINKS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("links");
