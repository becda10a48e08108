//! Data model for the memory store (`spec.md` §3, §6 persisted state).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which of the five memory sectors a `Memory` primarily belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Episodic,
    Semantic,
    Procedural,
    Emotional,
    Reflective,
}

/// Free-form classification attached to a `Memory`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryMetadata {
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub context: Option<String>,
    pub importance: f64,
    pub is_atomic: bool,
    pub parent_id: Option<Uuid>,
}

/// A single unit of durable content, exclusively owned by `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: Uuid,
    pub user_id: String,
    pub session_id: Option<String>,
    pub content: String,
    pub primary_sector: Sector,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub access_count: u64,
    pub salience: f64,
    pub strength: f64,
    pub decay_rate: f64,
    pub metadata: MemoryMetadata,
}

impl Memory {
    #[must_use]
    pub fn new(user_id: impl Into<String>, content: impl Into<String>, primary_sector: Sector) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            session_id: None,
            content: content.into(),
            primary_sector,
            created_at: now,
            last_accessed: now,
            access_count: 0,
            salience: 0.5,
            strength: 0.5,
            decay_rate: 0.1,
            metadata: MemoryMetadata::default(),
        }
    }
}

/// A hierarchical tag path owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub path: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The `(memory_id, tag_id)` join row; unique per pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryTagAssociation {
    pub memory_id: Uuid,
    pub tag_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// The kind of relationship a `MemoryLink` expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    Semantic,
    Temporal,
    Causal,
    Analogical,
}

/// A directed edge between two memories. `source_id` and `target_id` must
/// differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryLink {
    pub source_id: Uuid,
    pub target_id: Uuid,
    pub link_type: LinkType,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
    pub traversal_count: u64,
}

/// `search_by_tags` combinator: match any requested tag, or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSearchOp {
    And,
    Or,
}

/// One row of `get_tag_stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagStat {
    pub path: String,
    pub memory_count: usize,
    pub last_used: DateTime<Utc>,
}
