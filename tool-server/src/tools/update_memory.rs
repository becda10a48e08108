//! `update_memory` — mutates an owned memory's content/strength and tag
//! set in place (`spec.md` §4.8).

use serde_json::{json, Map, Value};

use crate::dispatch::AppState;
use crate::error::ToolError;
use crate::params::{optional_f64, optional_str, optional_string_vec, require_str, require_uuid};

pub async fn run(state: &AppState, params: &Map<String, Value>) -> Result<Value, ToolError> {
    let user_id = require_str(params, "user_id")?;
    let memory_id = require_uuid(params, "memory_id")?;

    let content = optional_str(params, "content").map(str::to_string);
    let salience = optional_f64(params, "salience");
    let strength = optional_f64(params, "strength");
    let importance = optional_f64(params, "importance");

    let memory = memory_store::ops::memories::update_memory(&state.memory, user_id, memory_id, move |memory| {
        if let Some(content) = content {
            memory.content = content;
        }
        if let Some(salience) = salience {
            memory.salience = salience;
        }
        if let Some(strength) = strength {
            memory.strength = strength;
        }
        if let Some(importance) = importance {
            memory.metadata.importance = importance;
        }
        memory.last_accessed = chrono::Utc::now();
    })
    .await?;

    let add = optional_string_vec(params, "add_tags");
    if !add.is_empty() {
        memory_store::ops::tags::add_tags(&state.memory, user_id, memory_id, &add).await?;
    }
    let remove = optional_string_vec(params, "remove_tags");
    if !remove.is_empty() {
        memory_store::ops::tags::remove_tags(&state.memory, user_id, memory_id, &remove).await?;
    }

    Ok(json!({ "memory": memory }))
}
