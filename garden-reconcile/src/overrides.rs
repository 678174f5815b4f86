//! User overrides. An override wins over every other action source until
//! it is cleared.

use garden_core::errors::{GardenError, GardenResult};
use garden_core::memory::{normalize, Memory};
use garden_core::traits::IMemoryStore;
use tracing::info;

fn load(store: &dyn IMemoryStore, memory_id: &str) -> GardenResult<Memory> {
    store
        .get(memory_id)?
        .ok_or_else(|| GardenError::MemoryNotFound { id: memory_id.to_string() })
}

/// Store a normalized override. A blank value clears it instead.
pub fn set_override(store: &dyn IMemoryStore, memory_id: &str, raw: &str) -> GardenResult<Memory> {
    if raw.trim().is_empty() {
        return clear_override(store, memory_id);
    }
    let mut memory = load(store, memory_id)?;
    let action = normalize(Some(raw));
    memory.override_action = Some(action);
    memory.user_overridden = true;
    store.update(&memory)?;
    info!(memory_id, action = %action, "override set");
    Ok(memory)
}

pub fn clear_override(store: &dyn IMemoryStore, memory_id: &str) -> GardenResult<Memory> {
    let mut memory = load(store, memory_id)?;
    memory.override_action = None;
    memory.user_overridden = false;
    store.update(&memory)?;
    info!(memory_id, "override cleared");
    Ok(memory)
}
