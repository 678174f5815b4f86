//! Migration-on-read of legacy cluster records.
//!
//! Stored payloads hold one record or an array of them. Membership may be
//! listed under `memoryIds` or `memories`; `action` may be missing, in which
//! case it is inferred from the name. Whatever cannot be read is skipped
//! and logged, never fatal.

use garden_core::errors::GardenResult;
use garden_core::memory::{normalize, Action};
use garden_core::models::{ClusterRecord, StoredClusterRecord};
use garden_core::traits::IClusterRecordStore;
use garden_observability::tracing_setup::events;
use serde_json::Value;
use tracing::warn;

const MEMBERSHIP_FIELDS: [&str; 2] = ["memoryIds", "memories"];
const COMPRESS_NAME_HINTS: [&str; 3] = ["old", "12-18", "6-12"];

/// Action implied by a record name when the record carries none.
pub fn infer_action_from_name(name: &str) -> Action {
    let lowered = name.to_ascii_lowercase();
    if COMPRESS_NAME_HINTS.iter().any(|hint| lowered.contains(hint)) {
        Action::Compress
    } else {
        Action::Keep
    }
}

/// Interpret one legacy record. The error names what is wrong with it.
pub fn migrate_record(value: &Value) -> Result<ClusterRecord, String> {
    let Value::Object(fields) = value else {
        return Err("record is not an object".into());
    };
    let id = match fields.get("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err("record has no id".into()),
    };
    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let membership = MEMBERSHIP_FIELDS
        .iter()
        .find_map(|field| fields.get(*field).map(|v| (*field, v)));
    let memory_ids = match membership {
        None | Some((_, Value::Null)) => Vec::new(),
        Some((_, Value::Array(items))) => {
            let mut ids: Vec<String> = Vec::with_capacity(items.len());
            for item in items.iter().filter_map(Value::as_str) {
                if !ids.iter().any(|known| known == item) {
                    ids.push(item.to_string());
                }
            }
            ids
        }
        Some((field, _)) => return Err(format!("`{field}` is not an array")),
    };

    let action = match fields.get("action").and_then(Value::as_str) {
        Some(raw) if !raw.is_empty() => normalize(Some(raw)),
        _ => infer_action_from_name(&name),
    };

    Ok(ClusterRecord {
        id,
        name,
        action,
        memory_ids,
    })
}

/// The raw elements of a payload: the array items, or the single object.
/// `None` when the payload is not JSON.
pub(crate) fn payload_elements(payload: &str) -> Option<(Vec<Value>, bool)> {
    match serde_json::from_str::<Value>(payload).ok()? {
        Value::Array(items) => Some((items, true)),
        single => Some((vec![single], false)),
    }
}

/// Every readable record in one stored payload, in payload order.
pub fn migrate_payload(stored: &StoredClusterRecord) -> Vec<ClusterRecord> {
    let Some((elements, _)) = payload_elements(&stored.payload) else {
        events::legacy_record_skipped(&stored.key, "payload is not valid JSON");
        return Vec::new();
    };
    elements
        .iter()
        .enumerate()
        .filter_map(|(idx, element)| match migrate_record(element) {
            Ok(record) => Some(record),
            Err(reason) => {
                events::legacy_record_skipped(&format!("{}[{idx}]", stored.key), &reason);
                None
            }
        })
        .collect()
}

/// Every readable legacy record. An absent store, or one that cannot be
/// listed, contributes nothing.
pub fn load_legacy_records(store: Option<&dyn IClusterRecordStore>) -> Vec<ClusterRecord> {
    let Some(store) = store else {
        return Vec::new();
    };
    match store.list_raw() {
        Ok(payloads) => payloads.iter().flat_map(migrate_payload).collect(),
        Err(e) => {
            warn!(error = %e, "legacy cluster records unavailable, reconciling without them");
            Vec::new()
        }
    }
}

/// What to do with one stored legacy record during a rewrite.
pub(crate) enum RecordEdit {
    Keep,
    Remove,
    Replace(Value),
}

/// Apply `decide` to every readable record in the store and write back the
/// payloads that changed. Unreadable elements are left as they are.
/// Returns the number of records removed.
pub(crate) fn rewrite_records<F>(store: &dyn IClusterRecordStore, mut decide: F) -> GardenResult<usize>
where
    F: FnMut(&ClusterRecord, &Value) -> RecordEdit,
{
    let mut removed = 0;
    for stored in store.list_raw()? {
        let Some((elements, is_array)) = payload_elements(&stored.payload) else {
            continue;
        };
        let mut changed = false;
        let mut kept = Vec::with_capacity(elements.len());
        for element in elements {
            let edit = match migrate_record(&element) {
                Ok(record) => decide(&record, &element),
                Err(_) => RecordEdit::Keep,
            };
            match edit {
                RecordEdit::Keep => kept.push(element),
                RecordEdit::Remove => {
                    removed += 1;
                    changed = true;
                }
                RecordEdit::Replace(value) => {
                    kept.push(value);
                    changed = true;
                }
            }
        }
        if !changed {
            continue;
        }
        if kept.is_empty() {
            store.delete_raw(&stored.key)?;
            continue;
        }
        let payload = if is_array || kept.len() > 1 {
            Value::Array(kept)
        } else {
            kept.swap_remove(0)
        };
        store.put_raw(&StoredClusterRecord {
            key: stored.key,
            payload: payload.to_string(),
        })?;
    }
    Ok(removed)
}

/// `element` with `memory_id` dropped from its membership list.
pub(crate) fn without_member(element: &Value, memory_id: &str) -> Value {
    let mut edited = element.clone();
    if let Value::Object(fields) = &mut edited {
        for field in MEMBERSHIP_FIELDS {
            if let Some(Value::Array(items)) = fields.get_mut(field) {
                items.retain(|item| item.as_str() != Some(memory_id));
            }
        }
    }
    edited
}
