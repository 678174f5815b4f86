//! Content fingerprinting.
//!
//! A fingerprint is a blake3 hash over the content-bearing fields of a
//! memory, serialized canonically (object keys sorted at every depth). The
//! id is not part of it, so two memories with identical content share cache
//! entries. The derived seed makes model sampling reproducible.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::SEED_MASK;
use crate::memory::Memory;

/// Hex-encoded blake3 content hash (64 chars).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(memory: &Memory) -> Self {
        let metadata = serde_json::to_value(&memory.metadata).unwrap_or(Value::Null);
        let material = json!({
            "type": memory.kind.as_str(),
            "content": memory.body(),
            "filename": memory.filename,
            "createdAt": memory.created_at.to_rfc3339(),
            "size": memory.size,
            "metadata": metadata,
            "tags": memory.tags,
        });
        let mut canonical = String::new();
        write_canonical(&material, &mut canonical);
        Self(blake3::hash(canonical.as_bytes()).to_hex().to_string())
    }

    /// Wrap an already computed hash (e.g. a durable cache key).
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Positive 31-bit sampling seed: the first four hash bytes, big-endian,
    /// masked. Never zero.
    pub fn seed(&self) -> u32 {
        let bytes: Vec<u8> = (0..4)
            .filter_map(|i| self.0.get(i * 2..i * 2 + 2))
            .filter_map(|pair| u8::from_str_radix(pair, 16).ok())
            .collect();
        let raw = bytes.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
        (raw & SEED_MASK).max(1)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[*key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
