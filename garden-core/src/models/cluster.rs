use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::GardenError;
use crate::memory::{normalize, Action};

const BUCKET_PREFIX: &str = "bucket:";
const LEGACY_PREFIX: &str = "legacy:";
const HISTORICAL_PREFIXES: [&str; 2] = ["merged-", "empty-"];
const ACTION_KEYWORDS: [&str; 5] = ["low_relevance", "compress", "delete", "forget", "keep"];

/// Structured cluster identifier.
///
/// Reconciled buckets are addressed by action; stored legacy records by
/// their own id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClusterId {
    Bucket(Action),
    Legacy(String),
}

impl ClusterId {
    /// Parse a cluster id, including historical string encodings.
    ///
    /// `merged-<action>-<ts>` and `empty-<action>-<ts>` name buckets, as does
    /// any bare id containing an action keyword. Other bare ids are legacy
    /// record ids.
    pub fn parse(raw: &str) -> Result<Self, GardenError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(GardenError::InvalidClusterId { raw: raw.to_string() });
        }
        if let Some(action) = raw.strip_prefix(BUCKET_PREFIX) {
            return Ok(Self::Bucket(normalize(Some(action))));
        }
        if let Some(id) = raw.strip_prefix(LEGACY_PREFIX) {
            if id.is_empty() {
                return Err(GardenError::InvalidClusterId { raw: raw.to_string() });
            }
            return Ok(Self::Legacy(id.to_string()));
        }
        for prefix in HISTORICAL_PREFIXES {
            if let Some(rest) = raw.strip_prefix(prefix) {
                let action = rest.rsplit_once('-').map_or(rest, |(action, _)| action);
                return Ok(Self::Bucket(normalize(Some(action))));
            }
        }
        let lowered = raw.to_ascii_lowercase();
        let embedded = ACTION_KEYWORDS
            .iter()
            .filter_map(|kw| lowered.find(kw).map(|pos| (pos, *kw)))
            .min_by_key(|(pos, _)| *pos);
        Ok(match embedded {
            Some((_, keyword)) => Self::Bucket(normalize(Some(keyword))),
            None => Self::Legacy(raw.to_string()),
        })
    }

    pub fn bucket_action(&self) -> Option<Action> {
        match self {
            Self::Bucket(action) => Some(*action),
            Self::Legacy(_) => None,
        }
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bucket(action) => write!(f, "{BUCKET_PREFIX}{}", action.as_str()),
            Self::Legacy(id) => write!(f, "{LEGACY_PREFIX}{id}"),
        }
    }
}

impl FromStr for ClusterId {
    type Err = GardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ClusterId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClusterId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// One reconciled bucket. Recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: ClusterId,
    pub name: String,
    pub action: Action,
    pub memory_ids: Vec<String>,
    /// Member count.
    pub size: usize,
    /// Sum of member `size` fields, in bytes.
    pub total_size: u64,
}

impl Cluster {
    pub fn empty(action: Action) -> Self {
        Self {
            id: ClusterId::Bucket(action),
            name: action.display_name().to_string(),
            action,
            memory_ids: Vec::new(),
            size: 0,
            total_size: 0,
        }
    }

    pub fn contains(&self, memory_id: &str) -> bool {
        self.memory_ids.iter().any(|id| id == memory_id)
    }
}

/// A legacy cluster record after migration-on-read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRecord {
    pub id: String,
    pub name: String,
    pub action: Action,
    pub memory_ids: Vec<String>,
}

/// A legacy cluster payload exactly as stored, not yet interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredClusterRecord {
    pub key: String,
    pub payload: String,
}

/// Outcome of a bucket or cluster deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionReport {
    pub memories_deleted: usize,
    pub clusters_deleted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_forms_round_trip() {
        for id in [ClusterId::Bucket(Action::LowRelevance), ClusterId::Legacy("c-17".into())] {
            assert_eq!(ClusterId::parse(&id.to_string()).unwrap(), id);
        }
    }

    #[test]
    fn historical_encodings() {
        assert_eq!(
            ClusterId::parse("merged-forget-1700000000").unwrap(),
            ClusterId::Bucket(Action::LowRelevance)
        );
        assert_eq!(
            ClusterId::parse("empty-low_relevance-1700000000").unwrap(),
            ClusterId::Bucket(Action::LowRelevance)
        );
        assert_eq!(
            ClusterId::parse("merged-archive-12").unwrap(),
            ClusterId::Bucket(Action::Keep)
        );
        assert_eq!(
            ClusterId::parse("cluster-compress").unwrap(),
            ClusterId::Bucket(Action::Compress)
        );
        assert_eq!(
            ClusterId::parse("cluster-1699").unwrap(),
            ClusterId::Legacy("cluster-1699".into())
        );
    }

    #[test]
    fn empty_ids_are_rejected() {
        assert!(ClusterId::parse("  ").is_err());
        assert!(ClusterId::parse("legacy:").is_err());
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&ClusterId::Bucket(Action::Delete)).unwrap();
        assert_eq!(json, "\"bucket:delete\"");
    }
}
