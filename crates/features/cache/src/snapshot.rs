//! The persisted mapping: normalized subject key to record, in insertion order.

use candor_domain::AnalysisRecord;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::NonZeroUsize;

/// All cached analyses, oldest first.
///
/// Serialized as a plain JSON object whose member order is the entry order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheSnapshot {
    entries: Vec<(String, AnalysisRecord)>,
}

impl CacheSnapshot {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AnalysisRecord> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, record)| record)
    }

    /// Inserts or replaces `key`, moving it to the newest position.
    pub fn upsert(&mut self, key: String, record: AnalysisRecord) {
        self.entries.retain(|(k, _)| *k != key);
        self.entries.push((key, record));
    }

    /// Drops the oldest entries until at most `max` remain. Returns how many were dropped.
    pub fn evict_to(&mut self, max: NonZeroUsize) -> usize {
        let excess = self.entries.len().saturating_sub(max.get());
        self.entries.drain(..excess);
        excess
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn records(&self) -> impl Iterator<Item = &AnalysisRecord> {
        self.entries.iter().map(|(_, record)| record)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses persisted bytes. Any invalid entry rejects the whole snapshot.
    ///
    /// # Errors
    /// Returns the JSON error describing the first problem found.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// # Errors
    /// Returns an error if a record cannot be serialized.
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl Serialize for CacheSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, record) in &self.entries {
            map.serialize_entry(key, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CacheSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = CacheSnapshot;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping subject keys to analyses")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, AnalysisRecord)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));

                while let Some((key, record)) = access.next_entry::<String, AnalysisRecord>()? {
                    // A repeated member keeps its first position and takes the last value.
                    if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
                        slot.1 = record;
                    } else {
                        entries.push((key, record));
                    }
                }

                Ok(CacheSnapshot { entries })
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candor_domain::{AuthenticityScores, DimensionScore, Score};

    fn record(name: &str) -> AnalysisRecord {
        let dim = || DimensionScore { score: Score::try_from(5.0).unwrap(), evidence: vec![] };
        AnalysisRecord {
            subject_name: name.to_owned(),
            dimension_scores: AuthenticityScores {
                alignment: dim(),
                boundary_consistency: dim(),
                shadow_integration: dim(),
                ethical_string_influence: dim(),
                self_expression: dim(),
            },
            narrative_summary: String::new(),
        }
    }

    #[test]
    fn test_upsert_moves_to_end() {
        let mut snap = CacheSnapshot::default();
        snap.upsert("a".into(), record("A"));
        snap.upsert("b".into(), record("B"));
        snap.upsert("a".into(), record("A2"));

        assert_eq!(snap.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(snap.get("a").unwrap().subject_name, "A2");
    }

    #[test]
    fn test_evict_oldest_first() {
        let mut snap = CacheSnapshot::default();
        for key in ["a", "b", "c", "d"] {
            snap.upsert(key.into(), record(key));
        }

        assert_eq!(snap.evict_to(NonZeroUsize::new(2).unwrap()), 2);
        assert_eq!(snap.keys().collect::<Vec<_>>(), ["c", "d"]);
        assert_eq!(snap.evict_to(NonZeroUsize::new(5).unwrap()), 0);
    }

    #[test]
    fn test_order_survives_serialization() {
        let mut snap = CacheSnapshot::default();
        for key in ["zeta", "alpha", "mu"] {
            snap.upsert(key.into(), record(key));
        }

        let parsed = CacheSnapshot::from_slice(&snap.to_vec().unwrap()).unwrap();
        assert_eq!(parsed.keys().collect::<Vec<_>>(), ["zeta", "alpha", "mu"]);
        assert_eq!(parsed, snap);
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(CacheSnapshot::from_slice(b"[]").is_err());
        assert!(CacheSnapshot::from_slice(b"null").is_err());
        assert!(CacheSnapshot::from_slice(b"{\"a\": 1}").is_err());
    }
}
