//! Node identifiers and injectable id generators

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a draft node (course, module, lesson, question or file).
///
/// Ids are opaque strings so that records fetched from the backend keep whatever
/// shape the backend gave them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Source of fresh node ids.
///
/// Generators must never hand out the same id twice. The draft tree still checks
/// every insert against its id index and rejects collisions.
pub trait IdGenerator: Send + Sync + fmt::Debug {
    fn next_id(&self) -> NodeId;
}

/// Random v4 UUIDs, the production generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> NodeId {
        NodeId(Uuid::new_v4().to_string())
    }
}

/// Monotonic counter ids (`<prefix>-<n>`), deterministic for tests and fixtures.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    pub fn starting_at(prefix: impl Into<String>, start: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(start),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> NodeId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        NodeId(format!("{}-{}", self.prefix, n))
    }
}

/// What happens to descendant ids when a course is duplicated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    /// Every module, lesson, question and file gets a fresh id
    #[default]
    Regenerate,
    /// Descendant ids are copied verbatim from the source course
    Preserve,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn given_sequential_ids_when_generating_then_monotonic() {
        let ids = SequentialIds::new("m");
        assert_eq!(ids.next_id().as_str(), "m-1");
        assert_eq!(ids.next_id().as_str(), "m-2");
        assert_eq!(ids.next_id().as_str(), "m-3");
    }

    #[test]
    fn given_uuid_generator_when_generating_many_then_all_distinct() {
        let ids = UuidGenerator;
        let set: HashSet<NodeId> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(set.len(), 1000);
    }

    #[test]
    fn given_id_policy_when_deserializing_then_lowercase_names() {
        let policy: IdPolicy = serde_json::from_str("\"preserve\"").unwrap();
        assert_eq!(policy, IdPolicy::Preserve);
        assert_eq!(IdPolicy::default(), IdPolicy::Regenerate);
    }
}
