//! Session Store - identifier to session record, with atomic check-and-set
//!
//! The manager only talks to the `SessionStore` trait, so the in-memory map
//! here can be swapped for a shared key-value store without touching the
//! state machine. Every operation is atomic per identifier.

use crate::seed::Seed;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// State held for one client identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// `None` for a burn that arrived before any session was issued
    pub seed: Option<Seed>,
    pub birth: DateTime<Utc>,
    pub burned_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// A live record holding a freshly issued seed
    pub fn active(seed: Seed) -> Self {
        Self { seed: Some(seed), birth: Utc::now(), burned_at: None }
    }

    /// A seedless burned record
    pub fn tombstone() -> Self {
        let now = Utc::now();
        Self { seed: None, birth: now, burned_at: Some(now) }
    }

    pub fn is_burned(&self) -> bool {
        self.burned_at.is_some()
    }

    /// The seed, if this record is still live
    pub fn live_seed(&self) -> Option<&Seed> {
        if self.is_burned() {
            None
        } else {
            self.seed.as_ref()
        }
    }

    fn burn(&mut self) {
        if self.burned_at.is_none() {
            self.burned_at = Some(Utc::now());
        }
    }
}

/// Identifier-keyed session storage
pub trait SessionStore: Send + Sync {
    fn get(&self, id: &str) -> Option<SessionRecord>;

    /// Insert `record` unless the identifier already has one. Returns the
    /// record that is stored afterwards.
    fn set_if_absent(&self, id: &str, record: SessionRecord) -> SessionRecord;

    /// Mark the identifier's record burned, storing a tombstone if there is
    /// none yet. Returns the burned record.
    fn mark_burned(&self, id: &str) -> SessionRecord;

    /// Replace a burned (or missing) record with `record`. A live record is
    /// left untouched and returned instead.
    fn reissue(&self, id: &str, record: SessionRecord) -> SessionRecord;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of records currently live
    fn live_count(&self) -> usize;
}

/// Process-lifetime store. Locks are per shard of the map, never global.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    records: DashMap<String, SessionRecord>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, id: &str) -> Option<SessionRecord> {
        self.records.get(id).map(|r| r.value().clone())
    }

    fn set_if_absent(&self, id: &str, record: SessionRecord) -> SessionRecord {
        self.records
            .entry(id.to_string())
            .or_insert(record)
            .value()
            .clone()
    }

    fn mark_burned(&self, id: &str) -> SessionRecord {
        let mut entry = self
            .records
            .entry(id.to_string())
            .or_insert_with(SessionRecord::tombstone);
        entry.burn();
        entry.value().clone()
    }

    fn reissue(&self, id: &str, record: SessionRecord) -> SessionRecord {
        match self.records.entry(id.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_burned() {
                    occupied.insert(record.clone());
                    record
                } else {
                    occupied.get().clone()
                }
            }
            Entry::Vacant(vacant) => vacant.insert(record).value().clone(),
        }
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn live_count(&self) -> usize {
        self.records.iter().filter(|r| !r.value().is_burned()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_if_absent_keeps_first() {
        let store = MemorySessionStore::new();
        let first = store.set_if_absent("c1", SessionRecord::active(Seed::from("aaa")));
        let second = store.set_if_absent("c1", SessionRecord::active(Seed::from("bbb")));
        assert_eq!(first, second);
        assert_eq!(second.seed, Some(Seed::from("aaa")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_mark_burned_existing() {
        let store = MemorySessionStore::new();
        store.set_if_absent("c1", SessionRecord::active(Seed::from("aaa")));
        let burned = store.mark_burned("c1");
        assert!(burned.is_burned());
        assert_eq!(burned.seed, Some(Seed::from("aaa")));
        assert!(burned.live_seed().is_none());
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_mark_burned_unseen_leaves_tombstone() {
        let store = MemorySessionStore::new();
        let burned = store.mark_burned("ghost");
        assert!(burned.is_burned());
        assert!(burned.seed.is_none());
        let after = store.set_if_absent("ghost", SessionRecord::active(Seed::from("x")));
        assert!(after.is_burned());
    }

    #[test]
    fn test_burn_time_is_sticky() {
        let store = MemorySessionStore::new();
        let first = store.mark_burned("c1");
        let second = store.mark_burned("c1");
        assert_eq!(first.burned_at, second.burned_at);
    }

    #[test]
    fn test_reissue_only_replaces_burned() {
        let store = MemorySessionStore::new();
        store.set_if_absent("c1", SessionRecord::active(Seed::from("old")));
        let kept = store.reissue("c1", SessionRecord::active(Seed::from("new")));
        assert_eq!(kept.seed, Some(Seed::from("old")));

        store.mark_burned("c1");
        let fresh = store.reissue("c1", SessionRecord::active(Seed::from("new")));
        assert_eq!(fresh.live_seed(), Some(&Seed::from("new")));
        assert_eq!(store.get("c1"), Some(fresh));
    }
}
