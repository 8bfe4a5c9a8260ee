//! Id-keyed reconciliation map
//!
//! One entry per id. An incoming value replaces the stored one unless its
//! version is strictly older, so merging is idempotent and, for distinct
//! versions, independent of arrival order.

use std::collections::HashMap;

use crate::domain::Entity;

/// Stored value plus the order in which its id was first seen
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T> {
    pub value: T,
    pub seq: u64,
}

/// Result of merging one value
#[derive(Debug, Clone, PartialEq)]
pub enum Merge<T> {
    /// The id was new
    Inserted,
    /// The stored value was replaced (equal versions: incoming wins)
    Replaced,
    /// The incoming value was older than the stored one and was dropped
    Discarded { incoming: T, stored: T },
}

#[derive(Debug, Clone)]
pub struct ReconcileMap<T: Entity> {
    entries: HashMap<T::Id, Entry<T>>,
    next_seq: u64,
}

impl<T: Entity> Default for ReconcileMap<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T: Entity> ReconcileMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, incoming: T) -> Merge<T> {
        match self.entries.get_mut(incoming.id()) {
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.entries.insert(
                    incoming.id().clone(),
                    Entry {
                        value: incoming,
                        seq,
                    },
                );
                Merge::Inserted
            }
            Some(entry) if incoming.version() >= entry.value.version() => {
                entry.value = incoming;
                Merge::Replaced
            }
            Some(entry) => Merge::Discarded {
                incoming,
                stored: entry.value.clone(),
            },
        }
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.entries.get(id).map(|entry| &entry.value)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry<T>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
