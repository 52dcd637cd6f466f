//! Composite-key grouping store.
//!
//! Maps `(spreadsheet id, dimension)` keys to accumulating batch payloads.
//! The store lives for a single incoming request: it is built during the
//! coalescing phase, enumerated once by the reconciler, and then discarded
//! with the response. It is never shared across requests.

use std::collections::HashMap;

use crate::types::{BatchPayload, CompositeKey};

/// Insertion-ordered mapping from [`CompositeKey`] to [`BatchPayload`].
///
/// Lookup is a single map keyed by the full composite key rather than a
/// nested two-level map; this keeps the uniqueness invariant visible in one
/// place and rules out partial matches on the identifier alone.
#[derive(Debug, Default)]
pub struct GroupingStore {
    index: HashMap<CompositeKey, usize>,
    entries: Vec<(CompositeKey, BatchPayload)>,
}

impl GroupingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-match lookup; no fallback on the first key component alone.
    pub fn get(&self, key: &CompositeKey) -> Option<&BatchPayload> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Inserts a payload under `key`, or wholesale-replaces the payload
    /// already stored there. Callers read-modify-write: fetch, mutate a
    /// copy, re-store.
    ///
    /// Replacing keeps the key's original first-seen position.
    pub fn insert(&mut self, key: CompositeKey, payload: BatchPayload) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = payload,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, payload));
            }
        }
    }

    /// Payloads in first-seen key order.
    ///
    /// Enumeration drives exactly one upstream call per distinct group.
    pub fn all_values(&self) -> impl Iterator<Item = &BatchPayload> {
        self.entries.iter().map(|(_, payload)| payload)
    }

    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
