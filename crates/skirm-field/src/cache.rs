//! Per-turn memoization of shared field computations.
//!
//! Many agents of the same class want the same target or cost field on
//! the same turn. Building those fields is the expensive part of a
//! decision pass, so the first agent to ask pays and everyone after it
//! reuses the stored copy. The whole store is dropped once per turn,
//! before any agent decides.

use crate::field::Field;
use indexmap::IndexMap;
use skirm_core::AgentClass;

/// What a cached field is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    /// Attractiveness — where the agent wants to be.
    Target,
    /// Traversal difficulty — what standing on a cell costs.
    Cost,
}

/// Cache key: every axis of variation the cached field depends on.
///
/// A field that secretly depends on finer per-agent state than this key
/// expresses is a correctness bug, not a performance one — two agents
/// with different hidden state would wrongly share one field. `damaged`
/// is the only per-agent flag allowed to influence a cached field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Target or cost.
    pub kind: FieldKind,
    /// The requesting agent's class.
    pub class: AgentClass,
    /// The coarse "damaged" variant flag.
    pub damaged: bool,
}

/// The per-turn field store.
///
/// Backed by an [`IndexMap`] so iteration (and therefore any debugging
/// dump) follows insertion order deterministically.
///
/// # Staleness window
///
/// The cache is cleared once per *turn*, not once per decision pass.
/// Agents acting mid-turn can invalidate what a cached field was built
/// from (an enemy dies, a tile frees up) and later agents in the same
/// turn still see the original field. That window is intentional and
/// preserved — per-pass clearing would trade determinism of cost for
/// marginal accuracy.
#[derive(Debug, Default)]
pub struct FieldCache {
    entries: IndexMap<CacheKey, Field>,
    hits: u64,
    misses: u64,
}

impl FieldCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the field for `key`, computing and storing it on first
    /// request. `compute` runs at most once per key per turn.
    pub fn get_or_compute(&mut self, key: CacheKey, compute: impl FnOnce() -> Field) -> &Field {
        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            self.entries.insert(key, compute());
        }
        &self.entries[&key]
    }

    /// Drop every entry. Called exactly once per turn, before any
    /// agent's decision pass.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lifetime count of lookups served from the store.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lifetime count of lookups that ran the compute closure.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}
