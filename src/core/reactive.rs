//! Revision counters and memoized derivations.
//!
//! Every piece of mutable input carries a [`Revision`] that is bumped on each
//! write. Derived values are stored in a [`Memo`] together with the revisions
//! of the inputs they were computed from; a read with different revisions
//! recomputes before returning, so a derived value never lags an input write.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

#[derive(Debug, Default)]
pub struct Revision(AtomicU64);

impl Revision {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Marks the owning input as changed and returns the new revision.
    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

struct MemoEntry<V> {
    deps: Vec<u64>,
    value: V,
}

/// Cache of derived values keyed by `K`, each tagged with the dependency
/// revisions it was computed at.
pub struct Memo<K, V> {
    name: &'static str,
    slots: Mutex<HashMap<K, MemoEntry<V>>>,
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key` if it was computed at `deps`,
    /// otherwise runs `compute` and stores the result.
    ///
    /// The lock is not held while computing, so `compute` may read other memos.
    pub fn get_or_compute(&self, key: K, deps: &[u64], compute: impl FnOnce() -> V) -> V {
        {
            let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = slots.get(&key) {
                if entry.deps == deps {
                    debug!(memo = self.name, ?key, "Memo HIT");
                    return entry.value.clone();
                }
            }
        }

        debug!(memo = self.name, ?key, ?deps, "Memo recompute");
        let value = compute();
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // Entries computed at older revisions can never be hit again
        slots.retain(|_, entry| entry.deps == deps);
        slots.insert(
            key,
            MemoEntry {
                deps: deps.to_vec(),
                value: value.clone(),
            },
        );
        value
    }
}
