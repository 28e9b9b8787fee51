//! In-memory TTL cache with single-flight recomputation.
//!
//! Each key owns a slot guarded by its own mutex. A caller that finds the slot
//! empty or expired computes the value while holding the slot lock, so
//! concurrent callers for the same key wait for that one computation instead
//! of starting their own. Different keys never block each other.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

type Slot<V> = Arc<Mutex<Option<(V, Instant)>>>;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct TtlCache<K, V> {
    ttl: Duration,
    slots: Mutex<HashMap<K, Slot<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn slot(&self, key: &K) -> Slot<V> {
        let mut slots = lock(&self.slots);
        slots.entry(key.clone()).or_default().clone()
    }

    /// Cached value for `key`, computing it with `compute` when missing or
    /// older than the TTL.
    pub fn get_or_compute(&self, key: &K, compute: impl FnOnce() -> V) -> V {
        self.get_or_compute_at(key, Instant::now(), compute)
    }

    /// Same as [`get_or_compute`](Self::get_or_compute) with an explicit clock.
    pub fn get_or_compute_at(&self, key: &K, now: Instant, compute: impl FnOnce() -> V) -> V {
        let slot = self.slot(key);
        let mut entry = lock(&slot);
        if let Some((value, stored_at)) = entry.as_ref() {
            if now.saturating_duration_since(*stored_at) < self.ttl {
                return value.clone();
            }
        }
        let value = compute();
        *entry = Some((value.clone(), now));
        value
    }

    /// Fresh cached value without computing.
    pub fn peek_at(&self, key: &K, now: Instant) -> Option<V> {
        let slot = lock(&self.slots).get(key).cloned()?;
        let entry = lock(&slot);
        entry
            .as_ref()
            .filter(|(_, stored_at)| now.saturating_duration_since(*stored_at) < self.ttl)
            .map(|(v, _)| v.clone())
    }

    pub fn invalidate(&self, key: &K) {
        lock(&self.slots).remove(key);
    }

    /// Drop every entry. Computations already running finish into detached
    /// slots and are not observed by later callers.
    pub fn invalidate_all(&self) {
        lock(&self.slots).clear();
    }

    pub fn len(&self) -> usize {
        lock(&self.slots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
