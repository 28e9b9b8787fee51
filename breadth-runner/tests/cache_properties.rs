//! Property tests for TTL cache expiry.

use breadth_runner::TtlCache;
use proptest::prelude::*;
use std::cell::Cell;
use std::time::{Duration, Instant};

proptest! {
    /// A value is recomputed exactly when the elapsed time reaches the TTL.
    #[test]
    fn recompute_iff_expired(ttl_secs in 1u64..1_000, elapsed in 0u64..2_000) {
        let cache = TtlCache::new(Duration::from_secs(ttl_secs));
        let calls = Cell::new(0);
        let t0 = Instant::now();
        let compute = || {
            calls.set(calls.get() + 1);
            calls.get()
        };
        cache.get_or_compute_at(&"k", t0, compute);
        let v = cache.get_or_compute_at(&"k", t0 + Duration::from_secs(elapsed), compute);
        let expected = if elapsed >= ttl_secs { 2 } else { 1 };
        prop_assert_eq!(v, expected);
        prop_assert_eq!(calls.get(), expected);
    }

    /// Invalidating one key leaves the others cached.
    #[test]
    fn invalidate_is_per_key(keys in proptest::collection::hash_set(0u32..100, 2..10)) {
        let cache = TtlCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        for k in &keys {
            cache.get_or_compute_at(k, t0, || *k);
        }
        let victim = *keys.iter().next().unwrap();
        cache.invalidate(&victim);
        for k in &keys {
            let expected = if *k == victim { None } else { Some(*k) };
            prop_assert_eq!(cache.peek_at(k, t0), expected);
        }
    }
}
