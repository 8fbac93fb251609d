//! Per-key serialization of concurrent loads.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use transcache_cache::CacheKey;

/// Table of per-key locks.
///
/// Loads of the same key run one at a time, so the second one finds the
/// first one's result in the memory tier instead of transforming again.
/// Different keys only share the brief shard lock used to fetch a handle.
#[derive(Default)]
pub(crate) struct KeyLocks {
    locks: DashMap<CacheKey, Arc<Mutex<()>>>,
}

impl KeyLocks {
    /// Runs `f` while holding the lock for `key`.
    pub(crate) fn run<R>(&self, key: &CacheKey, f: impl FnOnce() -> R) -> R {
        let lock = self.locks.entry(key.clone()).or_default().clone();

        let result = {
            let _guard = lock.lock();
            f()
        };

        // Handles are only cloned under the shard lock, so a count of 1 means nobody is waiting.
        drop(lock);
        self.locks
            .remove_if(key, |_, remaining| Arc::strong_count(remaining) == 1);

        result
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_run_returns_value_and_cleans_up() {
        let locks = KeyLocks::default();
        let key = CacheKey::new("/app/a.js", None);

        assert_eq!(locks.run(&key, || 42), 42);
        assert_eq!(locks.len(), 0);
    }

    #[test]
    fn test_same_key_is_serialized() {
        let locks = KeyLocks::default();
        let key = CacheKey::new("/app/a.js", Some("ios"));
        let active = AtomicUsize::new(0);
        let max_active = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    locks.run(&key, || {
                        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                        max_active.fetch_max(now, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(5));
                        active.fetch_sub(1, Ordering::SeqCst);
                    });
                });
            }
        });

        assert_eq!(max_active.load(Ordering::SeqCst), 1);
        assert_eq!(locks.len(), 0);
    }
}
