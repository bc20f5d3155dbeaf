use std::sync::Arc;

use parking_lot::Mutex;

use crate::InstrumentKey;

/// A lock dedicated to a single key.
pub type KeyLock = Arc<Mutex<()>>;

/// Hands out one lock per key, creating locks on demand.
///
/// Concurrent callers asking for the same key receive the same lock, and callers asking for
/// different keys never contend with one another.
///
/// Entries may be released once the resource they guard is fully initialized. Holders of a
/// released lock keep using it safely; later lookups for the same key simply receive a fresh lock.
#[derive(Default)]
pub struct LockTable {
    locks: scc::HashMap<InstrumentKey, KeyLock>,
}

impl LockTable {
    /// Creates an empty `LockTable`.
    pub fn new() -> Self {
        Self { locks: scc::HashMap::new() }
    }

    /// Gets the lock for `key`, creating it if it does not already exist.
    pub fn lock_for(&self, key: &InstrumentKey) -> KeyLock {
        if let Some(lock) = self.locks.read(key, |_, lock| Arc::clone(lock)) {
            return lock;
        }

        let entry = self.locks.entry(key.clone()).or_insert_with(|| Arc::new(Mutex::new(())));
        Arc::clone(entry.get())
    }

    /// Removes the entry for `key`.
    ///
    /// Safe to call while the lock for `key` is held.
    pub fn release(&self, key: &InstrumentKey) {
        let _ = self.locks.remove(key);
    }

    /// Removes the entry for `key` if no caller other than the current holder has fetched it.
    ///
    /// The caller must hold its own copy of the lock, so an idle entry has exactly two strong
    /// references: the table's and the caller's. `lock_for` clones under the same bucket lock this
    /// check runs under, so a concurrent fetch either completes first and keeps the entry alive, or
    /// runs afterwards and creates a fresh lock.
    ///
    /// Returns `true` if the entry was removed.
    pub fn release_idle(&self, key: &InstrumentKey) -> bool {
        self.locks.remove_if(key, |lock| Arc::strong_count(lock) <= 2).is_some()
    }

    /// Whether or not an entry exists for `key`.
    pub fn contains(&self, key: &InstrumentKey) -> bool {
        self.locks.contains(key)
    }

    /// Gets the number of live entries.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether or not the table is empty.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Barrier,
    };

    use super::LockTable;
    use crate::{InstrumentKey, InstrumentKind};

    fn key(name: &str) -> InstrumentKey {
        InstrumentKey::new(InstrumentKind::Counter, name)
    }

    #[test]
    fn test_same_key_same_lock() {
        let table = LockTable::new();
        let a = table.lock_for(&key("x"));
        let b = table.lock_for(&key("x"));
        let c = table.lock_for(&key("y"));

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_concurrent_callers_share_lock() {
        let table = LockTable::new();
        let barrier = Barrier::new(16);
        let first = table.lock_for(&key("shared"));

        std::thread::scope(|s| {
            for _ in 0..16 {
                s.spawn(|| {
                    barrier.wait();
                    let lock = table.lock_for(&key("shared"));
                    assert!(Arc::ptr_eq(&lock, &first));
                });
            }
        });
    }

    #[test]
    fn test_distinct_keys_do_not_block() {
        let table = LockTable::new();
        let held = table.lock_for(&key("held"));
        let _guard = held.lock();

        let other = table.lock_for(&key("other"));
        assert!(other.try_lock().is_some());
    }

    #[test]
    fn test_release_while_held() {
        let table = LockTable::new();
        let lock = table.lock_for(&key("x"));
        let guard = lock.lock();

        table.release(&key("x"));
        assert!(!table.contains(&key("x")));
        assert!(table.is_empty());

        // Later lookups get a fresh lock while the released one is still held.
        let fresh = table.lock_for(&key("x"));
        assert!(!Arc::ptr_eq(&lock, &fresh));
        assert!(fresh.try_lock().is_some());
        drop(guard);
    }

    #[test]
    fn test_release_idle() {
        let table = LockTable::new();
        let lock = table.lock_for(&key("x"));
        let other = table.lock_for(&key("x"));

        // Another caller still holds a copy.
        assert!(!table.release_idle(&key("x")));
        assert!(table.contains(&key("x")));

        drop(other);
        assert!(table.release_idle(&key("x")));
        assert!(!table.contains(&key("x")));
        drop(lock);

        // Missing entries are left alone.
        assert!(!table.release_idle(&key("y")));
    }

    #[test]
    fn test_release_idle_keeps_waited_on_lock() {
        let table = LockTable::new();
        let held = table.lock_for(&key("x"));
        let guard = held.lock();

        std::thread::scope(|s| {
            let waiter = s.spawn(|| {
                let lock = table.lock_for(&key("x"));
                let _guard = lock.lock();
            });

            while Arc::strong_count(&held) < 3 {
                std::thread::yield_now();
            }
            assert!(!table.release_idle(&key("x")));
            assert!(table.contains(&key("x")));

            drop(guard);
            waiter.join().unwrap();
        });

        assert!(table.release_idle(&key("x")));
        assert!(table.is_empty());
    }

    #[test]
    fn test_lock_serializes_holders() {
        let table = LockTable::new();
        let inside = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..100 {
                        let lock = table.lock_for(&key("x"));
                        let _guard = lock.lock();
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                });
            }
        });
    }
}
