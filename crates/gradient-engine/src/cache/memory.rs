use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use super::{EntryMeta, EntryStore, StorageError, StoredEntry};

#[derive(Debug)]
struct Slot {
    bytes: Vec<u8>,
    accessed: SystemTime,
    modified: SystemTime,
}

#[derive(Debug, Default)]
struct Inner {
    slots: HashMap<String, Slot>,
    last_tick: Option<SystemTime>,
}

impl Inner {
    /// Wall clock, bumped so no two events share a timestamp.
    fn tick(&mut self) -> SystemTime {
        let now = SystemTime::now();
        let t = match self.last_tick {
            Some(last) if now <= last => last + Duration::from_nanos(1),
            _ => now,
        };
        self.last_tick = Some(t);
        t
    }
}

/// In-process store. Never fails.
///
/// Timestamps are strictly increasing across all operations, so recency
/// order is total even when calls land within the clock's resolution.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic mid-operation leaves the map consistent; keep serving.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn meta(key: &str, slot: &Slot) -> EntryMeta {
        EntryMeta {
            key: key.to_owned(),
            size: slot.bytes.len() as u64,
            accessed: slot.accessed,
            modified: slot.modified,
        }
    }
}

impl EntryStore for MemoryStore {
    fn list_entries(&self) -> Result<Vec<EntryMeta>, StorageError> {
        let inner = self.lock();
        Ok(inner.slots.iter().map(|(k, s)| Self::meta(k, s)).collect())
    }

    fn stat(&self, key: &str) -> Result<Option<EntryMeta>, StorageError> {
        Ok(self.lock().slots.get(key).map(|s| Self::meta(key, s)))
    }

    fn get(&self, key: &str) -> Result<Option<StoredEntry>, StorageError> {
        let mut inner = self.lock();
        if !inner.slots.contains_key(key) {
            return Ok(None);
        }
        let now = inner.tick();
        Ok(inner.slots.get_mut(key).map(|slot| {
            slot.accessed = now;
            StoredEntry { bytes: slot.bytes.clone(), modified: slot.modified }
        }))
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<EntryMeta, StorageError> {
        let mut inner = self.lock();
        let now = inner.tick();
        let slot = Slot { bytes: bytes.to_vec(), accessed: now, modified: now };
        let meta = Self::meta(key, &slot);
        inner.slots.insert(key.to_owned(), slot);
        Ok(meta)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.lock().slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_strictly_increase() {
        let store = MemoryStore::new();
        let a = store.put("a", b"1").unwrap();
        let b = store.put("b", b"2").unwrap();
        assert!(b.accessed > a.accessed);

        store.get("a").unwrap();
        let a2 = store.stat("a").unwrap().unwrap();
        assert!(a2.accessed > b.accessed);
        assert_eq!(a2.modified, a.modified);
    }

    #[test]
    fn crud() {
        let store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());
        store.put("k", b"abc").unwrap();
        assert_eq!(store.get("k").unwrap().unwrap().bytes, b"abc");
        assert_eq!(store.list_entries().unwrap().len(), 1);
        store.delete("k").unwrap();
        store.delete("k").unwrap();
        assert!(store.stat("k").unwrap().is_none());
    }
}
