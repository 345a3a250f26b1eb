use std::time::SystemTime;

use super::StorageError;

/// Metadata of one stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMeta {
    pub key: String,
    pub size: u64,
    /// Last read or write.
    pub accessed: SystemTime,
    /// Last write.
    pub modified: SystemTime,
}

/// Entry bytes plus their modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub bytes: Vec<u8>,
    pub modified: SystemTime,
}

/// Key-value persistence behind the cache.
///
/// Implementations must tolerate concurrent mutation by other processes:
/// entries may vanish between `list_entries` and `delete`, and `put` must
/// publish atomically so readers never see a partial value.
pub trait EntryStore {
    /// Every entry with its metadata, in no particular order.
    fn list_entries(&self) -> Result<Vec<EntryMeta>, StorageError>;

    /// Metadata only. Does not count as an access.
    fn stat(&self, key: &str) -> Result<Option<EntryMeta>, StorageError>;

    /// Reads an entry and marks it accessed now.
    fn get(&self, key: &str) -> Result<Option<StoredEntry>, StorageError>;

    /// Writes (or replaces) an entry; access and modification time become now.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<EntryMeta, StorageError>;

    /// Removes an entry. Removing a missing entry is not an error.
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Removes leftovers of interrupted writes. Best effort; returns how many
    /// were removed.
    fn purge_stale(&self) -> usize {
        0
    }
}
