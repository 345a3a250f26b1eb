//! Size-bounded, recency-ordered cache of rendered images.
//!
//! Persistence is abstracted behind [`EntryStore`]; [`FsStore`] keeps one file
//! per entry in a shared directory, [`MemoryStore`] keeps everything in
//! process. [`CacheStore`] adds the policy: lookups refresh recency, every
//! store is followed by an eviction sweep against the byte budget.
//!
//! The sweep keeps the longest prefix of most-recently-accessed entries whose
//! summed size fits the budget and deletes everything else, including a
//! just-written entry that does not fit. It is not a strict LRU that always
//! protects the newest write.

mod error;
mod fs;
mod key;
mod memory;
mod store;

pub use error::StorageError;
pub use fs::FsStore;
pub use key::CacheKey;
pub use memory::MemoryStore;
pub use store::{EntryMeta, EntryStore, StoredEntry};

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

/// Cached image bytes and when they were last written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedImage {
    pub bytes: Vec<u8>,
    pub modified: SystemTime,
}

/// Outcome of one eviction sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvictionReport {
    pub kept: usize,
    pub kept_bytes: u64,
    /// Keys removed by this sweep, oldest access last.
    pub evicted: Vec<String>,
    pub freed_bytes: u64,
}

/// Counter snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Hit rate as a fraction in `[0.0, 1.0]`.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 { 0.0 } else { self.hits as f64 / total as f64 }
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    evictions: AtomicU64,
}

/// Evicting cache over an [`EntryStore`].
///
/// No lock is held across operations: the backing store may be shared with
/// other processes, and the sweep tolerates entries changing underneath it.
#[derive(Debug)]
pub struct CacheStore<S> {
    store: S,
    budget_bytes: u64,
    counters: Counters,
}

impl<S: EntryStore> CacheStore<S> {
    pub fn new(store: S, budget_bytes: u64) -> Self {
        Self { store, budget_bytes, counters: Counters::default() }
    }

    #[inline]
    pub fn budget_bytes(&self) -> u64 {
        self.budget_bytes
    }

    #[inline]
    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Reads an entry; a hit refreshes its access time.
    pub fn lookup(&self, key: &str) -> Result<Option<CachedImage>, StorageError> {
        let found = self.store.get(key)?;
        let counter = if found.is_some() { &self.counters.hits } else { &self.counters.misses };
        counter.fetch_add(1, Ordering::Relaxed);

        log::debug!("cache {} for {key}", if found.is_some() { "hit" } else { "miss" });
        Ok(found.map(|e| CachedImage { bytes: e.bytes, modified: e.modified }))
    }

    /// Modification time of an entry, without reading it or touching it.
    pub fn last_modified(&self, key: &str) -> Result<Option<SystemTime>, StorageError> {
        Ok(self.store.stat(key)?.map(|m| m.modified))
    }

    /// Writes an entry, then sweeps.
    ///
    /// The returned image carries the given bytes even if the sweep removed
    /// the entry again.
    pub fn store(&self, key: &str, bytes: Vec<u8>) -> Result<CachedImage, StorageError> {
        let meta = self.store.put(key, &bytes)?;
        self.counters.stores.fetch_add(1, Ordering::Relaxed);
        log::debug!("cached {key} ({} bytes)", meta.size);

        self.evict()?;
        Ok(CachedImage { bytes, modified: meta.modified })
    }

    /// Deletes entries beyond the budget, least recently accessed first.
    ///
    /// Only listing failures are errors; a failed delete (e.g. another
    /// process got there first) is logged and skipped.
    pub fn evict(&self) -> Result<EvictionReport, StorageError> {
        self.store.purge_stale();
        let mut entries = self.store.list_entries()?;
        // Most recent first; key order breaks ties so sweeps are deterministic.
        entries.sort_by(|a, b| b.accessed.cmp(&a.accessed).then_with(|| a.key.cmp(&b.key)));

        let mut report = EvictionReport::default();
        let mut total = 0u64;
        let mut over = false;

        for entry in entries {
            if !over {
                total = total.saturating_add(entry.size);
                over = total > self.budget_bytes;
            }
            if !over {
                report.kept += 1;
                report.kept_bytes = total;
                continue;
            }

            if let Err(e) = self.store.delete(&entry.key) {
                log::debug!("evicting {} failed, skipping: {e}", entry.key);
                continue;
            }
            report.freed_bytes += entry.size;
            report.evicted.push(entry.key);
        }

        if !report.evicted.is_empty() {
            self.counters.evictions.fetch_add(report.evicted.len() as u64, Ordering::Relaxed);
            log::info!(
                "evicted {} entries ({} bytes); {} entries / {} bytes remain of {} budget",
                report.evicted.len(),
                report.freed_bytes,
                report.kept,
                report.kept_bytes,
                self.budget_bytes,
            );
        }
        Ok(report)
    }

    /// Deletes every entry. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, StorageError> {
        self.store.purge_stale();
        let mut removed = 0;
        for entry in self.store.list_entries()? {
            if self.store.delete(&entry.key).is_ok() {
                removed += 1;
            }
        }
        log::info!("cleared {removed} cache entries");
        Ok(removed)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            stores: self.counters.stores.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }
}
