use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use filetime::FileTime;

use super::{EntryMeta, EntryStore, StorageError, StoredEntry};

const TEMP_PREFIX: &str = ".tmp-";

/// Temp files untouched for this long belong to a writer that died.
const STALE_TEMP_AGE: Duration = Duration::from_secs(5 * 60);

/// Directory-backed store: one `<key>.<extension>` file per entry.
///
/// - last access = file atime, set explicitly on every read and write so
///   `noatime`/`relatime` mounts still order entries correctly
/// - last modification = file mtime
///
/// Writes go to a unique hidden temp file in the same directory and are
/// renamed into place. Listing skips anything that is not a finished entry;
/// temp files orphaned by a crash are removed by [`EntryStore::purge_stale`].
#[derive(Debug, Clone)]
pub struct FsStore {
    dir: PathBuf,
    suffix: String,
}

impl FsStore {
    /// Opens `dir`, creating it if needed. Entries are named
    /// `<key>.<extension>`; `extension` is given without the dot.
    pub fn open(dir: impl Into<PathBuf>, extension: &str) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StorageError::directory(&dir, e))?;
        Ok(Self { dir, suffix: format!(".{extension}") })
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}{}", self.suffix))
    }

    /// Entry key for a directory entry name, if it is a finished entry.
    fn key_from_file_name<'a>(&self, name: &'a str) -> Option<&'a str> {
        if name.starts_with('.') {
            return None;
        }
        name.strip_suffix(self.suffix.as_str()).filter(|k| !k.is_empty())
    }

    fn meta_for(key: &str, meta: &fs::Metadata) -> EntryMeta {
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        EntryMeta {
            key: key.to_owned(),
            size: meta.len(),
            accessed: meta.accessed().unwrap_or(modified),
            modified,
        }
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut tmp = tempfile::Builder::new().prefix(TEMP_PREFIX).tempfile_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl EntryStore for FsStore {
    fn list_entries(&self) -> Result<Vec<EntryMeta>, StorageError> {
        let dir = fs::read_dir(&self.dir).map_err(|e| StorageError::directory(&self.dir, e))?;

        let mut entries = Vec::new();
        for item in dir {
            let item = item.map_err(|e| StorageError::directory(&self.dir, e))?;
            let name = item.file_name();
            let Some(key) = name.to_str().and_then(|n| self.key_from_file_name(n)) else {
                continue;
            };
            // Removed by someone else since read_dir; skip it.
            let Ok(meta) = item.metadata() else {
                continue;
            };
            if meta.is_file() {
                entries.push(Self::meta_for(key, &meta));
            }
        }
        Ok(entries)
    }

    fn stat(&self, key: &str) -> Result<Option<EntryMeta>, StorageError> {
        let path = self.entry_path(key);
        match fs::metadata(&path) {
            Ok(meta) => Ok(Some(Self::meta_for(key, &meta))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::entry(key, &path, e)),
        }
    }

    fn get(&self, key: &str) -> Result<Option<StoredEntry>, StorageError> {
        let path = self.entry_path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::entry(key, &path, e)),
        };

        let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(t) => t,
            // Evicted between read and stat; the bytes are still good.
            Err(_) => SystemTime::now(),
        };

        if let Err(e) = filetime::set_file_atime(&path, FileTime::now()) {
            log::debug!("could not touch {}: {e}", path.display());
        }

        Ok(Some(StoredEntry { bytes, modified }))
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<EntryMeta, StorageError> {
        let path = self.entry_path(key);
        self.write_atomic(&path, bytes)
            .map_err(|e| StorageError::entry(key, &path, e))?;

        let now = FileTime::now();
        if let Err(e) = filetime::set_file_times(&path, now, now) {
            log::debug!("could not set times on {}: {e}", path.display());
        }

        let meta = fs::metadata(&path).map_err(|e| StorageError::entry(key, &path, e))?;
        Ok(Self::meta_for(key, &meta))
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::entry(key, &path, e)),
        }
    }

    fn purge_stale(&self) -> usize {
        let Ok(dir) = fs::read_dir(&self.dir) else {
            return 0;
        };
        let now = SystemTime::now();

        let mut removed = 0;
        for item in dir.flatten() {
            let name = item.file_name();
            if !name.to_str().is_some_and(|n| n.starts_with(TEMP_PREFIX)) {
                continue;
            }
            let Ok(modified) = item.metadata().and_then(|m| m.modified()) else {
                continue;
            };
            // Clock skew reads as "fresh".
            let age = now.duration_since(modified).unwrap_or_default();
            if age < STALE_TEMP_AGE {
                continue;
            }
            match fs::remove_file(item.path()) {
                Ok(()) => removed += 1,
                Err(e) => log::debug!("removing stale {} failed: {e}", item.path().display()),
            }
        }
        if removed > 0 {
            log::debug!("removed {removed} stale temp files from {}", self.dir.display());
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn open() -> (tempfile::TempDir, FsStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsStore::open(tmp.path().join("cache"), "png").unwrap();
        (tmp, store)
    }

    #[test]
    fn put_get_roundtrip() {
        let (_tmp, store) = open();
        let meta = store.put("k1", b"hello").unwrap();
        assert_eq!(meta.key, "k1");
        assert_eq!(meta.size, 5);

        let got = store.get("k1").unwrap().unwrap();
        assert_eq!(got.bytes, b"hello");
        assert_eq!(got.modified, meta.modified);
    }

    #[test]
    fn missing_entries() {
        let (_tmp, store) = open();
        assert!(store.get("nope").unwrap().is_none());
        assert!(store.stat("nope").unwrap().is_none());
        store.delete("nope").unwrap();
    }

    #[test]
    fn put_replaces() {
        let (_tmp, store) = open();
        store.put("k", b"one").unwrap();
        store.put("k", b"three").unwrap();
        assert_eq!(store.get("k").unwrap().unwrap().bytes, b"three");
        assert_eq!(store.list_entries().unwrap().len(), 1);
    }

    #[test]
    fn listing_skips_foreign_and_temp_files() {
        let (_tmp, store) = open();
        store.put("a", b"aa").unwrap();
        store.put("b", b"bbb").unwrap();
        fs::write(store.dir().join(".tmp-xyz"), b"partial").unwrap();
        fs::write(store.dir().join("notes.txt"), b"x").unwrap();
        fs::create_dir(store.dir().join("sub.png")).unwrap();

        let mut keys: Vec<_> = store.list_entries().unwrap().into_iter().map(|e| (e.key, e.size)).collect();
        keys.sort();
        assert_eq!(keys, vec![("a".to_owned(), 2), ("b".to_owned(), 3)]);
    }

    #[test]
    fn entries_use_the_given_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsStore::open(tmp.path(), "webp").unwrap();
        store.put("k", b"x").unwrap();
        fs::write(tmp.path().join("other.png"), b"y").unwrap();

        assert!(tmp.path().join("k.webp").is_file());
        let keys: Vec<_> = store.list_entries().unwrap().into_iter().map(|e| e.key).collect();
        assert_eq!(keys, ["k"]);
    }

    // ── stale temp files ──────────────────────────────────────────────────

    #[test]
    fn purge_removes_only_old_temp_files() {
        let (_tmp, store) = open();
        store.put("k", b"x").unwrap();
        let old = store.dir().join(".tmp-crashed");
        let fresh = store.dir().join(".tmp-writing");
        fs::write(&old, b"partial").unwrap();
        fs::write(&fresh, b"partial").unwrap();
        filetime::set_file_mtime(&old, FileTime::from_unix_time(1_000_000, 0)).unwrap();

        assert_eq!(store.purge_stale(), 1);
        assert!(!old.exists());
        assert!(fresh.exists());
        assert!(store.entry_path("k").exists());
    }

    #[test]
    fn get_updates_access_time_only() {
        let (_tmp, store) = open();
        store.put("k", b"x").unwrap();

        let old = FileTime::from_unix_time(1_000_000, 0);
        filetime::set_file_times(store.entry_path("k"), old, old).unwrap();

        store.get("k").unwrap().unwrap();
        let meta = store.stat("k").unwrap().unwrap();
        let old_time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        assert!(meta.accessed > old_time);
        assert_eq!(meta.modified, old_time);
    }

    #[test]
    fn delete_removes_file() {
        let (_tmp, store) = open();
        store.put("k", b"x").unwrap();
        store.delete("k").unwrap();
        assert!(!store.entry_path("k").exists());
    }

    #[test]
    fn open_fails_when_path_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("occupied");
        fs::write(&file, b"x").unwrap();

        let err = FsStore::open(&file, "png").unwrap_err();
        assert!(matches!(err, StorageError::Directory { .. }));
    }
}
