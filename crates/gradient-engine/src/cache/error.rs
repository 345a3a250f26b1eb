use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Failure of the backing store. Always fatal for the request at hand.
#[derive(Debug)]
pub enum StorageError {
    /// The cache directory could not be created or listed.
    Directory { path: PathBuf, source: io::Error },
    /// An entry could not be read, written or published.
    Entry { key: String, path: PathBuf, source: io::Error },
}

impl StorageError {
    pub(crate) fn directory(path: &Path, source: io::Error) -> Self {
        Self::Directory { path: path.to_path_buf(), source }
    }

    pub(crate) fn entry(key: &str, path: &Path, source: io::Error) -> Self {
        Self::Entry { key: key.to_owned(), path: path.to_path_buf(), source }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory { path, source } => {
                write!(f, "cache directory {} unusable: {source}", path.display())
            }
            Self::Entry { key, path, source } => {
                write!(f, "cache entry {key} ({}) failed: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Directory { source, .. } | Self::Entry { source, .. } => Some(source),
        }
    }
}
