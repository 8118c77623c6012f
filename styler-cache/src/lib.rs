//! The on-disk cache store: a directory of zero-byte files, each named by
//! the hex-encoded content hash produced by `styler_core::cache::cache_key`.
//! `record` is a file creation, `lookup` a file-exists test — the entry's
//! content is its name, so concurrent writers of the same hash never race
//! on content, only on an idempotent create.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use styler_core::cache::CacheStore;

/// A cache rooted at a directory on disk. The directory is created lazily,
/// on the first `insert`, so a read-only `lookup`-only job never creates it.
#[derive(Debug, Clone)]
pub struct DiskCache {
    root: PathBuf,
}

/// Failure to read or write the cache directory. Callers demote this to a
/// warning and proceed without caching, per `StyleError::CacheIo`.
#[derive(Debug)]
pub struct CacheIoError {
    pub message: String,
}

impl std::fmt::Display for CacheIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CacheIoError {}

impl DiskCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DiskCache { root: root.into() }
    }

    /// The cache root, respecting an explicit path and falling back to the
    /// `STYLER_CACHE_ROOT` environment variable.
    pub fn from_env_or(explicit: Option<PathBuf>) -> Option<Self> {
        explicit
            .or_else(|| std::env::var_os("STYLER_CACHE_ROOT").map(PathBuf::from))
            .map(DiskCache::new)
    }

    fn entry_path(&self, hash: &str) -> PathBuf {
        self.root.join(hash)
    }

    /// Remove every cache entry. Used by a `cache clear` style entry point;
    /// not wired into the engine itself.
    pub fn clear(&self) -> Result<(), CacheIoError> {
        if !self.root.exists() {
            return Ok(());
        }
        fs::remove_dir_all(&self.root).map_err(|e| CacheIoError {
            message: format!("cannot clear cache at {}: {}", self.root.display(), e),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CacheStore for DiskCache {
    fn contains(&self, hash: &str) -> bool {
        self.entry_path(hash).is_file()
    }

    fn insert(&mut self, hash: &str) {
        let _ = self.try_insert(hash);
    }
}

impl DiskCache {
    /// Fallible variant of [`CacheStore::insert`] for callers that want to
    /// surface `CacheIo` instead of silently dropping the write.
    pub fn try_insert(&mut self, hash: &str) -> Result<(), CacheIoError> {
        if let Err(e) = fs::create_dir_all(&self.root) {
            if e.kind() != io::ErrorKind::AlreadyExists {
                return Err(CacheIoError {
                    message: format!("cannot create cache dir {}: {}", self.root.display(), e),
                });
            }
        }
        match fs::File::create(self.entry_path(hash)) {
            Ok(_) => Ok(()),
            Err(e) => Err(CacheIoError {
                message: format!("cannot write cache entry {}: {}", hash, e),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_before_insert_hit_after() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DiskCache::new(dir.path());
        assert!(!cache.contains("abc123"));
        cache.insert("abc123");
        assert!(cache.contains("abc123"));
    }

    #[test]
    fn entries_are_zero_byte_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DiskCache::new(dir.path());
        cache.insert("deadbeef");
        let meta = fs::metadata(dir.path().join("deadbeef")).unwrap();
        assert_eq!(meta.len(), 0);
    }

    #[test]
    fn repeated_insert_of_same_hash_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DiskCache::new(dir.path());
        cache.insert("same");
        cache.insert("same");
        assert!(cache.contains("same"));
    }

    #[test]
    fn clear_removes_the_whole_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DiskCache::new(dir.path().join("styler"));
        cache.insert("x");
        assert!(cache.contains("x"));
        cache.clear().unwrap();
        assert!(!cache.contains("x"));
    }

    #[test]
    fn from_env_or_prefers_explicit_path() {
        let explicit = PathBuf::from("/tmp/explicit-cache");
        let cache = DiskCache::from_env_or(Some(explicit.clone())).unwrap();
        assert_eq!(cache.root(), explicit.as_path());
    }
}
