use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::foundation::error::{WdgtError, WdgtResult};
use crate::foundation::math::Fnv1a64;

/// Key-value store for raw widget definition bytes, keyed by resolved id.
///
/// The cache is advisory: the pipeline treats read failures as misses and logs write failures.
pub trait CacheStore: Send + Sync {
    /// Bytes stored for `id`, if any.
    fn get(&self, id: &str) -> WdgtResult<Option<Vec<u8>>>;
    /// Insert or replace the bytes for `id`.
    fn put(&self, id: &str, bytes: &[u8]) -> WdgtResult<()>;
    /// Remove `id`; removing a missing id is not an error.
    fn delete(&self, id: &str) -> WdgtResult<()>;
}

/// In-process cache store.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    rows: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCacheStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of cached rows.
    pub fn len(&self) -> usize {
        self.rows().len()
    }

    /// `true` when no rows are cached.
    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Cached ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.rows().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, id: &str) -> WdgtResult<Option<Vec<u8>>> {
        Ok(self.rows().get(id).cloned())
    }

    fn put(&self, id: &str, bytes: &[u8]) -> WdgtResult<()> {
        self.rows().insert(id.to_owned(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, id: &str) -> WdgtResult<()> {
        self.rows().remove(id);
        Ok(())
    }
}

/// One file per id under a root directory.
///
/// File names are the FNV-1a 64 hash of the id; writes land in a temp file that is then renamed
/// over the target.
#[derive(Debug, Clone)]
pub struct FsCacheStore {
    root: PathBuf,
}

impl FsCacheStore {
    /// Store rooted at `root` (created lazily on first write).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file that holds `id`.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{:016x}.json", id_hash(id)))
    }
}

fn id_hash(id: &str) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(id.as_bytes());
    h.finish()
}

fn storage_err(op: &str, path: &Path, e: std::io::Error) -> WdgtError {
    WdgtError::storage(format!("{op} {}: {e}", path.display()))
}

impl CacheStore for FsCacheStore {
    fn get(&self, id: &str) -> WdgtResult<Option<Vec<u8>>> {
        let path = self.path_for(id);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_err("read", &path, e)),
        }
    }

    fn put(&self, id: &str, bytes: &[u8]) -> WdgtResult<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| storage_err("create", &self.root, e))?;
        let path = self.path_for(id);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes).map_err(|e| storage_err("write", &tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| storage_err("rename", &tmp, e))?;
        Ok(())
    }

    fn delete(&self, id: &str) -> WdgtResult<()> {
        let path = self.path_for(id);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_err("remove", &path, e)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/cache.rs"]
mod tests;
