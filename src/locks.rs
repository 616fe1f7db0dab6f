use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Per-repository deploy locks keyed by target directory.
///
/// Holding the lock for a path serializes deploys into that directory while
/// leaving deploys for other repositories free to proceed. Locks are created
/// on first use and kept for the life of the process; the map only grows to
/// the number of distinct repositories seen.
#[derive(Debug, Default)]
pub struct RepoLocks {
    inner: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl RepoLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock guarding the given directory, creating it if this is
    /// the first deploy for that path.
    pub fn lock_for(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().unwrap();
        map.entry(path.to_path_buf()).or_default().clone()
    }
}
