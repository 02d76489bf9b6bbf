//! In-memory utility store repository for testing.
//!
//! This adapter keeps encoded snapshots in a shared map, so tests can
//! exercise save/load flows without touching the file system.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::UtilityRepository, q_learning::SavedUtilityStore};

/// In-memory repository.
///
/// Clones share the same underlying storage.
///
/// # Examples
///
/// ```
/// use flappy_td::adapters::InMemoryRepository;
/// use flappy_td::ports::UtilityRepository;
/// use flappy_td::q_learning::{SavedUtilityStore, TrainingMetadata, UtilityStore};
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let snapshot = SavedUtilityStore::from_store(&UtilityStore::new(), TrainingMetadata::default());
///
/// repo.save(&snapshot, Path::new("table"))?;
/// let loaded = repo.load(Path::new("table"))?;
/// assert_eq!(loaded, snapshot);
/// # Ok::<(), flappy_td::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots currently stored.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.lock().contains_key(&Self::key(path))
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UtilityRepository for InMemoryRepository {
    fn save(&self, snapshot: &SavedUtilityStore, path: &Path) -> Result<()> {
        let bytes = snapshot.to_bytes()?;
        self.lock().insert(Self::key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedUtilityStore> {
        let key = Self::key(path);
        let storage = self.lock();
        let bytes = storage.get(&key).ok_or(Error::NotFound { key: key.clone() })?;
        SavedUtilityStore::from_bytes(bytes)
    }
}
