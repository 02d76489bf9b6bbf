//! Repository port for utility store persistence.
//!
//! The learned table lives in memory for the lifetime of a run. Saving and
//! loading it is opt-in and goes through this trait so the storage format
//! stays out of the learning code.

use std::path::Path;

use crate::{Result, q_learning::SavedUtilityStore};

/// Port for persisting and loading utility store snapshots.
///
/// # Examples
///
/// ```no_run
/// use flappy_td::ports::UtilityRepository;
/// use flappy_td::q_learning::{SavedUtilityStore, TrainingMetadata, UtilityStore};
/// use std::path::Path;
///
/// fn checkpoint<R: UtilityRepository>(
///     repo: &R,
///     store: &UtilityStore,
///     path: &Path,
/// ) -> flappy_td::Result<()> {
///     repo.save(&SavedUtilityStore::from_store(store, TrainingMetadata::default()), path)
/// }
/// ```
pub trait UtilityRepository {
    /// Save a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be written or encoding fails.
    fn save(&self, snapshot: &SavedUtilityStore, path: &Path) -> Result<()>;

    /// Load a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Nothing is stored at `path`
    /// - The stored bytes are not a valid snapshot
    fn load(&self, path: &Path) -> Result<SavedUtilityStore>;
}
