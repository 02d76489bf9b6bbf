//! Versioned snapshots of a utility store.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::utility_store::{EntryKey, StateActionEntry, UtilityStore},
    state::GameState,
    types::Action,
};

/// Run parameters recorded alongside a saved table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub episodes: usize,
    pub best_score: u32,
    pub discount: f64,
    pub decision_cadence: u32,
    pub bucket_px: f64,
}

/// Flat record for one (state, action) entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedEntry {
    pub bird_y: i32,
    pub gap_center: i32,
    pub pipe_distance: i32,
    pub action: Action,
    pub utility_value: f64,
    pub visit_count: u64,
}

impl SavedEntry {
    fn from_pair(key: &EntryKey, entry: &StateActionEntry) -> Self {
        Self {
            bird_y: key.state.bird_y,
            gap_center: key.state.gap_center,
            pipe_distance: key.state.pipe_distance,
            action: key.action,
            utility_value: entry.utility_value,
            visit_count: entry.visit_count,
        }
    }

    fn key(&self) -> EntryKey {
        EntryKey::new(
            GameState::new(self.bird_y, self.gap_center, self.pipe_distance),
            self.action,
        )
    }
}

/// Serializable form of a [`UtilityStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedUtilityStore {
    pub version: u32,
    pub metadata: TrainingMetadata,
    pub entries: Vec<SavedEntry>,
}

impl SavedUtilityStore {
    pub const VERSION: u32 = 1;

    pub fn from_store(store: &UtilityStore, metadata: TrainingMetadata) -> Self {
        let entries = store
            .sorted_entries()
            .iter()
            .map(|(key, entry)| SavedEntry::from_pair(key, entry))
            .collect();
        Self {
            version: Self::VERSION,
            metadata,
            entries,
        }
    }

    /// Rebuild the live store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] for snapshots written by another format version.
    pub fn to_store(&self) -> Result<UtilityStore> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }

        let mut store = UtilityStore::new();
        for saved in &self.entries {
            store.insert(
                saved.key(),
                StateActionEntry {
                    utility_value: saved.utility_value,
                    visit_count: saved.visit_count,
                },
            );
        }
        Ok(store)
    }

    /// Encode as MessagePack.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec(self).map_err(|e| Error::SerializationContext {
            operation: "serialize utility store to MessagePack".to_string(),
            message: e.to_string(),
        })
    }

    /// Decode from MessagePack.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize utility store from MessagePack".to_string(),
            message: e.to_string(),
        })
    }
}
