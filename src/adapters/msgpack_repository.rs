//! MessagePack implementation of the utility repository.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::UtilityRepository, q_learning::SavedUtilityStore};

/// File-backed repository storing snapshots as MessagePack via rmp_serde.
///
/// # Examples
///
/// ```no_run
/// use flappy_td::adapters::MsgPackRepository;
/// use flappy_td::ports::UtilityRepository;
/// use std::path::Path;
///
/// let repo = MsgPackRepository::new();
/// let snapshot = repo.load(Path::new("table.msgpack"))?;
/// println!("{} entries", snapshot.entries.len());
/// # Ok::<(), flappy_td::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    pub fn new() -> Self {
        Self
    }
}

impl UtilityRepository for MsgPackRepository {
    fn save(&self, snapshot: &SavedUtilityStore, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {parent:?}"),
                source,
            })?;
        }

        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let bytes = snapshot.to_bytes()?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&bytes)
            .and_then(|()| writer.flush())
            .map_err(|source| Error::Io {
                operation: format!("write utility store to {path:?}"),
                source,
            })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedUtilityStore> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let mut bytes = Vec::new();
        BufReader::new(file)
            .read_to_end(&mut bytes)
            .map_err(|source| Error::Io {
                operation: format!("read utility store from {path:?}"),
                source,
            })?;

        SavedUtilityStore::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        q_learning::{TrainingMetadata, UtilityStore},
        state::GameState,
        types::Action,
    };

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("nested").join("table.msgpack");

        let mut store = UtilityStore::new();
        store.get_or_create(GameState::new(240, 256, 517), Action::NoFlap).utility_value = 1.5;
        let snapshot = SavedUtilityStore::from_store(&store, TrainingMetadata::default());

        let repo = MsgPackRepository::new();
        repo.save(&snapshot, &file_path).expect("Failed to save");
        let loaded = repo.load(&file_path).expect("Failed to load");

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = MsgPackRepository::new().load(&temp_dir.path().join("missing.msgpack"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_load_corrupt_file_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("corrupt.msgpack");
        std::fs::write(&path, b"\xc1\xc1\xc1").unwrap();
        assert!(matches!(
            MsgPackRepository::new().load(&path),
            Err(Error::SerializationContext { .. })
        ));
    }
}
