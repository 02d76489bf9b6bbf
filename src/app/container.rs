//! Dependency container for the flappy_td application.
//!
//! The container owns the storage back-end and a default seed, and builds the
//! decision loop and the game world from configuration.

use std::{path::Path, sync::Arc};

use tracing::info;

use super::config::LearningConfig;
use crate::{
    Result,
    adapters::MsgPackRepository,
    game::World,
    pipeline::DecisionLoop,
    ports::UtilityRepository,
    q_learning::{SavedUtilityStore, TrainingMetadata, UtilityStore},
};

/// Application with injected infrastructure.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use flappy_td::app::{App, LearningConfig};
///
/// let app = App::new();
/// let agent = app.create_agent(&LearningConfig::default())?;
/// assert!(agent.store().is_empty());
/// # Ok::<(), flappy_td::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use flappy_td::app::App;
/// use flappy_td::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    repository: Arc<dyn UtilityRepository + Send + Sync>,
    default_seed: Option<u64>,
}

impl App {
    /// App storing tables as MessagePack files, without a default seed.
    pub fn new() -> Self {
        Self {
            repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Builder for injecting custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn repository(&self) -> Arc<dyn UtilityRepository + Send + Sync> {
        Arc::clone(&self.repository)
    }

    pub fn default_seed(&self) -> Option<u64> {
        self.default_seed
    }

    /// Decision loop over an empty utility store.
    pub fn create_agent(&self, config: &LearningConfig) -> Result<DecisionLoop> {
        DecisionLoop::new(UtilityStore::new(), config)
    }

    /// Decision loop continuing from a saved table.
    ///
    /// The learning parameters come from `config`, not from the snapshot;
    /// the snapshot metadata is returned for reporting.
    pub fn load_agent(
        &self,
        path: &Path,
        config: &LearningConfig,
    ) -> Result<(DecisionLoop, TrainingMetadata)> {
        let snapshot = self.repository.load(path)?;
        let store = snapshot.to_store()?;
        info!(
            path = %path.display(),
            entries = store.len(),
            episodes = snapshot.metadata.episodes,
            "loaded utility store"
        );
        Ok((DecisionLoop::new(store, config)?, snapshot.metadata))
    }

    pub fn save_store(
        &self,
        store: &UtilityStore,
        metadata: TrainingMetadata,
        path: &Path,
    ) -> Result<()> {
        let snapshot = SavedUtilityStore::from_store(store, metadata);
        self.repository.save(&snapshot, path)?;
        info!(path = %path.display(), entries = store.len(), "saved utility store");
        Ok(())
    }

    /// Game world seeded from `seed`, falling back to the app default.
    pub fn create_world(&self, seed: Option<u64>) -> World {
        World::new(seed.or(self.default_seed))
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`App`] with custom dependencies.
pub struct AppBuilder {
    repository: Option<Arc<dyn UtilityRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            default_seed: None,
        }
    }

    pub fn with_repository<R: UtilityRepository + Send + Sync + 'static>(
        mut self,
        repository: R,
    ) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Missing dependencies fall back to the production defaults.
    pub fn build(self) -> App {
        App {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
