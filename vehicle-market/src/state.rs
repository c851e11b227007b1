//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::repository::InMemoryVehicleRepository;
use crate::vehicles::VehicleService;

/// Vehicle service as wired into the HTTP layer
pub type SharedVehicleService = Arc<VehicleService<InMemoryVehicleRepository>>;

/// Application state shared across handlers
///
/// Cloning is cheap: every collaborator sits behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<Config>,
    vehicles: SharedVehicleService,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    /// Create state with an empty in-memory repository
    pub fn new(config: Config) -> Self {
        Self::builder().config(config).build()
    }

    /// Create a new builder for AppState
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the vehicle service
    pub fn vehicles(&self) -> &VehicleService<InMemoryVehicleRepository> {
        &self.vehicles
    }
}

/// Builder for [`AppState`]
///
/// Missing parts fall back to `Config::default()` and an empty
/// repository.
#[derive(Debug, Default)]
pub struct AppStateBuilder {
    config: Option<Config>,
    repository: Option<InMemoryVehicleRepository>,
}

impl AppStateBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use an existing (possibly pre-seeded) repository
    #[must_use]
    pub fn repository(mut self, repository: InMemoryVehicleRepository) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Build the state
    pub fn build(self) -> AppState {
        let config = self.config.unwrap_or_default();
        let repository = self.repository.unwrap_or_default();
        let vehicles = VehicleService::new(repository, config.pagination);

        AppState {
            config: Arc::new(config),
            vehicles: Arc::new(vehicles),
        }
    }
}
