//! Application state management

use std::sync::Arc;

use crate::artifact::{ModelPackage, ModelStore};

use super::error::{Result, ServerError};
use super::ServerConfig;

/// Application state shared across handlers
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub models: ModelStore,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let models = ModelStore::new(config.model_path.clone());
        Self { config, models }
    }

    /// State with an already loaded package
    pub fn with_package(config: ServerConfig, package: ModelPackage) -> Self {
        let models = ModelStore::with_package(config.model_path.clone(), package);
        Self { config, models }
    }

    /// Cached model package, loading it on first use
    pub async fn package(&self) -> Result<Arc<ModelPackage>> {
        self.models.get().await.map_err(ServerError::ModelUnavailable)
    }
}
