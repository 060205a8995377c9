//! Lazily loaded, process-lifetime model handle

use crate::error::{PredictorError, Result};
use super::ModelPackage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// Loads the model package on first use and keeps it for the life of the store.
///
/// Concurrent first callers wait on a single load. A failed load leaves the
/// cell empty, so the next call reads the file again.
#[derive(Debug)]
pub struct ModelStore {
    path: PathBuf,
    package: OnceCell<Arc<ModelPackage>>,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            package: OnceCell::new(),
        }
    }

    /// Store that already holds `package`
    pub fn with_package(path: impl Into<PathBuf>, package: ModelPackage) -> Self {
        Self {
            path: path.into(),
            package: OnceCell::new_with(Some(Arc::new(package))),
        }
    }

    /// Whether a load has succeeded
    pub fn is_loaded(&self) -> bool {
        self.package.initialized()
    }

    /// Cached package, loading it on first call
    pub async fn get(&self) -> Result<Arc<ModelPackage>> {
        self.package
            .get_or_try_init(|| async {
                let package = read_package(&self.path).await?;
                info!(
                    path = %self.path.display(),
                    estimators = package.model.n_estimators(),
                    max_depth = package.model.max_depth(),
                    features = package.feature_columns.len(),
                    neighborhoods = package.neighborhoods.len(),
                    test_r2 = %format!("{:.4}", package.metrics.test.r2),
                    "Model loaded"
                );
                Ok::<_, PredictorError>(Arc::new(package))
            })
            .await
            .cloned()
    }
}

async fn read_package(path: &Path) -> Result<ModelPackage> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PredictorError::ArtifactNotFound(path.to_path_buf()),
        _ => PredictorError::IoError(e),
    })?;
    ModelPackage::from_slice(&bytes)
}
