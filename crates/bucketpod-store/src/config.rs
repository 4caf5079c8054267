use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::local::LocalObjectStore;
use crate::memory::InMemoryObjectStore;
use crate::object::Visibility;
use crate::traits::ObjectStore;

/// Which backend to construct.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum BackendConfig {
    Memory,
    Local { root: PathBuf },
}

/// Construction-time settings for an object store client.
///
/// Everything backend-specific lives here and is consumed by [`open_store`];
/// callers of [`ObjectStore`] never see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(flatten)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub visibility: Visibility,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::Memory,
            visibility: Visibility::Private,
        }
    }
}

/// Build the configured store.
pub async fn open_store(config: &StoreConfig) -> StoreResult<Arc<dyn ObjectStore>> {
    match &config.backend {
        BackendConfig::Memory => Ok(Arc::new(InMemoryObjectStore::with_default_visibility(
            config.visibility,
        ))),
        BackendConfig::Local { root } => {
            if root.as_os_str().is_empty() {
                return Err(StoreError::Config("local backend root must not be empty".into()));
            }
            if config.visibility != Visibility::Private {
                tracing::warn!(
                    root = %root.display(),
                    "local backend has no access control; visibility setting ignored"
                );
            }
            Ok(Arc::new(LocalObjectStore::open(root).await?))
        }
    }
}
