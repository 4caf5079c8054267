use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use bucketpod_accessor::{AccessorConfig, BucketAccessor};
use bucketpod_codec::TripleCodec;
use bucketpod_mapper::{ExtensionMapper, MapperConfig};
use bucketpod_store::{open_store, BackendConfig, StoreConfig};
use serde::{Deserialize, Serialize};

/// Directory used when no configuration file names a backend.
pub const DEFAULT_ROOT: &str = ".bucketpod";

/// Everything the binary needs to build an accessor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub mapper: MapperConfig,
    pub accessor: AccessorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                backend: BackendConfig::Local {
                    root: DEFAULT_ROOT.into(),
                },
                ..StoreConfig::default()
            },
            mapper: MapperConfig::default(),
            accessor: AccessorConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Read `path`, or use the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    pub async fn build_accessor(&self) -> anyhow::Result<BucketAccessor> {
        let store = open_store(&self.store).await?;
        let mapper = ExtensionMapper::new(self.mapper.clone())?;
        let accessor = BucketAccessor::new(
            store,
            Arc::new(mapper),
            Arc::new(TripleCodec::new()),
            self.accessor.clone(),
        )?;
        tracing::debug!(config = ?self, "accessor ready");
        Ok(accessor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketpod_store::Visibility;

    #[test]
    fn defaults_to_local_directory() {
        let c = AppConfig::default();
        assert_eq!(
            c.store.backend,
            BackendConfig::Local {
                root: DEFAULT_ROOT.into()
            }
        );
        assert_eq!(c.mapper.metadata_suffix, ".meta");
        assert_eq!(c.accessor.metadata_format, "text/turtle");
    }

    #[test]
    fn empty_file_means_defaults() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn sections_override_independently() {
        let c = AppConfig::from_toml(
            r#"
            [store]
            backend = "memory"
            visibility = "public"

            [mapper]
            metadata_suffix = ".acl"

            [accessor]
            metadata_format = "application/n-triples"
            "#,
        )
        .unwrap();
        assert_eq!(c.store.backend, BackendConfig::Memory);
        assert_eq!(c.store.visibility, Visibility::Public);
        assert_eq!(c.mapper.metadata_suffix, ".acl");
        assert_eq!(c.mapper.base_scope, "/");
        assert_eq!(c.accessor.metadata_format, "application/n-triples");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(AppConfig::from_toml("[store]\nbackend = \"s3\"\n").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pod.toml");
        std::fs::write(&path, "[store]\nbackend = \"local\"\nroot = \"/srv/pod\"\n").unwrap();
        let c = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(
            c.store.backend,
            BackendConfig::Local {
                root: "/srv/pod".into()
            }
        );
    }

    #[tokio::test]
    async fn builds_memory_accessor() {
        let mut c = AppConfig::default();
        c.store.backend = BackendConfig::Memory;
        assert!(c.build_accessor().await.is_ok());
    }

    #[tokio::test]
    async fn bad_mapper_config_fails_to_build() {
        let mut c = AppConfig::default();
        c.store.backend = BackendConfig::Memory;
        c.mapper.base_scope = "no-slash".into();
        assert!(c.build_accessor().await.is_err());
    }

    #[tokio::test]
    async fn empty_root_key_fails_to_build() {
        let c = AppConfig::from_toml("[store]\nbackend = \"memory\"\n\n[mapper]\nroot_key = \"\"\n")
            .unwrap();
        assert!(c.build_accessor().await.is_err());
    }
}
