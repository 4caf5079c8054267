use serde::{Deserialize, Serialize};

use crate::error::{MapperError, MapperResult};

/// Settings for [`ExtensionMapper`](crate::ExtensionMapper).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Identifier prefix served by this store. Must end in `/`.
    pub base_scope: String,
    /// Key prefix that `base_scope` maps onto. Non-empty and ending in `/`,
    /// since the root container's placeholder is stored under it.
    pub root_key: String,
    /// Suffix that turns a base key into its sidecar key.
    pub metadata_suffix: String,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            base_scope: "/".into(),
            root_key: "/".into(),
            metadata_suffix: ".meta".into(),
        }
    }
}

impl MapperConfig {
    pub fn validate(&self) -> MapperResult<()> {
        if !self.base_scope.ends_with('/') {
            return Err(MapperError::Config(format!(
                "base_scope must end with '/': {:?}",
                self.base_scope
            )));
        }
        if !self.root_key.ends_with('/') {
            return Err(MapperError::Config(format!(
                "root_key must end with '/': {:?}",
                self.root_key
            )));
        }
        if self.metadata_suffix.is_empty() || self.metadata_suffix.contains('/') {
            return Err(MapperError::Config(format!(
                "metadata_suffix must be non-empty and contain no '/': {:?}",
                self.metadata_suffix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let c = MapperConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.metadata_suffix, ".meta");
    }

    #[test]
    fn rejects_bad_scopes() {
        let c = MapperConfig {
            base_scope: "/pod".into(),
            ..Default::default()
        };
        assert!(c.validate().is_err());

        let c = MapperConfig {
            root_key: "bucket".into(),
            ..Default::default()
        };
        assert!(c.validate().is_err());

        let c = MapperConfig {
            root_key: "".into(),
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(MapperError::Config(_))));

        let c = MapperConfig {
            metadata_suffix: "".into(),
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c: MapperConfig = toml::from_str(r#"base_scope = "/pod/""#).unwrap();
        assert_eq!(c.base_scope, "/pod/");
        assert_eq!(c.root_key, "/");
        assert_eq!(c.metadata_suffix, ".meta");
    }
}
