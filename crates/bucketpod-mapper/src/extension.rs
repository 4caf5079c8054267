use bucketpod_types::{ResourceIdentifier, ResourceLink, SEPARATOR};

use crate::config::MapperConfig;
use crate::error::{MapperError, MapperResult};
use crate::media;
use crate::traits::IdentifierMapper;

/// Separates a document's own name from an extension the mapper appended.
pub const EXTENSION_MARKER: &str = "$.";

/// Maps identifiers to keys, encoding a document's content type in the key's
/// extension.
///
/// - `/docs/a` written as `text/plain` is stored under `/docs/a$.txt`.
/// - `/docs/a.txt` written as `text/plain` is stored under `/docs/a.txt`.
/// - Sidecars live at `<base key><metadata_suffix>` whatever the type.
///
/// Appended extensions always follow [`EXTENSION_MARKER`], so `/docs/a` and
/// an independent `/docs/a.txt` never share a key.
#[derive(Clone, Debug)]
pub struct ExtensionMapper {
    config: MapperConfig,
}

impl ExtensionMapper {
    pub fn new(config: MapperConfig) -> MapperResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Key for `identifier` before any extension is applied.
    fn base_key(&self, identifier: &ResourceIdentifier) -> MapperResult<String> {
        let path = identifier.as_str();
        let relative = path
            .strip_prefix(self.config.base_scope.as_str())
            .ok_or_else(|| MapperError::NotFound(path.to_string()))?;
        self.validate_relative(path, relative, identifier.is_container())?;
        Ok(format!("{}{relative}", self.config.root_key))
    }

    fn validate_relative(&self, path: &str, relative: &str, container: bool) -> MapperResult<()> {
        if relative.chars().any(|c| c == '\\' || c.is_control()) {
            return Err(MapperError::BadRequest(format!(
                "identifier contains a forbidden character: {path:?}"
            )));
        }
        if relative.is_empty() {
            return Ok(());
        }
        let body = if container {
            &relative[..relative.len() - 1]
        } else {
            relative
        };
        for segment in body.split(SEPARATOR) {
            if segment.is_empty() {
                return Err(MapperError::BadRequest(format!(
                    "identifier contains an empty path segment: {path:?}"
                )));
            }
            let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
            if decoded == "." || decoded == ".." {
                return Err(MapperError::BadRequest(format!(
                    "identifier contains a traversal segment: {path:?}"
                )));
            }
        }
        let name = body.rsplit(SEPARATOR).next().unwrap_or(body);
        if !container && name.contains(EXTENSION_MARKER) {
            return Err(MapperError::BadRequest(format!(
                "document names may not contain {EXTENSION_MARKER:?}: {path:?}"
            )));
        }
        if !container && relative.ends_with(self.config.metadata_suffix.as_str()) {
            return Err(MapperError::BadRequest(format!(
                "names ending in {:?} are reserved for metadata: {path:?}",
                self.config.metadata_suffix
            )));
        }
        Ok(())
    }

    fn document_key(&self, base: String, content_type: Option<&str>) -> String {
        let Some(ct) = content_type else {
            return base;
        };
        if let Some(implied) = self.content_type_for_key(&base) {
            if media::same_type(&implied, ct) {
                return base;
            }
        }
        match media::preferred_extension(ct) {
            Some(ext) => format!("{base}{EXTENSION_MARKER}{ext}"),
            None => base,
        }
    }
}

impl IdentifierMapper for ExtensionMapper {
    fn resolve(
        &self,
        identifier: &ResourceIdentifier,
        want_sidecar: bool,
        content_type: Option<&str>,
    ) -> MapperResult<ResourceLink> {
        let base = self.base_key(identifier)?;
        if want_sidecar {
            let key = format!("{base}{}", self.config.metadata_suffix);
            return Ok(ResourceLink::new(identifier.clone(), key).metadata());
        }
        if identifier.is_container() {
            return Ok(ResourceLink::new(identifier.clone(), base));
        }
        let key = self.document_key(base, content_type);
        let content_type = content_type
            .map(str::to_string)
            .or_else(|| self.content_type_for_key(&key));
        Ok(ResourceLink::new(identifier.clone(), key).with_content_type(content_type))
    }

    fn metadata_suffix(&self) -> &str {
        &self.config.metadata_suffix
    }

    fn content_type_for_key(&self, key: &str) -> Option<String> {
        if key.ends_with(SEPARATOR) {
            return None;
        }
        media::extension_of(key).and_then(media::type_for_extension)
    }

    fn is_extension_variant(&self, base_key: &str, candidate: &str) -> bool {
        candidate
            .strip_prefix(base_key)
            .and_then(|rest| rest.strip_prefix(EXTENSION_MARKER))
            .is_some_and(|ext| is_plain_extension(ext) && !self.is_metadata_key(candidate))
    }

    fn document_name<'a>(&self, key_name: &'a str) -> &'a str {
        match key_name.rsplit_once(EXTENSION_MARKER) {
            Some((name, ext)) if !name.is_empty() && is_plain_extension(ext) => name,
            _ => key_name,
        }
    }
}

fn is_plain_extension(ext: &str) -> bool {
    !ext.is_empty() && !ext.contains('.') && !ext.contains(SEPARATOR)
}
