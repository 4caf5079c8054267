use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Path separator used by identifiers and storage keys alike.
pub const SEPARATOR: char = '/';

/// Caller-visible path naming a document or a container.
///
/// The identifier is opaque apart from one rule: a path ending in
/// [`SEPARATOR`] denotes a container, anything else a document. Scope and
/// traversal validation belong to the identifier mapper, not to this type.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceIdentifier(String);

impl ResourceIdentifier {
    /// Wrap a path. Fails only on the empty string.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        if path.is_empty() {
            return Err(TypeError::InvalidIdentifier(
                path,
                "identifier must not be empty".into(),
            ));
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this identifier denotes a container.
    pub fn is_container(&self) -> bool {
        self.0.ends_with(SEPARATOR)
    }

    /// Returns `true` if this identifier denotes a document.
    pub fn is_document(&self) -> bool {
        !self.is_container()
    }

    /// The last path segment, without the trailing separator of a container.
    ///
    /// Returns an empty string for the root container `/`.
    pub fn name(&self) -> &str {
        let trimmed = self.0.strip_suffix(SEPARATOR).unwrap_or(&self.0);
        match trimmed.rfind(SEPARATOR) {
            Some(pos) => &trimmed[pos + 1..],
            None => trimmed,
        }
    }

    /// The enclosing container, or `None` for a root-level path.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.0.strip_suffix(SEPARATOR).unwrap_or(&self.0);
        let pos = trimmed.rfind(SEPARATOR)?;
        Some(Self(trimmed[..=pos].to_string()))
    }

    /// Append a child segment to a container identifier.
    ///
    /// `child` may itself end in the separator to name a child container.
    pub fn join(&self, child: &str) -> Result<Self, TypeError> {
        if !self.is_container() {
            return Err(TypeError::InvalidIdentifier(
                self.0.clone(),
                "only containers have children".into(),
            ));
        }
        let child = child.strip_prefix(SEPARATOR).unwrap_or(child);
        if child.is_empty() {
            return Err(TypeError::InvalidIdentifier(
                self.0.clone(),
                "child name must not be empty".into(),
            ));
        }
        Ok(Self(format!("{}{child}", self.0)))
    }
}

impl fmt::Debug for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceIdentifier({})", self.0)
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ResourceIdentifier {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
