//! Identifier mapping for bucketpod.
//!
//! Turns caller-visible [`ResourceIdentifier`]s into storage keys, picks a
//! file extension from a content type, and rejects paths that would escape
//! the configured scope.
//!
//! [`ResourceIdentifier`]: bucketpod_types::ResourceIdentifier

pub mod config;
pub mod error;
pub mod extension;
pub mod media;
pub mod traits;

pub use config::MapperConfig;
pub use error::{MapperError, MapperResult};
pub use extension::{ExtensionMapper, EXTENSION_MARKER};
pub use traits::IdentifierMapper;
