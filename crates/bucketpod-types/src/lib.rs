//! Foundation types for bucketpod.
//!
//! bucketpod presents a tree of containers and documents over a flat,
//! key-addressed object store. This crate holds the values that flow between
//! the mapper, the codec, the object store, and the storage adapter. Every
//! other bucketpod crate depends on `bucketpod-types`.
//!
//! # Key Types
//!
//! - [`ResourceIdentifier`]: Caller-visible path; a trailing `/` marks a container
//! - [`ResourceLink`]: Per-call resolution of an identifier to a storage key
//! - [`StorageObjectStat`]: Live `File`/`Directory` stat derived from the store
//! - [`MetadataSet`]: Mutable set of [`Triple`]s describing one resource
//! - [`Representation`]: Metadata plus a byte stream, as handed to writers

pub mod error;
pub mod identifier;
pub mod link;
pub mod metadata;
pub mod representation;
pub mod stat;
pub mod vocab;

pub use error::TypeError;
pub use identifier::{ResourceIdentifier, SEPARATOR};
pub use link::ResourceLink;
pub use metadata::{MetadataSet, Term, Triple};
pub use representation::{collect_bytes, stream_from_bytes, ByteStream, Representation};
pub use stat::{ObjectKind, StorageObjectStat};
