//! Hierarchical resource storage over a flat object store.
//!
//! [`BucketAccessor`] implements the [`DataAccessor`] contract (containers
//! and documents with descriptive metadata) on top of any
//! [`ObjectStore`](bucketpod_store::ObjectStore), which only knows head,
//! get, put, delete, and prefix listing.
//!
//! # How the tree is emulated
//!
//! - A container exists while at least one key shares its prefix.
//! - A document is one key; its extension may encode its content type.
//! - Metadata lives in a sidecar key next to the resource. Kind, size and
//!   modification time are never stored there; they are read live from the
//!   store and merged in on every read.
//! - Children are found by listing the container prefix and collapsing each
//!   key to its first path segment.
//!
//! # Consistency
//!
//! There are no locks, transactions, or version checks. Concurrent writers
//! race at the store and the last write wins. A document write stores the
//! sidecar before the data and deletes the sidecar again if the data write
//! fails.

pub mod accessor;
mod children;
pub mod config;
pub mod error;
mod merge;
pub mod traits;

pub use accessor::BucketAccessor;
pub use config::AccessorConfig;
pub use error::{AccessorError, AccessorResult};
pub use traits::{ChildStream, DataAccessor};
