//! Flat object storage for bucketpod.
//!
//! The backing services bucketpod targets only offer key-addressed
//! primitives: head, get, put, delete, and prefix listing. This crate defines
//! that contract as the [`ObjectStore`] trait and ships two backends.
//!
//! # Storage Backends
//!
//! - [`InMemoryObjectStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`LocalObjectStore`] -- a local directory, one file per key
//!
//! # Design Rules
//!
//! 1. Keys are opaque strings. There are no directories at this layer.
//! 2. A missing key is always `StoreError::NotFound`.
//! 3. Deletes are idempotent.
//! 4. Each put/delete is atomic for its key; nothing spans keys.
//! 5. No retries. Retry policy belongs to the caller.

pub mod config;
pub mod error;
pub mod local;
pub mod memory;
pub mod object;
pub mod traits;

pub use config::{open_store, BackendConfig, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use local::LocalObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{ListEntry, ObjectHead, PutOptions, Visibility};
pub use traits::ObjectStore;
