//! Metadata serialization for bucketpod.
//!
//! Sidecar objects hold a resource's triples in a text serialization. The
//! [`MetadataCodec`] trait is the seam; [`TripleCodec`] implements
//! N-Triples, the N-Triples subset of Turtle, and a JSON array form.

pub mod error;
pub mod ntriples;
pub mod triple_codec;

pub use error::{CodecError, CodecResult};
pub use triple_codec::{MetadataCodec, TripleCodec, JSON, N_TRIPLES, TURTLE};
