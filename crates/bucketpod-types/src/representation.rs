use std::io;

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt};

use crate::metadata::MetadataSet;

/// Forward-only stream of document bytes.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

/// Metadata plus data, as produced by a caller for a write.
///
/// `binary` is `true` when `data` is an opaque byte stream rather than a
/// stream of parsed objects; only binary representations can be stored.
pub struct Representation {
    pub metadata: MetadataSet,
    pub data: ByteStream,
    pub binary: bool,
}

impl Representation {
    pub fn binary(metadata: MetadataSet, data: ByteStream) -> Self {
        Self {
            metadata,
            data,
            binary: true,
        }
    }
}

impl std::fmt::Debug for Representation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Representation")
            .field("identifier", self.metadata.identifier())
            .field("binary", &self.binary)
            .finish_non_exhaustive()
    }
}

/// A single-chunk stream over `data`.
pub fn stream_from_bytes(data: impl Into<Bytes>) -> ByteStream {
    stream::once(futures::future::ready(Ok(data.into()))).boxed()
}

/// Drain a byte stream into one contiguous buffer.
pub async fn collect_bytes(mut data: ByteStream) -> io::Result<Bytes> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = data.next().await {
        buf.extend_from_slice(&chunk?);
    }
    Ok(buf.freeze())
}
