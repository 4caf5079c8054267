use bucketpod_types::Triple;
use bytes::Bytes;

use crate::error::{CodecError, CodecResult};
use crate::ntriples;

pub const N_TRIPLES: &str = "application/n-triples";
pub const TURTLE: &str = "text/turtle";
pub const JSON: &str = "application/json";

/// Encodes and decodes the triples held in a metadata sidecar.
pub trait MetadataCodec: Send + Sync {
    /// Parse `data` written in `format`. Relative IRIs resolve against `base`.
    fn decode(&self, data: &[u8], format: &str, base: &str) -> CodecResult<Vec<Triple>>;

    /// Serialize `triples` in `format`.
    fn encode(&self, triples: &[Triple], format: &str) -> CodecResult<Bytes>;

    fn supports(&self, format: &str) -> bool;
}

/// Codec for N-Triples, Turtle (N-Triples subset), and a JSON array form.
///
/// Turtle output is plain N-Triples, which every Turtle reader accepts.
#[derive(Clone, Copy, Debug, Default)]
pub struct TripleCodec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Lines,
    Json,
}

impl TripleCodec {
    pub fn new() -> Self {
        Self
    }

    fn format(format: &str) -> CodecResult<Format> {
        let essence = format
            .split(';')
            .next()
            .unwrap_or(format)
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            N_TRIPLES | TURTLE => Ok(Format::Lines),
            JSON => Ok(Format::Json),
            _ => Err(CodecError::UnsupportedFormat(format.to_string())),
        }
    }
}

impl MetadataCodec for TripleCodec {
    fn decode(&self, data: &[u8], format: &str, base: &str) -> CodecResult<Vec<Triple>> {
        match Self::format(format)? {
            Format::Lines => ntriples::parse(std::str::from_utf8(data)?, base),
            Format::Json => Ok(serde_json::from_slice(data)?),
        }
    }

    fn encode(&self, triples: &[Triple], format: &str) -> CodecResult<Bytes> {
        match Self::format(format)? {
            Format::Lines => Ok(Bytes::from(ntriples::write(triples))),
            Format::Json => Ok(Bytes::from(serde_json::to_vec(triples)?)),
        }
    }

    fn supports(&self, format: &str) -> bool {
        Self::format(format).is_ok()
    }
}
