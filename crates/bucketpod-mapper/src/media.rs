//! Content-type ↔ extension lookups.
//!
//! A short table of preferred pairs is consulted first so that common types
//! get their conventional extension (`text/plain` → `txt`, not whichever
//! extension sorts first in the MIME database); everything else falls back
//! to `mime_guess`.

use bucketpod_types::vocab::DEFAULT_CONTENT_TYPE;

const PREFERRED: &[(&str, &str)] = &[
    ("text/plain", "txt"),
    ("text/html", "html"),
    ("text/turtle", "ttl"),
    ("text/markdown", "md"),
    ("text/css", "css"),
    ("text/csv", "csv"),
    ("application/json", "json"),
    ("application/ld+json", "jsonld"),
    ("application/n-triples", "nt"),
    ("application/xml", "xml"),
    ("application/pdf", "pdf"),
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
];

/// The type/subtype part of a content type, lowercased, without parameters.
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase()
}

/// Whether two content types name the same media type.
pub fn same_type(a: &str, b: &str) -> bool {
    essence(a) == essence(b)
}

/// Extension to append for `content_type`, if it has one.
///
/// The generic binary type never gets an extension.
pub fn preferred_extension(content_type: &str) -> Option<&'static str> {
    let essence = essence(content_type);
    if essence == DEFAULT_CONTENT_TYPE {
        return None;
    }
    PREFERRED
        .iter()
        .find(|(ct, _)| *ct == essence)
        .map(|(_, ext)| *ext)
        .or_else(|| mime_guess::get_mime_extensions_str(&essence).and_then(|exts| exts.first().copied()))
}

/// Content type for a bare extension (no dot).
pub fn type_for_extension(ext: &str) -> Option<String> {
    let ext = ext.to_ascii_lowercase();
    PREFERRED
        .iter()
        .find(|(_, e)| *e == ext)
        .map(|(ct, _)| (*ct).to_string())
        .or_else(|| mime_guess::from_ext(&ext).first_raw().map(str::to_string))
}

/// Extension of the last path segment of `key`, if any.
pub fn extension_of(key: &str) -> Option<&str> {
    let name = key.rsplit('/').next()?;
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}
