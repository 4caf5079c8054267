//! Metadata merge and filter rules.
//!
//! Anything the store can tell us live (kind, size, mtime, the type implied
//! by a key's extension) is stripped before a sidecar is written and added
//! back on every read.

use bucketpod_types::vocab::{self, media_type_class};
use bucketpod_types::{MetadataSet, ObjectKind, StorageObjectStat, Term, Triple};
use chrono::SecondsFormat;

/// Copy of `metadata` with storage-derived statements removed.
///
/// `derived_content_type` is what the primary key implies; an explicit
/// content type byte-equal to it is redundant and dropped. Parameters such
/// as `charset` are not implied by any key, so a type carrying them is kept. Containers never keep
/// a content type.
pub(crate) fn strip_storage_derived(
    metadata: &MetadataSet,
    kind: ObjectKind,
    derived_content_type: Option<&str>,
) -> MetadataSet {
    let mut out = metadata.clone();
    let subject = out.subject();
    out.retain(|t| t.subject != subject || !is_storage_derived(t));

    match kind {
        ObjectKind::Directory => {
            out.remove_all(vocab::CONTENT_TYPE);
        }
        ObjectKind::File => {
            let derived = derived_content_type.unwrap_or(vocab::DEFAULT_CONTENT_TYPE);
            if out.content_type() == Some(derived) {
                out.remove_all(vocab::CONTENT_TYPE);
            }
        }
    }
    out
}

fn is_storage_derived(t: &Triple) -> bool {
    if vocab::STORAGE_DERIVED_PREDICATES.contains(&t.predicate.as_str()) {
        return true;
    }
    if t.predicate == vocab::RDF_TYPE {
        return match &t.object {
            Term::NamedNode { value } => {
                vocab::STORAGE_DERIVED_TYPES.contains(&value.as_str())
                    || value.starts_with(vocab::IANA_MEDIA_TYPES)
            }
            _ => false,
        };
    }
    false
}

/// Add kind markers and live mtime/size, replacing any stored values.
pub(crate) fn add_live_fields(metadata: &mut MetadataSet, stat: &StorageObjectStat) {
    metadata.add(vocab::RDF_TYPE, Term::named(vocab::LDP_RESOURCE));
    match stat {
        StorageObjectStat::Directory { .. } => {
            metadata.add(vocab::RDF_TYPE, Term::named(vocab::LDP_CONTAINER));
            metadata.add(vocab::RDF_TYPE, Term::named(vocab::LDP_BASIC_CONTAINER));
            metadata.remove_all(vocab::POSIX_SIZE);
        }
        StorageObjectStat::File { size, .. } => {
            metadata.set(vocab::POSIX_SIZE, Term::typed(size.to_string(), vocab::XSD_INTEGER));
        }
    }
    let mtime = stat.mtime();
    metadata.set(
        vocab::DC_MODIFIED,
        Term::typed(
            mtime.to_rfc3339_opts(SecondsFormat::Secs, true),
            vocab::XSD_DATE_TIME,
        ),
    );
    metadata.set(
        vocab::POSIX_MTIME,
        Term::typed(mtime.timestamp().to_string(), vocab::XSD_INTEGER),
    );
}

/// Set the content type and its media-type class, if it is a valid type.
///
/// Returns `false` (and leaves `metadata` untouched) when `content_type`
/// cannot be turned into a media-type IRI.
pub(crate) fn add_content_type(metadata: &mut MetadataSet, content_type: &str) -> bool {
    if content_type.parse::<mime_guess::Mime>().is_err() {
        return false;
    }
    metadata.set_content_type(Some(content_type));
    metadata.add(vocab::RDF_TYPE, Term::named(media_type_class(content_type)));
    true
}
