//! IRIs used in resource metadata.

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

pub const LDP_RESOURCE: &str = "http://www.w3.org/ns/ldp#Resource";
pub const LDP_CONTAINER: &str = "http://www.w3.org/ns/ldp#Container";
pub const LDP_BASIC_CONTAINER: &str = "http://www.w3.org/ns/ldp#BasicContainer";
pub const LDP_CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";

pub const DC_MODIFIED: &str = "http://purl.org/dc/terms/modified";

pub const POSIX_MTIME: &str = "http://www.w3.org/ns/posix/stat#mtime";
pub const POSIX_SIZE: &str = "http://www.w3.org/ns/posix/stat#size";

pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Reserved predicate carrying a resource's explicit content type.
pub const CONTENT_TYPE: &str = "urn:bucketpod:meta:contentType";

/// Namespace for media-type class IRIs, e.g. `{IANA_MEDIA_TYPES}text/plain#Resource`.
pub const IANA_MEDIA_TYPES: &str = "http://www.w3.org/ns/iana/media-types/";

/// Fallback content type for documents whose key implies none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// `rdf:type` objects that restate what the store already tells us.
pub const STORAGE_DERIVED_TYPES: &[&str] = &[LDP_RESOURCE, LDP_CONTAINER, LDP_BASIC_CONTAINER];

/// Predicates whose values are always recomputed from the store.
pub const STORAGE_DERIVED_PREDICATES: &[&str] = &[DC_MODIFIED, POSIX_MTIME, POSIX_SIZE, LDP_CONTAINS];

/// Media-type class IRI for `content_type`, without parameters.
pub fn media_type_class(content_type: &str) -> String {
    let essence = content_type.split(';').next().unwrap_or(content_type).trim();
    format!("{IANA_MEDIA_TYPES}{essence}#Resource")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_class_drops_parameters() {
        assert_eq!(
            media_type_class("text/plain; charset=utf-8"),
            "http://www.w3.org/ns/iana/media-types/text/plain#Resource"
        );
    }
}
