#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Shared helpers for turning `$ref` strings into bare names.
//!
//! Only in-document references are supported: anything with a document part
//! before the `#` is rejected rather than fetched.

use crate::error::ResolveError;
use percent_encoding::percent_decode_str;

/// Splits a `$ref` into its document part and its fragment.
///
/// `"#/definitions/Pet"` yields `("", Some("/definitions/Pet"))`,
/// `"pets.yaml#/definitions/Pet"` yields `("pets.yaml", Some("/definitions/Pet"))`.
pub(crate) fn split_reference(ref_str: &str) -> (&str, Option<&str>) {
    match ref_str.split_once('#') {
        Some((doc, frag)) => (doc, Some(frag)),
        None => (ref_str, None),
    }
}

/// Extracts the bare name a local `$ref` points at within `section`.
///
/// `#/definitions/Pet` names `Pet` in `definitions`; a bare `Pet` is accepted
/// too. A pointer into any other section is malformed, so a schema `$ref` to
/// `#/responses/Pet` never falls through to `definitions/Pet`.
pub(crate) fn extract_ref_name(ref_str: &str, section: &str) -> Result<String, ResolveError> {
    let segment = match split_reference(ref_str) {
        ("", Some(frag)) => frag
            .strip_prefix('/')
            .and_then(|rest| rest.strip_prefix(section))
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.contains('/'))
            .ok_or_else(|| {
                ResolveError::MalformedSchema(format!(
                    "reference `{}` does not point into `{}`",
                    ref_str, section
                ))
            })?,
        (doc, None) if !doc.contains('/') && !doc.contains(':') && !doc.contains('.') => doc,
        _ => return Err(ResolveError::ExternalReference(ref_str.to_string())),
    };

    let name = decode_pointer_segment(segment);
    if name.is_empty() {
        return Err(ResolveError::MalformedSchema(format!(
            "reference `{}` does not name a definition",
            ref_str
        )));
    }
    Ok(name)
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_definitions_pointer() {
        assert_eq!(
            extract_ref_name("#/definitions/Pet", "definitions").unwrap(),
            "Pet"
        );
        assert_eq!(
            extract_ref_name("#/parameters/limit", "parameters").unwrap(),
            "limit"
        );
    }

    #[test]
    fn test_pointer_into_other_section_is_malformed() {
        for pointer in ["#/responses/Pet", "#/components/schemas/Pet", "#/definitions/Pet/properties"] {
            let err = extract_ref_name(pointer, "definitions").unwrap_err();
            assert!(matches!(err, ResolveError::MalformedSchema(_)), "{}", pointer);
        }
    }

    #[test]
    fn test_extract_bare_name() {
        assert_eq!(extract_ref_name("Pet", "definitions").unwrap(), "Pet");
    }

    #[test]
    fn test_external_reference_rejected() {
        let err = extract_ref_name("pets.yaml#/definitions/Pet", "definitions").unwrap_err();
        assert_eq!(
            err,
            ResolveError::ExternalReference("pets.yaml#/definitions/Pet".into())
        );
        assert!(
            extract_ref_name("https://example.com/api.json#/definitions/Pet", "definitions")
                .is_err()
        );
    }

    #[test]
    fn test_empty_pointer_is_malformed() {
        let err = extract_ref_name("#/definitions/", "definitions").unwrap_err();
        assert!(matches!(err, ResolveError::MalformedSchema(_)));
    }

    #[test]
    fn test_decode_pointer_segment_percent_encoding() {
        let encoded = "User%20Profile~1details";
        let decoded = decode_pointer_segment(encoded);
        assert_eq!(decoded, "User Profile/details");
    }
}
