//! # Error Handling
//!
//! Provides the `ResolveError` raised while substituting references and the
//! unified `AppError` enum used across the workspace.

use derive_more::{Display, From};
use serde::Serialize;

/// A failure raised while resolving a single schema fragment.
///
/// These are contained at the granularity of one parameter list or one
/// response list, so they are cheap to clone into the degradation report.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize)]
pub enum ResolveError {
    /// A `$ref` names a definition absent from the definitions table.
    #[display("definition `{name}` not found")]
    MissingDefinition {
        /// Bare definition name (last pointer segment).
        name: String,
    },

    /// A parameter or response `$ref` names an entry absent from the shared section.
    #[display("shared {section} entry `{name}` not found")]
    MissingComponent {
        /// Document section searched (`parameters` or `responses`).
        section: String,
        /// Bare entry name.
        name: String,
    },

    /// A fragment lacks an expected shape.
    #[display("malformed schema: {_0}")]
    MalformedSchema(String),

    /// A reference points into another document.
    #[display("external reference `{_0}` cannot be resolved in-document")]
    ExternalReference(String),

    /// Deep resolution re-entered a definition already being expanded.
    #[display("cyclic reference: {_0}")]
    CyclicReference(String),

    /// Scopes a failure to a nested property.
    #[display("property `{property}`: {cause}")]
    InProperty {
        /// Property name within the enclosing object.
        property: String,
        /// The underlying failure.
        cause: Box<ResolveError>,
    },
}

impl ResolveError {
    /// Wraps this error with the name of the property it occurred under.
    pub fn in_property(self, property: impl Into<String>) -> Self {
        ResolveError::InProperty {
            property: property.into(),
            cause: Box::new(self),
        }
    }

    /// Returns true if the root cause is a missing definition, however deeply nested.
    pub fn is_missing_definition(&self) -> bool {
        match self {
            ResolveError::MissingDefinition { .. } => true,
            ResolveError::InProperty { cause, .. } => cause.is_missing_definition(),
            _ => false,
        }
    }

    /// Returns the innermost error, skipping property scopes.
    pub fn root_cause(&self) -> &ResolveError {
        match self {
            ResolveError::InProperty { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}

impl std::error::Error for ResolveError {}

/// The Global Error Enum.
///
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The document text is not valid JSON/YAML or lacks the expected top-level shape.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// A resolution failure that was not contained.
    #[display("Resolution Error: {_0}")]
    Resolve(ResolveError),

    /// A contained failure escalated under strict resolution.
    #[from(ignore)]
    #[display("Operation `{method} {path}` failed: {cause}")]
    Operation {
        /// Owning resource path.
        path: String,
        /// HTTP method of the failing operation.
        method: String,
        /// What went wrong.
        cause: ResolveError,
    },

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_property_scope_display() {
        let err = ResolveError::MissingDefinition {
            name: "Ghost".into(),
        }
        .in_property("owner");
        assert_eq!(
            err.to_string(),
            "property `owner`: definition `Ghost` not found"
        );
        assert!(err.is_missing_definition());
        assert_eq!(
            err.root_cause(),
            &ResolveError::MissingDefinition {
                name: "Ghost".into()
            }
        );
    }

    #[test]
    fn test_operation_error_names_path_and_method() {
        let err = AppError::Operation {
            path: "/pets".into(),
            method: "get".into(),
            cause: ResolveError::MalformedSchema("response `200` has no description".into()),
        };
        assert_eq!(
            err.to_string(),
            "Operation `get /pets` failed: malformed schema: response `200` has no description"
        );
    }
}
