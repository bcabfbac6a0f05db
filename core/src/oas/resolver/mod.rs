#![deny(missing_docs)]

//! # Resolver Module
//!
//! Logic for resolving Swagger schema fragments against a document's
//! definitions table.
//!
//! Handles:
//! - Reference substitution (shallow by default, deep with a cycle guard).
//! - Parameter resolution (Inline and Reference).
//! - Response resolution, preserving declaration order.

pub mod params;
pub mod responses;
pub mod schema;

pub use params::{resolve_parameters, Parameter};
pub use responses::resolve_responses;
pub use schema::{
    expand_properties, resolve_schema, resolve_schema_deep, resolve_schema_with_options,
};

/// How far reference substitution reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionDepth {
    /// One dereference plus one property-level pass.
    #[default]
    Shallow,
    /// Every reachable reference, with cycle detection.
    Deep,
}

/// Knobs for a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveOptions {
    /// Substitution depth.
    pub depth: ResolutionDepth,
    /// Escalate the first contained failure into a document-level error.
    pub strict: bool,
}

impl ResolveOptions {
    /// Deep resolution, lenient error handling.
    pub fn deep() -> Self {
        Self {
            depth: ResolutionDepth::Deep,
            strict: false,
        }
    }

    /// Returns a copy with strict error handling switched on or off.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
