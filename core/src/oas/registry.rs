#![deny(missing_docs)]

//! # Definition Table
//!
//! Stores the named, reusable fragments of a single document: `definitions`
//! plus the shared `parameters` and `responses` sections.
//!
//! Fragments are kept raw and typed on lookup, so a malformed definition only
//! affects the operations that actually reference it. The table is read-only
//! once built.

use crate::error::ResolveError;
use crate::oas::ref_utils::extract_ref_name;
use crate::oas::schemas::{Reference, SchemaNode};
use indexmap::IndexMap;
use serde_json::Value;

/// Mapping of definition name to raw schema fragment, scoped to one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionTable {
    definitions: IndexMap<String, Value>,
    parameters: IndexMap<String, Value>,
    responses: IndexMap<String, Value>,
}

impl DefinitionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding only schema definitions.
    pub fn from_definitions(definitions: IndexMap<String, Value>) -> Self {
        Self {
            definitions,
            ..Self::default()
        }
    }

    /// Attaches the document's shared `parameters` and `responses` sections.
    pub fn with_shared(
        mut self,
        parameters: IndexMap<String, Value>,
        responses: IndexMap<String, Value>,
    ) -> Self {
        self.parameters = parameters;
        self.responses = responses;
        self
    }

    /// Adds or replaces a single definition.
    pub fn insert(&mut self, name: impl Into<String>, fragment: Value) {
        self.definitions.insert(name.into(), fragment);
    }

    /// Number of schema definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if there are no schema definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns true if a definition with this bare name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Iterates definition names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Dereferences a `$ref` into a typed, unresolved definition.
    pub fn lookup(&self, reference: &Reference) -> Result<SchemaNode, ResolveError> {
        let name = reference.name()?;
        self.lookup_name(&name)
    }

    /// Looks up a definition by bare name.
    pub fn lookup_name(&self, name: &str) -> Result<SchemaNode, ResolveError> {
        let raw = self
            .definitions
            .get(name)
            .ok_or_else(|| ResolveError::MissingDefinition {
                name: name.to_string(),
            })?;
        SchemaNode::from_value(raw)
    }

    /// Dereferences a parameter-level `$ref` (e.g. `#/parameters/limit`).
    pub fn shared_parameter(&self, ref_str: &str) -> Result<&Value, ResolveError> {
        shared_entry(&self.parameters, "parameters", ref_str)
    }

    /// Dereferences a response-level `$ref` (e.g. `#/responses/NotFound`).
    pub fn shared_response(&self, ref_str: &str) -> Result<&Value, ResolveError> {
        shared_entry(&self.responses, "responses", ref_str)
    }
}

fn shared_entry<'a>(
    section: &'a IndexMap<String, Value>,
    section_name: &str,
    ref_str: &str,
) -> Result<&'a Value, ResolveError> {
    let name = extract_ref_name(ref_str, section_name)?;
    section
        .get(&name)
        .ok_or_else(|| ResolveError::MissingComponent {
            section: section_name.to_string(),
            name,
        })
}
