#![deny(missing_docs)]

//! # Parameter Resolution
//!
//! Logic for normalising an operation's declared parameters and resolving the
//! schema each one carries.
//!
//! Only parameters with a `schema` (Swagger `in: body`) produce a definition;
//! query/path/header parameters describe their type inline and are skipped.

use crate::error::ResolveError;
use crate::oas::registry::DefinitionTable;
use crate::oas::resolver::schema::resolve_schema_with_options;
use crate::oas::resolver::ResolveOptions;
use crate::oas::schemas::SchemaNode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

type ParameterIdentity = (Option<String>, Option<String>, Option<String>);

/// A declared operation parameter, kept close to its raw form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Name of the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Location of the parameter (query, path, header, formData, body).
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Whether the parameter is required.
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Human readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Pointer into the document's shared `parameters` section.
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Raw body schema, typed lazily during resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    /// Every other keyword (`type`, `format`, `x-...`).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Parameter {
    /// Parses a raw parameter fragment.
    pub fn from_value(value: &Value) -> Result<Self, ResolveError> {
        serde_json::from_value(value.clone())
            .map_err(|e| ResolveError::MalformedSchema(format!("invalid parameter: {}", e)))
    }

    /// `(name, in)` of the parameter, looked through a shared `$ref` when it
    /// can be dereferenced. An unresolvable `$ref` is identified by itself.
    fn identity(&self, table: &DefinitionTable) -> ParameterIdentity {
        match &self.reference {
            Some(ref_str) => match table
                .shared_parameter(ref_str)
                .and_then(Parameter::from_value)
            {
                Ok(shared) => (shared.name, shared.location, None),
                Err(_) => (None, None, Some(ref_str.clone())),
            },
            None => (self.name.clone(), self.location.clone(), None),
        }
    }
}

/// Normalises a raw `parameters` value into `(key, Parameter)` pairs.
///
/// Accepts a Swagger list of parameter objects or a name-keyed mapping.
pub fn parameter_list(raw: &Value) -> Result<Vec<(String, Parameter)>, ResolveError> {
    match raw {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let param = Parameter::from_value(item)?;
                let key = param
                    .name
                    .clone()
                    .or_else(|| param.reference.clone())
                    .unwrap_or_else(|| idx.to_string());
                Ok((key, param))
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .map(|(key, item)| {
                let mut param = Parameter::from_value(item)?;
                if param.name.is_none() && param.reference.is_none() {
                    param.name = Some(key.clone());
                }
                Ok((key.clone(), param))
            })
            .collect(),
        _ => Err(ResolveError::MalformedSchema(
            "`parameters` must be a list or a mapping".to_string(),
        )),
    }
}

/// Merges path-level and operation-level parameters into one ordered mapping.
///
/// An operation parameter replaces a path parameter with the same name and
/// location, comparing shared `#/parameters` references by their target. A
/// name repeated under another location is keyed `name:in`.
pub fn merge_parameters(
    shared: Vec<(String, Parameter)>,
    own: Vec<(String, Parameter)>,
    table: &DefinitionTable,
) -> IndexMap<String, Parameter> {
    let mut merged: Vec<(ParameterIdentity, String, Parameter)> =
        Vec::with_capacity(shared.len() + own.len());
    for (key, param) in shared.into_iter().chain(own) {
        let identity = param.identity(table);
        match merged.iter_mut().find(|(existing, _, _)| *existing == identity) {
            Some(slot) => *slot = (identity, key, param),
            None => merged.push((identity, key, param)),
        }
    }

    let mut out = IndexMap::with_capacity(merged.len());
    for (_, key, param) in merged {
        let key = if out.contains_key(&key) {
            format!("{}:{}", key, param.location.as_deref().unwrap_or("unknown"))
        } else {
            key
        };
        out.insert(key, param);
    }
    out
}

/// Resolves the schema of each parameter, in declaration order.
///
/// - A parameter-level `$ref` is first replaced by the shared parameter it names.
/// - A parameter without `schema` is skipped.
/// - A schema that is (or wraps in `items`) a reference is resolved; any other
///   schema is appended unchanged.
///
/// The first failure aborts the whole list.
pub fn resolve_parameters(
    parameters: &IndexMap<String, Parameter>,
    table: &DefinitionTable,
    options: &ResolveOptions,
) -> Result<Vec<SchemaNode>, ResolveError> {
    let mut definitions = Vec::new();

    for (key, param) in parameters {
        let param: Cow<'_, Parameter> = match &param.reference {
            Some(ref_str) => Cow::Owned(
                Parameter::from_value(table.shared_parameter(ref_str)?)
                    .map_err(|e| e.in_property(key))?,
            ),
            None => Cow::Borrowed(param),
        };

        let raw = match &param.schema {
            Some(raw) => raw,
            None => {
                tracing::debug!(parameter = %key, "parameter has no schema, skipped");
                continue;
            }
        };

        let node = SchemaNode::from_value(raw).map_err(|e| e.in_property(key))?;
        definitions.push(resolve_schema_with_options(
            &node,
            table,
            Some(key.as_str()),
            options,
        )?);
    }

    Ok(definitions)
}
