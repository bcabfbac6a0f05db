#![deny(missing_docs)]

//! # Response Resolution
//!
//! Logic for resolving an operation's response map into `Response` records.

use crate::error::ResolveError;
use crate::oas::models::Response;
use crate::oas::registry::DefinitionTable;
use crate::oas::resolver::schema::resolve_schema_with_options;
use crate::oas::resolver::ResolveOptions;
use crate::oas::schemas::SchemaNode;
use indexmap::IndexMap;
use serde_json::Value;

/// Normalises a raw `responses` value into an ordered status → fragment map.
///
/// Vendor extensions (`x-...`) are not responses and are skipped.
pub fn response_map(raw: &Value) -> Result<IndexMap<String, Value>, ResolveError> {
    match raw {
        Value::Null => Ok(IndexMap::new()),
        Value::Object(map) => Ok(map
            .iter()
            .filter(|(key, _)| {
                let extension = key.starts_with("x-");
                if extension {
                    tracing::debug!(key = %key, "ignoring responses extension key");
                }
                !extension
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()),
        _ => Err(ResolveError::MalformedSchema(
            "`responses` must be a mapping".to_string(),
        )),
    }
}

/// Resolves every declared response, preserving declaration order.
///
/// - A response-level `$ref` is replaced by the shared response it names.
/// - A response without `schema` gets the empty schema.
/// - A schema that is (or wraps in `items`) a reference is resolved; any other
///   schema is used verbatim.
///
/// The first failure aborts the whole list.
pub fn resolve_responses(
    responses: &IndexMap<String, Value>,
    table: &DefinitionTable,
    options: &ResolveOptions,
) -> Result<Vec<Response>, ResolveError> {
    let mut resolved = Vec::with_capacity(responses.len());

    for (status_key, raw) in responses {
        let raw = match raw.get("$ref") {
            Some(Value::String(ref_str)) => table
                .shared_response(ref_str)
                .map_err(|e| e.in_property(status_key))?,
            Some(_) => {
                return Err(ResolveError::MalformedSchema(format!(
                    "response `{}` has a non-string `$ref`",
                    status_key
                )))
            }
            None => raw,
        };

        if !raw.is_object() {
            return Err(ResolveError::MalformedSchema(format!(
                "response `{}` is not an object",
                status_key
            )));
        }

        let description = raw
            .get("description")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ResolveError::MalformedSchema(format!(
                    "response `{}` has no description",
                    status_key
                ))
            })?;

        let schema = match raw.get("schema") {
            Some(fragment) => {
                let node =
                    SchemaNode::from_value(fragment).map_err(|e| e.in_property(status_key))?;
                resolve_schema_with_options(&node, table, Some(status_key.as_str()), options)?
            }
            None => SchemaNode::empty(),
        };

        resolved.push(Response {
            status_key: status_key.clone(),
            description: description.to_string(),
            schema,
        });
    }

    Ok(resolved)
}
