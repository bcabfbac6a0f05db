#![deny(missing_docs)]

//! # Reference Resolution
//!
//! Substitutes `$ref` pointers with the definitions they name.
//!
//! The default (shallow) contract performs one dereference of the top-level
//! reference followed by exactly one property-level pass over the referent:
//! - a property that is an array whose `items` is a reference gets its `items`
//!   replaced by the referent, keeping the `type: array` wrapper;
//! - a property that is itself a reference is replaced by the referent.
//!
//! Referents substituted during the property pass are used as declared; their
//! own references stay in place. Deep resolution lifts that limit and guards
//! against cycles with the stack of definitions being expanded.

use crate::error::ResolveError;
use crate::oas::registry::DefinitionTable;
use crate::oas::resolver::{ResolutionDepth, ResolveOptions};
use crate::oas::schemas::{ArraySchema, ObjectSchema, Reference, SchemaNode};
use indexmap::IndexMap;

/// Resolves a fragment under the given options.
///
/// `property_key` names the property the fragment sits under, if any, and is
/// only used to scope errors.
pub fn resolve_schema_with_options(
    node: &SchemaNode,
    table: &DefinitionTable,
    property_key: Option<&str>,
    options: &ResolveOptions,
) -> Result<SchemaNode, ResolveError> {
    match options.depth {
        ResolutionDepth::Shallow => resolve_schema(node, table, property_key),
        ResolutionDepth::Deep => {
            resolve_schema_deep(node, table).map_err(|e| scope(e, property_key))
        }
    }
}

/// Resolves a fragment with the shallow, one-level contract.
///
/// - A reference is dereferenced and the referent's properties get one pass.
/// - An array whose `items` is a reference gets its `items` resolved the same way.
/// - Anything else is returned unchanged.
pub fn resolve_schema(
    node: &SchemaNode,
    table: &DefinitionTable,
    property_key: Option<&str>,
) -> Result<SchemaNode, ResolveError> {
    match node {
        SchemaNode::Reference(reference) => {
            dereference(reference, table).map_err(|e| scope(e, property_key))
        }
        SchemaNode::Array(array) => match array.items.as_deref() {
            Some(SchemaNode::Reference(reference)) => {
                let items = dereference(reference, table)
                    .map_err(|e| scope(e.in_property("items"), property_key))?;
                Ok(SchemaNode::Array(ArraySchema {
                    items: Some(Box::new(items)),
                    keywords: array.keywords.clone(),
                }))
            }
            _ => Ok(node.clone()),
        },
        _ => Ok(node.clone()),
    }
}

/// Looks up a reference and applies the property-level pass to the referent.
fn dereference(
    reference: &Reference,
    table: &DefinitionTable,
) -> Result<SchemaNode, ResolveError> {
    let referent = table.lookup(reference)?;
    expand_properties(referent, table)
}

/// Applies one substitution pass to each declared property of `referent`.
///
/// A referent without declared properties is returned verbatim.
pub fn expand_properties(
    referent: SchemaNode,
    table: &DefinitionTable,
) -> Result<SchemaNode, ResolveError> {
    match referent {
        SchemaNode::Object(obj) if !obj.properties.is_empty() => {
            let mut properties = IndexMap::with_capacity(obj.properties.len());
            for (key, prop) in obj.properties {
                let resolved = substitute_property(&prop, table).map_err(|e| e.in_property(&key))?;
                properties.insert(key, resolved);
            }
            Ok(SchemaNode::Object(ObjectSchema {
                properties,
                keywords: obj.keywords,
            }))
        }
        other => Ok(other),
    }
}

/// One level of substitution for a single property. Arrays are checked first.
fn substitute_property(
    prop: &SchemaNode,
    table: &DefinitionTable,
) -> Result<SchemaNode, ResolveError> {
    match prop {
        SchemaNode::Array(array) => match array.items.as_deref() {
            Some(SchemaNode::Reference(reference)) => {
                let items = table
                    .lookup(reference)
                    .map_err(|e| e.in_property("items"))?;
                Ok(SchemaNode::Array(ArraySchema {
                    items: Some(Box::new(items)),
                    keywords: array.keywords.clone(),
                }))
            }
            _ => Ok(prop.clone()),
        },
        SchemaNode::Reference(reference) => table.lookup(reference),
        _ => Ok(prop.clone()),
    }
}

/// Resolves every reachable reference, failing on cycles.
pub fn resolve_schema_deep(
    node: &SchemaNode,
    table: &DefinitionTable,
) -> Result<SchemaNode, ResolveError> {
    let mut in_flight = Vec::new();
    resolve_deep_inner(node, table, &mut in_flight)
}

fn resolve_deep_inner(
    node: &SchemaNode,
    table: &DefinitionTable,
    in_flight: &mut Vec<String>,
) -> Result<SchemaNode, ResolveError> {
    match node {
        SchemaNode::Reference(reference) => {
            let name = reference.name()?;
            if in_flight.contains(&name) {
                let mut chain = in_flight.clone();
                chain.push(name);
                return Err(ResolveError::CyclicReference(chain.join(" -> ")));
            }
            let referent = table.lookup_name(&name)?;
            in_flight.push(name);
            let resolved = resolve_deep_inner(&referent, table, in_flight);
            in_flight.pop();
            resolved
        }
        SchemaNode::Object(obj) => {
            let mut properties = IndexMap::with_capacity(obj.properties.len());
            for (key, prop) in &obj.properties {
                let resolved =
                    resolve_deep_inner(prop, table, in_flight).map_err(|e| e.in_property(key))?;
                properties.insert(key.clone(), resolved);
            }
            Ok(SchemaNode::Object(ObjectSchema {
                properties,
                keywords: obj.keywords.clone(),
            }))
        }
        SchemaNode::Array(array) => {
            let items = match array.items.as_deref() {
                Some(items) => Some(Box::new(
                    resolve_deep_inner(items, table, in_flight)
                        .map_err(|e| e.in_property("items"))?,
                )),
                None => None,
            };
            Ok(SchemaNode::Array(ArraySchema {
                items,
                keywords: array.keywords.clone(),
            }))
        }
        SchemaNode::Scalar(_) => Ok(node.clone()),
    }
}

fn scope(err: ResolveError, property_key: Option<&str>) -> ResolveError {
    match property_key {
        Some(key) => err.in_property(key),
        None => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn pet_table() -> DefinitionTable {
        let mut table = DefinitionTable::new();
        table.insert(
            "Pet",
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "tag": {"$ref": "#/definitions/Tag"},
                    "friends": {"type": "array", "items": {"$ref": "#/definitions/Tag"}}
                }
            }),
        );
        table.insert(
            "Tag",
            json!({"properties": {"id": {"type": "integer"}}}),
        );
        table
    }

    fn node(value: Value) -> SchemaNode {
        SchemaNode::from_value(&value).unwrap()
    }

    #[test]
    fn test_reference_to_object_gets_property_pass() {
        let table = pet_table();
        let resolved =
            resolve_schema(&SchemaNode::reference("#/definitions/Pet"), &table, None).unwrap();

        assert_eq!(
            resolved.to_value(),
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "tag": {"properties": {"id": {"type": "integer"}}},
                    "friends": {
                        "type": "array",
                        "items": {"properties": {"id": {"type": "integer"}}}
                    }
                }
            })
        );
    }

    #[test]
    fn test_reference_without_properties_is_verbatim() {
        let mut table = DefinitionTable::new();
        table.insert("Id", json!({"type": "string", "format": "uuid"}));
        let resolved =
            resolve_schema(&SchemaNode::reference("#/definitions/Id"), &table, None).unwrap();
        assert_eq!(resolved, node(json!({"type": "string", "format": "uuid"})));
    }

    #[test]
    fn test_array_of_reference_keeps_wrapper() {
        let table = pet_table();
        let input = node(json!({"type": "array", "items": {"$ref": "#/definitions/Pet"}}));
        let resolved = resolve_schema(&input, &table, None).unwrap();

        assert_eq!(resolved.schema_type(), Some("array"));
        let items = resolved.items().unwrap();
        assert_eq!(
            items,
            &resolve_schema(&SchemaNode::reference("#/definitions/Pet"), &table, None).unwrap()
        );
    }

    #[test]
    fn test_shallow_stops_after_one_property_pass() {
        let mut table = DefinitionTable::new();
        table.insert("A", json!({"properties": {"b": {"$ref": "#/definitions/B"}}}));
        table.insert("B", json!({"properties": {"c": {"$ref": "#/definitions/C"}}}));
        table.insert("C", json!({"type": "string"}));

        let resolved =
            resolve_schema(&SchemaNode::reference("#/definitions/A"), &table, None).unwrap();
        let b = &resolved.properties().unwrap()["b"];
        assert_eq!(
            b.properties().unwrap()["c"],
            SchemaNode::reference("#/definitions/C")
        );
    }

    #[test]
    fn test_non_reference_is_identity() {
        let table = pet_table();
        let input = node(json!({
            "type": "object",
            "properties": {"tag": {"$ref": "#/definitions/Tag"}}
        }));
        assert_eq!(resolve_schema(&input, &table, None).unwrap(), input);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let table = pet_table();
        let once =
            resolve_schema(&SchemaNode::reference("#/definitions/Pet"), &table, None).unwrap();
        let twice = resolve_schema(&once, &table, None).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_top_level_definition() {
        let table = pet_table();
        let err = resolve_schema(&SchemaNode::reference("#/definitions/Ghost"), &table, None)
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::MissingDefinition {
                name: "Ghost".into()
            }
        );
    }

    #[test]
    fn test_missing_nested_definition_is_scoped() {
        let mut table = DefinitionTable::new();
        table.insert(
            "Owner",
            json!({"properties": {"pets": {"type": "array", "items": {"$ref": "#/definitions/Ghost"}}}}),
        );
        let err = resolve_schema(
            &SchemaNode::reference("#/definitions/Owner"),
            &table,
            Some("body"),
        )
        .unwrap_err();

        assert!(err.is_missing_definition());
        assert_eq!(
            err.to_string(),
            "property `body`: property `pets`: property `items`: definition `Ghost` not found"
        );
    }

    #[test]
    fn test_deep_resolves_every_level() {
        let mut table = DefinitionTable::new();
        table.insert("A", json!({"properties": {"b": {"$ref": "#/definitions/B"}}}));
        table.insert(
            "B",
            json!({"properties": {"c": {"type": "array", "items": {"$ref": "#/definitions/C"}}}}),
        );
        table.insert("C", json!({"type": "string"}));

        let resolved =
            resolve_schema_deep(&SchemaNode::reference("#/definitions/A"), &table).unwrap();
        assert!(!resolved.contains_reference());
        assert_eq!(
            resolved.to_value(),
            json!({"properties": {"b": {"properties": {"c": {"type": "array", "items": {"type": "string"}}}}}})
        );
    }

    #[test]
    fn test_deep_detects_cycles() {
        let mut table = DefinitionTable::new();
        table.insert("Node", json!({"properties": {"next": {"$ref": "#/definitions/Next"}}}));
        table.insert("Next", json!({"properties": {"back": {"$ref": "#/definitions/Node"}}}));

        let err =
            resolve_schema_deep(&SchemaNode::reference("#/definitions/Node"), &table).unwrap_err();
        assert_eq!(
            err.root_cause(),
            &ResolveError::CyclicReference("Node -> Next -> Node".into())
        );
    }

    #[test]
    fn test_deep_allows_repeated_siblings() {
        let mut table = DefinitionTable::new();
        table.insert(
            "Pair",
            json!({"properties": {
                "left": {"$ref": "#/definitions/Leaf"},
                "right": {"$ref": "#/definitions/Leaf"}
            }}),
        );
        table.insert("Leaf", json!({"type": "integer"}));

        let resolved =
            resolve_schema_deep(&SchemaNode::reference("#/definitions/Pair"), &table).unwrap();
        let props = resolved.properties().unwrap();
        assert_eq!(props["left"], props["right"]);
    }

    #[test]
    fn test_options_dispatch() {
        let mut table = DefinitionTable::new();
        table.insert("A", json!({"properties": {"b": {"$ref": "#/definitions/B"}}}));
        table.insert("B", json!({"properties": {"c": {"$ref": "#/definitions/C"}}}));
        table.insert("C", json!({"type": "string"}));
        let input = SchemaNode::reference("#/definitions/A");

        let shallow =
            resolve_schema_with_options(&input, &table, None, &ResolveOptions::default()).unwrap();
        assert!(shallow.contains_reference());

        let deep = resolve_schema_with_options(&input, &table, None, &ResolveOptions::deep())
            .unwrap();
        assert!(!deep.contains_reference());
    }
}
