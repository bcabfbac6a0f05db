#![deny(missing_docs)]

//! # Schema Nodes
//!
//! Typed representation of Swagger schema fragments.
//!
//! A fragment is classified into one of four shapes: array, reference, object or
//! scalar, checked in that order. Keywords the resolver does not interpret
//! (`type`, `format`, `required`, `description`, ...) are carried verbatim so a
//! fragment without references round-trips unchanged.

use crate::error::ResolveError;
use crate::oas::ref_utils::extract_ref_name;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A `$ref` pointer naming another schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    /// The raw pointer, e.g. `#/definitions/Pet`.
    pub pointer: String,
}

impl Reference {
    /// Creates a reference from a raw pointer string.
    pub fn new(pointer: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
        }
    }

    /// Returns the bare definition name this reference targets.
    pub fn name(&self) -> Result<String, ResolveError> {
        extract_ref_name(&self.pointer, "definitions")
    }
}

/// A leaf fragment (`type: string`, `type: integer`, or untyped).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScalarSchema {
    /// All keywords of the fragment.
    pub keywords: Map<String, Value>,
}

/// A fragment with declared `properties`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    /// Declared properties in declaration order.
    pub properties: IndexMap<String, SchemaNode>,
    /// Remaining keywords (`type`, `required`, ...).
    pub keywords: Map<String, Value>,
}

/// A fragment with `type: array` or an `items` keyword.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArraySchema {
    /// The element schema, if declared.
    pub items: Option<Box<SchemaNode>>,
    /// Remaining keywords (`type`, `minItems`, ...).
    pub keywords: Map<String, Value>,
}

/// A JSON-Schema-like fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum SchemaNode {
    /// A pointer to a named definition.
    Reference(Reference),
    /// A typed or untyped leaf.
    Scalar(ScalarSchema),
    /// An object with declared properties.
    Object(ObjectSchema),
    /// An array, optionally with an element schema.
    Array(ArraySchema),
}

impl SchemaNode {
    /// The empty schema `{}`, used for responses that declare no body.
    pub fn empty() -> Self {
        SchemaNode::Scalar(ScalarSchema::default())
    }

    /// Creates a reference node.
    pub fn reference(pointer: impl Into<String>) -> Self {
        SchemaNode::Reference(Reference::new(pointer))
    }

    /// Returns true for the empty schema `{}`.
    pub fn is_empty(&self) -> bool {
        matches!(self, SchemaNode::Scalar(s) if s.keywords.is_empty())
    }

    /// Returns the reference if this node is one.
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            SchemaNode::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the declared properties of an object node.
    pub fn properties(&self) -> Option<&IndexMap<String, SchemaNode>> {
        match self {
            SchemaNode::Object(obj) => Some(&obj.properties),
            _ => None,
        }
    }

    /// Returns the element schema of an array node.
    pub fn items(&self) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Array(arr) => arr.items.as_deref(),
            _ => None,
        }
    }

    /// Returns the `type` keyword, if any.
    pub fn schema_type(&self) -> Option<&str> {
        let keywords = match self {
            SchemaNode::Reference(_) => return None,
            SchemaNode::Scalar(s) => &s.keywords,
            SchemaNode::Object(o) => &o.keywords,
            SchemaNode::Array(a) => &a.keywords,
        };
        keywords.get("type").and_then(Value::as_str)
    }

    /// Returns true if any reachable node is a reference.
    pub fn contains_reference(&self) -> bool {
        match self {
            SchemaNode::Reference(_) => true,
            SchemaNode::Scalar(_) => false,
            SchemaNode::Object(obj) => obj.properties.values().any(SchemaNode::contains_reference),
            SchemaNode::Array(arr) => arr
                .items
                .as_deref()
                .is_some_and(SchemaNode::contains_reference),
        }
    }

    /// Converts a raw fragment into a typed node.
    pub fn from_value(value: &Value) -> Result<Self, ResolveError> {
        Self::try_from(value.clone())
    }

    /// Converts this node back into a raw fragment.
    pub fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}

fn describe_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

impl TryFrom<Value> for SchemaNode {
    type Error = ResolveError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut keywords = match value {
            Value::Object(map) => map,
            other => {
                return Err(ResolveError::MalformedSchema(format!(
                    "expected a schema object, found {}",
                    describe_kind(&other)
                )))
            }
        };

        let is_array = keywords.get("type").and_then(Value::as_str) == Some("array")
            || keywords.contains_key("items");
        if is_array {
            let items = match keywords.remove("items") {
                Some(items) => Some(Box::new(
                    SchemaNode::try_from(items).map_err(|e| e.in_property("items"))?,
                )),
                None => None,
            };
            return Ok(SchemaNode::Array(ArraySchema { items, keywords }));
        }

        if let Some(pointer) = keywords.remove("$ref") {
            return match pointer {
                Value::String(p) => Ok(SchemaNode::reference(p)),
                other => Err(ResolveError::MalformedSchema(format!(
                    "`$ref` must be a string, found {}",
                    describe_kind(&other)
                ))),
            };
        }

        if let Some(raw) = keywords.remove("properties") {
            let raw = match raw {
                Value::Object(map) => map,
                other => {
                    return Err(ResolveError::MalformedSchema(format!(
                        "`properties` must be an object, found {}",
                        describe_kind(&other)
                    )))
                }
            };
            let mut properties = IndexMap::with_capacity(raw.len());
            for (key, prop) in raw {
                let node = SchemaNode::try_from(prop).map_err(|e| e.in_property(key.as_str()))?;
                properties.insert(key, node);
            }
            return Ok(SchemaNode::Object(ObjectSchema {
                properties,
                keywords,
            }));
        }

        Ok(SchemaNode::Scalar(ScalarSchema { keywords }))
    }
}

impl From<SchemaNode> for Value {
    fn from(node: SchemaNode) -> Self {
        match node {
            SchemaNode::Reference(r) => {
                let mut map = Map::new();
                map.insert("$ref".to_string(), Value::String(r.pointer));
                Value::Object(map)
            }
            SchemaNode::Scalar(s) => Value::Object(s.keywords),
            SchemaNode::Object(obj) => {
                let mut map = obj.keywords;
                let properties = obj
                    .properties
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect();
                map.insert("properties".to_string(), Value::Object(properties));
                Value::Object(map)
            }
            SchemaNode::Array(arr) => {
                let mut map = arr.keywords;
                if let Some(items) = arr.items {
                    map.insert("items".to_string(), Value::from(*items));
                }
                Value::Object(map)
            }
        }
    }
}
