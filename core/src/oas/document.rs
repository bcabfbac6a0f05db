#![deny(missing_docs)]

//! # Swagger Document Loading
//!
//! Turns JSON or YAML text into a `SwaggerDocument`, keeping the declaration
//! order of paths, methods, definitions and responses.

use crate::error::{AppError, AppResult};
use crate::oas::registry::DefinitionTable;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// HTTP methods a Swagger 2.0 path item may declare.
pub const HTTP_METHODS: [&str; 7] = ["get", "put", "post", "delete", "options", "head", "patch"];

/// The parts of a Swagger 2.0 document the resolver needs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SwaggerDocument {
    /// Declared Swagger version; YAML may hand it over as a number.
    #[serde(default)]
    pub swagger: Option<Value>,
    /// Document metadata.
    #[serde(default)]
    pub info: IndexMap<String, Value>,
    /// Path templates in declaration order.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Named schema definitions.
    #[serde(default)]
    pub definitions: IndexMap<String, Value>,
    /// Shared parameters, targeted by `#/parameters/...`.
    #[serde(default)]
    pub parameters: IndexMap<String, Value>,
    /// Shared responses, targeted by `#/responses/...`.
    #[serde(default)]
    pub responses: IndexMap<String, Value>,
}

/// A single entry of `paths`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PathItem {
    /// Parameters shared by every operation of the path.
    #[serde(default)]
    pub parameters: Option<Value>,
    /// Methods plus anything else declared (`$ref`, `x-...`).
    #[serde(flatten)]
    pub entries: IndexMap<String, Value>,
}

impl PathItem {
    /// Iterates `(method, raw operation)` pairs in declaration order.
    ///
    /// Keys that are not HTTP methods are skipped.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().filter_map(|(key, op)| {
            if HTTP_METHODS.iter().any(|m| m.eq_ignore_ascii_case(key)) {
                Some((key.as_str(), op))
            } else {
                tracing::debug!(key = %key, "ignoring non-method path item key");
                None
            }
        })
    }
}

impl SwaggerDocument {
    /// Builds the definitions table for this document.
    pub fn definition_table(&self) -> DefinitionTable {
        DefinitionTable::from_definitions(self.definitions.clone())
            .with_shared(self.parameters.clone(), self.responses.clone())
    }

    /// The declared Swagger version as text.
    pub fn version(&self) -> Option<String> {
        match self.swagger.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// The `info.title`, if declared.
    pub fn title(&self) -> Option<&str> {
        self.info.get("title").and_then(Value::as_str)
    }
}

/// Parses Swagger JSON or YAML text.
///
/// YAML is read first so that unquoted status codes (`200:`) become string keys.
pub fn parse_swagger_document(content: &str) -> AppResult<SwaggerDocument> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| AppError::Parse(format!("Failed to parse Swagger document: {}", e)))?;
    let raw = serde_json::to_value(yaml)
        .map_err(|e| AppError::Parse(format!("Unsupported YAML construct: {}", e)))?;
    document_from_value(raw)
}

/// Builds a document from an already decoded JSON value.
pub fn document_from_value(raw: Value) -> AppResult<SwaggerDocument> {
    if !raw.is_object() {
        return Err(AppError::Parse(
            "Swagger document root must be a mapping".into(),
        ));
    }
    if raw.get("openapi").is_some() && raw.get("swagger").is_none() {
        return Err(AppError::Parse(
            "OpenAPI 3 documents are not supported; expected `swagger: \"2.0\"`".into(),
        ));
    }
    serde_json::from_value(raw)
        .map_err(|e| AppError::Parse(format!("Invalid Swagger document: {}", e)))
}

/// Reads and parses a Swagger file, returning its file name alongside.
pub fn load_swagger_file(path: &Path) -> AppResult<(String, SwaggerDocument)> {
    let content = fs::read_to_string(path)?;
    let source_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((source_name, parse_swagger_document(&content)?))
}
