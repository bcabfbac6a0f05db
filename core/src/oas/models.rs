#![deny(missing_docs)]

//! # API Models
//!
//! The fully resolved in-memory model of one document.
//!
//! Every value here is built once by the assembler and then only read; a
//! `ParsedApi` owns everything below it.

use crate::error::ResolveError;
use crate::oas::resolver::Parameter;
use crate::oas::schemas::SchemaNode;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One declared response of an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// Status code or `default`.
    pub status_key: String,
    /// The declared description.
    pub description: String,
    /// Best-effort resolved schema; empty when the response declares none.
    pub schema: SchemaNode,
}

/// One HTTP method declared under a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    /// Lowercase HTTP method, as declared.
    pub method: String,
    /// Declared parameters, path-level ones merged in.
    pub parameters: Vec<Parameter>,
    /// Resolved parameter schemas, in declaration order.
    pub definitions: Vec<SchemaNode>,
    /// Resolved responses, in declaration order.
    pub responses: Vec<Response>,
}

impl Operation {
    /// The first declared response, if any.
    pub fn primary_response(&self) -> Option<&Response> {
        self.responses.first()
    }
}

/// All operations of one path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// The path template, e.g. `/pets/{petId}`.
    pub path: String,
    /// Operations in declaration order.
    pub operations: Vec<Operation>,
}

/// Which list of an operation was degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedList {
    /// The parameter definitions list.
    Parameters,
    /// The response list.
    Responses,
}

impl fmt::Display for DegradedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedList::Parameters => write!(f, "parameters"),
            DegradedList::Responses => write!(f, "responses"),
        }
    }
}

/// A list that was reduced to empty because resolution failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Degradation {
    /// Owning resource path.
    pub path: String,
    /// HTTP method of the affected operation.
    pub method: String,
    /// The list that was emptied.
    pub list: DegradedList,
    /// Why.
    pub error: ResolveError,
}

/// The resolved model of one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedApi {
    /// Identifying name of the source document (usually the file name).
    pub source_name: String,
    /// The document's `info` metadata.
    pub info: IndexMap<String, Value>,
    /// Resources in path declaration order.
    pub resources: Vec<Resource>,
    /// Every contained failure, in the order it occurred.
    pub degradations: Vec<Degradation>,
}

impl ParsedApi {
    /// Pairs each operation's first response with its owning path.
    ///
    /// Operations without responses (including degraded ones) are left out.
    pub fn paths_with_response(&self) -> Vec<(&str, &Response)> {
        self.resources
            .iter()
            .flat_map(|resource| {
                resource
                    .operations
                    .iter()
                    .filter_map(move |op| op.primary_response().map(|r| (resource.path.as_str(), r)))
            })
            .collect()
    }

    /// Iterates every operation with its owning path.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.resources.iter().flat_map(|resource| {
            resource
                .operations
                .iter()
                .map(move |op| (resource.path.as_str(), op))
        })
    }

    /// Returns true if any list was degraded.
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }

    /// Looks up a string field of `info` (e.g. `title`).
    pub fn info_str(&self, key: &str) -> Option<&str> {
        self.info.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: &str) -> Response {
        Response {
            status_key: status.to_string(),
            description: format!("{} response", status),
            schema: SchemaNode::empty(),
        }
    }

    fn operation(method: &str, responses: Vec<Response>) -> Operation {
        Operation {
            method: method.to_string(),
            parameters: Vec::new(),
            definitions: Vec::new(),
            responses,
        }
    }

    #[test]
    fn test_paths_with_response_takes_first_and_skips_empty() {
        let api = ParsedApi {
            source_name: "pets.json".into(),
            info: IndexMap::new(),
            resources: vec![
                Resource {
                    path: "/pets".into(),
                    operations: vec![
                        operation("get", vec![response("200"), response("404")]),
                        operation("post", Vec::new()),
                    ],
                },
                Resource {
                    path: "/stores".into(),
                    operations: vec![operation("get", vec![response("default")])],
                },
            ],
            degradations: Vec::new(),
        };

        let view: Vec<_> = api
            .paths_with_response()
            .into_iter()
            .map(|(path, r)| (path, r.status_key.as_str()))
            .collect();
        assert_eq!(view, vec![("/pets", "200"), ("/stores", "default")]);
        assert_eq!(api.operations().count(), 3);
        assert!(!api.is_degraded());
    }

    #[test]
    fn test_degraded_list_display() {
        assert_eq!(DegradedList::Parameters.to_string(), "parameters");
        assert_eq!(DegradedList::Responses.to_string(), "responses");
    }
}
