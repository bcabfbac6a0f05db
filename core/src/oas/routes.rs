#![deny(missing_docs)]

//! # Operation / Resource Assembly
//!
//! Walks every path and method of a document, runs the parameter and response
//! resolvers, and composes the results into a `ParsedApi`.
//!
//! Failures are contained per list: a failing parameter list or response list
//! becomes empty and is recorded as a `Degradation`, unless strict resolution
//! asks for the first one to abort the document.

use crate::error::{AppError, AppResult, ResolveError};
use crate::oas::document::{load_swagger_file, parse_swagger_document, PathItem, SwaggerDocument};
use crate::oas::models::{Degradation, DegradedList, Operation, ParsedApi, Resource, Response};
use crate::oas::registry::DefinitionTable;
use crate::oas::resolver::params::{merge_parameters, parameter_list};
use crate::oas::resolver::responses::response_map;
use crate::oas::resolver::{resolve_parameters, resolve_responses, Parameter, ResolveOptions};
use crate::oas::schemas::SchemaNode;
use indexmap::IndexMap;
use serde_json::Value;
use std::path::Path;

/// Parses Swagger text and resolves it into a `ParsedApi`.
pub fn parse_api(source_name: &str, content: &str, options: &ResolveOptions) -> AppResult<ParsedApi> {
    let document = parse_swagger_document(content)?;
    assemble_api(source_name, &document, options)
}

/// Reads a Swagger file and resolves it into a `ParsedApi` named after the file.
pub fn load_api(path: &Path, options: &ResolveOptions) -> AppResult<ParsedApi> {
    let (source_name, document) = load_swagger_file(path)?;
    assemble_api(&source_name, &document, options)
}

/// Resolves every operation of `document`.
///
/// Builds the definitions table once, then visits paths, methods, parameters
/// and responses in declaration order.
pub fn assemble_api(
    source_name: &str,
    document: &SwaggerDocument,
    options: &ResolveOptions,
) -> AppResult<ParsedApi> {
    let table = document.definition_table();
    let mut degradations = Vec::new();
    let mut resources = Vec::with_capacity(document.paths.len());

    for (path, item) in &document.paths {
        let mut operations = Vec::new();
        for (method, raw_op) in item.operations() {
            let mut ctx = OperationContext {
                path,
                method,
                options,
                degradations: &mut degradations,
            };
            operations.push(assemble_operation(&mut ctx, item, raw_op, &table)?);
        }
        resources.push(Resource {
            path: path.clone(),
            operations,
        });
    }

    tracing::info!(
        source = %source_name,
        resources = resources.len(),
        definitions = table.len(),
        degraded = degradations.len(),
        "document resolved"
    );

    Ok(ParsedApi {
        source_name: source_name.to_string(),
        info: document.info.clone(),
        resources,
        degradations,
    })
}

struct OperationContext<'a> {
    path: &'a str,
    method: &'a str,
    options: &'a ResolveOptions,
    degradations: &'a mut Vec<Degradation>,
}

impl OperationContext<'_> {
    /// Records a contained failure, or escalates it under strict resolution.
    fn contain(&mut self, list: DegradedList, error: ResolveError) -> AppResult<()> {
        if self.options.strict {
            return Err(AppError::Operation {
                path: self.path.to_string(),
                method: self.method.to_string(),
                cause: error,
            });
        }

        tracing::warn!(
            path = %self.path,
            method = %self.method,
            list = %list,
            error = %error,
            "resolution failed, list degraded to empty"
        );
        self.degradations.push(Degradation {
            path: self.path.to_string(),
            method: self.method.to_string(),
            list,
            error,
        });
        Ok(())
    }
}

fn assemble_operation(
    ctx: &mut OperationContext<'_>,
    item: &PathItem,
    raw_op: &Value,
    table: &DefinitionTable,
) -> AppResult<Operation> {
    let (parameters, definitions) = match operation_parameters(item, raw_op, table, ctx.options) {
        Ok(resolved) => resolved,
        Err((declared, error)) => {
            ctx.contain(DegradedList::Parameters, error)?;
            (declared, Vec::new())
        }
    };

    let responses = match operation_responses(raw_op, table, ctx.options) {
        Ok(responses) => responses,
        Err(error) => {
            ctx.contain(DegradedList::Responses, error)?;
            Vec::new()
        }
    };

    Ok(Operation {
        method: ctx.method.to_string(),
        parameters,
        definitions,
        responses,
    })
}

type ParameterFailure = (Vec<Parameter>, ResolveError);

/// Declared parameters plus their resolved schemas.
///
/// On failure the declared list is still returned when it could be read.
fn operation_parameters(
    item: &PathItem,
    raw_op: &Value,
    table: &DefinitionTable,
    options: &ResolveOptions,
) -> Result<(Vec<Parameter>, Vec<SchemaNode>), ParameterFailure> {
    let declared = declared_parameters(item, raw_op, table).map_err(|e| (Vec::new(), e))?;
    match resolve_parameters(&declared, table, options) {
        Ok(definitions) => Ok((declared.into_values().collect(), definitions)),
        Err(error) => Err((declared.into_values().collect(), error)),
    }
}

fn declared_parameters(
    item: &PathItem,
    raw_op: &Value,
    table: &DefinitionTable,
) -> Result<IndexMap<String, Parameter>, ResolveError> {
    if !raw_op.is_object() {
        return Err(ResolveError::MalformedSchema(
            "operation is not a mapping".to_string(),
        ));
    }
    let shared = match &item.parameters {
        Some(raw) => parameter_list(raw)?,
        None => Vec::new(),
    };
    let own = match raw_op.get("parameters") {
        Some(raw) => parameter_list(raw)?,
        None => Vec::new(),
    };
    Ok(merge_parameters(shared, own, table))
}

fn operation_responses(
    raw_op: &Value,
    table: &DefinitionTable,
    options: &ResolveOptions,
) -> Result<Vec<Response>, ResolveError> {
    if !raw_op.is_object() {
        return Err(ResolveError::MalformedSchema(
            "operation is not a mapping".to_string(),
        ));
    }
    match raw_op.get("responses") {
        Some(raw) => resolve_responses(&response_map(raw)?, table, options),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::resolver::ResolutionDepth;

    const PETSTORE: &str = r##"
swagger: "2.0"
info:
  title: Petstore
  version: "1.0"
paths:
  /pets:
    parameters:
      - name: trace
        in: header
        type: string
    get:
      parameters:
        - name: limit
          in: query
          type: integer
      responses:
        "200":
          description: A list of pets
          schema:
            type: array
            items:
              $ref: "#/definitions/Pet"
    post:
      parameters:
        - name: pet
          in: body
          schema:
            $ref: "#/definitions/Pet"
      responses:
        "201":
          description: Created
  /ghosts:
    get:
      responses:
        "200":
          description: Boo
          schema:
            $ref: "#/definitions/Ghost"
definitions:
  Pet:
    type: object
    properties:
      name:
        type: string
      tag:
        $ref: "#/definitions/Tag"
  Tag:
    properties:
      id:
        type: integer
"##;

    #[test]
    fn test_assembles_in_declaration_order() {
        let api = parse_api("petstore.yaml", PETSTORE, &ResolveOptions::default()).unwrap();

        assert_eq!(api.source_name, "petstore.yaml");
        assert_eq!(api.info_str("title"), Some("Petstore"));
        let paths: Vec<_> = api.resources.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/pets", "/ghosts"]);
        let methods: Vec<_> = api.resources[0]
            .operations
            .iter()
            .map(|o| o.method.as_str())
            .collect();
        assert_eq!(methods, vec!["get", "post"]);
    }

    #[test]
    fn test_path_parameters_are_merged() {
        let api = parse_api("petstore.yaml", PETSTORE, &ResolveOptions::default()).unwrap();
        let get = &api.resources[0].operations[0];
        let names: Vec<_> = get
            .parameters
            .iter()
            .map(|p| p.name.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["trace", "limit"]);
        assert!(get.definitions.is_empty());
    }

    #[test]
    fn test_missing_definition_is_contained() {
        let api = parse_api("petstore.yaml", PETSTORE, &ResolveOptions::default()).unwrap();

        let ghost = &api.resources[1].operations[0];
        assert!(ghost.responses.is_empty());
        assert_eq!(api.degradations.len(), 1);
        assert_eq!(api.degradations[0].path, "/ghosts");
        assert_eq!(api.degradations[0].method, "get");
        assert_eq!(api.degradations[0].list, DegradedList::Responses);
        assert!(api.degradations[0].error.is_missing_definition());

        let post = &api.resources[0].operations[1];
        assert_eq!(post.definitions.len(), 1);
        assert_eq!(post.responses[0].status_key, "201");
    }

    #[test]
    fn test_strict_escalates_first_failure() {
        let options = ResolveOptions::default().with_strict(true);
        let err = parse_api("petstore.yaml", PETSTORE, &options).unwrap_err();
        match err {
            AppError::Operation { path, method, cause } => {
                assert_eq!(path, "/ghosts");
                assert_eq!(method, "get");
                assert!(cause.is_missing_definition());
            }
            other => panic!("expected operation error, got {}", other),
        }
    }

    #[test]
    fn test_malformed_operation_degrades_both_lists() {
        let yaml = "swagger: '2.0'\npaths:\n  /x:\n    get: nope\n";
        let api = parse_api("x.yaml", yaml, &ResolveOptions::default()).unwrap();
        let lists: Vec<_> = api.degradations.iter().map(|d| d.list).collect();
        assert_eq!(lists, vec![DegradedList::Parameters, DegradedList::Responses]);
        assert!(api.resources[0].operations[0].responses.is_empty());
    }

    #[test]
    fn test_deep_option_reaches_assembler() {
        let options = ResolveOptions {
            depth: ResolutionDepth::Deep,
            strict: false,
        };
        let api = parse_api("petstore.yaml", PETSTORE, &options).unwrap();
        let post = &api.resources[0].operations[1];
        assert!(!post.definitions[0].contains_reference());
    }
}
