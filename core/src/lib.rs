#![deny(missing_docs)]

//! # Specdigest Core
//!
//! Resolves the schema references of a Swagger 2.0 document into a
//! self-contained `ParsedApi`: every parameter and response schema that points
//! at a definition is replaced by that definition's content.
//!
//! ```
//! use specdigest_core::{parse_api, ResolveOptions};
//!
//! let yaml = r##"
//! swagger: "2.0"
//! info: {title: Pets}
//! paths:
//!   /pets:
//!     get:
//!       responses:
//!         "200":
//!           description: OK
//!           schema: {$ref: "#/definitions/Pet"}
//! definitions:
//!   Pet:
//!     properties:
//!       name: {type: string}
//! "##;
//!
//! let api = parse_api("pets.yaml", yaml, &ResolveOptions::default()).unwrap();
//! let (path, response) = api.paths_with_response()[0];
//! assert_eq!(path, "/pets");
//! assert!(response.schema.properties().unwrap().contains_key("name"));
//! ```

/// Shared error types.
pub mod error;

/// Swagger loading, reference resolution and assembly.
pub mod oas;

pub use error::{AppError, AppResult, ResolveError};
pub use oas::{
    assemble_api, load_api, load_swagger_file, parse_api, parse_swagger_document,
    Degradation, DegradedList, DefinitionTable, Operation, ParsedApi, Resource, ResolutionDepth,
    ResolveOptions, Response, SchemaNode, SwaggerDocument,
};
