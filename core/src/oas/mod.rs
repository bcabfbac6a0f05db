#![deny(missing_docs)]

//! # Swagger Resolution Module
//!
//! - **document**: Loading Swagger 2.0 JSON/YAML into ordered raw fragments.
//! - **registry**: The per-document definitions table.
//! - **schemas**: Typed schema fragments.
//! - **resolver**: Reference, parameter and response resolution.
//! - **routes**: Assembly of operations and resources into a `ParsedApi`.
//! - **models**: The resolved output model.

pub mod document;
pub mod models;
pub(crate) mod ref_utils;
pub mod registry;
pub mod resolver;
pub mod routes;
pub mod schemas;

pub use document::{load_swagger_file, parse_swagger_document, PathItem, SwaggerDocument};
pub use models::{Degradation, DegradedList, Operation, ParsedApi, Resource, Response};
pub use registry::DefinitionTable;
pub use resolver::{ResolutionDepth, ResolveOptions};
pub use routes::{assemble_api, load_api, parse_api};
pub use schemas::{ArraySchema, ObjectSchema, Reference, ScalarSchema, SchemaNode};
