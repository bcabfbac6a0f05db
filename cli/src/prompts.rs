#![deny(missing_docs)]

//! # Prompt Records
//!
//! Turns a resolved `ParsedApi` into question records for downstream
//! generation, one JSON object per line.

use crate::error::CliResult;
use serde::Serialize;
use serde_json::{json, Value};
use specdigest_core::ParsedApi;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

const ENDPOINT_SYSTEM: &str = "You are to be given questions about REST API Endpoints. \
Your answers are to be given in code or text. Give no explanation, and only give the answer \
in the following format, no fluff text: url: <url> headers: <headers> params: <params> \
body: <body> python code: <code> code needs to be in Python code using the requests library. \
Do not include imports, just code.";

const OPERATIONS_SYSTEM: &str = "The input will be a list of strings representing resource \
paths for a RESTful API. Give your answers as operations a consumer of the API could perform. \
Write the operations in natural language, and separate them with a comma, no fluff text.";

const ENTITY_SYSTEM: &str = "The input will be a list of strings representing resource paths \
for a RESTful API. Give your response based on which paths require an entity id, and if you \
can get that entity elsewhere, tell the user how. Write the operations in natural language, \
and separate them with a comma, no fluff text.";

/// One question to hand to a generation backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptRecord {
    /// Document the question was derived from.
    pub source: String,
    /// System instruction accompanying the question.
    pub system: &'static str,
    /// The question text.
    pub question: String,
    /// Structured material the question refers to.
    pub context: Value,
}

/// Builds the endpoint questions followed by the two path-list questions.
pub fn prompt_records(api: &ParsedApi) -> Vec<PromptRecord> {
    let view = api.paths_with_response();
    let mut records = Vec::with_capacity(view.len() + 2);

    for (path, response) in &view {
        records.push(PromptRecord {
            source: api.source_name.clone(),
            system: ENDPOINT_SYSTEM,
            question: format!(
                "Given the following endpoint {}, write me the HTTP request to get the success response",
                path
            ),
            context: json!({
                "path": path,
                "status": response.status_key,
                "description": response.description,
                "schema": response.schema,
            }),
        });
    }

    if view.is_empty() {
        return records;
    }

    let paths: Vec<&str> = view.iter().map(|(path, _)| *path).collect();
    let listing = Value::from(paths.clone()).to_string();

    records.push(PromptRecord {
        source: api.source_name.clone(),
        system: OPERATIONS_SYSTEM,
        question: format!(
            "Give the following RESTful Endpoint paths. What operations could I perform on them? \n{}\n",
            listing
        ),
        context: json!({ "paths": paths }),
    });
    records.push(PromptRecord {
        source: api.source_name.clone(),
        system: ENTITY_SYSTEM,
        question: format!(
            "Give the following RESTful Endpoint paths. What Paths require an entity_id to access \
and can you get that entity from a different path? If you can which path do you need to call? \n{}\n",
            listing
        ),
        context: json!({ "paths": paths }),
    });

    records
}

/// Appends records to a JSON-lines file, creating it if needed.
pub fn append_records(path: &Path, records: &[PromptRecord]) -> CliResult<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
