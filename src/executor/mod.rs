//! Execution (component C7, §4.3): turns a parsed [`crate::document::Document`]
//! plus an embedder-supplied [`Context`] into the `{data, errors, extensions}`
//! response envelope described in §6.

mod context;
mod error;
mod eval;
mod variables;

pub use context::{Context, ErrorLocation, ErrorRecord, UnknownContextArg};
pub use error::{BadScalarError, FieldTypeError, OperationNameError, SchemaMismatchError, VariablesError};
pub use variables::coerce_variables;

use crate::document::{Document, OperationKind};
use crate::schema::Schema;
use crate::value::{ObjectValue, RootMutationValue, RootQueryValue};
use eval::{execute_operation, ExecState};
use std::cell::RefCell;
use std::sync::Arc;

/// Parses `document_str` against `schema` and executes it, in one call. This
/// is the entry point most callers reach for -- see [`execute_document`] for
/// re-running an already-parsed [`Document`] (e.g. one cached across
/// requests) without paying to parse it again.
pub fn execute(
    document_str: &str,
    schema: &Arc<Schema>,
    context: &dyn Context,
    variables: Option<&serde_json::Value>,
    operation_name: Option<&str>,
) -> serde_json::Value {
    context.execute_document_str_start(document_str);
    let response = match crate::parser::parse(document_str, schema) {
        Ok(document) => {
            context.parsed_document(&document);
            run(&document, schema, context, variables, operation_name)
        }
        Err(parse_err) => {
            let record = ErrorRecord::at(parse_err.message.clone(), parse_err.line, parse_err.column);
            pre_execution_response(vec![record], context, Some(&parse_err))
        }
    };
    context.execute_document_str_end(&response);
    response
}

/// Executes an already-parsed [`Document`] against the exact [`Schema`] it
/// was parsed against (§3 "Lifecycle"). A `Document` always carries that
/// schema by `Arc`, so the check `run` performs internally can never
/// actually fail through this entry point -- it exists so the same
/// preparation/execution path also backs [`execute`], where it *can*
/// matter (see DESIGN.md's note on `SchemaMismatchError`).
pub fn execute_document(
    document: &Document,
    context: &dyn Context,
    variables: Option<&serde_json::Value>,
    operation_name: Option<&str>,
) -> serde_json::Value {
    context.execute_document_start(document);
    let schema = Arc::clone(document.schema());
    let response = run(document, &schema, context, variables, operation_name);
    context.execute_document_end(&response);
    response
}

fn run(
    document: &Document,
    schema: &Arc<Schema>,
    context: &dyn Context,
    variables: Option<&serde_json::Value>,
    operation_name: Option<&str>,
) -> serde_json::Value {
    if document.schema().id() != schema.id() {
        let err = SchemaMismatchError;
        return pre_execution_response(vec![ErrorRecord::message(err.to_string())], context, Some(&err));
    }

    let operation = match document.resolve_operation(operation_name) {
        Ok(op) => op,
        Err(lookup_err) => {
            let err = OperationNameError::Lookup(lookup_err);
            return pre_execution_response(vec![ErrorRecord::message(err.to_string())], context, Some(&err));
        }
    };

    let raw_variables = match variables {
        None => serde_json::Map::new(),
        Some(serde_json::Value::Object(map)) => map.clone(),
        Some(_) => {
            let err = VariablesError::NotAnObject;
            return pre_execution_response(vec![ErrorRecord::message(err.to_string())], context, Some(&err));
        }
    };
    let coerced_variables = match coerce_variables(schema, operation, &raw_variables) {
        Ok(v) => v,
        Err(err) => {
            return pre_execution_response(vec![ErrorRecord::message(err.to_string())], context, Some(&err));
        }
    };

    let (root_type_name, root_value): (&str, ObjectValue) = match operation.kind {
        OperationKind::Query => (schema.query_type().name(), Arc::new(RootQueryValue)),
        OperationKind::Mutation => (
            schema
                .mutation_type()
                .expect("parser rejects a `mutation` operation against a schema with no mutation type")
                .name(),
            Arc::new(RootMutationValue),
        ),
    };

    let state = ExecState {
        schema: schema.as_ref(),
        context,
        variables: coerced_variables,
        errors: RefCell::new(Vec::new()),
    };

    let data = match execute_operation(operation, root_type_name, &root_value, &state) {
        Ok(map) => serde_json::Value::Object(map.into_iter().collect()),
        Err(_bubble) => serde_json::Value::Null,
    };
    build_success_response(data, state.errors.into_inner(), context)
}

fn pre_execution_response(
    records: Vec<ErrorRecord>,
    context: &dyn Context,
    err: Option<&(dyn std::error::Error + 'static)>,
) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    map.insert(
        "errors".to_string(),
        serde_json::Value::Array(
            records
                .iter()
                .map(|r| serde_json::to_value(r).expect("ErrorRecord always serializes"))
                .collect(),
        ),
    );
    let mut response = serde_json::Value::Object(map);
    if let Some(extensions) = context.extensions(&response, err) {
        response
            .as_object_mut()
            .expect("just constructed as an Object above")
            .insert("extensions".to_string(), extensions);
    }
    response
}

fn build_success_response(
    data: serde_json::Value,
    errors: Vec<ErrorRecord>,
    context: &dyn Context,
) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    map.insert("data".to_string(), data);
    if !errors.is_empty() {
        map.insert(
            "errors".to_string(),
            serde_json::Value::Array(
                errors
                    .iter()
                    .map(|r| serde_json::to_value(r).expect("ErrorRecord always serializes"))
                    .collect(),
            ),
        );
    }
    let mut response = serde_json::Value::Object(map);
    if let Some(extensions) = context.extensions(&response, None) {
        response
            .as_object_mut()
            .expect("just constructed as an Object above")
            .insert("extensions".to_string(), extensions);
    }
    response
}
