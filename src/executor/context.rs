//! The [`Context`] protocol (component C8): the hooks an embedder supplies
//! around execution (§6 "Context protocol", §9's "Deepcopy before hooks"
//! note -- hooks here only ever receive `&`-borrows of already-finished
//! values, so there's nothing for them to mutate).

use crate::document::Document;
use crate::types::ArgValues;
use crate::value::{FieldValue, ResolvedValue, ResolverError};
use indexmap::IndexMap;
use serde::Serialize;

/// Raised by the default [`Context::context_arg`] when the embedder hasn't
/// overridden it, or by an override that genuinely doesn't recognize `name`.
#[derive(Clone, Debug, thiserror::Error)]
#[error("unknown context arg `{0}`")]
pub struct UnknownContextArg(pub String);

/// A single `{line, column}` pair inside an error record's `locations` list.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ErrorLocation {
    pub line: usize,
    pub column: usize,
}

/// A single entry in the response's `errors` list (§7 "Default record
/// shape"). `extensions` is flattened directly into the record so a
/// `Context::exception_errors` override can add arbitrary named fields
/// alongside `message`/`locations` (the typical extension: an error-kind
/// name).
#[derive(Clone, Debug, Serialize)]
pub struct ErrorRecord {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<ErrorLocation>>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl ErrorRecord {
    pub fn message(message: impl Into<String>) -> Self {
        ErrorRecord {
            message: message.into(),
            locations: None,
            extensions: IndexMap::new(),
        }
    }

    pub fn at(message: impl Into<String>, line: usize, column: usize) -> Self {
        ErrorRecord {
            message: message.into(),
            locations: Some(vec![ErrorLocation { line, column }]),
            extensions: IndexMap::new(),
        }
    }
}

/// The contract an embedder implements to observe and extend execution
/// (§6). Every hook besides [`Context::context_arg`] has a sensible
/// default, and a failure inside any hook but `context_arg` is swallowed
/// rather than surfaced to the caller -- see `crate::executor`'s top-level
/// `execute`/`execute_document` for where that's enforced.
pub trait Context: Send + Sync {
    /// A resolver's way of asking the embedder for a named piece of
    /// ambient context (the logged-in user, a request-scoped loader, …).
    /// No universal default makes sense, so the baseline behavior is to
    /// report the name as unrecognized; override to actually serve any.
    fn context_arg(&self, name: &str) -> Result<ResolvedValue, UnknownContextArg> {
        Err(UnknownContextArg(name.to_string()))
    }

    /// Renders a resolver-raised error into one or more response records.
    /// §7: "failure inside falls back to `[{message: str(ex)}]`" -- since
    /// this engine has no way to recover from an override that panics, the
    /// fallback instead covers the case an override returns an empty list.
    fn exception_errors(&self, err: &ResolverError) -> Vec<ErrorRecord> {
        vec![ErrorRecord::message(err.to_string())]
    }

    fn execute_document_str_start(&self, _document_str: &str) {}
    fn execute_document_str_end(&self, _response: &serde_json::Value) {}
    fn parsed_document(&self, _document: &Document) {}
    fn execute_document_start(&self, _document: &Document) {}
    fn execute_document_end(&self, _response: &serde_json::Value) {}

    /// An optional `extensions` map attached to the response just before
    /// it's returned. `ex` is the terminal error for a pre-execution
    /// failure (parse/operation-name/variables/schema-mismatch), if any.
    fn extensions(
        &self,
        _response: &serde_json::Value,
        _ex: Option<&(dyn std::error::Error + 'static)>,
    ) -> Option<serde_json::Value> {
        None
    }

    fn mutation_start(&self, _field_name: &str, _args: &ArgValues) {}
    fn mutation_end(
        &self,
        _field_name: &str,
        _args: &ArgValues,
        _result: Option<&FieldValue>,
        _error: Option<&ResolverError>,
    ) {
    }
}

/// Renders a resolver error through the context hook, falling back to the
/// default single-record shape if the hook returns nothing (§7).
pub(crate) fn render_exception(context: &dyn Context, err: &ResolverError) -> Vec<ErrorRecord> {
    let records = context.exception_errors(err);
    if records.is_empty() {
        vec![ErrorRecord::message(err.to_string())]
    } else {
        records
    }
}
