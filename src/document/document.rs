//! The parsed, validated document: a list of operations plus the named
//! fragments they (transitively) reference, tied to the exact schema they
//! were resolved against.

use crate::document::fragment::FragmentSlot;
use crate::document::operation::Operation;
use crate::schema::Schema;
use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug)]
pub struct Document {
    pub(crate) schema: Arc<Schema>,
    pub(crate) operations: Vec<Operation>,
    /// Named fragment definitions, in declaration order, keyed by name.
    pub(crate) fragments: IndexMap<String, Arc<FragmentSlot>>,
}

impl Document {
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn fragment(&self, name: &str) -> Option<&Arc<FragmentSlot>> {
        self.fragments.get(name)
    }

    pub fn fragments(&self) -> impl Iterator<Item = (&str, &Arc<FragmentSlot>)> {
        self.fragments.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Looks up an operation by name; if `name` is `None`, succeeds only
    /// when the document has exactly one operation. Mirrors the resolution
    /// rule the executor's preparation step runs (§4.3).
    pub fn resolve_operation(&self, name: Option<&str>) -> Result<&Operation, OperationLookupError> {
        match name {
            Some(n) => self
                .operations
                .iter()
                .find(|op| op.name.as_deref() == Some(n))
                .ok_or_else(|| OperationLookupError::NotFound(n.to_string())),
            None => match self.operations.len() {
                0 => Err(OperationLookupError::NoOperations),
                1 => Ok(&self.operations[0]),
                _ => Err(OperationLookupError::AmbiguousWithoutName),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum OperationLookupError {
    #[error("unknown operation name `{0}`")]
    NotFound(String),
    #[error("document has no operations")]
    NoOperations,
    #[error("an operation name must be supplied when a document defines more than one operation")]
    AmbiguousWithoutName,
}
