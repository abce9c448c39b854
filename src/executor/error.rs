//! Pre-execution error kinds (§6 "Exit/error kinds", §7 layer 1): the ways
//! preparation can fail before a single resolver runs.

use crate::document::OperationLookupError;

#[derive(Clone, Debug, thiserror::Error)]
pub enum OperationNameError {
    #[error(transparent)]
    Lookup(#[from] OperationLookupError),
}

#[derive(Clone, Debug, thiserror::Error)]
pub enum VariablesError {
    #[error("unknown variable `${0}` in the variables map")]
    UnknownVariable(String),
    #[error("missing required variable `${0}`")]
    MissingRequired(String),
    #[error("variable `${0}` failed coercion: {1}")]
    CoercionFailed(String, String),
    #[error("variables must be a JSON object")]
    NotAnObject,
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("document was parsed against a different schema than the one it's being executed against")]
pub struct SchemaMismatchError;

/// A resolver returned a value that doesn't fit the field's declared output
/// type (§4.3 "Completion"): a non-null position getting `null`, a scalar
/// list where an object was expected, an abstract type's resolved concrete
/// type not actually implementing it, and so on.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{0}")]
pub struct FieldTypeError(pub String);

/// A resolver returned a value a scalar's output coercion rejected.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{0}")]
pub struct BadScalarError(pub String);
