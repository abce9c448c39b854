//! Scalars: leaf types whose input/output coercion is supplied by the
//! schema author (or, for the five built-ins, by this crate).

use crate::value::{FieldValue, ResolvedValue};
use std::fmt;
use std::sync::Arc;

/// The `[-2^31, 2^31)` range every `Int` literal, variable, and output value
/// must fall within, enforced at every boundary (§3's Int-range invariant).
pub const INT_MIN: i64 = -(1i64 << 31);
pub const INT_MAX_EXCLUSIVE: i64 = 1i64 << 31;

pub fn int_in_range(n: i64) -> bool {
    (INT_MIN..INT_MAX_EXCLUSIVE).contains(&n)
}

/// Input/output coercion for a scalar type. Input coercion maps an external
/// (JSON-shaped) literal or variable value into the internal
/// [`ResolvedValue`] representation; output coercion maps a resolver's
/// returned value back out to JSON.
pub trait ScalarImpl: Send + Sync + fmt::Debug {
    fn coerce_input(&self, literal: &serde_json::Value) -> Result<ResolvedValue, String>;
    fn coerce_output(&self, value: &FieldValue) -> Result<serde_json::Value, String>;
}

#[derive(Clone, Debug)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
    pub implementation: Arc<dyn ScalarImpl>,
}

impl ScalarType {
    pub fn new(name: impl Into<String>, implementation: Arc<dyn ScalarImpl>) -> Self {
        ScalarType {
            name: name.into(),
            description: None,
            implementation,
        }
    }
}

impl PartialEq for ScalarType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

// --- Built-in scalars -------------------------------------------------
//
// §4.2: "Built-in scalar input coercion is enforced even if the schema
// provides a custom scalar of the same name." The executor and parser both
// run literal/variable values for `String`/`Int`/`Float`/`Boolean`/`ID`
// through these implementations regardless of what a caller registered
// under those names.

#[derive(Debug)]
pub struct StringScalarImpl;
impl ScalarImpl for StringScalarImpl {
    fn coerce_input(&self, literal: &serde_json::Value) -> Result<ResolvedValue, String> {
        match literal {
            serde_json::Value::String(s) => Ok(ResolvedValue::String(s.clone())),
            _ => Err("String must be a string".to_string()),
        }
    }

    fn coerce_output(&self, value: &FieldValue) -> Result<serde_json::Value, String> {
        match value {
            FieldValue::String(s) => Ok(serde_json::Value::String(s.clone())),
            _ => Err("String output must be a string".to_string()),
        }
    }
}

#[derive(Debug)]
pub struct IdScalarImpl;
impl ScalarImpl for IdScalarImpl {
    fn coerce_input(&self, literal: &serde_json::Value) -> Result<ResolvedValue, String> {
        match literal {
            serde_json::Value::String(s) => Ok(ResolvedValue::String(s.clone())),
            serde_json::Value::Number(n) => {
                let i = n.as_i64().ok_or_else(|| "ID must be a string or integer".to_string())?;
                if !int_in_range(i) {
                    return Err("ID integer out of Int range".to_string());
                }
                Ok(ResolvedValue::String(i.to_string()))
            }
            _ => Err("ID must be a string or an integer".to_string()),
        }
    }

    fn coerce_output(&self, value: &FieldValue) -> Result<serde_json::Value, String> {
        match value {
            FieldValue::String(s) => Ok(serde_json::Value::String(s.clone())),
            FieldValue::Int(n) => Ok(serde_json::Value::String(n.to_string())),
            _ => Err("ID output must be a string or integer".to_string()),
        }
    }
}

#[derive(Debug)]
pub struct IntScalarImpl;
impl ScalarImpl for IntScalarImpl {
    fn coerce_input(&self, literal: &serde_json::Value) -> Result<ResolvedValue, String> {
        match literal {
            serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => {
                let i = n.as_i64().ok_or_else(|| "Int out of range".to_string())?;
                if !int_in_range(i) {
                    return Err("Int out of [-2^31, 2^31) range".to_string());
                }
                Ok(ResolvedValue::Int(i as i32))
            }
            _ => Err("Int must be an integer".to_string()),
        }
    }

    fn coerce_output(&self, value: &FieldValue) -> Result<serde_json::Value, String> {
        match value {
            FieldValue::Int(n) => {
                if !int_in_range(*n as i64) {
                    return Err("Int output out of range".to_string());
                }
                Ok(serde_json::Value::from(*n))
            }
            _ => Err("Int output must be an integer".to_string()),
        }
    }
}

#[derive(Debug)]
pub struct FloatScalarImpl;
impl ScalarImpl for FloatScalarImpl {
    fn coerce_input(&self, literal: &serde_json::Value) -> Result<ResolvedValue, String> {
        match literal {
            serde_json::Value::Number(n) => {
                let f = n.as_f64().ok_or_else(|| "Float must be numeric".to_string())?;
                Ok(ResolvedValue::Float(f))
            }
            _ => Err("Float must be a number".to_string()),
        }
    }

    fn coerce_output(&self, value: &FieldValue) -> Result<serde_json::Value, String> {
        match value {
            // §4.3 requires strict output enforcement: a Float field must
            // produce a true float, unlike input coercion (which accepts
            // integers too).
            FieldValue::Float(f) => Ok(serde_json::Value::from(*f)),
            _ => Err("Float output must be a float".to_string()),
        }
    }
}

#[derive(Debug)]
pub struct BooleanScalarImpl;
impl ScalarImpl for BooleanScalarImpl {
    fn coerce_input(&self, literal: &serde_json::Value) -> Result<ResolvedValue, String> {
        match literal {
            serde_json::Value::Bool(b) => Ok(ResolvedValue::Bool(*b)),
            _ => Err("Boolean must be a boolean".to_string()),
        }
    }

    fn coerce_output(&self, value: &FieldValue) -> Result<serde_json::Value, String> {
        match value {
            FieldValue::Bool(b) => Ok(serde_json::Value::Bool(*b)),
            _ => Err("Boolean output must be a boolean".to_string()),
        }
    }
}

pub fn builtin_scalar_names() -> &'static [&'static str] {
    &["String", "Int", "Float", "Boolean", "ID"]
}

pub fn builtin_scalar_impl(name: &str) -> Option<Arc<dyn ScalarImpl>> {
    match name {
        "String" => Some(Arc::new(StringScalarImpl)),
        "Int" => Some(Arc::new(IntScalarImpl)),
        "Float" => Some(Arc::new(FloatScalarImpl)),
        "Boolean" => Some(Arc::new(BooleanScalarImpl)),
        "ID" => Some(Arc::new(IdScalarImpl)),
        _ => None,
    }
}
