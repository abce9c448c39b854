//! Runtime values: literals parsed out of a document, and the values a
//! resolver hands back to the executor.
//!
//! This is the idiomatic-Rust stand-in for the teacher's reflection-based
//! runtime dispatch (see DESIGN.md, "Class identity for runtime dispatch").
//! Rather than recovering an object's `Object` type by walking a live class
//! hierarchy at runtime, a value that wants to participate in GraphQL
//! implements [`GraphQLObject`] and declares its own (and its ancestors')
//! [`ClassTag`]s explicitly; [`crate::schema::Schema::object_type_of`] walks
//! that list.

use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An opaque tag identifying a registered [`crate::types::ObjectType`].
/// A value's [`GraphQLObject::class_tags`] should list its own tag first,
/// followed by its ancestors' tags (most-derived to least-derived), mirroring
/// the "ordered list of surfaces" the schema builder merges fields over.
pub type ClassTag = &'static str;

/// The class tag for the single synthetic root query value.
pub const ROOT_QUERY_TAG: ClassTag = "$$root_query";
/// The class tag for the single synthetic root mutation value.
pub const ROOT_MUTATION_TAG: ClassTag = "$$root_mutation";

/// Implemented by any Rust value that can be the "source" object behind an
/// Object-typed field in a resolver chain.
pub trait GraphQLObject: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// This value's class tags, most-derived first. [`GraphQLObject::class_tags`]
    /// lets the schema recover the registered [`crate::types::ObjectType`]
    /// for a value without needing real reflection.
    fn class_tags(&self) -> &'static [ClassTag];
}

/// A reference-counted, type-erased GraphQL object value.
pub type ObjectValue = Arc<dyn GraphQLObject>;

/// The synthetic value root query fields resolve against.
#[derive(Debug)]
pub struct RootQueryValue;
impl GraphQLObject for RootQueryValue {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn class_tags(&self) -> &'static [ClassTag] {
        &[ROOT_QUERY_TAG]
    }
}

/// The synthetic value root mutation fields resolve against.
#[derive(Debug)]
pub struct RootMutationValue;
impl GraphQLObject for RootMutationValue {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn class_tags(&self) -> &'static [ClassTag] {
        &[ROOT_MUTATION_TAG]
    }
}

/// A literal (or variable reference) as it appears in a parsed document --
/// an argument value, a default value, a value inside a list/input-object
/// literal.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    VariableRef(String),
    Int(i32),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
    Enum(String),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a literal (non-variable) value into its JSON form, for
    /// feeding into a [`crate::types::ScalarImpl::coerce_input`] call. Panics
    /// if a [`Value::VariableRef`] or [`Value::Enum`] is present -- callers
    /// must substitute variables and handle enum literals before calling
    /// this (see `parser::value`).
    pub fn to_json_literal(&self) -> serde_json::Value {
        match self {
            Value::VariableRef(_) => {
                unreachable!("variable references must be substituted before JSON conversion")
            }
            Value::Enum(_) => unreachable!("enum literals are coerced separately"),
            Value::Int(n) => serde_json::Value::from(*n),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::String(s) => serde_json::Value::from(s.clone()),
            Value::Boolean(b) => serde_json::Value::from(*b),
            Value::Null => serde_json::Value::Null,
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json_literal).collect())
            }
            Value::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json_literal()))
                    .collect(),
            ),
        }
    }

    /// Walks this value (descending into lists/objects), substituting every
    /// [`Value::VariableRef`] with its resolved value from `variables`.
    pub fn substitute_variables(&self, variables: &IndexMap<String, ResolvedValue>) -> ResolvedValue {
        match self {
            Value::VariableRef(name) => variables
                .get(name)
                .cloned()
                .unwrap_or(ResolvedValue::Null),
            Value::Int(n) => ResolvedValue::Int(*n),
            Value::Float(f) => ResolvedValue::Float(*f),
            Value::String(s) => ResolvedValue::String(s.clone()),
            Value::Boolean(b) => ResolvedValue::Bool(*b),
            Value::Null => ResolvedValue::Null,
            Value::Enum(name) => ResolvedValue::EnumValue(name.clone()),
            Value::List(items) => ResolvedValue::List(
                items
                    .iter()
                    .map(|v| v.substitute_variables(variables))
                    .collect(),
            ),
            Value::Object(fields) => ResolvedValue::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.substitute_variables(variables)))
                    .collect(),
            ),
        }
    }
}

/// A fully-resolved value: either a coerced argument/variable value flowing
/// into a resolver, or a value flowing out of one on its way to the
/// response. Distinct from [`Value`] in that every [`Value::VariableRef`]
/// has already been substituted.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedValue {
    Null,
    Bool(bool),
    Int(i32),
    Float(f64),
    String(String),
    /// The GraphQL *name* of an enum constant (schema-internal value mapping
    /// is applied when validating this against a field/argument type).
    EnumValue(String),
    List(Vec<ResolvedValue>),
    Object(IndexMap<String, ResolvedValue>),
}

impl ResolvedValue {
    pub fn object(value: ObjectValue) -> FieldValue {
        FieldValue::Object(value)
    }
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The value a [`crate::types::Resolver`] hands back to the executor, prior
/// to type-checking against the field's declared output type. Unlike
/// [`ResolvedValue`] (used for inputs), this can carry an opaque
/// [`ObjectValue`] for Object/Interface/Union-typed fields.
#[derive(Clone)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i32),
    Float(f64),
    String(String),
    EnumValue(String),
    List(Vec<FieldValue>),
    Object(ObjectValue),
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "Null"),
            FieldValue::Bool(b) => write!(f, "Bool({b})"),
            FieldValue::Int(n) => write!(f, "Int({n})"),
            FieldValue::Float(n) => write!(f, "Float({n})"),
            FieldValue::String(s) => write!(f, "String({s:?})"),
            FieldValue::EnumValue(s) => write!(f, "EnumValue({s:?})"),
            FieldValue::List(items) => f.debug_list().entries(items).finish(),
            FieldValue::Object(_) => write!(f, "Object(..)"),
        }
    }
}

impl From<ResolvedValue> for FieldValue {
    fn from(value: ResolvedValue) -> Self {
        match value {
            ResolvedValue::Null => FieldValue::Null,
            ResolvedValue::Bool(b) => FieldValue::Bool(b),
            ResolvedValue::Int(n) => FieldValue::Int(n),
            ResolvedValue::Float(n) => FieldValue::Float(n),
            ResolvedValue::String(s) => FieldValue::String(s),
            ResolvedValue::EnumValue(s) => FieldValue::EnumValue(s),
            ResolvedValue::List(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            ResolvedValue::Object(_) => {
                unreachable!("input objects never flow out of a resolver as-is")
            }
        }
    }
}

/// A resolver-raised error. Rendered into a response error record through
/// [`crate::executor::Context::exception_errors`].
#[derive(Debug)]
pub struct ResolverError(pub Box<dyn std::error::Error + Send + Sync>);

impl ResolverError {
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        ResolverError(Box::new(err))
    }

    pub fn msg(message: impl Into<String>) -> Self {
        #[derive(Debug, thiserror::Error)]
        #[error("{0}")]
        struct Msg(String);
        ResolverError(Box::new(Msg(message.into())))
    }
}

impl fmt::Display for ResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value paired with non-fatal errors that should still be recorded
/// against the field, per §4.3's `ResultWithErrors` handling.
pub struct ResolvedWithErrors<T> {
    pub value: T,
    pub errors: Vec<ResolverError>,
}

impl<T> ResolvedWithErrors<T> {
    pub fn ok(value: T) -> Self {
        ResolvedWithErrors {
            value,
            errors: Vec::new(),
        }
    }
}
