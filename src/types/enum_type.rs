//! Enum types: a bijection between GraphQL constant names and opaque
//! internal values.
//!
//! Internal values are represented as plain `String`s here rather than an
//! arbitrary hashable/comparable host type (as the source allows) -- the
//! schema is a single monomorphic `GraphQLType` enum, so there is no type
//! parameter to hang an arbitrary internal representation off of. A caller
//! that wants a richer internal value (an actual Rust enum, say) maps it to
//! and from a String tag in its own resolver code. See DESIGN.md.

use indexmap::IndexMap;

pub const RESERVED_ENUM_CONSTANTS: [&str; 3] = ["true", "false", "null"];

#[derive(Clone, Debug, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub internal_value: String,
    pub description: Option<String>,
    pub deprecated: bool,
    pub deprecation_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EnumValueError {
    Reserved(String),
    DuplicateConstant(String),
    NonBijective(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: IndexMap<String, EnumValue>,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        EnumType {
            name: name.into(),
            description: None,
            values: IndexMap::new(),
        }
    }

    /// Adds an enum value, rejecting reserved constant names, duplicate
    /// constant names, and a second constant mapping to the same internal
    /// value (the map must stay bijective).
    pub fn add_value(&mut self, value: EnumValue) -> Result<(), EnumValueError> {
        if RESERVED_ENUM_CONSTANTS.contains(&value.name.as_str()) {
            return Err(EnumValueError::Reserved(value.name));
        }
        if self.values.contains_key(&value.name) {
            return Err(EnumValueError::DuplicateConstant(value.name));
        }
        if self
            .values
            .values()
            .any(|v| v.internal_value == value.internal_value)
        {
            return Err(EnumValueError::NonBijective(value.name));
        }
        self.values.insert(value.name.clone(), value);
        Ok(())
    }

    pub fn value(&self, constant_name: &str) -> Option<&EnumValue> {
        self.values.get(constant_name)
    }

    pub fn internal_value_of(&self, constant_name: &str) -> Option<&str> {
        self.values.get(constant_name).map(|v| v.internal_value.as_str())
    }

    /// The GraphQL constant name that maps to `internal_value`, used by
    /// output coercion to turn a resolver's opaque value back into the name
    /// a client should see.
    pub fn name_of_internal_value(&self, internal_value: &str) -> Option<&str> {
        self.values
            .values()
            .find(|v| v.internal_value == internal_value)
            .map(|v| v.name.as_str())
    }
}
