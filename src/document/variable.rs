//! Variable definitions (`($name: Type = default, …)`) declared on an
//! [`crate::document::Operation`].

use crate::types::TypeRef;
use crate::value::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub var_type: TypeRef,
    pub default_value: Option<Value>,
}

impl Variable {
    /// The effective type used when checking use-site compatibility (§4.2
    /// "Variable-use typing"): a variable with a default is treated as
    /// non-null at every use site, since the executor never actually hands a
    /// resolver `null` for it when the caller omits the variable.
    pub fn effective_type(&self) -> TypeRef {
        if self.default_value.is_some() && !self.var_type.is_non_null() {
            TypeRef::non_null(self.var_type.clone()).expect("wrapping a non-NonNull type never double-wraps")
        } else {
            self.var_type.clone()
        }
    }
}
