//! Directive applications (`@include(if: $x)`) attached to a field,
//! fragment spread, inline fragment, or fragment definition.

use crate::value::Value;
use indexmap::IndexMap;

#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveApplication {
    pub name: String,
    pub args: IndexMap<String, Value>,
}

impl DirectiveApplication {
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }
}
