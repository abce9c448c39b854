//! Operations (`query`/`mutation`) and their variable definitions.

use crate::document::directive::DirectiveApplication;
use crate::document::selection::SelectionSet;
use crate::document::variable::Variable;
use crate::loc::SourcePosition;
use indexmap::IndexMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Operation {
    pub kind: OperationKind,
    pub name: Option<String>,
    pub variables: IndexMap<String, Variable>,
    pub directives: Vec<DirectiveApplication>,
    pub selection_set: SelectionSet,
    pub def_location: SourcePosition,
}

impl Operation {
    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }
}
