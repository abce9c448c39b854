//! The document AST (component C4): operations, selection sets, field
//! queries, fragments, variables, and directive applications. Built by
//! [`crate::parser::parse`] and walked by [`crate::executor`].

mod directive;
#[allow(clippy::module_inception)]
mod document;
mod fragment;
mod operation;
mod selection;
mod variable;

pub use directive::DirectiveApplication;
pub use document::{Document, OperationLookupError};
pub use fragment::{FragmentDefinition, FragmentReference, FragmentSlot};
pub use operation::{Operation, OperationKind};
pub use selection::{FieldQuery, FragmentSpreadSite, Selection, SelectionSet};
pub use variable::Variable;
