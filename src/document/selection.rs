//! Selection sets and the field queries / fragment references inside them.

use crate::document::directive::DirectiveApplication;
use crate::document::fragment::FragmentReference;
use crate::loc::SourcePosition;
use crate::types::FieldDescriptor;
use crate::value::Value;
use indexmap::IndexMap;

/// A single `name(args) { … }` entry in a selection set.
#[derive(Clone, Debug)]
pub struct FieldQuery {
    /// The alias if one was given, else `field_descriptor.name`.
    pub response_key: String,
    pub field_descriptor: FieldDescriptor,
    pub args: IndexMap<String, Value>,
    pub selection_set: Option<SelectionSet>,
    pub directives: Vec<DirectiveApplication>,
    /// Where this field query began in the source document, used to anchor
    /// validation errors (selection-merging conflicts, variable-use
    /// errors) back onto a line/column.
    pub def_location: SourcePosition,
}

impl FieldQuery {
    pub fn field_name(&self) -> &str {
        &self.field_descriptor.name
    }
}

/// A `... Name` or `... on Type { … }` entry together with the directives
/// applied at *this* spread site. Directives live here rather than on
/// [`FragmentReference`] because a single named fragment can be spread from
/// many sites, each with its own `@include`/`@skip` (an inline fragment has
/// exactly one site, so its site directives and its definition's directives
/// are the same list, duplicated here for a uniform read path).
#[derive(Clone, Debug)]
pub struct FragmentSpreadSite {
    pub fragment: FragmentReference,
    pub directives: Vec<DirectiveApplication>,
}

#[derive(Clone, Debug)]
pub enum Selection {
    Field(FieldQuery),
    FragmentSpread(FragmentSpreadSite),
}

/// An ordered list of [`Selection`]s, rooted at `base_type`.
#[derive(Clone, Debug)]
pub struct SelectionSet {
    /// The name of the Object/Interface/Union type this selection set was
    /// parsed against (an operation's root type, a field's output type, or
    /// a fragment's type condition).
    pub base_type: String,
    pub selections: Vec<Selection>,
}

impl SelectionSet {
    pub fn new(base_type: impl Into<String>) -> Self {
        SelectionSet {
            base_type: base_type.into(),
            selections: Vec::new(),
        }
    }
}
