//! Directive declarations (`@include`, `@skip`, and any schema-registered
//! custom directives) plus the locations a directive may be applied at.

use indexmap::IndexMap;

use super::field::Argument;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
}

impl DirectiveLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveLocation::Query => "QUERY",
            DirectiveLocation::Mutation => "MUTATION",
            DirectiveLocation::Field => "FIELD",
            DirectiveLocation::FragmentDefinition => "FRAGMENT_DEFINITION",
            DirectiveLocation::FragmentSpread => "FRAGMENT_SPREAD",
            DirectiveLocation::InlineFragment => "INLINE_FRAGMENT",
        }
    }
}

#[derive(Clone, Debug)]
pub struct DirectiveType {
    pub name: String,
    pub description: Option<String>,
    pub args: IndexMap<String, Argument>,
    pub locations: Vec<DirectiveLocation>,
}

impl DirectiveType {
    pub fn new(name: impl Into<String>, locations: Vec<DirectiveLocation>) -> Self {
        DirectiveType {
            name: name.into(),
            description: None,
            args: IndexMap::new(),
            locations,
        }
    }

    pub fn is_valid_at(&self, location: DirectiveLocation) -> bool {
        self.locations.contains(&location)
    }
}

/// The two directives every schema gets for free, per §4.1.
pub fn builtin_include() -> DirectiveType {
    let mut d = DirectiveType::new(
        "include",
        vec![
            DirectiveLocation::Field,
            DirectiveLocation::FragmentSpread,
            DirectiveLocation::InlineFragment,
            DirectiveLocation::FragmentDefinition,
        ],
    );
    d.description = Some("Directs the executor to include this field or fragment only when the `if` argument is true.".to_string());
    d.args.insert(
        "if".to_string(),
        Argument {
            name: "if".to_string(),
            arg_type: super::type_ref::TypeRef::non_null(super::type_ref::TypeRef::named("Boolean"))
                .expect("non_null(Boolean) never double-wraps"),
            default_value: None,
            description: Some("Included when true.".to_string()),
        },
    );
    d
}

pub fn builtin_skip() -> DirectiveType {
    let mut d = DirectiveType::new(
        "skip",
        vec![
            DirectiveLocation::Field,
            DirectiveLocation::FragmentSpread,
            DirectiveLocation::InlineFragment,
            DirectiveLocation::FragmentDefinition,
        ],
    );
    d.description = Some("Directs the executor to skip this field or fragment when the `if` argument is true.".to_string());
    d.args.insert(
        "if".to_string(),
        Argument {
            name: "if".to_string(),
            arg_type: super::type_ref::TypeRef::non_null(super::type_ref::TypeRef::named("Boolean"))
                .expect("non_null(Boolean) never double-wraps"),
            default_value: None,
            description: Some("Skipped when true.".to_string()),
        },
    );
    d
}
