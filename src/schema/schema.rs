//! The finished, immutable [`Schema`]: a type registry plus the handful of
//! cross-type lookups the parser, validator, and executor all need
//! (`get_type`, `object_type_of`, `intersects`, directive lookup).

use crate::types::{DirectiveType, FieldDescriptor, GraphQLType, TypeRef};
use crate::value::{ClassTag, ObjectValue};
use indexmap::IndexMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Bumped whenever [`Schema::describe`]'s JSON shape changes in a
/// non-backward-compatible way.
pub const SCHEMA_JSON_VERSION: u32 = 1;

static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates a fresh identity for a newly built schema. Two [`Schema`]s are
/// never "the same schema" even if structurally identical -- a [`crate::document::Document`]
/// must be executed only against the exact `Schema` value it was parsed
/// against (§3 "Lifecycle"), and this id is what `execute_document` checks.
pub(crate) fn next_schema_id() -> u64 {
    NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug)]
pub struct Schema {
    pub(crate) schema_id: u64,
    pub(crate) types: IndexMap<String, GraphQLType>,
    pub(crate) directives: IndexMap<String, DirectiveType>,
    pub(crate) query_type_name: String,
    pub(crate) mutation_type_name: Option<String>,
    /// Maps a value's most-derived [`ClassTag`] to the object type it was
    /// registered under, so `object_type_of` can recover a type without a
    /// linear scan.
    pub(crate) class_tag_to_type: IndexMap<ClassTag, String>,
    /// The field set attached to every type regardless of declared fields:
    /// just `__typename: String!`.
    pub(crate) common_fields: IndexMap<String, FieldDescriptor>,
    /// The field set attached only to the root query type: `__schema` and
    /// `__type(name: String!)`.
    pub(crate) implicit_root_fields: IndexMap<String, FieldDescriptor>,
}

impl Schema {
    pub fn id(&self) -> u64 {
        self.schema_id
    }

    pub fn get_type(&self, name: &str) -> Option<&GraphQLType> {
        self.types.get(name)
    }

    /// A field every type gets implicitly: currently just `__typename`.
    pub fn common_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.common_fields.get(name)
    }

    /// A field only the root query type gets implicitly: `__schema` and
    /// `__type(name: String!)`.
    pub fn implicit_root_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.implicit_root_fields.get(name)
    }

    pub fn is_root_query_type(&self, name: &str) -> bool {
        name == self.query_type_name
    }

    pub fn types(&self) -> impl Iterator<Item = &GraphQLType> {
        self.types.values()
    }

    pub fn query_type(&self) -> &GraphQLType {
        self.types
            .get(&self.query_type_name)
            .expect("schema invariant: query_type_name always resolves")
    }

    pub fn mutation_type(&self) -> Option<&GraphQLType> {
        self.mutation_type_name
            .as_ref()
            .and_then(|name| self.types.get(name))
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveType> {
        self.directives.get(name)
    }

    pub fn directives(&self) -> impl Iterator<Item = &DirectiveType> {
        self.directives.values()
    }

    /// Resolves a [`TypeRef`] to its base [`GraphQLType`], ignoring any
    /// list/non-null wrapping. Returns `None` if the base name isn't
    /// registered.
    pub fn resolve_type_ref(&self, type_ref: &TypeRef) -> Option<&GraphQLType> {
        self.get_type(type_ref.base_name())
    }

    /// Recovers the registered [`crate::types::ObjectType`] a value's source
    /// belongs to by walking its [`crate::value::GraphQLObject::class_tags`]
    /// (most-derived first) looking for the first one this schema knows
    /// about.
    pub fn object_type_of(&self, value: &ObjectValue) -> Option<&GraphQLType> {
        for tag in value.class_tags() {
            if let Some(type_name) = self.class_tag_to_type.get(tag) {
                return self.types.get(type_name);
            }
        }
        None
    }

    /// Reflexive subtype check: is `sub` the same type as `sup`, or does it
    /// reach `sup` by following `parents` edges (object implements
    /// interface, interface extends interface, union nests union)?
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        if sub == sup {
            return true;
        }
        let mut visited = std::collections::HashSet::new();
        self.is_subtype_inner(sub, sup, &mut visited)
    }

    fn is_subtype_inner(
        &self,
        sub: &str,
        sup: &str,
        visited: &mut std::collections::HashSet<String>,
    ) -> bool {
        if !visited.insert(sub.to_string()) {
            return false;
        }
        let Some(t) = self.types.get(sub) else {
            return false;
        };
        for parent in t.parents() {
            if parent == sup || self.is_subtype_inner(parent, sup, visited) {
                return true;
            }
        }
        false
    }

    /// The Object types a (possibly interface/union) type can concretely
    /// manifest as, found by walking `children` edges down to leaves.
    pub fn leaf_types(&self, name: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut visited = std::collections::HashSet::new();
        self.collect_leaf_types(name, &mut visited, &mut out);
        out
    }

    fn collect_leaf_types<'a>(
        &'a self,
        name: &str,
        visited: &mut std::collections::HashSet<String>,
        out: &mut Vec<&'a str>,
    ) {
        if !visited.insert(name.to_string()) {
            return;
        }
        let Some(t) = self.types.get(name) else {
            return;
        };
        match t {
            GraphQLType::Object(obj) => out.push(&obj.name),
            _ => {
                for child in t.children() {
                    self.collect_leaf_types(child, visited, out);
                }
            }
        }
    }

    /// Whether the two named (possibly abstract) types can ever describe the
    /// same concrete object at once -- used to validate fragment spreads
    /// against their parent selection set's type.
    pub fn intersects(&self, a: &str, b: &str) -> bool {
        let a_is_abstract = matches!(
            self.types.get(a),
            Some(GraphQLType::Interface(_)) | Some(GraphQLType::Union(_))
        );
        let b_is_abstract = matches!(
            self.types.get(b),
            Some(GraphQLType::Interface(_)) | Some(GraphQLType::Union(_))
        );
        if !a_is_abstract || !b_is_abstract {
            return self.is_subtype(a, b) || self.is_subtype(b, a);
        }
        let a_leaves: std::collections::HashSet<&str> = self.leaf_types(a).into_iter().collect();
        self.leaf_types(b).into_iter().any(|t| a_leaves.contains(t))
    }
}
