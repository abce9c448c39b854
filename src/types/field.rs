//! Output fields and their arguments (component C2: "Field & argument
//! descriptors").

use crate::executor::Context;
use crate::types::TypeRef;
use crate::value::{FieldValue, ObjectValue, ResolvedValue, ResolvedWithErrors, ResolverError};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// A single declared argument on a field, directive, or (as an
/// [`crate::types::InputField`]) an input object.
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub name: String,
    pub arg_type: TypeRef,
    pub default_value: Option<crate::value::Value>,
    pub description: Option<String>,
}

/// The resolved argument values passed to a resolver: response-key order
/// preserved, every value already variable-substituted and coerced.
pub type ArgValues = IndexMap<String, ResolvedValue>;

/// What a resolver needs to produce a field's value: the source object, the
/// field's coerced arguments, a handle onto the execution context, and the
/// schema being executed against (introspection resolvers need the latter
/// to walk type references; ordinary resolvers typically ignore it).
pub struct ResolverContext<'a> {
    pub source: &'a ObjectValue,
    pub args: &'a ArgValues,
    pub context: &'a dyn Context,
    pub schema: &'a crate::schema::Schema,
}

impl<'a> ResolverContext<'a> {
    pub fn arg(&self, name: &str) -> Option<&ResolvedValue> {
        self.args.get(name)
    }
}

pub type ResolverOutcome = Result<ResolvedWithErrors<FieldValue>, ResolverError>;

/// How a [`Field`]'s value is produced from its source object.
///
/// This is the idiomatic-Rust analogue of the source's `Attr(name)` /
/// `Method(name, partial_args, partial_kwargs, context_args)` split (see
/// DESIGN.md): rather than reflecting on a named attribute or method at
/// runtime, each variant wraps a plain closure. `Attr` models a resolver
/// that only ever looks at the source value (the common case: "read a field
/// off the underlying struct"); `Method` models one that also wants
/// arguments and/or context.
#[derive(Clone)]
pub enum Resolver {
    Attr(Arc<dyn Fn(&ObjectValue) -> ResolverOutcome + Send + Sync>),
    Method(Arc<dyn Fn(&ResolverContext) -> ResolverOutcome + Send + Sync>),
}

impl Resolver {
    pub fn attr(f: impl Fn(&ObjectValue) -> ResolverOutcome + Send + Sync + 'static) -> Self {
        Resolver::Attr(Arc::new(f))
    }

    pub fn method(f: impl Fn(&ResolverContext) -> ResolverOutcome + Send + Sync + 'static) -> Self {
        Resolver::Method(Arc::new(f))
    }

    pub fn invoke(&self, ctx: &ResolverContext) -> ResolverOutcome {
        match self {
            Resolver::Attr(f) => f(ctx.source),
            Resolver::Method(f) => f(ctx),
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolver::Attr(_) => write!(f, "Resolver::Attr(..)"),
            Resolver::Method(_) => write!(f, "Resolver::Method(..)"),
        }
    }
}

/// Output-field metadata shared between interfaces (which declare a
/// contract but no resolver) and objects (which pair a descriptor with a
/// [`Resolver`]).
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: TypeRef,
    pub args: IndexMap<String, Argument>,
    pub description: Option<String>,
    pub deprecated: bool,
    pub deprecation_reason: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        FieldDescriptor {
            name: name.into(),
            field_type,
            args: IndexMap::new(),
            description: None,
            deprecated: false,
            deprecation_reason: None,
        }
    }

    /// Whether `self` may stand in for `parent` when merging fields declared
    /// on a supertype, per §4.1 rule 3: the field type must be a subtype of
    /// the parent's, every parent argument must be present with an
    /// identical type, and any extra argument must be nullable.
    pub fn is_assignment_compatible_with(
        &self,
        parent: &FieldDescriptor,
        is_subtype: impl Fn(&str, &str) -> bool,
    ) -> bool {
        if !type_ref_is_assignment_compatible(&self.field_type, &parent.field_type, &is_subtype) {
            return false;
        }
        for (arg_name, parent_arg) in parent.args.iter() {
            match self.args.get(arg_name) {
                Some(child_arg) if child_arg.arg_type == parent_arg.arg_type => {}
                _ => return false,
            }
        }
        for (arg_name, child_arg) in self.args.iter() {
            if !parent.args.contains_key(arg_name) && child_arg.arg_type.is_non_null() {
                return false;
            }
        }
        true
    }
}

/// §4.1 rule 3's "field type: subtype-of" check, generalized over
/// `List`/`NonNull` wrapping: a `NonNull` child type may stand in for its
/// nullable parent (peeled on the child side only), `List` wrapping must
/// match element-wise, and two `Named` types are compatible when they're
/// equal or `is_subtype` says so.
fn type_ref_is_assignment_compatible(
    child: &TypeRef,
    parent: &TypeRef,
    is_subtype: &impl Fn(&str, &str) -> bool,
) -> bool {
    match (child, parent) {
        (TypeRef::NonNull(c), TypeRef::NonNull(p)) => {
            type_ref_is_assignment_compatible(c, p, is_subtype)
        }
        (TypeRef::NonNull(c), p) => type_ref_is_assignment_compatible(c, p, is_subtype),
        (_, TypeRef::NonNull(_)) => false,
        (TypeRef::List(c), TypeRef::List(p)) => type_ref_is_assignment_compatible(c, p, is_subtype),
        (TypeRef::List(_), _) | (_, TypeRef::List(_)) => false,
        (TypeRef::Named(c), TypeRef::Named(p)) => c == p || is_subtype(c, p),
    }
}

/// An output field on an [`crate::types::ObjectType`]: a descriptor plus the
/// [`Resolver`] that produces its value.
#[derive(Clone)]
pub struct Field {
    pub descriptor: FieldDescriptor,
    pub resolver: Resolver,
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("descriptor", &self.descriptor)
            .field("resolver", &self.resolver)
            .finish()
    }
}

impl Field {
    pub fn new(descriptor: FieldDescriptor, resolver: Resolver) -> Self {
        Field {
            descriptor,
            resolver,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}
