//! [`GraphQLType`]: the tagged union over every kind of type a schema can
//! register, used wherever code needs to hold "some type, we don't yet know
//! which kind" (the type registry, `TypeRef` resolution, introspection).

use super::directive_type::DirectiveType;
use super::enum_type::EnumType;
use super::input_object_type::InputObjectType;
use super::interface_type::InterfaceType;
use super::object_type::ObjectType;
use super::scalar::ScalarType;
use super::union_type::UnionType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Scalar => "SCALAR",
            TypeKind::Object => "OBJECT",
            TypeKind::Interface => "INTERFACE",
            TypeKind::Union => "UNION",
            TypeKind::Enum => "ENUM",
            TypeKind::InputObject => "INPUT_OBJECT",
        }
    }

    /// Whether this kind may be used as the type of a field/expression --
    /// i.e. may appear anywhere an *output* type is expected.
    pub fn is_output_kind(&self) -> bool {
        !matches!(self, TypeKind::InputObject)
    }

    /// Whether this kind may be used as the type of an argument, input
    /// field, or variable -- i.e. may appear anywhere an *input* type is
    /// expected.
    pub fn is_input_kind(&self) -> bool {
        matches!(
            self,
            TypeKind::Scalar | TypeKind::Enum | TypeKind::InputObject
        )
    }
}

#[derive(Clone, Debug)]
pub enum GraphQLType {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

impl GraphQLType {
    pub fn name(&self) -> &str {
        match self {
            GraphQLType::Scalar(t) => &t.name,
            GraphQLType::Object(t) => &t.name,
            GraphQLType::Interface(t) => &t.name,
            GraphQLType::Union(t) => &t.name,
            GraphQLType::Enum(t) => &t.name,
            GraphQLType::InputObject(t) => &t.name,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            GraphQLType::Scalar(_) => TypeKind::Scalar,
            GraphQLType::Object(_) => TypeKind::Object,
            GraphQLType::Interface(_) => TypeKind::Interface,
            GraphQLType::Union(_) => TypeKind::Union,
            GraphQLType::Enum(_) => TypeKind::Enum,
            GraphQLType::InputObject(_) => TypeKind::InputObject,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            GraphQLType::Scalar(t) => t.description.as_deref(),
            GraphQLType::Object(t) => t.description.as_deref(),
            GraphQLType::Interface(t) => t.description.as_deref(),
            GraphQLType::Union(t) => t.description.as_deref(),
            GraphQLType::Enum(t) => t.description.as_deref(),
            GraphQLType::InputObject(t) => t.description.as_deref(),
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            GraphQLType::Object(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceType> {
        match self {
            GraphQLType::Interface(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionType> {
        match self {
            GraphQLType::Union(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            GraphQLType::Enum(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarType> {
        match self {
            GraphQLType::Scalar(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_input_object(&self) -> Option<&InputObjectType> {
        match self {
            GraphQLType::InputObject(t) => Some(t),
            _ => None,
        }
    }

    /// The names of this type's immediate parents in the subtype lattice
    /// (interfaces an object implements, interfaces a interface extends,
    /// unions a union is nested within). Everything else has none.
    pub(crate) fn parents(&self) -> &[String] {
        match self {
            GraphQLType::Object(t) => &t.parents,
            GraphQLType::Interface(t) => &t.parents,
            GraphQLType::Union(t) => &t.parents,
            _ => &[],
        }
    }

    /// The names of this type's immediate children in the subtype lattice
    /// (objects/interfaces implementing an interface, members of a union).
    pub(crate) fn children(&self) -> &[String] {
        match self {
            GraphQLType::Interface(t) => &t.children,
            GraphQLType::Union(t) => &t.children,
            _ => &[],
        }
    }
}

#[derive(Clone, Debug)]
pub struct RegisteredDirective(pub DirectiveType);
