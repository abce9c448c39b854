//! The schema's type system: [`GraphQLType`] and its six concrete kinds,
//! [`TypeRef`] annotations, and the field/argument/scalar machinery shared
//! across them.

mod directive_type;
mod enum_type;
mod field;
mod graphql_type;
mod input_object_type;
mod interface_type;
mod object_type;
mod scalar;
mod type_ref;
mod union_type;

pub use directive_type::{builtin_include, builtin_skip, DirectiveLocation, DirectiveType};
pub use enum_type::{EnumType, EnumValue, EnumValueError, RESERVED_ENUM_CONSTANTS};
pub use field::{ArgValues, Argument, Field, FieldDescriptor, Resolver, ResolverContext, ResolverOutcome};
pub use graphql_type::{GraphQLType, TypeKind};
pub use input_object_type::{InputField, InputObjectType};
pub use interface_type::InterfaceType;
pub use object_type::ObjectType;
pub use scalar::{
    builtin_scalar_impl, builtin_scalar_names, int_in_range, BooleanScalarImpl, FloatScalarImpl,
    IdScalarImpl, IntScalarImpl, ScalarImpl, ScalarType, StringScalarImpl, INT_MAX_EXCLUSIVE, INT_MIN,
};
pub use type_ref::{is_valid_identifier, TypeRef, TypeRefError};
pub use union_type::UnionType;
