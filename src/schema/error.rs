//! Errors raised while assembling a [`crate::schema::SchemaBuilder`] into a
//! finished [`crate::schema::Schema`].

use crate::loc::SchemaDefLocation;
use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq)]
pub enum SchemaBuildError {
    #[error("multiple types were registered under the name `{type_name}`")]
    DuplicateTypeDefinition {
        type_name: String,
        def1: SchemaDefLocation,
        def2: SchemaDefLocation,
    },

    #[error("multiple fields named `{field_name}` were registered on `{type_name}`")]
    DuplicateFieldDefinition {
        type_name: String,
        field_name: String,
    },

    #[error("multiple enum values were registered under the constant name `{constant_name}` on enum `{enum_name}`")]
    DuplicateEnumValue {
        enum_name: String,
        constant_name: String,
    },

    #[error("two enum constants on `{enum_name}` map to the same internal value; enum value mappings must be bijective")]
    NonBijectiveEnumMapping { enum_name: String },

    #[error("`{constant_name}` is a reserved constant name and may not be used as an enum value on `{enum_name}`")]
    ReservedEnumConstant {
        enum_name: String,
        constant_name: String,
    },

    #[error("`{type_name}` declares itself as implementing/extending unknown type `{referenced}`")]
    UndefinedTypeReference {
        type_name: String,
        referenced: String,
    },

    #[error("`{type_name}` declares itself as implementing/extending `{referenced}`, which is not an interface")]
    NotAnInterface {
        type_name: String,
        referenced: String,
    },

    #[error("union `{type_name}` names `{referenced}` as a member, but no such type was registered")]
    UndefinedUnionMember {
        type_name: String,
        referenced: String,
    },

    #[error("cycle detected among union declarations: {cycle}")]
    UnionCycle { cycle: String },

    #[error(
        "`{type_name}.{field_name}` does not satisfy the contract declared by `{parent_name}.{field_name}`: \
         return type, argument types, or required arguments do not match"
    )]
    IncompatibleFieldOverride {
        type_name: String,
        parent_name: String,
        field_name: String,
    },

    #[error("`{interface_name}` declares field `{field_name}`, but implementing type `{type_name}` does not define it")]
    MissingInterfaceField {
        type_name: String,
        interface_name: String,
        field_name: String,
    },

    #[error("field/argument type `{type_ref}` does not reference any registered type")]
    UndefinedFieldType { type_ref: String },

    #[error("`{type_ref}` is used as an output type but `{named_type}` is an input object, which may only be used as an input type")]
    InputTypeUsedAsOutput { type_ref: String, named_type: String },

    #[error("`{type_ref}` is used as an input type but `{named_type}` is an object, interface, or union, which may only be used as an output type")]
    OutputTypeUsedAsInput { type_ref: String, named_type: String },

    #[error("a schema must define exactly one root query type; none was registered")]
    NoQueryTypeDefined,

    #[error("attempted to redefine builtin directive `@{name}`")]
    RedefinedBuiltinDirective { name: String },

    #[error("`{type_ref}` is not a well-formed type reference: {source}")]
    InvalidTypeRef {
        type_ref: String,
        #[source]
        source: crate::types::TypeRefError,
    },

    #[error("`{0}` is not a valid GraphQL name")]
    InvalidName(String),

    #[error("`{type_name}` declares a field named `{field_name}`, which shadows a built-in meta-field")]
    ShadowsMetaField { type_name: String, field_name: String },
}
