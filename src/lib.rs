//! A schema-aware GraphQL parsing, validation, and execution engine.
//!
//! The pieces, roughly in the order a request flows through them:
//! - [`schema`] -- build a [`schema::Schema`] (component C1-C3): register
//!   scalars, enums, input objects, interfaces, unions, and objects (each
//!   backed by [`types::Resolver`] closures), then [`schema::SchemaBuilder::build`]
//!   validates the whole graph and attaches the introspection surface.
//! - [`parser`] -- [`parser::parse`] turns a document string plus a `Schema`
//!   into a validated [`document::Document`] in one schema-aware pass
//!   (component C4-C5).
//! - [`executor`] -- [`executor::execute`]/[`executor::execute_document`]
//!   (component C7) walk a `Document`'s selections against an
//!   embedder-supplied [`executor::Context`], producing the
//!   `{data, errors, extensions}` response envelope.
//! - [`introspection`] -- the `__Schema`/`__Type`/… surface (component C6),
//!   wired into every built `Schema` automatically.
//!
//! [`value`], [`types`], [`loc`], and [`named_ref`] are the shared
//! vocabulary the rest of the crate is built from.

mod document;
mod executor;
mod introspection;
mod loc;
mod named_ref;
mod parser;
mod schema;
mod types;
mod value;

pub use document::{
    Document, DirectiveApplication, FieldQuery, FragmentDefinition, FragmentReference, FragmentSlot,
    FragmentSpreadSite, Operation, OperationKind, OperationLookupError, Selection, SelectionSet, Variable,
};
pub use executor::{
    execute, execute_document, BadScalarError, Context, ErrorLocation, ErrorRecord, FieldTypeError,
    OperationNameError, SchemaMismatchError, UnknownContextArg, VariablesError,
};
pub use loc::{SourcePosition, SchemaDefLocation};
pub use named_ref::{DerefByName, NamedRef};
pub use parser::ParseError;
pub use schema::{Schema, SchemaBuildError, SchemaBuilder, SchemaJsonError, SCHEMA_JSON_VERSION};
pub use types::{
    builtin_include, builtin_scalar_impl, builtin_scalar_names, builtin_skip, is_valid_identifier,
    ArgValues, Argument, BooleanScalarImpl, DirectiveLocation, DirectiveType, EnumType, EnumValue,
    EnumValueError, Field, FieldDescriptor, FloatScalarImpl, GraphQLType, IdScalarImpl, InputField,
    InputObjectType, InterfaceType, IntScalarImpl, ObjectType, RESERVED_ENUM_CONSTANTS, Resolver,
    ResolverContext, ResolverOutcome, ScalarImpl, ScalarType, StringScalarImpl, TypeKind, TypeRef,
    TypeRefError, UnionType, INT_MAX_EXCLUSIVE, INT_MIN,
};
pub use value::{
    ClassTag, FieldValue, GraphQLObject, ObjectValue, ResolvedValue, ResolvedWithErrors, ResolverError,
    RootMutationValue, RootQueryValue, Value, ROOT_MUTATION_TAG, ROOT_QUERY_TAG,
};
