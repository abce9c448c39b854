//! The introspection system: `__Schema`, `__Type`, `__Field`,
//! `__InputValue`, `__EnumValue`, `__Directive`, and the `__schema`/`__type`
//! root fields and `__typename` meta-field that expose them.
//!
//! These are registered as ordinary [`crate::types::ObjectType`]/[`crate::types::EnumType`]
//! values so that a query against them validates the same way a query
//! against any other type does; their resolvers are ordinary
//! [`crate::types::Resolver::Method`] closures that read the
//! [`crate::schema::Schema`] off [`crate::types::ResolverContext`] rather
//! than needing to capture it (captures can't reach back into the schema
//! they'll eventually be attached to).

use crate::schema::Schema;
use crate::types::{
    DirectiveLocation, EnumType, EnumValue, Field, FieldDescriptor, GraphQLType, ObjectType,
    Resolver, TypeKind, TypeRef,
};
use crate::value::{FieldValue, GraphQLObject, ObjectValue, ResolvedWithErrors};
use std::any::Any;
use std::sync::Arc;

/// A type reference as introspection sees it: either a name that should
/// resolve against the schema, or a `List`/`NonNull` wrapper around one.
#[derive(Clone, Debug)]
enum IntroTypeRepr {
    Named(String),
    List(Box<IntroTypeRepr>),
    NonNull(Box<IntroTypeRepr>),
}

impl IntroTypeRepr {
    fn from_type_ref(t: &TypeRef) -> Self {
        match t {
            TypeRef::Named(name) => IntroTypeRepr::Named(name.clone()),
            TypeRef::List(inner) => IntroTypeRepr::List(Box::new(Self::from_type_ref(inner))),
            TypeRef::NonNull(inner) => IntroTypeRepr::NonNull(Box::new(Self::from_type_ref(inner))),
        }
    }
}

struct IntroType(IntroTypeRepr);
struct IntroField(FieldDescriptor);
struct IntroInputValue {
    name: String,
    type_ref: TypeRef,
    default_value: Option<crate::value::Value>,
    description: Option<String>,
}
struct IntroEnumValue(EnumValue);
struct IntroDirective(crate::types::DirectiveType);
struct IntroSchema;

macro_rules! tag_impl {
    ($ty:ty, $tag:expr) => {
        impl GraphQLObject for $ty {
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn class_tags(&self) -> &'static [crate::value::ClassTag] {
                &[$tag]
            }
        }
    };
}

tag_impl!(IntroType, "__Type");
tag_impl!(IntroField, "__Field");
tag_impl!(IntroInputValue, "__InputValue");
tag_impl!(IntroEnumValue, "__EnumValue");
tag_impl!(IntroDirective, "__Directive");
tag_impl!(IntroSchema, "__Schema");

fn ok(value: FieldValue) -> crate::types::ResolverOutcome {
    Ok(ResolvedWithErrors::ok(value))
}

fn str_list(items: Vec<String>) -> FieldValue {
    FieldValue::List(items.into_iter().map(FieldValue::String).collect())
}

fn obj_list(items: Vec<ObjectValue>) -> FieldValue {
    FieldValue::List(items.into_iter().map(FieldValue::Object).collect())
}

fn opt_str(s: Option<String>) -> FieldValue {
    match s {
        Some(s) => FieldValue::String(s),
        None => FieldValue::Null,
    }
}

fn intro_type_value(repr: IntroTypeRepr) -> ObjectValue {
    Arc::new(IntroType(repr))
}

/// Registers the introspection meta-types (`__Schema` and friends) and
/// attaches the `__schema`/`__type` fields to the schema's query type.
/// `__typename` is handled directly by the executor and needs no entry
/// here.
pub fn attach(mut schema: Schema) -> Schema {
    let type_kind = build_type_kind_enum();
    let directive_location = build_directive_location_enum();
    let input_value = build_input_value_object();
    let enum_value = build_enum_value_object();
    let field = build_field_object();
    let directive = build_directive_object();
    let ty = build_type_object();
    let schema_object = build_schema_object();

    schema.directives.keys().for_each(|_| {});

    schema.types.insert("__TypeKind".to_string(), GraphQLType::Enum(type_kind));
    schema.types.insert(
        "__DirectiveLocation".to_string(),
        GraphQLType::Enum(directive_location),
    );
    schema
        .types
        .insert("__InputValue".to_string(), GraphQLType::Object(input_value));
    schema
        .types
        .insert("__EnumValue".to_string(), GraphQLType::Object(enum_value));
    schema.types.insert("__Field".to_string(), GraphQLType::Object(field));
    schema
        .types
        .insert("__Directive".to_string(), GraphQLType::Object(directive));
    schema.types.insert("__Type".to_string(), GraphQLType::Object(ty));
    schema
        .types
        .insert("__Schema".to_string(), GraphQLType::Object(schema_object));

    schema
}

fn nn(inner: TypeRef) -> TypeRef {
    TypeRef::non_null(inner).expect("single non_null wrap never double-wraps")
}

fn list_of_nn(inner: TypeRef) -> TypeRef {
    nn(TypeRef::list(nn(inner)))
}

fn build_type_kind_enum() -> EnumType {
    let mut e = EnumType::new("__TypeKind");
    for kind in [
        TypeKind::Scalar,
        TypeKind::Object,
        TypeKind::Interface,
        TypeKind::Union,
        TypeKind::Enum,
        TypeKind::InputObject,
    ] {
        let _ = e.add_value(EnumValue {
            name: kind.as_str().to_string(),
            internal_value: kind.as_str().to_string(),
            description: None,
            deprecated: false,
            deprecation_reason: None,
        });
    }
    for name in ["LIST", "NON_NULL"] {
        let _ = e.add_value(EnumValue {
            name: name.to_string(),
            internal_value: name.to_string(),
            description: None,
            deprecated: false,
            deprecation_reason: None,
        });
    }
    e
}

fn build_directive_location_enum() -> EnumType {
    let mut e = EnumType::new("__DirectiveLocation");
    for loc in [
        DirectiveLocation::Query,
        DirectiveLocation::Mutation,
        DirectiveLocation::Field,
        DirectiveLocation::FragmentDefinition,
        DirectiveLocation::FragmentSpread,
        DirectiveLocation::InlineFragment,
    ] {
        let _ = e.add_value(EnumValue {
            name: loc.as_str().to_string(),
            internal_value: loc.as_str().to_string(),
            description: None,
            deprecated: false,
            deprecation_reason: None,
        });
    }
    e
}

fn build_input_value_object() -> ObjectType {
    let mut o = ObjectType::new("__InputValue", "__InputValue");
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("name", nn(TypeRef::named("String"))),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroInputValue>().expect("source is __InputValue");
            ok(FieldValue::String(v.name.clone()))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("description", TypeRef::named("String")),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroInputValue>().expect("source is __InputValue");
            ok(opt_str(v.description.clone()))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("type", nn(TypeRef::named("__Type"))),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroInputValue>().expect("source is __InputValue");
            ok(FieldValue::Object(intro_type_value(IntroTypeRepr::from_type_ref(&v.type_ref))))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("defaultValue", TypeRef::named("String")),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroInputValue>().expect("source is __InputValue");
            ok(opt_str(v.default_value.as_ref().map(|dv| dv.to_json_literal_or_enum_string())))
        }),
    ));
    o
}

fn build_enum_value_object() -> ObjectType {
    let mut o = ObjectType::new("__EnumValue", "__EnumValue");
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("name", nn(TypeRef::named("String"))),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroEnumValue>().expect("source is __EnumValue");
            ok(FieldValue::String(v.0.name.clone()))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("description", TypeRef::named("String")),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroEnumValue>().expect("source is __EnumValue");
            ok(opt_str(v.0.description.clone()))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("isDeprecated", nn(TypeRef::named("Boolean"))),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroEnumValue>().expect("source is __EnumValue");
            ok(FieldValue::Bool(v.0.deprecated))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("deprecationReason", TypeRef::named("String")),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroEnumValue>().expect("source is __EnumValue");
            ok(opt_str(v.0.deprecation_reason.clone()))
        }),
    ));
    o
}

fn build_field_object() -> ObjectType {
    let mut o = ObjectType::new("__Field", "__Field");
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("name", nn(TypeRef::named("String"))),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroField>().expect("source is __Field");
            ok(FieldValue::String(v.0.name.clone()))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("description", TypeRef::named("String")),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroField>().expect("source is __Field");
            ok(opt_str(v.0.description.clone()))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("args", list_of_nn(TypeRef::named("__InputValue"))),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroField>().expect("source is __Field");
            let args = v
                .0
                .args
                .values()
                .map(|a| -> ObjectValue {
                    Arc::new(IntroInputValue {
                        name: a.name.clone(),
                        type_ref: a.arg_type.clone(),
                        default_value: a.default_value.clone(),
                        description: a.description.clone(),
                    })
                })
                .collect();
            ok(obj_list(args))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("type", nn(TypeRef::named("__Type"))),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroField>().expect("source is __Field");
            ok(FieldValue::Object(intro_type_value(IntroTypeRepr::from_type_ref(&v.0.field_type))))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("isDeprecated", nn(TypeRef::named("Boolean"))),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroField>().expect("source is __Field");
            ok(FieldValue::Bool(v.0.deprecated))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("deprecationReason", TypeRef::named("String")),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroField>().expect("source is __Field");
            ok(opt_str(v.0.deprecation_reason.clone()))
        }),
    ));
    o
}

fn build_directive_object() -> ObjectType {
    let mut o = ObjectType::new("__Directive", "__Directive");
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("name", nn(TypeRef::named("String"))),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroDirective>().expect("source is __Directive");
            ok(FieldValue::String(v.0.name.clone()))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("description", TypeRef::named("String")),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroDirective>().expect("source is __Directive");
            ok(opt_str(v.0.description.clone()))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("locations", list_of_nn(TypeRef::named("__DirectiveLocation"))),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroDirective>().expect("source is __Directive");
            ok(str_list(v.0.locations.iter().map(|l| l.as_str().to_string()).collect()))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("args", list_of_nn(TypeRef::named("__InputValue"))),
        Resolver::attr(|src| {
            let v = src.as_any().downcast_ref::<IntroDirective>().expect("source is __Directive");
            let args = v
                .0
                .args
                .values()
                .map(|a| -> ObjectValue {
                    Arc::new(IntroInputValue {
                        name: a.name.clone(),
                        type_ref: a.arg_type.clone(),
                        default_value: a.default_value.clone(),
                        description: a.description.clone(),
                    })
                })
                .collect();
            ok(obj_list(args))
        }),
    ));
    o
}

fn build_type_object() -> ObjectType {
    let mut o = ObjectType::new("__Type", "__Type");
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("kind", nn(TypeRef::named("__TypeKind"))),
        Resolver::method(|ctx| {
            let v = ctx.source.as_any().downcast_ref::<IntroType>().expect("source is __Type");
            let kind = match &v.0 {
                IntroTypeRepr::NonNull(_) => "NON_NULL".to_string(),
                IntroTypeRepr::List(_) => "LIST".to_string(),
                IntroTypeRepr::Named(name) => ctx
                    .schema
                    .get_type(name)
                    .map(|t| t.kind().as_str().to_string())
                    .unwrap_or_else(|| "SCALAR".to_string()),
            };
            ok(FieldValue::EnumValue(kind))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("name", TypeRef::named("String")),
        Resolver::method(|ctx| {
            let v = ctx.source.as_any().downcast_ref::<IntroType>().expect("source is __Type");
            match &v.0 {
                IntroTypeRepr::Named(name) => ok(FieldValue::String(name.clone())),
                _ => ok(FieldValue::Null),
            }
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("description", TypeRef::named("String")),
        Resolver::method(|ctx| {
            let v = ctx.source.as_any().downcast_ref::<IntroType>().expect("source is __Type");
            match &v.0 {
                IntroTypeRepr::Named(name) => {
                    ok(opt_str(ctx.schema.get_type(name).and_then(|t| t.description()).map(str::to_string)))
                }
                _ => ok(FieldValue::Null),
            }
        }),
    ));
    let mut fields_field = FieldDescriptor::new("fields", TypeRef::list(nn(TypeRef::named("__Field"))));
    fields_field.args.insert(
        "includeDeprecated".to_string(),
        crate::types::Argument {
            name: "includeDeprecated".to_string(),
            arg_type: TypeRef::named("Boolean"),
            default_value: Some(crate::value::Value::Boolean(false)),
            description: None,
        },
    );
    let _ = o.add_field(Field::new(
        fields_field,
        Resolver::method(|ctx| {
            let v = ctx.source.as_any().downcast_ref::<IntroType>().expect("source is __Type");
            let IntroTypeRepr::Named(name) = &v.0 else {
                return ok(FieldValue::Null);
            };
            let include_deprecated = matches!(
                ctx.arg("includeDeprecated"),
                Some(crate::value::ResolvedValue::Bool(true))
            );
            let descriptors: Vec<FieldDescriptor> = match ctx.schema.get_type(name) {
                Some(GraphQLType::Object(obj)) => {
                    obj.fields.values().map(|f| f.descriptor.clone()).collect()
                }
                Some(GraphQLType::Interface(iface)) => iface.fields.values().cloned().collect(),
                _ => return ok(FieldValue::Null),
            };
            let fields: Vec<ObjectValue> = descriptors
                .into_iter()
                .filter(|d| include_deprecated || !d.deprecated)
                .map(|d| -> ObjectValue { Arc::new(IntroField(d)) })
                .collect();
            ok(obj_list(fields))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("interfaces", TypeRef::list(nn(TypeRef::named("__Type")))),
        Resolver::method(|ctx| {
            let v = ctx.source.as_any().downcast_ref::<IntroType>().expect("source is __Type");
            let IntroTypeRepr::Named(name) = &v.0 else {
                return ok(FieldValue::Null);
            };
            match ctx.schema.get_type(name) {
                Some(GraphQLType::Object(obj)) => ok(obj_list(
                    obj.implemented_interfaces()
                        .iter()
                        .map(|n| intro_type_value(IntroTypeRepr::Named(n.clone())))
                        .collect(),
                )),
                Some(GraphQLType::Interface(iface)) => ok(obj_list(
                    iface
                        .extended_interfaces()
                        .iter()
                        .map(|n| intro_type_value(IntroTypeRepr::Named(n.clone())))
                        .collect(),
                )),
                _ => ok(FieldValue::Null),
            }
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("possibleTypes", TypeRef::list(nn(TypeRef::named("__Type")))),
        Resolver::method(|ctx| {
            let v = ctx.source.as_any().downcast_ref::<IntroType>().expect("source is __Type");
            let IntroTypeRepr::Named(name) = &v.0 else {
                return ok(FieldValue::Null);
            };
            match ctx.schema.get_type(name) {
                Some(GraphQLType::Interface(_)) | Some(GraphQLType::Union(_)) => ok(obj_list(
                    ctx.schema
                        .leaf_types(name)
                        .into_iter()
                        .map(|n| intro_type_value(IntroTypeRepr::Named(n.to_string())))
                        .collect(),
                )),
                _ => ok(FieldValue::Null),
            }
        }),
    ));
    let mut enum_values_field =
        FieldDescriptor::new("enumValues", TypeRef::list(nn(TypeRef::named("__EnumValue"))));
    enum_values_field.args.insert(
        "includeDeprecated".to_string(),
        crate::types::Argument {
            name: "includeDeprecated".to_string(),
            arg_type: TypeRef::named("Boolean"),
            default_value: Some(crate::value::Value::Boolean(false)),
            description: None,
        },
    );
    let _ = o.add_field(Field::new(
        enum_values_field,
        Resolver::method(|ctx| {
            let v = ctx.source.as_any().downcast_ref::<IntroType>().expect("source is __Type");
            let IntroTypeRepr::Named(name) = &v.0 else {
                return ok(FieldValue::Null);
            };
            let include_deprecated = matches!(
                ctx.arg("includeDeprecated"),
                Some(crate::value::ResolvedValue::Bool(true))
            );
            match ctx.schema.get_type(name) {
                Some(GraphQLType::Enum(e)) => ok(obj_list(
                    e.values
                        .values()
                        .filter(|ev| include_deprecated || !ev.deprecated)
                        .map(|ev| -> ObjectValue { Arc::new(IntroEnumValue(ev.clone())) })
                        .collect(),
                )),
                _ => ok(FieldValue::Null),
            }
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("inputFields", TypeRef::list(nn(TypeRef::named("__InputValue")))),
        Resolver::method(|ctx| {
            let v = ctx.source.as_any().downcast_ref::<IntroType>().expect("source is __Type");
            let IntroTypeRepr::Named(name) = &v.0 else {
                return ok(FieldValue::Null);
            };
            match ctx.schema.get_type(name) {
                Some(GraphQLType::InputObject(io)) => ok(obj_list(
                    io.fields
                        .values()
                        .map(|f| -> ObjectValue {
                            Arc::new(IntroInputValue {
                                name: f.name.clone(),
                                type_ref: f.field_type.clone(),
                                // Input-object fields never carry a default
                                // (`InputField` has none, per §3/§4.2's
                                // required-field rule); `defaultValue` is
                                // always null for these, matching the
                                // original's own `__InputValue` projection.
                                default_value: None,
                                description: f.description.clone(),
                            })
                        })
                        .collect(),
                )),
                _ => ok(FieldValue::Null),
            }
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("ofType", TypeRef::named("__Type")),
        Resolver::method(|ctx| {
            let v = ctx.source.as_any().downcast_ref::<IntroType>().expect("source is __Type");
            match &v.0 {
                IntroTypeRepr::List(inner) | IntroTypeRepr::NonNull(inner) => {
                    ok(FieldValue::Object(intro_type_value((**inner).clone())))
                }
                IntroTypeRepr::Named(_) => ok(FieldValue::Null),
            }
        }),
    ));
    o
}

fn build_schema_object() -> ObjectType {
    let mut o = ObjectType::new("__Schema", "__Schema");
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("types", list_of_nn(TypeRef::named("__Type"))),
        Resolver::method(|ctx| {
            let names: Vec<String> = ctx.schema.types().map(|t| t.name().to_string()).collect();
            ok(obj_list(names.into_iter().map(|n| intro_type_value(IntroTypeRepr::Named(n))).collect()))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("queryType", nn(TypeRef::named("__Type"))),
        Resolver::method(|ctx| {
            ok(FieldValue::Object(intro_type_value(IntroTypeRepr::Named(
                ctx.schema.query_type().name().to_string(),
            ))))
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("mutationType", TypeRef::named("__Type")),
        Resolver::method(|ctx| match ctx.schema.mutation_type() {
            Some(t) => ok(FieldValue::Object(intro_type_value(IntroTypeRepr::Named(t.name().to_string())))),
            None => ok(FieldValue::Null),
        }),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("subscriptionType", TypeRef::named("__Type")),
        Resolver::method(|_ctx| ok(FieldValue::Null)),
    ));
    let _ = o.add_field(Field::new(
        FieldDescriptor::new("directives", list_of_nn(TypeRef::named("__Directive"))),
        Resolver::method(|ctx| {
            let directives: Vec<ObjectValue> = ctx
                .schema
                .directives()
                .map(|d| -> ObjectValue { Arc::new(IntroDirective(d.clone())) })
                .collect();
            ok(obj_list(directives))
        }),
    ));
    o
}

/// Resolver for the root `__schema` meta-field.
pub fn resolve_root_schema() -> ObjectValue {
    Arc::new(IntroSchema)
}

/// Resolver for the root `__type(name: ...)` meta-field; `None` if no such
/// type is registered.
pub fn resolve_root_type(schema: &Schema, name: &str) -> Option<ObjectValue> {
    schema
        .get_type(name)
        .map(|_| intro_type_value(IntroTypeRepr::Named(name.to_string())))
}

impl Clone for IntroTypeRepr {
    fn clone(&self) -> Self {
        match self {
            IntroTypeRepr::Named(n) => IntroTypeRepr::Named(n.clone()),
            IntroTypeRepr::List(inner) => IntroTypeRepr::List(Box::new((**inner).clone())),
            IntroTypeRepr::NonNull(inner) => IntroTypeRepr::NonNull(Box::new((**inner).clone())),
        }
    }
}

trait DefaultValueDisplay {
    fn to_json_literal_or_enum_string(&self) -> String;
}

impl DefaultValueDisplay for crate::value::Value {
    fn to_json_literal_or_enum_string(&self) -> String {
        match self {
            crate::value::Value::Enum(name) => name.clone(),
            crate::value::Value::VariableRef(_) => String::new(),
            other => other.to_json_literal().to_string(),
        }
    }
}

