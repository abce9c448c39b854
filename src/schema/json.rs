//! Versioned JSON encoding for a built [`Schema`] (§4.1 "Serialization").
//!
//! `to_json` renders the full type graph -- every object/interface/union/
//! enum/scalar/input-object, its parents, and its fields -- as plain JSON.
//! `from_json` is the inverse, gated on [`SCHEMA_JSON_VERSION`] matching
//! exactly.
//!
//! One thing doesn't round-trip: resolvers are closures, not named,
//! dynamically-loadable symbols, so there's nothing to reattach a rebuilt
//! object field to. A schema rebuilt by `from_json` is faithful for every
//! structural purpose (introspection, validation, documentation) but its
//! object fields carry a stub resolver that returns a [`ResolverError`] if
//! actually invoked -- see DESIGN.md.

use crate::types::{
    Argument, EnumType, EnumValue, Field, FieldDescriptor, GraphQLType, InputField,
    InputObjectType, InterfaceType, ObjectType, Resolver, ScalarType, TypeRef, UnionType,
};
use crate::value::{ResolverError, Value};
use indexmap::IndexMap;
use serde_json::{json, Value as Json};

use super::builder::SchemaBuilder;
use super::schema::{Schema, SCHEMA_JSON_VERSION};

#[derive(Clone, Debug, thiserror::Error)]
pub enum SchemaJsonError {
    #[error("schema JSON has version {found}, but this build only understands version {expected}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("malformed schema JSON: {0}")]
    Malformed(String),
}

impl Schema {
    /// Renders this schema's full type graph as the versioned JSON form
    /// described in §4.1. Types within each category, and fields within
    /// each type, are listed in declaration order (this crate's
    /// `IndexMap`-backed registries preserve it directly, with no need for
    /// a separate sort-by-name pass).
    pub fn to_json(&self) -> Json {
        let mut objects = Vec::new();
        let mut interfaces = Vec::new();
        let mut unions = Vec::new();
        let mut enums = Vec::new();
        let mut scalars = Vec::new();
        let mut input_objects = Vec::new();

        // The introspection surface (`__Schema`, `__Type`, ...) is attached
        // automatically by every `SchemaBuilder::build`, `from_json`
        // included -- encoding it here would make a round trip double-add
        // it and fail with a duplicate-type error.
        for t in self.types.values().filter(|t| !t.name().starts_with("__")) {
            match t {
                GraphQLType::Object(o) => objects.push(object_json(o)),
                GraphQLType::Interface(i) => interfaces.push(interface_json(i)),
                GraphQLType::Union(u) => unions.push(union_json(u)),
                GraphQLType::Enum(e) => enums.push(enum_json(e)),
                GraphQLType::Scalar(s) => scalars.push(scalar_json(s)),
                GraphQLType::InputObject(io) => input_objects.push(input_object_json(io)),
            }
        }

        json!({
            "version": SCHEMA_JSON_VERSION,
            "queryType": self.query_type_name,
            "mutationType": self.mutation_type_name,
            "objects": objects,
            "interfaces": interfaces,
            "unions": unions,
            "enums": enums,
            "scalars": scalars,
            "inputObjects": input_objects,
        })
    }

    /// Reconstructs a [`Schema`] from [`Schema::to_json`]'s output. Hard
    /// rejects on any version other than [`SCHEMA_JSON_VERSION`] -- there is
    /// no migration path.
    pub fn from_json(value: &Json) -> Result<Schema, SchemaJsonError> {
        let found = value
            .get("version")
            .and_then(Json::as_u64)
            .ok_or_else(|| SchemaJsonError::Malformed("missing \"version\"".to_string()))?;
        if found != SCHEMA_JSON_VERSION as u64 {
            return Err(SchemaJsonError::VersionMismatch {
                expected: SCHEMA_JSON_VERSION,
                found: found as u32,
            });
        }

        let mut builder = SchemaBuilder::new();

        for scalar_json in array_field(value, "scalars")? {
            if let Some(scalar) = scalar_from_json(scalar_json)? {
                builder
                    .add_scalar(scalar)
                    .map_err(|e| SchemaJsonError::Malformed(e.to_string()))?;
            }
        }
        for enum_json in array_field(value, "enums")? {
            builder
                .add_enum(enum_from_json(enum_json)?)
                .map_err(|e| SchemaJsonError::Malformed(e.to_string()))?;
        }
        for input_json in array_field(value, "inputObjects")? {
            builder
                .add_input_object(input_object_from_json(input_json)?)
                .map_err(|e| SchemaJsonError::Malformed(e.to_string()))?;
        }
        for interface_json in array_field(value, "interfaces")? {
            builder
                .add_interface(interface_from_json(interface_json)?)
                .map_err(|e| SchemaJsonError::Malformed(e.to_string()))?;
        }
        for union_json in array_field(value, "unions")? {
            builder
                .add_union(union_from_json(union_json)?)
                .map_err(|e| SchemaJsonError::Malformed(e.to_string()))?;
        }
        for object_json in array_field(value, "objects")? {
            builder
                .add_object(object_from_json(object_json)?)
                .map_err(|e| SchemaJsonError::Malformed(e.to_string()))?;
        }

        if let Some(name) = value.get("queryType").and_then(Json::as_str) {
            builder.set_query_type(name);
        }
        if let Some(name) = value.get("mutationType").and_then(Json::as_str) {
            builder.set_mutation_type(name);
        }

        builder
            .build()
            .map_err(|e| SchemaJsonError::Malformed(e.to_string()))
    }
}

fn array_field<'a>(value: &'a Json, key: &str) -> Result<&'a Vec<Json>, SchemaJsonError> {
    value
        .get(key)
        .and_then(Json::as_array)
        .ok_or_else(|| SchemaJsonError::Malformed(format!("missing \"{key}\" array")))
}

fn str_field(value: &Json, key: &str) -> Result<String, SchemaJsonError> {
    value
        .get(key)
        .and_then(Json::as_str)
        .map(str::to_string)
        .ok_or_else(|| SchemaJsonError::Malformed(format!("missing \"{key}\" string")))
}

fn description_field(value: &Json) -> Option<String> {
    value.get("description").and_then(Json::as_str).map(str::to_string)
}

fn type_ref_field(value: &Json, key: &str) -> Result<TypeRef, SchemaJsonError> {
    let rendered = str_field(value, key)?;
    TypeRef::parse(&rendered).map_err(|e| SchemaJsonError::Malformed(e.to_string()))
}

fn leak_static(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}

fn argument_json(arg: &Argument) -> Json {
    json!({
        "name": arg.name,
        "type": arg.arg_type.to_string(),
        "defaultValue": arg.default_value.as_ref().map(Value::to_json_literal),
        "description": arg.description,
    })
}

fn argument_from_json(value: &Json) -> Result<Argument, SchemaJsonError> {
    Ok(Argument {
        name: str_field(value, "name")?,
        arg_type: type_ref_field(value, "type")?,
        default_value: value
            .get("defaultValue")
            .filter(|v| !v.is_null())
            .map(json_to_value),
        description: description_field(value),
    })
}

fn args_json(args: &IndexMap<String, Argument>) -> Json {
    Json::Array(args.values().map(argument_json).collect())
}

fn args_from_json(value: &Json, key: &str) -> Result<IndexMap<String, Argument>, SchemaJsonError> {
    let mut out = IndexMap::new();
    for arg_json in array_field(value, key)? {
        let arg = argument_from_json(arg_json)?;
        out.insert(arg.name.clone(), arg);
    }
    Ok(out)
}

/// A schema JSON default value only ever holds a literal (never a
/// `$variable` reference), so every branch but `VariableRef` is reachable.
fn json_to_value(value: &Json) -> Value {
    match value {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Boolean(*b),
        Json::Number(n) if n.is_i64() || n.is_u64() => Value::Int(n.as_i64().unwrap_or_default() as i32),
        Json::Number(n) => Value::Float(n.as_f64().unwrap_or_default()),
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => Value::List(items.iter().map(json_to_value).collect()),
        Json::Object(map) => {
            Value::Object(map.iter().map(|(k, v)| (k.clone(), json_to_value(v))).collect())
        }
    }
}

fn field_descriptor_json(descriptor: &FieldDescriptor) -> Json {
    json!({
        "name": descriptor.name,
        "type": descriptor.field_type.to_string(),
        "args": args_json(&descriptor.args),
        "description": descriptor.description,
        "deprecated": descriptor.deprecated,
        "deprecationReason": descriptor.deprecation_reason,
    })
}

fn field_descriptor_from_json(value: &Json) -> Result<FieldDescriptor, SchemaJsonError> {
    Ok(FieldDescriptor {
        name: str_field(value, "name")?,
        field_type: type_ref_field(value, "type")?,
        args: args_from_json(value, "args")?,
        description: description_field(value),
        deprecated: value.get("deprecated").and_then(Json::as_bool).unwrap_or(false),
        deprecation_reason: value
            .get("deprecationReason")
            .and_then(Json::as_str)
            .map(str::to_string),
    })
}

/// Object fields add a `"resolver": "stub"` marker alongside the shared
/// descriptor JSON: there is no way to serialize a closure, so this only
/// records that a resolver existed, not what it did.
fn object_field_json(field: &Field) -> Json {
    let mut j = field_descriptor_json(&field.descriptor);
    j.as_object_mut()
        .expect("field_descriptor_json always returns an object")
        .insert("resolver".to_string(), Json::String("stub".to_string()));
    j
}

fn object_field_from_json(value: &Json) -> Result<Field, SchemaJsonError> {
    let descriptor = field_descriptor_from_json(value)?;
    let field_name = descriptor.name.clone();
    Ok(Field::new(
        descriptor,
        Resolver::attr(move |_| {
            Err(ResolverError::msg(format!(
                "field `{field_name}` was reconstructed from schema JSON and has no executable resolver"
            )))
        }),
    ))
}

fn object_json(o: &ObjectType) -> Json {
    json!({
        "name": o.name,
        "description": o.description,
        "classTag": o.class_tag,
        "parents": o.parents,
        "fields": o.fields.values().map(object_field_json).collect::<Vec<_>>(),
    })
}

fn object_from_json(value: &Json) -> Result<ObjectType, SchemaJsonError> {
    let name = str_field(value, "name")?;
    let class_tag = value
        .get("classTag")
        .and_then(Json::as_str)
        .map(|s| leak_static(s.to_string()))
        .unwrap_or_else(|| leak_static(name.clone()));
    let mut object = ObjectType::new(name.clone(), class_tag);
    object.description = description_field(value);
    for parent in array_field(value, "parents")? {
        let parent = parent
            .as_str()
            .ok_or_else(|| SchemaJsonError::Malformed("parents entries must be strings".to_string()))?;
        object.implement_interface(parent);
    }
    for field_json in array_field(value, "fields")? {
        object
            .add_field(object_field_from_json(field_json)?)
            .map_err(|name| SchemaJsonError::Malformed(format!("duplicate field `{name}`")))?;
    }
    Ok(object)
}

fn interface_json(i: &InterfaceType) -> Json {
    json!({
        "name": i.name,
        "description": i.description,
        "parents": i.parents,
        "fields": i.fields.values().map(field_descriptor_json).collect::<Vec<_>>(),
    })
}

fn interface_from_json(value: &Json) -> Result<InterfaceType, SchemaJsonError> {
    let mut interface = InterfaceType::new(str_field(value, "name")?);
    interface.description = description_field(value);
    for parent in array_field(value, "parents")? {
        let parent = parent
            .as_str()
            .ok_or_else(|| SchemaJsonError::Malformed("parents entries must be strings".to_string()))?;
        interface.extend_interface(parent);
    }
    for field_json in array_field(value, "fields")? {
        interface
            .add_field(field_descriptor_from_json(field_json)?)
            .map_err(|name| SchemaJsonError::Malformed(format!("duplicate field `{name}`")))?;
    }
    Ok(interface)
}

fn union_json(u: &UnionType) -> Json {
    json!({
        "name": u.name,
        "description": u.description,
        "members": u.members(),
    })
}

fn union_from_json(value: &Json) -> Result<UnionType, SchemaJsonError> {
    let name = str_field(value, "name")?;
    let members: Vec<String> = array_field(value, "members")?
        .iter()
        .map(|m| {
            m.as_str()
                .map(str::to_string)
                .ok_or_else(|| SchemaJsonError::Malformed("members entries must be strings".to_string()))
        })
        .collect::<Result<_, _>>()?;
    let mut union = UnionType::new(name, members);
    union.description = description_field(value);
    Ok(union)
}

fn enum_json(e: &EnumType) -> Json {
    json!({
        "name": e.name,
        "description": e.description,
        "values": e.values.values().map(|v| json!({
            "name": v.name,
            "internalValue": v.internal_value,
            "description": v.description,
            "deprecated": v.deprecated,
            "deprecationReason": v.deprecation_reason,
        })).collect::<Vec<_>>(),
    })
}

fn enum_from_json(value: &Json) -> Result<EnumType, SchemaJsonError> {
    let mut e = EnumType::new(str_field(value, "name")?);
    e.description = description_field(value);
    for value_json in array_field(value, "values")? {
        let enum_value = EnumValue {
            name: str_field(value_json, "name")?,
            internal_value: str_field(value_json, "internalValue")?,
            description: description_field(value_json),
            deprecated: value_json.get("deprecated").and_then(Json::as_bool).unwrap_or(false),
            deprecation_reason: value_json
                .get("deprecationReason")
                .and_then(Json::as_str)
                .map(str::to_string),
        };
        e.add_value(enum_value)
            .map_err(|err| SchemaJsonError::Malformed(format!("{err:?}")))?;
    }
    Ok(e)
}

/// Builtin scalars (`Int`, `String`, ...) are pre-registered by
/// [`SchemaBuilder::new`] with their real [`crate::types::ScalarImpl`]
/// already attached; `from_json` skips re-adding them and returns `None`.
/// A custom scalar has no impl to reattach (same limitation as object
/// resolvers) so it gets a stub that rejects every coercion.
fn scalar_from_json(value: &Json) -> Result<Option<ScalarType>, SchemaJsonError> {
    let name = str_field(value, "name")?;
    if crate::types::builtin_scalar_names().contains(&name.as_str()) {
        return Ok(None);
    }
    let stub = std::sync::Arc::new(StubScalarImpl(name.clone()));
    let mut scalar = ScalarType::new(name, stub);
    scalar.description = description_field(value);
    Ok(Some(scalar))
}

#[derive(Debug)]
struct StubScalarImpl(String);

impl crate::types::ScalarImpl for StubScalarImpl {
    fn coerce_input(&self, _literal: &Json) -> Result<crate::value::ResolvedValue, String> {
        Err(format!(
            "scalar `{}` was reconstructed from schema JSON and has no executable coercion",
            self.0
        ))
    }

    fn coerce_output(&self, _value: &crate::value::FieldValue) -> Result<Json, String> {
        Err(format!(
            "scalar `{}` was reconstructed from schema JSON and has no executable coercion",
            self.0
        ))
    }
}

fn scalar_json(s: &ScalarType) -> Json {
    json!({
        "name": s.name,
        "description": s.description,
    })
}

fn input_field_json(f: &InputField) -> Json {
    json!({
        "name": f.name,
        "type": f.field_type.to_string(),
        "description": f.description,
    })
}

fn input_field_from_json(value: &Json) -> Result<InputField, SchemaJsonError> {
    Ok(InputField {
        name: str_field(value, "name")?,
        field_type: type_ref_field(value, "type")?,
        description: description_field(value),
    })
}

fn input_object_json(io: &InputObjectType) -> Json {
    json!({
        "name": io.name,
        "description": io.description,
        "fields": io.fields.values().map(input_field_json).collect::<Vec<_>>(),
    })
}

fn input_object_from_json(value: &Json) -> Result<InputObjectType, SchemaJsonError> {
    let mut io = InputObjectType::new(str_field(value, "name")?);
    io.description = description_field(value);
    for field_json in array_field(value, "fields")? {
        io.add_field(input_field_from_json(field_json)?)
            .map_err(|name| SchemaJsonError::Malformed(format!("duplicate field `{name}`")))?;
    }
    Ok(io)
}
