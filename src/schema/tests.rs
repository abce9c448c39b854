//! Unit tests for [`SchemaBuilder`]'s cross-type validation. Organized by
//! the validation pass each case exercises, mirroring the structure of the
//! builder itself rather than the source's SDL-string test fixtures --
//! this crate's builder is programmatic, so every case is assembled from
//! the same `ObjectType`/`InterfaceType`/... values the builder accepts.

use super::builder::SchemaBuilder;
use super::error::SchemaBuildError;
use crate::types::{
    Field, FieldDescriptor, InputField, InputObjectType, InterfaceType, ObjectType, Resolver,
    TypeRef, UnionType,
};
use crate::value::{FieldValue, ResolvedWithErrors};

type Result<T> = std::result::Result<T, SchemaBuildError>;

fn string_field(name: &str) -> Field {
    Field::new(
        FieldDescriptor::new(name, TypeRef::named("String")),
        Resolver::attr(|_| Ok(ResolvedWithErrors::ok(FieldValue::String("".to_string())))),
    )
}

fn query_with(mut f: impl FnMut(&mut ObjectType)) -> ObjectType {
    let mut query = ObjectType::new("Query", "Query");
    f(&mut query);
    query
}

mod basics {
    use super::*;

    #[test]
    fn minimal_schema_builds() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        builder.add_object(query_with(|q| {
            q.add_field(string_field("hello")).unwrap();
        }))?;
        let schema = builder.build()?;
        assert_eq!(schema.query_type().name(), "Query");
        assert!(schema.mutation_type().is_none());
        Ok(())
    }

    #[test]
    fn no_query_type_is_an_error() {
        let builder = SchemaBuilder::new();
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaBuildError::NoQueryTypeDefined));
    }

    #[test]
    fn query_type_defaults_to_object_named_query() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        builder.add_object(query_with(|q| {
            q.add_field(string_field("hello")).unwrap();
        }))?;
        let schema = builder.build()?;
        assert_eq!(schema.query_type().name(), "Query");
        Ok(())
    }

    #[test]
    fn explicit_query_type_name_is_honored() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        let mut root = ObjectType::new("RootQuery", "RootQuery");
        root.add_field(string_field("hello")).unwrap();
        builder.add_object(root)?;
        builder.set_query_type("RootQuery");
        let schema = builder.build()?;
        assert_eq!(schema.query_type().name(), "RootQuery");
        Ok(())
    }

    #[test]
    fn duplicate_type_definition_is_rejected() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        builder.add_object(query_with(|_| {}))?;
        let err = builder
            .add_interface(InterfaceType::new("Query"))
            .unwrap_err();
        assert!(matches!(err, SchemaBuildError::DuplicateTypeDefinition { .. }));
        Ok(())
    }
}

mod interfaces {
    use super::*;

    #[test]
    fn object_implementing_undeclared_interface_is_rejected() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        let mut node = ObjectType::new("Node", "Node");
        node.add_field(string_field("id")).unwrap();
        node.implement_interface("NotDeclared");
        builder.add_object(query_with(|_| {}))?;
        let err = builder.add_object(node).and_then(|_| builder.build()).unwrap_err();
        assert!(matches!(err, SchemaBuildError::NotAnInterface { .. }));
        Ok(())
    }

    #[test]
    fn missing_interface_field_is_rejected() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        let mut iface = InterfaceType::new("Node");
        iface
            .add_field(FieldDescriptor::new("id", TypeRef::named("String")))
            .unwrap();
        let mut node = ObjectType::new("Droid", "Droid");
        node.implement_interface("Node");
        builder.add_object(query_with(|_| {}))?;
        builder.add_interface(iface)?;
        builder.add_object(node)?;
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaBuildError::MissingInterfaceField { .. }));
        Ok(())
    }

    #[test]
    fn incompatible_field_override_is_rejected() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        let mut iface = InterfaceType::new("Node");
        iface
            .add_field(FieldDescriptor::new("id", TypeRef::named("String")))
            .unwrap();
        let mut droid = ObjectType::new("Droid", "Droid");
        droid
            .add_field(Field::new(
                FieldDescriptor::new("id", TypeRef::named("Int")),
                Resolver::attr(|_| Ok(ResolvedWithErrors::ok(FieldValue::Int(1)))),
            ))
            .unwrap();
        droid.implement_interface("Node");
        builder.add_object(query_with(|_| {}))?;
        builder.add_interface(iface)?;
        builder.add_object(droid)?;
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaBuildError::IncompatibleFieldOverride { .. }));
        Ok(())
    }

    #[test]
    fn compatible_field_override_builds() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        let mut iface = InterfaceType::new("Node");
        iface
            .add_field(FieldDescriptor::new("id", TypeRef::named("String")))
            .unwrap();
        let mut droid = ObjectType::new("Droid", "Droid");
        droid.add_field(string_field("id")).unwrap();
        droid.implement_interface("Node");
        builder.add_object(query_with(|_| {}))?;
        builder.add_interface(iface)?;
        builder.add_object(droid)?;
        let schema = builder.build()?;
        assert!(schema.is_subtype("Droid", "Node"));
        Ok(())
    }

    #[test]
    fn covariant_field_override_builds() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        let mut named = InterfaceType::new("Named");
        named
            .add_field(FieldDescriptor::new("best_friend", TypeRef::named("Named")))
            .unwrap();
        let mut droid = ObjectType::new("Droid", "Droid");
        droid
            .add_field(Field::new(
                FieldDescriptor::new("best_friend", TypeRef::named("Droid")),
                Resolver::attr(|_| Ok(ResolvedWithErrors::ok(FieldValue::Null))),
            ))
            .unwrap();
        droid.implement_interface("Named");
        builder.add_object(query_with(|_| {}))?;
        builder.add_interface(named)?;
        builder.add_object(droid)?;
        let schema = builder.build()?;
        assert!(schema.is_subtype("Droid", "Named"));
        Ok(())
    }

    #[test]
    fn mismatched_wrapping_field_override_is_rejected() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        let mut iface = InterfaceType::new("Node");
        iface
            .add_field(FieldDescriptor::new("id", TypeRef::named("String")))
            .unwrap();
        let mut droid = ObjectType::new("Droid", "Droid");
        droid
            .add_field(Field::new(
                FieldDescriptor::new("id", TypeRef::list(TypeRef::named("String"))),
                Resolver::attr(|_| Ok(ResolvedWithErrors::ok(FieldValue::Null))),
            ))
            .unwrap();
        droid.implement_interface("Node");
        builder.add_object(query_with(|_| {}))?;
        builder.add_interface(iface)?;
        builder.add_object(droid)?;
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaBuildError::IncompatibleFieldOverride { .. }));
        Ok(())
    }
}

mod unions {
    use super::*;

    #[test]
    fn undefined_union_member_is_rejected() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        builder.add_object(query_with(|_| {}))?;
        builder.add_union(UnionType::new("SearchResult", vec!["Ghost".to_string()]))?;
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaBuildError::UndefinedUnionMember { .. }));
        Ok(())
    }

    #[test]
    fn union_of_unions_cycle_is_rejected() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        builder.add_object(query_with(|_| {}))?;
        builder.add_union(UnionType::new("A", vec!["B".to_string()]))?;
        builder.add_union(UnionType::new("B", vec!["A".to_string()]))?;
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaBuildError::UnionCycle { .. }));
        Ok(())
    }

    #[test]
    fn acyclic_union_of_unions_builds() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        builder.add_object(query_with(|_| {}))?;
        let mut droid = ObjectType::new("Droid", "Droid");
        droid.add_field(string_field("id")).unwrap();
        builder.add_object(droid)?;
        builder.add_union(UnionType::new("Leaf", vec!["Droid".to_string()]))?;
        builder.add_union(UnionType::new("Root", vec!["Leaf".to_string()]))?;
        let schema = builder.build()?;
        assert!(schema.is_subtype("Droid", "Leaf"));
        Ok(())
    }
}

mod field_types {
    use super::*;

    #[test]
    fn undefined_field_type_is_rejected() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        builder.add_object(query_with(|q| {
            q.add_field(Field::new(
                FieldDescriptor::new("hello", TypeRef::named("Nonexistent")),
                Resolver::attr(|_| Ok(ResolvedWithErrors::ok(FieldValue::Null))),
            ))
            .unwrap();
        }))?;
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaBuildError::UndefinedFieldType { .. }));
        Ok(())
    }

    #[test]
    fn input_object_used_as_field_output_type_is_rejected() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        builder.add_input_object(InputObjectType::new("Filter"))?;
        builder.add_object(query_with(|q| {
            q.add_field(Field::new(
                FieldDescriptor::new("hello", TypeRef::named("Filter")),
                Resolver::attr(|_| Ok(ResolvedWithErrors::ok(FieldValue::Null))),
            ))
            .unwrap();
        }))?;
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaBuildError::InputTypeUsedAsOutput { .. }));
        Ok(())
    }

    #[test]
    fn object_used_as_argument_type_is_rejected() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        builder.add_object(query_with(|q| {
            let mut descriptor = FieldDescriptor::new("hello", TypeRef::named("String"));
            descriptor.args.insert(
                "filter".to_string(),
                crate::types::Argument {
                    name: "filter".to_string(),
                    arg_type: TypeRef::named("Query"),
                    default_value: None,
                    description: None,
                },
            );
            q.add_field(Field::new(
                descriptor,
                Resolver::attr(|_| Ok(ResolvedWithErrors::ok(FieldValue::Null))),
            ))
            .unwrap();
        }))?;
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaBuildError::OutputTypeUsedAsInput { .. }));
        Ok(())
    }

    #[test]
    fn input_object_field_referencing_object_type_is_rejected() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        let mut filter = InputObjectType::new("Filter");
        filter
            .add_field(InputField {
                name: "root".to_string(),
                field_type: TypeRef::named("Query"),
                description: None,
            })
            .unwrap();
        builder.add_input_object(filter)?;
        builder.add_object(query_with(|_| {}))?;
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaBuildError::OutputTypeUsedAsInput { .. }));
        Ok(())
    }
}

mod meta_field_shadowing {
    use super::*;

    #[test]
    fn object_field_named_typename_is_rejected() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        builder.add_object(query_with(|q| {
            q.add_field(string_field("__typename")).unwrap();
        }))?;
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaBuildError::ShadowsMetaField { .. }));
        Ok(())
    }

    #[test]
    fn query_field_named_schema_is_rejected() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        builder.add_object(query_with(|q| {
            q.add_field(Field::new(
                FieldDescriptor::new("__schema", TypeRef::named("String")),
                Resolver::attr(|_| Ok(ResolvedWithErrors::ok(FieldValue::Null))),
            ))
            .unwrap();
        }))?;
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaBuildError::ShadowsMetaField { .. }));
        Ok(())
    }
}

mod enums {
    use super::*;
    use crate::types::{EnumType, EnumValue};

    #[test]
    fn reserved_enum_constant_is_rejected() {
        let mut episode = EnumType::new("Episode");
        let err = episode
            .add_value(EnumValue {
                name: "true".to_string(),
                internal_value: "TRUE".to_string(),
                description: None,
                deprecated: false,
                deprecation_reason: None,
            })
            .unwrap_err();
        assert!(matches!(err, crate::types::EnumValueError::Reserved(_)));
    }

    #[test]
    fn non_bijective_enum_mapping_is_rejected() {
        let mut episode = EnumType::new("Episode");
        episode
            .add_value(EnumValue {
                name: "NEWHOPE".to_string(),
                internal_value: "4".to_string(),
                description: None,
                deprecated: false,
                deprecation_reason: None,
            })
            .unwrap();
        let err = episode
            .add_value(EnumValue {
                name: "EMPIRE".to_string(),
                internal_value: "4".to_string(),
                description: None,
                deprecated: false,
                deprecation_reason: None,
            })
            .unwrap_err();
        assert!(matches!(err, crate::types::EnumValueError::NonBijective(_)));
    }

    #[test]
    fn enum_builds_and_resolves_both_directions() -> Result<()> {
        let mut episode = EnumType::new("Episode");
        episode
            .add_value(EnumValue {
                name: "EMPIRE".to_string(),
                internal_value: "5".to_string(),
                description: None,
                deprecated: false,
                deprecation_reason: None,
            })
            .unwrap();
        let mut builder = SchemaBuilder::new();
        builder.add_enum(episode)?;
        builder.add_object(query_with(|_| {}))?;
        let schema = builder.build()?;
        let episode = schema.get_type("Episode").expect("registered above").as_enum().unwrap();
        assert_eq!(episode.internal_value_of("EMPIRE"), Some("5"));
        assert_eq!(episode.name_of_internal_value("5"), Some("EMPIRE"));
        Ok(())
    }
}

mod directives {
    use super::*;

    #[test]
    fn redefining_a_builtin_directive_is_rejected() {
        let mut builder = SchemaBuilder::new();
        let err = builder
            .add_directive(crate::types::DirectiveType {
                name: "skip".to_string(),
                description: None,
                args: indexmap::IndexMap::new(),
                locations: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, SchemaBuildError::RedefinedBuiltinDirective { .. }));
    }
}

mod json {
    use super::*;
    use crate::schema::{Schema, SchemaJsonError, SCHEMA_JSON_VERSION};

    fn sample_schema() -> crate::schema::Schema {
        let mut builder = SchemaBuilder::new();
        let mut iface = InterfaceType::new("Node");
        iface
            .add_field(FieldDescriptor::new("id", TypeRef::named("String")))
            .unwrap();
        let mut droid = ObjectType::new("Droid", "Droid");
        droid.add_field(string_field("id")).unwrap();
        droid.implement_interface("Node");
        builder.add_interface(iface).unwrap();
        builder.add_object(droid).unwrap();
        builder
            .add_object(query_with(|q| {
                q.add_field(string_field("hello")).unwrap();
            }))
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn round_trips_through_json() {
        let schema = sample_schema();
        let json = schema.to_json();
        let rebuilt = Schema::from_json(&json).expect("round trip");
        assert!(rebuilt.is_subtype("Droid", "Node"));
        assert_eq!(rebuilt.query_type().name(), "Query");
        assert!(rebuilt.get_type("__Schema").is_some());
    }

    #[test]
    fn introspection_types_are_not_duplicated_in_the_encoding() {
        let schema = sample_schema();
        let json = schema.to_json();
        let objects = json["objects"].as_array().unwrap();
        assert!(objects.iter().all(|o| !o["name"].as_str().unwrap().starts_with("__")));
    }

    #[test]
    fn version_mismatch_is_hard_rejected() {
        let mut json = sample_schema().to_json();
        json["version"] = serde_json::json!(SCHEMA_JSON_VERSION + 1);
        let err = Schema::from_json(&json).unwrap_err();
        assert!(matches!(err, SchemaJsonError::VersionMismatch { .. }));
    }

    #[test]
    fn reconstructed_object_field_survives_with_its_descriptor_intact() {
        let schema = sample_schema();
        let rebuilt = Schema::from_json(&schema.to_json()).unwrap();
        let droid = rebuilt.get_type("Droid").unwrap().as_object().unwrap();
        let field = droid.field("id").expect("field survives round trip");
        assert_eq!(field.descriptor.field_type.to_string(), "String");
    }
}

mod introspection_wiring {
    use super::*;

    #[test]
    fn built_schema_registers_introspection_types() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        builder.add_object(query_with(|q| {
            q.add_field(string_field("hello")).unwrap();
        }))?;
        let schema = builder.build()?;
        assert!(schema.get_type("__Schema").is_some());
        assert!(schema.get_type("__Type").is_some());
        assert!(schema.common_field("__typename").is_some());
        assert!(schema.implicit_root_field("__schema").is_some());
        assert!(schema.implicit_root_field("__type").is_some());
        Ok(())
    }

    #[test]
    fn mutation_type_is_absent_when_not_declared() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        builder.add_object(query_with(|_| {}))?;
        let schema = builder.build()?;
        assert!(schema.mutation_type().is_none());
        Ok(())
    }

    #[test]
    fn explicit_mutation_type_is_honored() -> Result<()> {
        let mut builder = SchemaBuilder::new();
        builder.add_object(query_with(|_| {}))?;
        let mut mutation = ObjectType::new("Mutation", "Mutation");
        mutation
            .add_field(Field::new(
                FieldDescriptor::new("noop", TypeRef::named("Boolean")),
                Resolver::attr(|_| Ok(ResolvedWithErrors::ok(FieldValue::Bool(true)))),
            ))
            .unwrap();
        builder.add_object(mutation)?;
        let schema = builder.build()?;
        assert_eq!(schema.mutation_type().map(|t| t.name()), Some("Mutation"));
        Ok(())
    }
}
