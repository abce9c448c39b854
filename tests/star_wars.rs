//! End-to-end coverage for the eight concrete scenarios (§8) plus a few of
//! the invariants, driven entirely through the public [`execute`] entry
//! point against a small Star-Wars-flavored schema.

use graphlayer::{
    execute, ArgValues, ClassTag, Context, Field, FieldDescriptor, FieldValue, GraphQLObject,
    InterfaceType, ObjectType, ResolvedValue, ResolvedWithErrors, Resolver, ResolverError, Schema,
    SchemaBuilder, TypeRef,
};
use std::any::Any;
use std::sync::{Arc, Mutex};

fn nn(inner: TypeRef) -> TypeRef {
    TypeRef::non_null(inner).expect("never double-wraps")
}

// --- Domain values ------------------------------------------------------

#[derive(Debug)]
struct Human {
    id: &'static str,
    name: &'static str,
}
impl GraphQLObject for Human {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn class_tags(&self) -> &'static [ClassTag] {
        &["Human"]
    }
}

#[derive(Debug)]
struct Droid {
    id: &'static str,
    name: &'static str,
}
impl GraphQLObject for Droid {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn class_tags(&self) -> &'static [ClassTag] {
        &["Droid"]
    }
}

#[derive(Debug)]
struct Ship {
    id: &'static str,
    name: &'static str,
}
impl GraphQLObject for Ship {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn class_tags(&self) -> &'static [ClassTag] {
        &["Ship"]
    }
}

/// Never actually produced by a resolver -- exists only so `Ship.brokenId`
/// has an Object type to be typechecked against, so the field can be made to
/// fail completion on purpose (scenario 7).
#[derive(Debug)]
struct Captain;
impl GraphQLObject for Captain {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn class_tags(&self) -> &'static [ClassTag] {
        &["Captain"]
    }
}

fn humans() -> &'static [Human] {
    &[Human { id: "1000", name: "Luke Skywalker" }]
}

fn droids() -> &'static [Droid] {
    &[Droid { id: "2001", name: "R2-D2" }]
}

fn ships() -> &'static [Ship] {
    &[
        Ship { id: "3000", name: "Millennium Falcon" },
        Ship { id: "3001", name: "X-wing" },
    ]
}

// --- Schema ---------------------------------------------------------------

fn ok_str(s: impl Into<String>) -> Result<ResolvedWithErrors<FieldValue>, ResolverError> {
    Ok(ResolvedWithErrors::ok(FieldValue::String(s.into())))
}

fn character_field(name: &str) -> Field {
    Field::new(
        FieldDescriptor::new(name, nn(TypeRef::named("String"))),
        Resolver::attr(move |source| {
            if let Some(h) = source.as_any().downcast_ref::<Human>() {
                return match name {
                    "id" => ok_str(h.id),
                    "name" => ok_str(h.name),
                    _ => unreachable!(),
                };
            }
            if let Some(d) = source.as_any().downcast_ref::<Droid>() {
                return match name {
                    "id" => ok_str(d.id),
                    "name" => ok_str(d.name),
                    _ => unreachable!(),
                };
            }
            unreachable!("Character fields only ever resolve against Human/Droid")
        }),
    )
}

fn build_schema() -> Arc<Schema> {
    let mut builder = SchemaBuilder::new();

    let mut character = InterfaceType::new("Character");
    character.add_field(FieldDescriptor::new("id", nn(TypeRef::named("String")))).unwrap();
    character.add_field(FieldDescriptor::new("name", nn(TypeRef::named("String")))).unwrap();
    builder.add_interface(character).unwrap();

    let mut human = ObjectType::new("Human", "Human");
    human.add_field(character_field("id")).unwrap();
    human.add_field(character_field("name")).unwrap();
    human.implement_interface("Character");
    builder.add_object(human).unwrap();

    let mut droid = ObjectType::new("Droid", "Droid");
    droid.add_field(character_field("id")).unwrap();
    droid.add_field(character_field("name")).unwrap();
    droid.implement_interface("Character");
    builder.add_object(droid).unwrap();

    let mut captain = ObjectType::new("Captain", "Captain");
    captain
        .add_field(Field::new(
            FieldDescriptor::new("id", nn(TypeRef::named("String"))),
            Resolver::attr(|_| ok_str("unused")),
        ))
        .unwrap();
    builder.add_object(captain).unwrap();

    let mut ship = ObjectType::new("Ship", "Ship");
    ship.add_field(Field::new(
        FieldDescriptor::new("id", nn(TypeRef::named("String"))),
        Resolver::attr(|source| {
            let s = source.as_any().downcast_ref::<Ship>().unwrap();
            ok_str(s.id)
        }),
    ))
    .unwrap();
    ship.add_field(Field::new(
        FieldDescriptor::new("name", nn(TypeRef::named("String"))),
        Resolver::attr(|source| {
            let s = source.as_any().downcast_ref::<Ship>().unwrap();
            ok_str(s.name)
        }),
    ))
    .unwrap();
    // Both always produce a value of the wrong kind (a plain string) for a
    // field declared to return `Captain`/`Captain!`, to exercise completion
    // failure at a nullable and at a non-null position respectively.
    ship.add_field(Field::new(
        FieldDescriptor::new("brokenId", TypeRef::named("Captain")),
        Resolver::attr(|_| ok_str("not-a-captain")),
    ))
    .unwrap();
    ship.add_field(Field::new(
        FieldDescriptor::new("brokenIdNonNull", nn(TypeRef::named("Captain"))),
        Resolver::attr(|_| ok_str("not-a-captain")),
    ))
    .unwrap();
    builder.add_object(ship).unwrap();

    let mut query = ObjectType::new("Query", "Query");
    query
        .add_field(Field::new(
            FieldDescriptor::new("human", TypeRef::named("Human")).with_arg(
                "id",
                nn(TypeRef::named("String")),
            ),
            Resolver::method(|ctx| {
                let Some(ResolvedValue::String(id)) = ctx.arg("id") else {
                    return Ok(ResolvedWithErrors::ok(FieldValue::Null));
                };
                match humans().iter().find(|h| h.id == id.as_str()) {
                    Some(h) => Ok(ResolvedWithErrors::ok(FieldValue::Object(Arc::new(Human {
                        id: h.id,
                        name: h.name,
                    })))),
                    None => Ok(ResolvedWithErrors::ok(FieldValue::Null)),
                }
            }),
        ))
        .unwrap();
    query
        .add_field(Field::new(
            FieldDescriptor::new("hero", TypeRef::named("Character")),
            Resolver::attr(|_| {
                let r2d2 = &droids()[0];
                Ok(ResolvedWithErrors::ok(FieldValue::Object(Arc::new(Droid {
                    id: r2d2.id,
                    name: r2d2.name,
                }))))
            }),
        ))
        .unwrap();
    query
        .add_field(Field::new(
            FieldDescriptor::new("ship", nn(TypeRef::named("Ship"))).with_arg(
                "id",
                nn(TypeRef::named("String")),
            ),
            Resolver::method(|ctx| {
                let Some(ResolvedValue::String(id)) = ctx.arg("id") else {
                    unreachable!("id is a required argument")
                };
                let found = ships()
                    .iter()
                    .find(|s| s.id == id.as_str())
                    .expect("test only queries known ships");
                Ok(ResolvedWithErrors::ok(FieldValue::Object(Arc::new(Ship {
                    id: found.id,
                    name: found.name,
                }))))
            }),
        ))
        .unwrap();
    builder.add_object(query).unwrap();

    let mut mutation = ObjectType::new("Mutation", "Mutation");
    mutation
        .add_field(Field::new(
            FieldDescriptor::new("setFavoriteShip", TypeRef::named("Ship")).with_arg(
                "id",
                nn(TypeRef::named("String")),
            ),
            Resolver::method(|ctx| {
                let Some(ResolvedValue::String(id)) = ctx.arg("id") else {
                    return Ok(ResolvedWithErrors::ok(FieldValue::Null));
                };
                match ships().iter().find(|s| s.id == id.as_str()) {
                    Some(s) => Ok(ResolvedWithErrors::ok(FieldValue::Object(Arc::new(Ship {
                        id: s.id,
                        name: s.name,
                    })))),
                    None => Ok(ResolvedWithErrors::ok(FieldValue::Null)),
                }
            }),
        ))
        .unwrap();
    builder.add_object(mutation).unwrap();

    Arc::new(builder.build().expect("fixture schema is valid"))
}

/// Extends [`FieldDescriptor`] with a builder-style argument helper, since
/// every field in this fixture declares exactly one required argument or
/// none at all.
trait WithArg {
    fn with_arg(self, name: &str, arg_type: TypeRef) -> Self;
}
impl WithArg for FieldDescriptor {
    fn with_arg(mut self, name: &str, arg_type: TypeRef) -> Self {
        self.args.insert(
            name.to_string(),
            graphlayer::Argument {
                name: name.to_string(),
                arg_type,
                default_value: None,
                description: None,
            },
        );
        self
    }
}

#[derive(Default)]
struct RecordingContext {
    mutation_log: Mutex<Vec<String>>,
}

impl Context for RecordingContext {
    fn mutation_start(&self, field_name: &str, _args: &ArgValues) {
        self.mutation_log.lock().unwrap().push(format!("start:{field_name}"));
    }
    fn mutation_end(
        &self,
        field_name: &str,
        _args: &ArgValues,
        _result: Option<&FieldValue>,
        _error: Option<&ResolverError>,
    ) {
        self.mutation_log.lock().unwrap().push(format!("end:{field_name}"));
    }
}

// --- Scenario 1 -------------------------------------------------------

#[test]
fn human_query_resolves_by_id() {
    let schema = build_schema();
    let ctx = RecordingContext::default();
    let response = execute(r#"{human(id: "1000"){name}}"#, &schema, &ctx, None, None);
    assert_eq!(
        response,
        serde_json::json!({"data": {"human": {"name": "Luke Skywalker"}}})
    );
}

// --- Scenario 2 -------------------------------------------------------

#[test]
fn hero_resolves_through_the_character_interface() {
    let schema = build_schema();
    let ctx = RecordingContext::default();
    let response = execute(r#"{hero{__typename, name}}"#, &schema, &ctx, None, None);
    assert_eq!(
        response,
        serde_json::json!({"data": {"hero": {"__typename": "Droid", "name": "R2-D2"}}})
    );
}

// --- Scenario 3 -------------------------------------------------------

#[test]
fn variable_driven_include_directive() {
    let schema = build_schema();
    let ctx = RecordingContext::default();
    let document = r#"query($if: Boolean!){human(id: "1000"){name @include(if: $if)}}"#;

    let response = execute(document, &schema, &ctx, Some(&serde_json::json!({"if": false})), None);
    assert_eq!(response, serde_json::json!({"data": {"human": {}}}));

    let response = execute(document, &schema, &ctx, Some(&serde_json::json!({"if": true})), None);
    assert_eq!(
        response,
        serde_json::json!({"data": {"human": {"name": "Luke Skywalker"}}})
    );
}

// --- Scenario 4 -------------------------------------------------------

#[test]
fn mutation_batch_with_partial_failure() {
    let schema = build_schema();
    let ctx = RecordingContext::default();
    let document = r#"mutation{
        a: setFavoriteShip(id: "3000"){name}
        b: setFavoriteShip(id: "X"){name}
        c: setFavoriteShip(id: "3001"){name}
    }"#;
    let response = execute(document, &schema, &ctx, None, None);
    assert_eq!(
        response,
        serde_json::json!({
            "data": {
                "a": {"name": "Millennium Falcon"},
                "b": null,
                "c": {"name": "X-wing"},
            }
        })
    );

    let log = ctx.mutation_log.into_inner().unwrap();
    assert_eq!(log.len(), 6, "expected start/end pairs for all three aliases: {log:?}");
    assert_eq!(log.iter().filter(|e| e.starts_with("start:")).count(), 3);
    assert_eq!(log.iter().filter(|e| e.starts_with("end:")).count(), 3);
    assert!(log.iter().all(|e| e.ends_with("setFavoriteShip")));
}

// --- Scenario 5 -------------------------------------------------------

#[test]
fn selecting_subfields_of_a_scalar_is_a_parse_error() {
    let schema = build_schema();
    let ctx = RecordingContext::default();
    let response = execute(r#"{human(id: "1000"){id{foo}}}"#, &schema, &ctx, None, None);
    let errors = response["errors"].as_array().expect("parse failure reports errors");
    assert_eq!(errors.len(), 1);
    let location = &errors[0]["locations"][0];
    assert!(location["line"].is_number());
    assert!(location["column"].is_number());
}

// --- Scenario 6 -------------------------------------------------------

#[test]
fn duplicate_operation_name_is_rejected() {
    let schema = build_schema();
    let ctx = RecordingContext::default();
    let response = execute("query foo {hero{name}} query foo {hero{name}}", &schema, &ctx, None, None);
    assert!(response.get("data").is_none());
    assert_eq!(response["errors"].as_array().unwrap().len(), 1);
}

// --- Scenario 7 -------------------------------------------------------

#[test]
fn non_null_field_type_error_nulls_out_the_whole_response() {
    let schema = build_schema();
    let ctx = RecordingContext::default();
    let response = execute(
        r#"{ship(id: "3000"){brokenIdNonNull, name}}"#,
        &schema,
        &ctx,
        None,
        None,
    );
    assert_eq!(response["data"], serde_json::Value::Null);
    assert_eq!(response["errors"].as_array().unwrap().len(), 1);
}

#[test]
fn nullable_field_type_error_leaves_its_sibling_intact() {
    let schema = build_schema();
    let ctx = RecordingContext::default();
    let response = execute(r#"{ship(id: "3000"){brokenId, name}}"#, &schema, &ctx, None, None);
    assert_eq!(
        response["data"],
        serde_json::json!({"ship": {"brokenId": null, "name": "Millennium Falcon"}})
    );
    assert_eq!(response["errors"].as_array().unwrap().len(), 1);
}

// --- Scenario 8 -------------------------------------------------------

#[test]
fn fragment_cycle_is_a_parse_error() {
    let schema = build_schema();
    let ctx = RecordingContext::default();
    let document = r#"
        fragment A on Character { ...B }
        fragment B on Character { ...A }
        query { hero { ...A } }
    "#;
    let response = execute(document, &schema, &ctx, None, None);
    let errors = response["errors"].as_array().expect("cycle is a parse failure");
    assert_eq!(errors.len(), 1);
    let message = errors[0]["message"].as_str().unwrap();
    assert!(message.contains("A => B => A"), "message was: {message}");
}

// --- A couple of the §8 invariants -------------------------------------

#[test]
fn response_top_level_keys_are_a_subset_of_data_errors_extensions() {
    let schema = build_schema();
    let ctx = RecordingContext::default();
    for document in [
        r#"{human(id: "1000"){name}}"#,
        r#"{human(id: "1000"){id{foo}}}"#,
        "query foo {hero{name}} query foo {hero{name}}",
    ] {
        let response = execute(document, &schema, &ctx, None, None);
        let allowed = ["data", "errors", "extensions"];
        for key in response.as_object().unwrap().keys() {
            assert!(allowed.contains(&key.as_str()), "unexpected top-level key `{key}`");
        }
    }
}

#[test]
fn unknown_operation_name_is_reported_without_data() {
    let schema = build_schema();
    let ctx = RecordingContext::default();
    let response = execute(r#"{human(id: "1000"){name}}"#, &schema, &ctx, None, Some("NotDefined"));
    assert!(response.get("data").is_none());
    assert_eq!(response["errors"].as_array().unwrap().len(), 1);
}
