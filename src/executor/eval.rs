//! The selection-set walk itself (§4.3 "Execution"): groups fields by
//! response key, dispatches each group to a resolver (or an introspection
//! meta-field), and type-checks what comes back against the field's
//! declared output type, bubbling a failure up through any `NonNull`
//! wrappers to the first nullable ancestor along the way.

use crate::document::{FieldQuery, Operation, OperationKind, Selection, SelectionSet};
use crate::executor::context::{render_exception, Context, ErrorRecord};
use crate::executor::error::{BadScalarError, FieldTypeError};
use crate::introspection;
use crate::loc::SourcePosition;
use crate::schema::Schema;
use crate::types::{ArgValues, GraphQLType, ResolverContext, TypeRef};
use crate::value::{FieldValue, ObjectValue, ResolvedValue, ResolverError};
use indexmap::IndexMap;
use std::cell::RefCell;

/// Marker returned when a value fails inside a non-null position: the
/// failure has already been recorded as an [`ErrorRecord`], and the caller's
/// only job is to decide whether it stops here (nullable position: becomes
/// `null`) or keeps climbing (non-null position: propagate again).
pub(crate) struct Bubble;

pub(crate) struct ExecState<'a> {
    pub schema: &'a Schema,
    pub context: &'a dyn Context,
    pub variables: IndexMap<String, ResolvedValue>,
    pub errors: RefCell<Vec<ErrorRecord>>,
}

impl<'a> ExecState<'a> {
    fn record(&self, record: ErrorRecord) {
        self.errors.borrow_mut().push(record);
    }

    fn record_at(&self, pos: SourcePosition, message: String) {
        self.record(ErrorRecord::at(message, pos.line, pos.column));
    }
}

/// Runs an operation's root selection set against its synthetic root value,
/// returning the assembled `data` object or a [`Bubble`] if a non-null
/// failure reached all the way to the root (§4.3: "data: null" in that
/// case).
pub(crate) fn execute_operation(
    operation: &Operation,
    root_type_name: &str,
    root_value: &ObjectValue,
    state: &ExecState,
) -> Result<IndexMap<String, serde_json::Value>, Bubble> {
    let is_mutation = matches!(operation.kind, OperationKind::Mutation);
    execute_selection_set(
        root_type_name,
        root_value,
        &[&operation.selection_set],
        state,
        is_mutation,
    )
}

fn passes_directives(
    directives: &[crate::document::DirectiveApplication],
    variables: &IndexMap<String, ResolvedValue>,
) -> bool {
    for d in directives {
        let resolved = d
            .args
            .get("if")
            .map(|v| v.substitute_variables(variables));
        match (d.name.as_str(), resolved) {
            (_, None) => continue,
            ("skip", Some(ResolvedValue::Bool(true))) => return false,
            ("include", Some(ResolvedValue::Bool(false))) => return false,
            _ => {}
        }
    }
    true
}

/// Depth-first flattens `ss`'s selections into `out`, inlining fragment
/// spreads whose directives pass and whose type condition the concrete
/// `object_type_name` satisfies (§4.3 "Fragment resolution").
fn flatten_selection_set<'doc>(
    ss: &'doc SelectionSet,
    object_type_name: &str,
    schema: &Schema,
    variables: &IndexMap<String, ResolvedValue>,
    out: &mut Vec<&'doc FieldQuery>,
) {
    for selection in &ss.selections {
        match selection {
            Selection::Field(fq) => {
                if passes_directives(&fq.directives, variables) {
                    out.push(fq);
                }
            }
            Selection::FragmentSpread(site) => {
                if !passes_directives(&site.directives, variables) {
                    continue;
                }
                let Some(def) = site.fragment.fragment() else {
                    continue;
                };
                if !schema.is_subtype(object_type_name, &def.type_condition) {
                    continue;
                }
                flatten_selection_set(&def.selection_set, object_type_name, schema, variables, out);
            }
        }
    }
}

/// Fills in each declared argument's value: the supplied literal/variable if
/// present, else the argument's declared default, else omitted (a resolver
/// sees that as "no value supplied").
fn coerce_args(fq: &FieldQuery, variables: &IndexMap<String, ResolvedValue>) -> ArgValues {
    let mut out = IndexMap::new();
    for (name, arg_def) in fq.field_descriptor.args.iter() {
        if let Some(v) = fq.args.get(name) {
            out.insert(name.clone(), v.substitute_variables(variables));
        } else if let Some(default) = &arg_def.default_value {
            out.insert(name.clone(), default.substitute_variables(variables));
        }
    }
    out
}

fn child_selection_sets<'a>(group: &[&'a FieldQuery]) -> Vec<&'a SelectionSet> {
    group.iter().filter_map(|fq| fq.selection_set.as_ref()).collect()
}

/// Evaluates every selection reachable from `selection_sets` (merged
/// together, since more than one query can target the same object) against
/// `value`, an instance of `object_type_name`. `is_mutation_root_level` is
/// true only for the single top-level call made against an operation's own
/// root selection set when that operation is a mutation -- it's what gates
/// the `mutation_start`/`mutation_end` hook pairing (§4.3, §6).
pub(crate) fn execute_selection_set(
    object_type_name: &str,
    value: &ObjectValue,
    selection_sets: &[&SelectionSet],
    state: &ExecState,
    is_mutation_root_level: bool,
) -> Result<IndexMap<String, serde_json::Value>, Bubble> {
    let mut flattened = Vec::new();
    for ss in selection_sets {
        flatten_selection_set(ss, object_type_name, state.schema, &state.variables, &mut flattened);
    }

    let mut groups: IndexMap<String, Vec<&FieldQuery>> = IndexMap::new();
    for fq in flattened {
        groups.entry(fq.response_key.clone()).or_default().push(fq);
    }

    let mut out = IndexMap::new();
    for (response_key, group) in groups {
        let first = group[0];
        let json = execute_field_group(
            object_type_name,
            value,
            first,
            &group,
            state,
            is_mutation_root_level,
        )?;
        out.insert(response_key, json);
    }
    Ok(out)
}

fn execute_field_group(
    object_type_name: &str,
    value: &ObjectValue,
    first: &FieldQuery,
    group: &[&FieldQuery],
    state: &ExecState,
    is_mutation_root_level: bool,
) -> Result<serde_json::Value, Bubble> {
    let name = first.field_name();

    if name == "__typename" {
        return Ok(serde_json::Value::String(object_type_name.to_string()));
    }

    if name == "__schema" && state.schema.is_root_query_type(object_type_name) {
        let schema_value = introspection::resolve_root_schema();
        let sub_selections = child_selection_sets(group);
        return complete_value(
            &first.field_descriptor.field_type,
            FieldValue::Object(schema_value),
            &sub_selections,
            first.def_location,
            state,
        );
    }

    if name == "__type" && state.schema.is_root_query_type(object_type_name) {
        let args = coerce_args(first, &state.variables);
        let type_name = match args.get("name") {
            Some(ResolvedValue::String(s)) => s.clone(),
            _ => return Ok(serde_json::Value::Null),
        };
        return match introspection::resolve_root_type(state.schema, &type_name) {
            Some(type_value) => {
                let sub_selections = child_selection_sets(group);
                complete_value(
                    &first.field_descriptor.field_type,
                    FieldValue::Object(type_value),
                    &sub_selections,
                    first.def_location,
                    state,
                )
            }
            None => Ok(serde_json::Value::Null),
        };
    }

    let object_type = state
        .schema
        .get_type(object_type_name)
        .and_then(GraphQLType::as_object)
        .expect("a value's class tag always resolves to a registered Object type");
    let field = object_type
        .field(name)
        .expect("every field reachable on a concrete object was validated against that object's own field set");

    let arg_values = coerce_args(first, &state.variables);
    if is_mutation_root_level {
        state.context.mutation_start(name, &arg_values);
    }

    let outcome = field.resolver.invoke(&ResolverContext {
        source: value,
        args: &arg_values,
        context: state.context,
        schema: state.schema,
    });

    match outcome {
        Ok(resolved) => {
            for err in &resolved.errors {
                for record in render_exception(state.context, err) {
                    state.record(record);
                }
            }
            if is_mutation_root_level {
                state
                    .context
                    .mutation_end(name, &arg_values, Some(&resolved.value), None);
            }
            let sub_selections = child_selection_sets(group);
            complete_value(
                &field.descriptor.field_type,
                resolved.value,
                &sub_selections,
                first.def_location,
                state,
            )
        }
        Err(resolver_err) => {
            if is_mutation_root_level {
                state
                    .context
                    .mutation_end(name, &arg_values, None, Some(&resolver_err));
            }
            for record in render_exception(state.context, &resolver_err) {
                state.record(record);
            }
            bubble_or_null(&field.descriptor.field_type)
        }
    }
}

fn bubble_or_null(field_type: &TypeRef) -> Result<serde_json::Value, Bubble> {
    if field_type.is_non_null() {
        Err(Bubble)
    } else {
        Ok(serde_json::Value::Null)
    }
}

/// Type-checks and (for Object/Interface/Union types) recursively resolves
/// `raw` against `type_ref`, absorbing a failure into an explicit `null` at
/// the first position that isn't itself `NonNull` (§4.3 "Null propagation").
fn complete_value(
    type_ref: &TypeRef,
    raw: FieldValue,
    sub_selections: &[&SelectionSet],
    pos: SourcePosition,
    state: &ExecState,
) -> Result<serde_json::Value, Bubble> {
    if let TypeRef::NonNull(inner) = type_ref {
        if matches!(raw, FieldValue::Null) {
            state.record_at(
                pos,
                FieldTypeError(format!("cannot return null for non-null type `{type_ref}`")).to_string(),
            );
            return Err(Bubble);
        }
        // A `NonNull` position never absorbs -- any failure below it must
        // keep climbing, so this calls the core completion directly rather
        // than going back through `complete_value`'s absorbing wrapper.
        return complete_value_core(inner, raw, sub_selections, pos, state);
    }

    match complete_value_core(type_ref, raw, sub_selections, pos, state) {
        Ok(json) => Ok(json),
        Err(Bubble) => Ok(serde_json::Value::Null),
    }
}

fn complete_value_core(
    type_ref: &TypeRef,
    raw: FieldValue,
    sub_selections: &[&SelectionSet],
    pos: SourcePosition,
    state: &ExecState,
) -> Result<serde_json::Value, Bubble> {
    match type_ref {
        TypeRef::NonNull(_) => unreachable!("NonNull is always peeled by complete_value before reaching core"),
        TypeRef::List(elem_type) => match raw {
            FieldValue::Null => Ok(serde_json::Value::Null),
            FieldValue::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(complete_value(elem_type, item, sub_selections, pos, state)?);
                }
                Ok(serde_json::Value::Array(out))
            }
            _ => {
                state.record_at(
                    pos,
                    FieldTypeError(format!("expected a list for type `{type_ref}`")).to_string(),
                );
                Err(Bubble)
            }
        },
        TypeRef::Named(name) => complete_named_value(name, raw, sub_selections, pos, state),
    }
}

fn complete_named_value(
    name: &str,
    raw: FieldValue,
    sub_selections: &[&SelectionSet],
    pos: SourcePosition,
    state: &ExecState,
) -> Result<serde_json::Value, Bubble> {
    if matches!(raw, FieldValue::Null) {
        return Ok(serde_json::Value::Null);
    }

    match state.schema.get_type(name) {
        Some(GraphQLType::Scalar(scalar)) => match scalar.implementation.coerce_output(&raw) {
            Ok(json) => Ok(json),
            Err(message) => {
                state.record_at(pos, BadScalarError(format!("`{name}`: {message}")).to_string());
                Err(Bubble)
            }
        },
        Some(GraphQLType::Enum(enum_type)) => match &raw {
            FieldValue::EnumValue(internal_value) => match enum_type.name_of_internal_value(internal_value) {
                Some(constant_name) => Ok(serde_json::Value::String(constant_name.to_string())),
                None => {
                    state.record_at(
                        pos,
                        FieldTypeError(format!(
                            "`{internal_value}` is not a registered value of enum `{name}`"
                        ))
                        .to_string(),
                    );
                    Err(Bubble)
                }
            },
            _ => {
                state.record_at(
                    pos,
                    FieldTypeError(format!("expected an enum value for `{name}`")).to_string(),
                );
                Err(Bubble)
            }
        },
        Some(GraphQLType::Object(_)) | Some(GraphQLType::Interface(_)) | Some(GraphQLType::Union(_)) => {
            let FieldValue::Object(obj_value) = raw else {
                state.record_at(
                    pos,
                    FieldTypeError(format!("expected an object value for `{name}`")).to_string(),
                );
                return Err(Bubble);
            };
            let Some(concrete) = state.schema.object_type_of(&obj_value) else {
                state.record_at(
                    pos,
                    FieldTypeError(format!(
                        "could not determine the concrete Object type of a value for `{name}`"
                    ))
                    .to_string(),
                );
                return Err(Bubble);
            };
            if !state.schema.is_subtype(concrete.name(), name) {
                state.record_at(
                    pos,
                    FieldTypeError(format!(
                        "resolved type `{}` is not a subtype of `{name}`",
                        concrete.name()
                    ))
                    .to_string(),
                );
                return Err(Bubble);
            }
            let map = execute_selection_set(concrete.name(), &obj_value, sub_selections, state, false)?;
            Ok(serde_json::Value::Object(map.into_iter().collect()))
        }
        Some(GraphQLType::InputObject(_)) | None => {
            state.record_at(pos, FieldTypeError(format!("`{name}` is not a valid output type")).to_string());
            Err(Bubble)
        }
    }
}
