//! The post-parse validation pass (§4.2): fragment existence/usage, cycle
//! detection, fragment-condition applicability, variable-use typing, and
//! selection-set merging. Runs once, after every operation and fragment in
//! the document has been parsed, so forward-referenced named fragments are
//! always resolved by the time any of these checks run.

use crate::document::{FieldQuery, FragmentSlot, Operation, Selection, SelectionSet};
use crate::loc::SourcePosition;
use crate::parser::error::ParseError;
use crate::schema::Schema;
use crate::types::{GraphQLType, TypeRef};
use crate::value::Value;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;

pub fn run(
    schema: &Schema,
    operations: &[Operation],
    fragments: &IndexMap<String, Arc<FragmentSlot>>,
    document_str: &str,
) -> Result<(), ParseError> {
    check_fragment_existence_and_usage(fragments, document_str)?;
    detect_fragment_cycles(fragments, document_str)?;
    for op in operations {
        validate_fragment_conditions(schema, &op.selection_set, document_str)?;
    }
    for slot in fragments.values() {
        let def = slot.get().expect("checked filled above");
        validate_fragment_conditions(schema, &def.selection_set, document_str)?;
    }
    for op in operations {
        validate_variable_usage(schema, op, document_str)?;
    }
    for op in operations {
        validate_merge_group(&[&op.selection_set], document_str)?;
    }
    Ok(())
}

/// Every referenced named fragment must have a matching definition, and
/// every defined fragment must be referenced from somewhere reachable in
/// the document (an unused fragment is a parse error, per §4.2). Whether a
/// definition is reachable is read off its `Arc`'s strong count: besides
/// the registry's own entry, the only other way a clone of a fragment's
/// slot escapes into the document is by being embedded in a spread site
/// that's itself part of some operation's or fragment's selection tree.
fn check_fragment_existence_and_usage(
    fragments: &IndexMap<String, Arc<FragmentSlot>>,
    document_str: &str,
) -> Result<(), ParseError> {
    for (name, slot) in fragments {
        if !slot.is_filled() {
            return Err(ParseError::new(
                format!("fragment `{name}` is referenced but never defined"),
                document_str,
                SourcePosition::new(1, 1),
            ));
        }
        if Arc::strong_count(slot) == 1 {
            let def = slot.get().expect("just checked is_filled");
            return Err(ParseError::new(
                format!("fragment `{name}` is defined but never used"),
                document_str,
                def.def_location,
            ));
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}

fn detect_fragment_cycles(
    fragments: &IndexMap<String, Arc<FragmentSlot>>,
    document_str: &str,
) -> Result<(), ParseError> {
    let mut state: IndexMap<String, VisitState> = IndexMap::new();
    for name in fragments.keys() {
        if !state.contains_key(name) {
            let mut path = Vec::new();
            visit_fragment(name, fragments, &mut state, &mut path, document_str)?;
        }
    }
    Ok(())
}

fn visit_fragment(
    name: &str,
    fragments: &IndexMap<String, Arc<FragmentSlot>>,
    state: &mut IndexMap<String, VisitState>,
    path: &mut Vec<String>,
    document_str: &str,
) -> Result<(), ParseError> {
    state.insert(name.to_string(), VisitState::InProgress);
    path.push(name.to_string());

    let slot = fragments
        .get(name)
        .expect("fragment dependency names always come from a resolved spread, so they're registered");
    let def = slot.get().expect("unfilled fragments already rejected by the existence check");

    let mut deps = Vec::new();
    collect_named_fragment_deps(&def.selection_set, &mut deps);
    for dep in deps {
        match state.get(&dep) {
            Some(VisitState::InProgress) => {
                let start = path.iter().position(|n| n == &dep).unwrap_or(0);
                let mut cycle = path[start..].to_vec();
                cycle.push(dep);
                return Err(ParseError::new(
                    format!("fragment cycle: {}", cycle.join(" => ")),
                    document_str,
                    def.def_location,
                ));
            }
            Some(VisitState::Done) => {}
            None => visit_fragment(&dep, fragments, state, path, document_str)?,
        }
    }

    path.pop();
    state.insert(name.to_string(), VisitState::Done);
    Ok(())
}

/// Collects the names of every *named* fragment transitively spread inside
/// `ss`, descending through inline fragments directly (they have no node of
/// their own in the dependency graph).
fn collect_named_fragment_deps(ss: &SelectionSet, out: &mut Vec<String>) {
    for sel in &ss.selections {
        match sel {
            Selection::Field(fq) => {
                if let Some(inner) = &fq.selection_set {
                    collect_named_fragment_deps(inner, out);
                }
            }
            Selection::FragmentSpread(site) => {
                let slot = site.fragment.slot();
                match slot.name() {
                    Some(n) => out.push(n.to_string()),
                    None => {
                        if let Some(def) = slot.get() {
                            collect_named_fragment_deps(&def.selection_set, out);
                        }
                    }
                }
            }
        }
    }
}

/// For every fragment spread reachable from `ss`, the enclosing selection
/// set's base type and the fragment's own condition type must intersect
/// (§4.2's "fragment condition applicability" rule; inline fragments are
/// already checked eagerly at parse time, but a named fragment's condition
/// isn't known until its (possibly forward-declared) definition resolves).
fn validate_fragment_conditions(schema: &Schema, ss: &SelectionSet, document_str: &str) -> Result<(), ParseError> {
    for sel in &ss.selections {
        match sel {
            Selection::Field(fq) => {
                if let Some(inner) = &fq.selection_set {
                    validate_fragment_conditions(schema, inner, document_str)?;
                }
            }
            Selection::FragmentSpread(site) => {
                let slot = site.fragment.slot();
                if let Some(def) = slot.get() {
                    if !schema.intersects(&ss.base_type, &def.type_condition) {
                        return Err(ParseError::new(
                            format!(
                                "fragment condition `{}` can never apply within `{}`",
                                def.type_condition, ss.base_type
                            ),
                            document_str,
                            def.def_location,
                        ));
                    }
                    // Named fragment bodies are validated once each from
                    // `run`'s own top-level loop over `fragments`; only
                    // recurse here for inline fragments, which have no
                    // other entry point.
                    if slot.name().is_none() {
                        validate_fragment_conditions(schema, &def.selection_set, document_str)?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Collects every variable use under an operation (transitively through its
/// fragment spreads) and checks each one is both defined and type-compatible
/// with its use site (§4.2 "Variable-use typing"), then checks every
/// declared variable was actually used.
fn validate_variable_usage(schema: &Schema, op: &Operation, document_str: &str) -> Result<(), ParseError> {
    let mut uses = Vec::new();
    collect_variable_uses_in_selection_set(schema, &op.selection_set, &mut uses);
    for directive in &op.directives {
        for value in directive.args.values() {
            collect_variable_refs_untyped(value, op.def_location, &mut uses, schema);
        }
    }

    let mut used_names = HashSet::new();
    for (var_name, expected_type, pos) in &uses {
        used_names.insert(var_name.clone());
        let Some(var) = op.variables.get(var_name) else {
            return Err(ParseError::new(format!("undefined variable `${var_name}`"), document_str, *pos));
        };
        if !type_ref_is_compatible(&var.effective_type(), expected_type) {
            return Err(ParseError::new(
                format!(
                    "variable `${var_name}` of type `{}` cannot be used where `{expected_type}` is expected",
                    var.var_type
                ),
                document_str,
                *pos,
            ));
        }
    }
    for var_name in op.variables.keys() {
        if !used_names.contains(var_name) {
            return Err(ParseError::new(
                format!("variable `${var_name}` is declared but never used"),
                document_str,
                op.def_location,
            ));
        }
    }
    Ok(())
}

type VarUse = (String, TypeRef, SourcePosition);

fn collect_variable_uses_in_selection_set(schema: &Schema, ss: &SelectionSet, out: &mut Vec<VarUse>) {
    for sel in &ss.selections {
        match sel {
            Selection::Field(fq) => collect_variable_uses_in_field(schema, fq, out),
            Selection::FragmentSpread(site) => {
                for value in site.directives.iter().flat_map(|d| d.args.values()) {
                    collect_variable_refs_untyped(value, directive_pos(site), out, schema);
                }
                if let Some(def) = site.fragment.fragment() {
                    collect_variable_uses_in_selection_set(schema, &def.selection_set, out);
                }
            }
        }
    }
}

fn directive_pos(site: &crate::document::FragmentSpreadSite) -> SourcePosition {
    site.fragment
        .fragment()
        .map(|def| def.def_location)
        .unwrap_or_else(|| SourcePosition::new(1, 1))
}

fn collect_variable_uses_in_field(schema: &Schema, fq: &FieldQuery, out: &mut Vec<VarUse>) {
    for (arg_name, value) in &fq.args {
        if let Some(arg_def) = fq.field_descriptor.args.get(arg_name) {
            collect_from_value(schema, value, &arg_def.arg_type, fq.def_location, out);
        }
    }
    for directive in &fq.directives {
        for value in directive.args.values() {
            collect_variable_refs_untyped(value, fq.def_location, out, schema);
        }
    }
    if let Some(inner) = &fq.selection_set {
        collect_variable_uses_in_selection_set(schema, inner, out);
    }
}

/// Walks a value tree looking for `$var` references against a known
/// expected type, pushing one use per reference found.
fn collect_from_value(schema: &Schema, value: &Value, expected_type: &TypeRef, pos: SourcePosition, out: &mut Vec<VarUse>) {
    match value {
        Value::VariableRef(name) => out.push((name.clone(), expected_type.clone(), pos)),
        Value::List(items) => {
            if let Some(elem_type) = expected_type.list_element() {
                for item in items {
                    collect_from_value(schema, item, elem_type, pos, out);
                }
            }
        }
        Value::Object(fields) => {
            if let Some(io) = schema.get_type(expected_type.base_name()).and_then(GraphQLType::as_input_object) {
                for (field_name, field_value) in fields {
                    if let Some(field_def) = io.field(field_name) {
                        collect_from_value(schema, field_value, &field_def.field_type, pos, out);
                    }
                }
            }
        }
        _ => {}
    }
}

/// `@directive(arg: $var)` arguments don't carry a declared `TypeRef` the
/// way field/input-object arguments do without a directive-argument lookup;
/// builtin directives (`@include`/`@skip`'s `if: Boolean!`) are the only
/// ones the parser ever admits a variable into here, so the expected type
/// is always `Boolean!` in practice. Falling back to the variable's own
/// declared type when it isn't one skips the compatibility check rather
/// than mis-reporting it, which only matters for a future custom directive
/// accepting a variable-typed argument.
fn collect_variable_refs_untyped(value: &Value, pos: SourcePosition, out: &mut Vec<VarUse>, _schema: &Schema) {
    if let Value::VariableRef(name) = value {
        out.push((name.clone(), TypeRef::non_null(TypeRef::named("Boolean")).expect("single wrap"), pos));
    }
}

fn type_ref_is_compatible(var_type: &TypeRef, expected: &TypeRef) -> bool {
    match (var_type, expected) {
        (TypeRef::NonNull(v_inner), TypeRef::NonNull(e_inner)) => type_ref_is_compatible(v_inner, e_inner),
        (TypeRef::NonNull(v_inner), e) => type_ref_is_compatible(v_inner, e),
        (_, TypeRef::NonNull(_)) => false,
        (TypeRef::List(v_inner), TypeRef::List(e_inner)) => type_ref_is_compatible(v_inner, e_inner),
        (TypeRef::List(_), _) | (_, TypeRef::List(_)) => false,
        (TypeRef::Named(v_name), TypeRef::Named(e_name)) => v_name == e_name,
    }
}

/// Groups every `Selection::Field` reachable at this level -- descending
/// through fragment spreads, named or inline -- by response key.
fn collect_same_level_fields<'a>(ss: &'a SelectionSet, out: &mut IndexMap<String, Vec<&'a FieldQuery>>) {
    for sel in &ss.selections {
        match sel {
            Selection::Field(fq) => out.entry(fq.response_key.clone()).or_default().push(fq),
            Selection::FragmentSpread(site) => {
                if let Some(def) = site.fragment.fragment() {
                    collect_same_level_fields(&def.selection_set, out);
                }
            }
        }
    }
}

/// Validates that every group of fields sharing a response key across
/// `sets` (which, for a single selection set, is the set of one) names the
/// same field with the same arguments, then recurses into the union of
/// their sub-selections (§4.2 "Selection-set merging").
fn validate_merge_group(sets: &[&SelectionSet], document_str: &str) -> Result<(), ParseError> {
    let mut grouped: IndexMap<String, Vec<&FieldQuery>> = IndexMap::new();
    for ss in sets {
        collect_same_level_fields(ss, &mut grouped);
    }
    for entries in grouped.values() {
        let first = entries[0];
        for other in &entries[1..] {
            if other.field_name() != first.field_name() {
                return Err(ParseError::new(
                    format!(
                        "fields `{}` and `{}` cannot both be requested under the response key `{}`",
                        first.field_name(),
                        other.field_name(),
                        first.response_key
                    ),
                    document_str,
                    other.def_location,
                ));
            }
            if other.args != first.args {
                return Err(ParseError::new(
                    format!(
                        "field `{}` is requested twice under response key `{}` with different arguments",
                        first.field_name(),
                        first.response_key
                    ),
                    document_str,
                    other.def_location,
                ));
            }
            if other.field_descriptor.field_type != first.field_descriptor.field_type {
                return Err(ParseError::new(
                    format!(
                        "field `{}` is requested twice under response key `{}` with different return types (`{}` vs `{}`)",
                        first.field_name(),
                        first.response_key,
                        first.field_descriptor.field_type,
                        other.field_descriptor.field_type,
                    ),
                    document_str,
                    other.def_location,
                ));
            }
        }
        let child_sets: Vec<&SelectionSet> = entries.iter().filter_map(|fq| fq.selection_set.as_ref()).collect();
        if !child_sets.is_empty() {
            validate_merge_group(&child_sets, document_str)?;
        }
    }
    Ok(())
}
