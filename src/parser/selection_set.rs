//! Selection-set parsing: field queries, named-fragment spreads, and inline
//! fragments (§4.2 "Selection sets").

use crate::document::{
    FieldQuery, FragmentDefinition, FragmentReference, FragmentSlot, FragmentSpreadSite, Selection, SelectionSet,
};
use crate::parser::cursor::Cursor;
use crate::parser::directive::parse_directives;
use crate::parser::error::ParseError;
use crate::parser::lexer::read_name;
use crate::parser::value::parse_arguments;
use crate::schema::Schema;
use crate::types::{FieldDescriptor, GraphQLType, TypeKind};
use indexmap::IndexMap;
use std::sync::Arc;

pub type FragmentSlots = IndexMap<String, Arc<FragmentSlot>>;

/// Parses a `{ ... }` selection set whose fields are resolved against
/// `base_type_name`'s own fields, falling back to the schema-wide
/// common/implicit-root fields (§4.2's "field resolution" rule).
pub fn parse_selection_set(
    cursor: &mut Cursor,
    schema: &Schema,
    base_type_name: &str,
    fragments: &mut FragmentSlots,
) -> Result<SelectionSet, ParseError> {
    cursor.expect_str("{")?;
    let mut selections = Vec::new();
    loop {
        match cursor.peek_significant() {
            Some('}') => {
                cursor.advance_char();
                break;
            }
            None => return Err(cursor.error("unterminated selection set")),
            Some('.') => selections.push(parse_fragment_selection(cursor, schema, base_type_name, fragments)?),
            _ => selections.push(Selection::Field(parse_field_query(cursor, schema, base_type_name, fragments)?)),
        }
    }
    if selections.is_empty() {
        return Err(cursor.error("a selection set must select at least one field"));
    }
    Ok(SelectionSet {
        base_type: base_type_name.to_string(),
        selections,
    })
}

fn parse_field_query(
    cursor: &mut Cursor,
    schema: &Schema,
    base_type_name: &str,
    fragments: &mut FragmentSlots,
) -> Result<FieldQuery, ParseError> {
    cursor.peek_significant();
    let def_location = cursor.position();
    let first_name = read_name(cursor)?;
    let (field_name, response_key) = if cursor.peek_significant() == Some(':') {
        cursor.advance_char();
        let actual = read_name(cursor)?;
        (actual, first_name)
    } else {
        (first_name.clone(), first_name)
    };

    let field_descriptor = resolve_field_descriptor(cursor, schema, base_type_name, &field_name)?;

    let args = parse_arguments(cursor, schema, &field_descriptor.args, true)?;
    let directives = parse_directives(cursor, schema, crate::types::DirectiveLocation::Field)?;

    let output_kind = schema.get_type(field_descriptor.field_type.base_name()).map(GraphQLType::kind);
    let needs_selection_set = matches!(output_kind, Some(TypeKind::Object) | Some(TypeKind::Interface) | Some(TypeKind::Union));

    let selection_set = match cursor.peek_significant() {
        Some('{') => {
            if !needs_selection_set {
                return Err(cursor.error(format!(
                    "`{field_name}` is a scalar or enum field and may not have a selection set"
                )));
            }
            Some(parse_selection_set(
                cursor,
                schema,
                field_descriptor.field_type.base_name(),
                fragments,
            )?)
        }
        _ => {
            if needs_selection_set {
                return Err(cursor.error(format!(
                    "`{field_name}` returns an Object, Interface, or Union and must have a selection set"
                )));
            }
            None
        }
    };

    Ok(FieldQuery {
        response_key,
        field_descriptor,
        args,
        selection_set,
        directives,
        def_location,
    })
}

/// Resolves a field name against `base_type_name`'s own declared fields,
/// then the schema-wide common fields (`__typename`), then -- only for the
/// root query type -- the implicit root fields (`__schema`, `__type`).
fn resolve_field_descriptor(
    cursor: &mut Cursor,
    schema: &Schema,
    base_type_name: &str,
    field_name: &str,
) -> Result<FieldDescriptor, ParseError> {
    let direct = match schema.get_type(base_type_name) {
        Some(GraphQLType::Object(o)) => o.field(field_name).map(|f| f.descriptor.clone()),
        Some(GraphQLType::Interface(i)) => i.field(field_name).cloned(),
        _ => None,
    };
    if let Some(d) = direct {
        return Ok(d);
    }
    if let Some(d) = schema.common_field(field_name) {
        return Ok(d.clone());
    }
    if schema.is_root_query_type(base_type_name) {
        if let Some(d) = schema.implicit_root_field(field_name) {
            return Ok(d.clone());
        }
    }
    Err(cursor.error(format!("`{base_type_name}` has no field named `{field_name}`")))
}

fn parse_fragment_selection(
    cursor: &mut Cursor,
    schema: &Schema,
    base_type_name: &str,
    fragments: &mut FragmentSlots,
) -> Result<Selection, ParseError> {
    let def_location = cursor.position();
    cursor.expect_str("...")?;
    match cursor.peek_significant() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            let ident = read_name(cursor)?;
            if ident == "on" {
                let type_condition = read_name(cursor)?;
                validate_fragment_condition_kind(cursor, schema, &type_condition)?;
                if !schema.intersects(base_type_name, &type_condition) {
                    return Err(cursor.error(format!(
                        "fragment condition `{type_condition}` can never apply within `{base_type_name}`"
                    )));
                }
                let directives = parse_directives(cursor, schema, crate::types::DirectiveLocation::InlineFragment)?;
                let selection_set = parse_selection_set(cursor, schema, &type_condition, fragments)?;
                let def = FragmentDefinition {
                    name: None,
                    type_condition,
                    directives: directives.clone(),
                    selection_set,
                    def_location,
                };
                let fragment = FragmentReference(FragmentSlot::inline(def));
                Ok(Selection::FragmentSpread(FragmentSpreadSite { fragment, directives }))
            } else {
                let directives = parse_directives(cursor, schema, crate::types::DirectiveLocation::FragmentSpread)?;
                let slot = fragments
                    .entry(ident.clone())
                    .or_insert_with(|| FragmentSlot::named(ident.clone()))
                    .clone();
                let fragment = FragmentReference(slot);
                Ok(Selection::FragmentSpread(FragmentSpreadSite { fragment, directives }))
            }
        }
        _ => Err(cursor.error("expected `on` or a fragment name after `...`")),
    }
}

pub fn validate_fragment_condition_kind(cursor: &Cursor, schema: &Schema, type_name: &str) -> Result<(), ParseError> {
    match schema.get_type(type_name) {
        Some(GraphQLType::Object(_)) | Some(GraphQLType::Interface(_)) | Some(GraphQLType::Union(_)) => Ok(()),
        Some(_) => Err(cursor.error(format!(
            "`{type_name}` is not an Object, Interface, or Union type and cannot be used as a fragment condition"
        ))),
        None => Err(cursor.error(format!("unknown type `{type_name}`"))),
    }
}
