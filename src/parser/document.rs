//! The top-level parse loop: dispatches each top-level definition to an
//! operation, a fragment definition, or (for a bare `{ ... }`) an anonymous
//! query, then runs the post-parse validation pass (§4.2).

use crate::document::{Document, FragmentDefinition, FragmentSlot, Operation, OperationKind, Variable};
use crate::loc::SourcePosition;
use crate::parser::cursor::Cursor;
use crate::parser::directive::parse_directives;
use crate::parser::error::ParseError;
use crate::parser::lexer::read_name;
use crate::parser::selection_set::{parse_selection_set, validate_fragment_condition_kind, FragmentSlots};
use crate::parser::type_ref::parse_type_ref;
use crate::parser::validate;
use crate::parser::value::parse_value;
use crate::schema::Schema;
use crate::types::DirectiveLocation;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;

/// Parses `document_str` against `schema`, returning a fully validated
/// [`Document`] or the first [`ParseError`] encountered.
pub fn parse(document_str: &str, schema: &Arc<Schema>) -> Result<Document, ParseError> {
    let mut cursor = Cursor::new(document_str);
    let mut operations = Vec::new();
    let mut fragments: FragmentSlots = IndexMap::new();
    let mut sequencer = OperationSequencer::default();

    loop {
        match cursor.peek_significant() {
            None => break,
            Some('{') => {
                let def_location = cursor.position();
                sequencer.check(&cursor, def_location, None)?;
                operations.push(parse_operation_body(
                    &mut cursor,
                    schema,
                    &mut fragments,
                    OperationKind::Query,
                    None,
                    def_location,
                )?);
            }
            Some(c) if c == '_' || c.is_ascii_alphabetic() => {
                let keyword_pos = cursor.position();
                let keyword = read_name(&mut cursor)?;
                match keyword.as_str() {
                    "query" | "mutation" => {
                        let kind = if keyword == "query" {
                            OperationKind::Query
                        } else {
                            OperationKind::Mutation
                        };
                        if matches!(kind, OperationKind::Mutation) && schema.mutation_type().is_none() {
                            return Err(cursor.error_at(keyword_pos, "the schema defines no root mutation type"));
                        }
                        let name = match cursor.peek_significant() {
                            Some(c) if c == '_' || c.is_ascii_alphabetic() => Some(read_name(&mut cursor)?),
                            _ => None,
                        };
                        sequencer.check(&cursor, keyword_pos, name.as_deref())?;
                        operations.push(parse_operation_body(
                            &mut cursor,
                            schema,
                            &mut fragments,
                            kind,
                            name,
                            keyword_pos,
                        )?);
                    }
                    "fragment" => {
                        parse_fragment_definition(&mut cursor, schema, &mut fragments, keyword_pos)?;
                    }
                    other => {
                        return Err(cursor.error_at(
                            keyword_pos,
                            format!("expected `query`, `mutation`, `fragment`, or `{{`, found `{other}`"),
                        ));
                    }
                }
            }
            Some(c) => return Err(cursor.error(format!("unexpected character `{c}`"))),
        }
    }

    if operations.is_empty() {
        return Err(cursor.error("a document must define at least one operation"));
    }

    validate::run(schema, &operations, &fragments, document_str)?;

    Ok(Document {
        schema: schema.clone(),
        operations,
        fragments,
    })
}

fn parse_operation_body(
    cursor: &mut Cursor,
    schema: &Schema,
    fragments: &mut FragmentSlots,
    kind: OperationKind,
    name: Option<String>,
    def_location: SourcePosition,
) -> Result<Operation, ParseError> {
    let variables = parse_variable_definitions(cursor, schema)?;
    let host_location = match kind {
        OperationKind::Query => DirectiveLocation::Query,
        OperationKind::Mutation => DirectiveLocation::Mutation,
    };
    let directives = parse_directives(cursor, schema, host_location)?;
    let root_type_name = match kind {
        OperationKind::Query => schema.query_type().name().to_string(),
        OperationKind::Mutation => schema
            .mutation_type()
            .expect("checked by the caller before recursing into the operation body")
            .name()
            .to_string(),
    };
    let selection_set = parse_selection_set(cursor, schema, &root_type_name, fragments)?;
    Ok(Operation {
        kind,
        name,
        variables,
        directives,
        selection_set,
        def_location,
    })
}

fn parse_fragment_definition(
    cursor: &mut Cursor,
    schema: &Schema,
    fragments: &mut FragmentSlots,
    def_location: SourcePosition,
) -> Result<(), ParseError> {
    let name = read_name(cursor)?;
    if name == "on" {
        return Err(cursor.error_at(def_location, "a fragment may not be named `on`"));
    }
    let on_keyword = read_name(cursor)?;
    if on_keyword != "on" {
        return Err(cursor.error(format!("expected `on`, found `{on_keyword}`")));
    }
    let type_condition = read_name(cursor)?;
    validate_fragment_condition_kind(cursor, schema, &type_condition)?;
    let directives = parse_directives(cursor, schema, DirectiveLocation::FragmentDefinition)?;
    let selection_set = parse_selection_set(cursor, schema, &type_condition, fragments)?;

    let slot = fragments
        .entry(name.clone())
        .or_insert_with(|| FragmentSlot::named(name.clone()))
        .clone();
    if slot.is_filled() {
        return Err(cursor.error_at(def_location, format!("duplicate fragment definition `{name}`")));
    }
    let def = FragmentDefinition {
        name: Some(name.clone()),
        type_condition,
        directives,
        selection_set,
        def_location,
    };
    slot.fill(def)
        .unwrap_or_else(|_| unreachable!("just checked is_filled() under the same single-threaded parse"));
    Ok(())
}

fn parse_variable_definitions(cursor: &mut Cursor, schema: &Schema) -> Result<IndexMap<String, Variable>, ParseError> {
    let mut vars = IndexMap::new();
    if cursor.peek_significant() != Some('(') {
        return Ok(vars);
    }
    cursor.advance_char();
    loop {
        match cursor.peek_significant() {
            Some(')') => {
                cursor.advance_char();
                break;
            }
            None => return Err(cursor.error("unterminated variable definition list")),
            Some('$') => {
                cursor.advance_char();
                let name = read_name(cursor)?;
                cursor.expect_str(":")?;
                let var_type = parse_type_ref(cursor)?;
                let base_kind = schema.get_type(var_type.base_name()).map(crate::types::GraphQLType::kind);
                match base_kind {
                    Some(k) if k.is_input_kind() => {}
                    Some(_) => {
                        return Err(cursor.error(format!(
                            "variable `${name}` has type `{var_type}`, which is not a Scalar, Enum, or Input Object"
                        )));
                    }
                    None => return Err(cursor.error(format!("unknown type `{}`", var_type.base_name()))),
                }

                let mut default_value = None;
                if cursor.peek_significant() == Some('=') {
                    cursor.advance_char();
                    if var_type.is_non_null() {
                        return Err(cursor.error(format!(
                            "variable `${name}` may not have both a non-null type and a default value"
                        )));
                    }
                    default_value = Some(parse_value(cursor, schema, &var_type, false)?);
                }

                if vars.contains_key(&name) {
                    return Err(cursor.error(format!("duplicate variable `${name}`")));
                }
                vars.insert(
                    name.clone(),
                    Variable {
                        name,
                        var_type,
                        default_value,
                    },
                );
            }
            _ => return Err(cursor.error("expected a variable definition (`$name: Type`)")),
        }
    }
    Ok(vars)
}

/// Enforces §4.2's operation-naming rule: an anonymous operation is only
/// legal when it's the document's only operation, and no two operations
/// share a name. §9 standardizes the reported position as the offending
/// operation's own start, which is what `check` is always called with.
#[derive(Default)]
struct OperationSequencer {
    anonymous_seen: bool,
    any_seen: bool,
    names_seen: HashSet<String>,
}

impl OperationSequencer {
    fn check(&mut self, cursor: &Cursor, pos: SourcePosition, name: Option<&str>) -> Result<(), ParseError> {
        match name {
            None => {
                if self.any_seen {
                    return Err(cursor.error_at(
                        pos,
                        "an anonymous operation must be the only operation in the document",
                    ));
                }
                self.anonymous_seen = true;
            }
            Some(name) => {
                if self.anonymous_seen {
                    return Err(cursor.error_at(
                        pos,
                        "an anonymous operation must be the only operation in the document",
                    ));
                }
                if !self.names_seen.insert(name.to_string()) {
                    return Err(cursor.error_at(pos, format!("duplicate operation name `{name}`")));
                }
            }
        }
        self.any_seen = true;
        Ok(())
    }
}
