//! Input-value parsing: literals, variable references, lists, and input
//! objects, dispatched against a target [`TypeRef`] (§4.2 "Input value").

use crate::parser::cursor::Cursor;
use crate::parser::error::ParseError;
use crate::parser::lexer::{read_name, read_number_literal, read_string_literal, NumberLiteral};
use crate::schema::Schema;
use crate::types::{Argument, GraphQLType, TypeRef};
use crate::value::Value;
use indexmap::IndexMap;

/// Parses a single input value against `target_type`. `allow_variable` is
/// false inside a `const` context (a variable's own default value, per
/// §4.2's variable-definition rule).
pub fn parse_value(
    cursor: &mut Cursor,
    schema: &Schema,
    target_type: &TypeRef,
    allow_variable: bool,
) -> Result<Value, ParseError> {
    match cursor.peek_significant() {
        None => Err(cursor.error("unexpected end of input while reading a value")),
        Some('$') => {
            if !allow_variable {
                return Err(cursor.error("a variable reference is not allowed here"));
            }
            cursor.advance_char();
            let name = read_name(cursor)?;
            Ok(Value::VariableRef(name))
        }
        Some('[') => parse_list_value(cursor, schema, target_type, allow_variable),
        Some('{') => parse_input_object_value(cursor, schema, target_type, allow_variable),
        Some('"') => {
            let s = read_string_literal(cursor)?;
            coerce_scalar_literal(cursor, schema, target_type, Value::String(s))
        }
        Some(c) if c == '-' || c.is_ascii_digit() => {
            let literal = read_number_literal(cursor)?;
            let value = match literal {
                NumberLiteral::Int(n) => Value::Int(n),
                NumberLiteral::Float(f) => Value::Float(f),
            };
            coerce_scalar_literal(cursor, schema, target_type, value)
        }
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            let ident = read_name(cursor)?;
            parse_identifier_value(cursor, schema, target_type, ident)
        }
        Some(c) => Err(cursor.error(format!("unexpected character `{c}` while reading a value"))),
    }
}

fn parse_identifier_value(
    cursor: &mut Cursor,
    schema: &Schema,
    target_type: &TypeRef,
    ident: String,
) -> Result<Value, ParseError> {
    match ident.as_str() {
        "true" => coerce_scalar_literal(cursor, schema, target_type, Value::Boolean(true)),
        "false" => coerce_scalar_literal(cursor, schema, target_type, Value::Boolean(false)),
        "null" => {
            if target_type.is_non_null() {
                return Err(cursor.error(format!("`null` is not a valid value for non-null type `{target_type}`")));
            }
            Ok(Value::Null)
        }
        _ => {
            let base_name = target_type.base_name();
            match schema.get_type(base_name) {
                Some(GraphQLType::Enum(e)) => {
                    if e.value(&ident).is_none() {
                        return Err(cursor.error(format!(
                            "`{ident}` is not a valid value of enum `{base_name}`"
                        )));
                    }
                    Ok(Value::Enum(ident))
                }
                _ => Err(cursor.error(format!("`{ident}` is not a valid value for type `{target_type}`"))),
            }
        }
    }
}

fn coerce_scalar_literal(
    cursor: &mut Cursor,
    schema: &Schema,
    target_type: &TypeRef,
    value: Value,
) -> Result<Value, ParseError> {
    let base_name = target_type.base_name();
    match schema.get_type(base_name) {
        Some(GraphQLType::Scalar(s)) => {
            s.implementation
                .coerce_input(&value.to_json_literal())
                .map_err(|err| cursor.error(format!("invalid value for `{base_name}`: {err}")))?;
            Ok(value)
        }
        _ => Err(cursor.error(format!(
            "`{value:?}` is not a valid value for type `{target_type}`, which is not a scalar"
        ))),
    }
}

fn parse_list_value(
    cursor: &mut Cursor,
    schema: &Schema,
    target_type: &TypeRef,
    allow_variable: bool,
) -> Result<Value, ParseError> {
    cursor.advance_char(); // '['
    let element_type = target_type.list_element().cloned().ok_or_else(|| {
        cursor.error(format!("`{target_type}` is not a list type, but a list literal was given"))
    })?;
    let mut items = Vec::new();
    loop {
        match cursor.peek_significant() {
            Some(']') => {
                cursor.advance_char();
                return Ok(Value::List(items));
            }
            None => return Err(cursor.error("unterminated list literal")),
            _ => items.push(parse_value(cursor, schema, &element_type, allow_variable)?),
        }
    }
}

fn parse_input_object_value(
    cursor: &mut Cursor,
    schema: &Schema,
    target_type: &TypeRef,
    allow_variable: bool,
) -> Result<Value, ParseError> {
    let input_object_name = target_type.base_name().to_string();
    let input_object = schema
        .get_type(&input_object_name)
        .and_then(GraphQLType::as_input_object)
        .ok_or_else(|| cursor.error(format!("`{input_object_name}` is not an input object type")))?;

    cursor.advance_char(); // '{'
    let mut fields = IndexMap::new();
    loop {
        match cursor.peek_significant() {
            Some('}') => {
                cursor.advance_char();
                break;
            }
            None => return Err(cursor.error("unterminated input object literal")),
            _ => {
                let field_name = read_name(cursor)?;
                cursor.expect_str(":")?;
                let field_def = input_object.field(&field_name).ok_or_else(|| {
                    cursor.error(format!(
                        "`{input_object_name}` has no field named `{field_name}`"
                    ))
                })?;
                if fields.contains_key(&field_name) {
                    return Err(cursor.error(format!("duplicate input object field `{field_name}`")));
                }
                let value = parse_value(cursor, schema, &field_def.field_type, allow_variable)?;
                fields.insert(field_name, value);
            }
        }
    }
    for (name, field_def) in input_object.fields.iter() {
        if !fields.contains_key(name) && field_def.field_type.is_non_null() {
            return Err(cursor.error(format!(
                "missing required input field `{name}` on `{input_object_name}`"
            )));
        }
    }
    Ok(Value::Object(fields))
}

/// Parses an optional `(name: value, ...)` argument list against `arg_defs`,
/// or returns an empty map if no `(` follows.
pub fn parse_arguments(
    cursor: &mut Cursor,
    schema: &Schema,
    arg_defs: &IndexMap<String, Argument>,
    allow_variable: bool,
) -> Result<IndexMap<String, Value>, ParseError> {
    let mut args = IndexMap::new();
    if cursor.peek_significant() != Some('(') {
        return Ok(args);
    }
    cursor.advance_char();
    loop {
        match cursor.peek_significant() {
            Some(')') => {
                cursor.advance_char();
                break;
            }
            None => return Err(cursor.error("unterminated argument list")),
            _ => {
                let name = read_name(cursor)?;
                cursor.expect_str(":")?;
                let Some(arg_def) = arg_defs.get(&name) else {
                    return Err(cursor.error(format!("unknown argument `{name}`")));
                };
                if args.contains_key(&name) {
                    return Err(cursor.error(format!("duplicate argument `{name}`")));
                }
                let value = parse_value(cursor, schema, &arg_def.arg_type, allow_variable)?;
                args.insert(name, value);
            }
        }
    }
    for (arg_name, arg_def) in arg_defs.iter() {
        if !args.contains_key(arg_name) && arg_def.arg_type.is_non_null() && arg_def.default_value.is_none() {
            return Err(cursor.error(format!("missing required argument `{arg_name}`")));
        }
    }
    Ok(args)
}
