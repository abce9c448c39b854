//! Directive-application parsing (§4.2 "Directives").

use crate::document::DirectiveApplication;
use crate::parser::cursor::Cursor;
use crate::parser::error::ParseError;
use crate::parser::lexer::read_name;
use crate::parser::value::parse_arguments;
use crate::schema::Schema;
use crate::types::DirectiveLocation;

/// Parses zero or more `@name(arg: value)` applications, rejecting an
/// unknown directive name or one not valid at `host_location`.
pub fn parse_directives(
    cursor: &mut Cursor,
    schema: &Schema,
    host_location: DirectiveLocation,
) -> Result<Vec<DirectiveApplication>, ParseError> {
    let mut out = Vec::new();
    while cursor.peek_significant() == Some('@') {
        cursor.advance_char();
        let name = read_name(cursor)?;
        let directive_def = schema
            .directive(&name)
            .ok_or_else(|| cursor.error(format!("unknown directive `@{name}`")))?;
        if !directive_def.is_valid_at(host_location) {
            return Err(cursor.error(format!(
                "directive `@{name}` is not allowed at {}",
                host_location.as_str()
            )));
        }
        let args = parse_arguments(cursor, schema, &directive_def.args, true)?;
        out.push(DirectiveApplication { name, args });
    }
    Ok(out)
}
