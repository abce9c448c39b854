//! Parses the `Type`/`[Type]`/`Type!` grammar straight off the cursor
//! (§4.2 "Type references"), building a [`TypeRef`] without a text
//! round-trip through [`TypeRef::parse`].

use crate::parser::cursor::Cursor;
use crate::parser::error::ParseError;
use crate::parser::lexer::read_name;
use crate::types::TypeRef;

pub fn parse_type_ref(cursor: &mut Cursor) -> Result<TypeRef, ParseError> {
    let base = match cursor.peek_significant() {
        Some('[') => {
            cursor.advance_char();
            let inner = parse_type_ref(cursor)?;
            cursor.expect_str("]")?;
            TypeRef::list(inner)
        }
        Some(c) if c == '_' || c.is_ascii_alphabetic() => TypeRef::named(read_name(cursor)?),
        _ => return Err(cursor.error("expected a type reference")),
    };
    if cursor.peek_significant() == Some('!') {
        cursor.advance_char();
        TypeRef::non_null(base).map_err(|e| cursor.error(e.to_string()))
    } else {
        Ok(base)
    }
}
