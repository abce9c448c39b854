//! Token-level readers shared by every higher-level parser function:
//! identifiers, string literals, number literals (§4.2).

use crate::parser::cursor::Cursor;
use crate::parser::error::ParseError;

/// A parsed number literal, already classified as `Int` or `Float` per
/// §4.2's rule ("no fractional and no exponent" => `Int`, checked against
/// the Int range right here; anything else => `Float`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumberLiteral {
    Int(i32),
    Float(f64),
}

/// Reads a `[_A-Za-z][_0-9A-Za-z]*` identifier. Does not skip ignored tokens
/// first -- callers that want "read X" semantics call
/// [`Cursor::skip_ignored`] (or `peek_significant`) themselves.
pub fn read_name(cursor: &mut Cursor) -> Result<String, ParseError> {
    cursor.skip_ignored();
    let mut name = String::new();
    match cursor.peek_char() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            name.push(c);
            cursor.advance_char();
        }
        _ => return Err(cursor.error("expected a name")),
    }
    while let Some(c) = cursor.peek_char() {
        if c == '_' || c.is_ascii_alphanumeric() {
            name.push(c);
            cursor.advance_char();
        } else {
            break;
        }
    }
    Ok(name)
}

/// Reads a `"`-delimited string literal, including its escapes. The cursor
/// must be positioned at the opening quote.
pub fn read_string_literal(cursor: &mut Cursor) -> Result<String, ParseError> {
    cursor.advance_char(); // opening quote
    let mut out = String::new();
    loop {
        match cursor.peek_char() {
            None => return Err(cursor.error("unterminated string literal")),
            Some('"') => {
                cursor.advance_char();
                return Ok(out);
            }
            Some('\\') => {
                cursor.advance_char();
                match cursor.peek_char() {
                    Some('"') => {
                        out.push('"');
                        cursor.advance_char();
                    }
                    Some('\\') => {
                        out.push('\\');
                        cursor.advance_char();
                    }
                    Some('/') => {
                        out.push('/');
                        cursor.advance_char();
                    }
                    Some('b') => {
                        out.push('\u{8}');
                        cursor.advance_char();
                    }
                    Some('f') => {
                        out.push('\u{c}');
                        cursor.advance_char();
                    }
                    Some('n') => {
                        out.push('\n');
                        cursor.advance_char();
                    }
                    Some('r') => {
                        out.push('\r');
                        cursor.advance_char();
                    }
                    Some('t') => {
                        out.push('\t');
                        cursor.advance_char();
                    }
                    Some('u') => {
                        cursor.advance_char();
                        let mut code = 0u32;
                        for _ in 0..4 {
                            let c = cursor
                                .advance_char()
                                .ok_or_else(|| cursor.error("unterminated \\u escape"))?;
                            let digit = c
                                .to_digit(16)
                                .ok_or_else(|| cursor.error("invalid hex digit in \\u escape"))?;
                            code = code * 16 + digit;
                        }
                        let ch = char::from_u32(code)
                            .ok_or_else(|| cursor.error("\\u escape is not a valid unicode code point"))?;
                        out.push(ch);
                    }
                    Some(other) => {
                        return Err(cursor.error(format!("invalid escape sequence `\\{other}`")));
                    }
                    None => return Err(cursor.error("unterminated string literal")),
                }
            }
            Some(c) if (c as u32) < 0x20 && !matches!(c, '\n' | '\r' | '\t') => {
                return Err(cursor.error("raw control character in string literal"));
            }
            Some(c) => {
                out.push(c);
                cursor.advance_char();
            }
        }
    }
}

/// Reads a number literal per §4.2's grammar, classifying it as `Int` or
/// `Float` and range-checking `Int`s on the spot (§3, §8's Int invariant).
pub fn read_number_literal(cursor: &mut Cursor) -> Result<NumberLiteral, ParseError> {
    let start_pos = cursor.position();
    let text = read_number_text(cursor)?;
    if text.has_fraction || text.has_exponent {
        let f: f64 = text
            .raw
            .parse()
            .map_err(|_| cursor.error_at(start_pos, format!("`{}` is not a valid float literal", text.raw)))?;
        Ok(NumberLiteral::Float(f))
    } else {
        let i: i64 = text
            .raw
            .parse()
            .map_err(|_| cursor.error_at(start_pos, format!("`{}` is not a valid integer literal", text.raw)))?;
        if !crate::types::int_in_range(i) {
            return Err(cursor.error_at(
                start_pos,
                format!("integer literal `{}` is outside the Int range [-2^31, 2^31)", text.raw),
            ));
        }
        Ok(NumberLiteral::Int(i as i32))
    }
}

struct NumberText {
    raw: String,
    has_fraction: bool,
    has_exponent: bool,
}

fn read_number_text(cursor: &mut Cursor) -> Result<NumberText, ParseError> {
    let mut raw = String::new();
    if cursor.peek_char() == Some('-') {
        raw.push('-');
        cursor.advance_char();
    }
    match cursor.peek_char() {
        Some('0') => {
            raw.push('0');
            cursor.advance_char();
            if matches!(cursor.peek_char(), Some(c) if c.is_ascii_digit()) {
                return Err(cursor.error("leading zeros are not allowed in a number literal"));
            }
        }
        Some(c) if c.is_ascii_digit() => {
            while let Some(c) = cursor.peek_char() {
                if c.is_ascii_digit() {
                    raw.push(c);
                    cursor.advance_char();
                } else {
                    break;
                }
            }
        }
        _ => return Err(cursor.error("expected a number literal")),
    }

    let mut has_fraction = false;
    if cursor.peek_char() == Some('.') {
        has_fraction = true;
        raw.push('.');
        cursor.advance_char();
        let mut digits = 0;
        while let Some(c) = cursor.peek_char() {
            if c.is_ascii_digit() {
                raw.push(c);
                cursor.advance_char();
                digits += 1;
            } else {
                break;
            }
        }
        if digits == 0 {
            return Err(cursor.error("expected digits after the decimal point"));
        }
    }

    let mut has_exponent = false;
    if matches!(cursor.peek_char(), Some('e' | 'E')) {
        has_exponent = true;
        raw.push('e');
        cursor.advance_char();
        if matches!(cursor.peek_char(), Some('+' | '-')) {
            raw.push(cursor.peek_char().expect("just matched"));
            cursor.advance_char();
        }
        let mut digits = 0;
        while let Some(c) = cursor.peek_char() {
            if c.is_ascii_digit() {
                raw.push(c);
                cursor.advance_char();
                digits += 1;
            } else {
                break;
            }
        }
        if digits == 0 {
            return Err(cursor.error("expected digits in the exponent"));
        }
    }

    Ok(NumberText {
        raw,
        has_fraction,
        has_exponent,
    })
}
