//! The single mutable cursor the whole parser shares, per §4.2: "a single
//! mutable cursor over a UTF-8 code-point sequence". Tracks a byte offset
//! into the source rather than building a `Vec<char>` up front; line/column
//! are computed lazily (only when an error is actually raised) by scanning
//! back to the previous line terminator with `memchr`.

use crate::loc::SourcePosition;
use crate::parser::error::ParseError;

pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    pub fn document_str(&self) -> &'a str {
        self.src
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    pub fn advance_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// 1-based line/column of the cursor's current position, computed by
    /// counting line terminators up to `pos`.
    pub fn position(&self) -> SourcePosition {
        let prefix = &self.src.as_bytes()[..self.pos];
        let line = memchr::Memchr::new(b'\n', prefix).count() + 1;
        let col_start = memchr::memrchr(b'\n', prefix).map(|i| i + 1).unwrap_or(0);
        let column = self.src[col_start..self.pos].chars().count() + 1;
        SourcePosition::new(line, column)
    }

    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.src, self.position())
    }

    pub fn error_at(&self, pos: SourcePosition, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.src, pos)
    }

    /// Skips whitespace, commas, the UTF-8 BOM, and `#`-comments (up to but
    /// not including the next line terminator -- the terminator itself is
    /// ignored whitespace and falls out on the following loop iteration).
    pub fn skip_ignored(&mut self) {
        loop {
            match self.peek_char() {
                Some('\u{FEFF}' | ' ' | '\t' | ',' | '\n' | '\r') => {
                    self.advance_char();
                }
                Some('#') => {
                    let rest = &self.src.as_bytes()[self.pos..];
                    match memchr::memchr2(b'\n', b'\r', rest) {
                        Some(offset) => self.pos += offset,
                        None => self.pos = self.src.len(),
                    }
                }
                _ => break,
            }
        }
    }

    /// Skips ignored tokens, then consumes the literal punctuation `s`
    /// (assumed ASCII) if present. Does not consume on mismatch.
    pub fn try_consume_str(&mut self, s: &str) -> bool {
        self.skip_ignored();
        if self.src[self.pos..].starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    pub fn expect_str(&mut self, s: &str) -> Result<(), ParseError> {
        if self.try_consume_str(s) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{s}`")))
        }
    }

    /// Skips ignored tokens and reports the next significant character
    /// without consuming it.
    pub fn peek_significant(&mut self) -> Option<char> {
        self.skip_ignored();
        self.peek_char()
    }
}
