//! [`ParseError`]: the single error type `parse` ever returns, covering
//! lexical errors, schema-aware validation failures during the single-pass
//! walk, and the post-parse validation pass (§4.2).

use crate::loc::SourcePosition;

/// A single parse failure, pre-execution (§6, §7 layer 1).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message} (line {line}, column {column})")]
pub struct ParseError {
    pub message: String,
    pub document_str: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, document_str: impl Into<String>, pos: SourcePosition) -> Self {
        ParseError {
            message: message.into(),
            document_str: document_str.into(),
            line: pos.line,
            column: pos.column,
        }
    }

    pub fn position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column)
    }
}
