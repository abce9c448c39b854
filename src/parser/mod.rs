//! The schema-aware, single-pass recursive-descent parser and validator
//! (component C5, §4.2): turns a document string plus a [`crate::schema::Schema`]
//! into a validated [`crate::document::Document`].

mod cursor;
mod directive;
#[allow(clippy::module_inception)]
mod document;
mod error;
mod lexer;
mod selection_set;
mod type_ref;
mod validate;
mod value;

pub use document::parse;
pub use error::ParseError;
