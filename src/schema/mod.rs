//! Schema assembly: independently-built [`crate::types`] values go in,
//! a validated, introspectable [`Schema`] comes out.

mod builder;
mod error;
mod json;
#[allow(clippy::module_inception)]
mod schema;

pub use builder::SchemaBuilder;
pub use error::SchemaBuildError;
pub use json::SchemaJsonError;
pub use schema::{Schema, SCHEMA_JSON_VERSION};

#[cfg(test)]
mod tests;
