//! Source locations used to annotate schema elements and parse errors.
//!
//! The schema is built programmatically rather than parsed from a file (see
//! the crate's Non-goals), so there is no file path to track here -- only
//! the 1-based line/column pair a document parse error (or a schema-build
//! error raised while replaying a document) occurred at.

/// A 1-based line/column pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        SourcePosition { line, column }
    }
}

/// Where some piece of the schema came from.
///
/// Schema construction is programmatic (builder calls), so most elements
/// are [`SchemaDefLocation::Builtin`] or [`SchemaDefLocation::Registered`];
/// nothing here ever points into a file on disk.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SchemaDefLocation {
    /// Defined by the engine itself (e.g. `Int`, `@include`, `__Type`).
    Builtin,
    /// Defined by a call into [`crate::schema::SchemaBuilder`], identified by
    /// the order in which it was registered (useful for stable error
    /// ordering and introspection but not a real file position).
    Registered(usize),
}
