//! Type references: the `Foo`, `[Foo!]!`, `[[Foo]!]` annotations that appear
//! on fields, arguments, and variable definitions.
//!
//! A [`TypeRef`] names a base type plus any `List`/`NonNull` wrappers around
//! it; resolving the base name against a [`crate::schema::Schema`] is a
//! separate step (see `Schema::get_type`), since a `TypeRef` can exist
//! before the schema it refers to is fully built (e.g. while a builder is
//! still registering types).

use std::fmt;

/// A (possibly wrapped) reference to a named type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum TypeRefError {
    #[error("type reference may not double-wrap a non-null type with `!!`")]
    DoubleNonNull,
    #[error("unmatched `[` in type reference")]
    UnmatchedOpenBracket,
    #[error("unmatched `]` in type reference")]
    UnmatchedCloseBracket,
    #[error("type reference has an empty base type name")]
    EmptyBaseName,
    #[error("`{0}` is not a valid type name")]
    InvalidBaseName(String),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> TypeRef {
        TypeRef::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> TypeRef {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Result<TypeRef, TypeRefError> {
        if matches!(inner, TypeRef::NonNull(_)) {
            Err(TypeRefError::DoubleNonNull)
        } else {
            Ok(TypeRef::NonNull(Box::new(inner)))
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::List(_) => true,
            TypeRef::NonNull(inner) => inner.is_list(),
            TypeRef::Named(_) => false,
        }
    }

    /// The element type of a (possibly non-null-wrapped) list type.
    pub fn list_element(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::List(inner) => Some(inner),
            TypeRef::NonNull(inner) => inner.list_element(),
            TypeRef::Named(_) => None,
        }
    }

    /// The name of the base (non-wrapper) type this reference ultimately
    /// points at.
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base_name(),
        }
    }

    /// Parse a rendered type reference like `"[Foo!]!"`.
    ///
    /// Strips trailing `!`s and matching `[`/`]` pairs from the outside in,
    /// as described in the schema registry's lookup rules: reject doubled
    /// `!`, reject bracket mismatch, reject an empty base name.
    pub fn parse(s: &str) -> Result<TypeRef, TypeRefError> {
        let s = s.trim();
        let (inner, non_null) = match s.strip_suffix('!') {
            Some(rest) => {
                if rest.ends_with('!') {
                    return Err(TypeRefError::DoubleNonNull);
                }
                (rest, true)
            }
            None => (s, false),
        };

        let base = if let Some(rest) = inner.strip_prefix('[') {
            let rest = rest
                .strip_suffix(']')
                .ok_or(TypeRefError::UnmatchedOpenBracket)?;
            TypeRef::List(Box::new(TypeRef::parse(rest)?))
        } else {
            if inner.contains('[') {
                return Err(TypeRefError::UnmatchedCloseBracket);
            }
            if inner.is_empty() {
                return Err(TypeRefError::EmptyBaseName);
            }
            if !is_valid_identifier(inner) {
                return Err(TypeRefError::InvalidBaseName(inner.to_string()));
            }
            TypeRef::Named(inner.to_string())
        };

        if non_null {
            TypeRef::non_null(base)
        } else {
            Ok(base)
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_name() {
        assert_eq!(TypeRef::parse("String").unwrap(), TypeRef::named("String"));
    }

    #[test]
    fn parses_non_null_list_of_non_null() {
        let parsed = TypeRef::parse("[Foo!]!").unwrap();
        assert_eq!(parsed.to_string(), "[Foo!]!");
        assert_eq!(parsed.base_name(), "Foo");
        assert!(parsed.is_non_null());
        assert!(parsed.is_list());
    }

    #[test]
    fn rejects_doubled_bang() {
        assert_eq!(TypeRef::parse("Foo!!"), Err(TypeRefError::DoubleNonNull));
    }

    #[test]
    fn rejects_mismatched_brackets() {
        assert_eq!(TypeRef::parse("[Foo"), Err(TypeRefError::UnmatchedOpenBracket));
        assert_eq!(TypeRef::parse("Foo]"), Err(TypeRefError::UnmatchedCloseBracket));
    }

    #[test]
    fn rejects_empty_base() {
        assert_eq!(TypeRef::parse("[]"), Err(TypeRefError::EmptyBaseName));
    }
}
