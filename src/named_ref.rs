//! A by-name reference into some registry, resolved lazily.
//!
//! Mirrors the teacher's `NamedRef<T>`/`DerefByName` split: rather than
//! storing a direct pointer (which would fight the borrow checker once the
//! thing doing the pointing and the registry itself are both owned by the
//! same [`crate::schema::Schema`] or [`crate::document`] tree), a reference
//! is just a name plus a phantom marker, and resolution is a lookup against
//! whatever registry implements [`DerefByName`] for `T`.

use std::marker::PhantomData;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedRef<T: DerefByName> {
    name: String,
    phantom: PhantomData<T>,
}

impl<T: DerefByName> NamedRef<T> {
    pub fn new(name: impl Into<String>) -> Self {
        NamedRef {
            name: name.into(),
            phantom: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deref<'a>(&self, registry: &'a T::Registry) -> Option<&'a T> {
        T::deref_name(registry, &self.name)
    }
}

/// Implemented by any type that can be looked up by name in some registry
/// (a [`crate::schema::Schema`]'s type map, a document's fragment registry,
/// an enum's value map, ...).
pub trait DerefByName: Sized {
    type Registry;

    fn deref_name<'a>(registry: &'a Self::Registry, name: &str) -> Option<&'a Self>;
}
