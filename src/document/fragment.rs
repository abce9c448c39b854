//! Fragment definitions and the shared-pointer references to them.
//!
//! A named fragment can be referenced (`... Name`) before its own
//! `fragment Name on Type { … }` definition has been parsed, so a reference
//! can't simply hold a fully-formed [`FragmentDefinition`] at the moment
//! it's created. Instead every reference -- forward or not -- holds a
//! clone of an [`Arc<FragmentSlot>`] registered once per name; the slot
//! starts empty and is filled in exactly once, by whichever `fragment`
//! definition matches its name (see `crate::parser`). An inline fragment
//! (`... on Type { … }`) has no such ordering problem, so its slot is
//! filled immediately, at the point it's parsed.

use crate::document::SelectionSet;
use crate::document::directive::DirectiveApplication;
use crate::loc::SourcePosition;
use std::sync::{Arc, OnceLock};

#[derive(Debug)]
pub struct FragmentDefinition {
    /// `None` for an inline fragment (`... on Type { … }`); `Some` for a
    /// named fragment definition (`fragment Name on Type { … }`).
    pub name: Option<String>,
    pub type_condition: String,
    pub directives: Vec<DirectiveApplication>,
    pub selection_set: SelectionSet,
    pub def_location: SourcePosition,
}

/// A name-addressed cell a [`FragmentReference`] points at. Exactly one
/// `fragment Name on Type { … }` definition (or, for an inline fragment,
/// exactly one parse of `... on Type { … }`) ever fills it.
#[derive(Debug)]
pub struct FragmentSlot {
    name: Option<String>,
    cell: OnceLock<Arc<FragmentDefinition>>,
}

impl FragmentSlot {
    pub fn named(name: impl Into<String>) -> Arc<FragmentSlot> {
        Arc::new(FragmentSlot {
            name: Some(name.into()),
            cell: OnceLock::new(),
        })
    }

    pub fn inline(def: FragmentDefinition) -> Arc<FragmentSlot> {
        let slot = FragmentSlot {
            name: None,
            cell: OnceLock::new(),
        };
        // An inline fragment is always filled at construction time; the
        // `Arc::new` it immediately wraps never shares identity with
        // anything else, so `set` can never race or double-fill.
        slot.cell
            .set(Arc::new(def))
            .unwrap_or_else(|_| unreachable!("freshly constructed slot is always empty"));
        Arc::new(slot)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fills a forward-declared named slot. Fails (returning the definition
    /// back) if the slot was already filled -- the caller should surface
    /// this as a duplicate-fragment-name parse error.
    pub fn fill(&self, def: FragmentDefinition) -> Result<(), FragmentDefinition> {
        let arc = Arc::new(def);
        self.cell.set(arc.clone()).map_err(|rejected| {
            Arc::try_unwrap(rejected).unwrap_or_else(|_| unreachable!("just created, refcount 1"))
        })
    }

    pub fn get(&self) -> Option<&Arc<FragmentDefinition>> {
        self.cell.get()
    }

    pub fn is_filled(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// A `... Name` or `... on Type { … }` entry inside a [`SelectionSet`].
#[derive(Clone, Debug)]
pub struct FragmentReference(pub Arc<FragmentSlot>);

impl FragmentReference {
    pub fn slot(&self) -> &FragmentSlot {
        &self.0
    }

    /// The resolved fragment, if its slot has been filled. Every reference
    /// in a fully-parsed, validated [`crate::document::Document`] resolves
    /// (§3's invariant); this is only `None` mid-parse.
    pub fn fragment(&self) -> Option<&Arc<FragmentDefinition>> {
        self.0.get()
    }
}
