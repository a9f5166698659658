use crate::Entry;

/// Names a scope within a [`Table`][`crate::Table`].
///
/// A `ScopeId` is only meaningful for the table that produced it, and only
/// until that table is cleared. Using an id from before a
/// [`clear`][`crate::Table::clear`] panics instead of reaching whichever scope
/// was later created at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId {
    pub(crate) index: usize,
    /// Number of clears the owning table had seen when this id was made.
    pub(crate) generation: usize,
}

impl ScopeId {
    /// Return the position of the scope in creation order.
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }
}

/// A node in the scope tree.
#[derive(Debug, Default)]
pub(crate) struct Scope {
    /// Declared entries, in insertion order.
    pub entries: Vec<Entry>,
    /// The enclosing scope, absent for the root.
    pub parent: Option<ScopeId>,
    /// Nested scopes, in creation order.
    pub children: Vec<ScopeId>,
}

impl Scope {
    /// Create a new empty [`Scope`] enclosed by the given parent.
    #[inline]
    pub fn new(parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            ..Default::default()
        }
    }

    /// Return the position of the identifier in this scope, if declared here.
    #[inline]
    pub fn position(&self, identifier: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.identifier() == identifier)
    }
}
