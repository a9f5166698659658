mod scope;

pub use scope::ScopeId;

use self::scope::Scope;
use crate::{
    report::{error_duplicate, error_not_found, error_not_local, Error},
    Entry,
};

/// A tree of nested scopes, each holding an ordered list of [`Entry`] values.
///
/// Scopes are stored in an arena and addressed by [`ScopeId`]. A lookup starts in
/// the given scope and walks outward through enclosing scopes, so an inner
/// declaration shadows an outer one with the same identifier.
///
/// Every method that accepts a `ScopeId` panics if the id was not produced by
/// this table.
///
/// # Examples
///
/// ```
/// use burrow::Table;
///
/// let mut table = Table::new();
/// let root = table.root();
/// table.insert(root, "y", "const", "float").unwrap();
///
/// let child = table.enter(root);
/// table.insert(child, "x", "variable", "int").unwrap();
///
/// assert_eq!(table.lookup(child, "y").unwrap().ty(), "float");
/// assert!(table.lookup(root, "x").is_err());
/// assert_eq!(table.exit(child), root);
/// ```
#[derive(Debug)]
pub struct Table {
    scopes: Vec<Scope>,
    generation: usize,
}

impl Table {
    /// Create a new [`Table`] holding a single empty root scope.
    #[inline]
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(None)],
            generation: 0,
        }
    }

    /// Return the root scope.
    #[inline]
    pub fn root(&self) -> ScopeId {
        self.id(0)
    }

    /// Return the number of scopes in the [`Table`], including the root.
    #[inline]
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Return true if no scope holds any entry.
    ///
    /// Scopes without entries do not count, so a table with nested but empty
    /// scopes is empty. Use [`scope_count`][`Table::scope_count`] to tell it
    /// apart from a fresh table.
    pub fn is_empty(&self) -> bool {
        self.scopes.iter().all(|s| s.entries.is_empty())
    }

    /// Create a new scope nested inside `current` and return it.
    ///
    /// The entries of `current` are untouched.
    pub fn enter(&mut self, current: ScopeId) -> ScopeId {
        self.scope(current);
        let id = self.id(self.scopes.len());
        self.scopes.push(Scope::new(Some(current)));
        self.scope_mut(current).children.push(id);
        log::debug!("entered scope {} from scope {}", id.index, current.index);

        id
    }

    /// Return the scope enclosing `current`.
    ///
    /// The root has no enclosing scope, so exiting it returns the root itself.
    /// Callers that need to distinguish the two cases should check
    /// [`parent`][`Table::parent`] first.
    pub fn exit(&self, current: ScopeId) -> ScopeId {
        self.parent(current).unwrap_or(current)
    }

    /// Return the scope enclosing `scope`, if any.
    #[inline]
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scope(scope).parent
    }

    /// Return the scopes nested directly inside `scope`, in creation order.
    #[inline]
    pub fn children(&self, scope: ScopeId) -> &[ScopeId] {
        &self.scope(scope).children
    }

    /// Return the entries declared directly in `scope`, in insertion order.
    #[inline]
    pub fn entries(&self, scope: ScopeId) -> &[Entry] {
        &self.scope(scope).entries
    }

    /// Return the number of scopes enclosing `scope`. The root is at depth zero.
    pub fn depth(&self, scope: ScopeId) -> usize {
        self.ancestors(scope).count() - 1
    }

    /// Return how many levels of scopes nest below `scope`. A scope without
    /// children has height zero.
    pub fn height(&self, scope: ScopeId) -> usize {
        let mut tallest = 0;
        let mut stack = vec![(scope, 0)];
        while let Some((id, height)) = stack.pop() {
            tallest = tallest.max(height);
            stack.extend(self.children(id).iter().map(|&child| (child, height + 1)));
        }

        tallest
    }

    /// Return an iterator over `scope` followed by each enclosing scope, ending
    /// with the root.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |&s| self.parent(s))
    }

    /// Declare a new [`Entry`] in `scope`.
    ///
    /// Only `scope` itself is checked for an existing declaration, so an identifier
    /// declared in an enclosing scope may be shadowed.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind `Duplicate` if the identifier is already declared
    /// in `scope`. The table is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{ErrorKind, Table};
    ///
    /// let mut table = Table::new();
    /// let root = table.root();
    ///
    /// assert!(table.insert(root, "x", "variable", "int").is_ok());
    /// assert_eq!(
    ///     table.insert(root, "x", "variable", "bool").unwrap_err().kind(),
    ///     ErrorKind::Duplicate
    /// );
    /// ```
    pub fn insert<I, K, T>(
        &mut self,
        scope: ScopeId,
        identifier: I,
        kind: K,
        ty: T,
    ) -> Result<(), Error>
    where
        I: Into<String>,
        K: Into<String>,
        T: Into<String>,
    {
        let entry = Entry::new(identifier, kind, ty);
        let target = self.scope_mut(scope);
        if target.position(entry.identifier()).is_some() {
            return Err(error_duplicate(entry.identifier()));
        }

        log::debug!("declared `{}` in scope {}", entry, scope.index);
        target.entries.push(entry);
        Ok(())
    }

    /// Declare a new [`Entry`] in `scope`.
    ///
    /// # Panics
    ///
    /// Panics if the identifier is already declared in `scope`.
    #[inline]
    pub fn insert_must<I, K, T>(&mut self, scope: ScopeId, identifier: I, kind: K, ty: T)
    where
        I: Into<String>,
        K: Into<String>,
        T: Into<String>,
    {
        self.insert(scope, identifier, kind, ty).unwrap();
    }

    /// Return the [`Entry`] that `identifier` refers to when seen from `scope`.
    ///
    /// `scope` is searched first, then each enclosing scope in turn. The first
    /// match wins.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind `NotFound` if no scope up to and including the
    /// root declares the identifier.
    pub fn lookup(&self, scope: ScopeId, identifier: &str) -> Result<&Entry, Error> {
        self.resolve(scope, identifier)
            .map(|(_, entry)| entry)
            .ok_or_else(|| error_not_found(identifier))
    }

    /// Like [`lookup`][`Table::lookup`], but also return the scope that declares
    /// the matching [`Entry`].
    pub fn resolve(&self, scope: ScopeId, identifier: &str) -> Option<(ScopeId, &Entry)> {
        for id in self.ancestors(scope) {
            if let Some(entry) = self.get(id, identifier) {
                return Some((id, entry));
            }
            log::trace!("`{identifier}` not in scope {}, trying enclosing scope", id.index);
        }

        None
    }

    /// Return the [`Entry`] declared directly in `scope`, without searching
    /// enclosing scopes.
    #[inline]
    pub fn get(&self, scope: ScopeId, identifier: &str) -> Option<&Entry> {
        let target = self.scope(scope);
        target.position(identifier).map(|i| &target.entries[i])
    }

    /// Return the position of `identifier` within the entries of `scope`.
    #[inline]
    pub fn position(&self, scope: ScopeId, identifier: &str) -> Option<usize> {
        self.scope(scope).position(identifier)
    }

    /// Remove the [`Entry`] declared directly in `scope` and return it.
    ///
    /// Enclosing scopes are not searched, so an outer declaration shadowed by the
    /// removed one becomes visible again.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind `NotFound` if `scope` itself does not declare
    /// the identifier.
    pub fn delete(&mut self, scope: ScopeId, identifier: &str) -> Result<Entry, Error> {
        let target = self.scope_mut(scope);
        let index = target
            .position(identifier)
            .ok_or_else(|| error_not_local(identifier))?;
        let entry = target.entries.remove(index);
        log::debug!("removed `{}` from scope {}", entry, scope.index);

        Ok(entry)
    }

    /// Discard every scope and entry, leaving a single empty root.
    ///
    /// Every previously returned [`ScopeId`], the old root included, becomes
    /// stale. Passing a stale id to any method panics, even once new scopes
    /// exist at the same position. Fetch the new root with
    /// [`root`][`Table::root`].
    pub fn clear(&mut self) {
        self.scopes.clear();
        self.scopes.push(Scope::new(None));
        self.generation += 1;
        log::debug!("cleared table");
    }

    /// Replace the entries of `scope` wholesale. The caller upholds uniqueness.
    pub(crate) fn replace_entries(&mut self, scope: ScopeId, entries: Vec<Entry>) {
        self.scope_mut(scope).entries = entries;
    }

    #[inline]
    fn id(&self, index: usize) -> ScopeId {
        ScopeId {
            index,
            generation: self.generation,
        }
    }

    fn scope(&self, id: ScopeId) -> &Scope {
        self.check(id);
        self.scopes
            .get(id.index)
            .expect("scope id should belong to this table")
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        self.check(id);
        self.scopes
            .get_mut(id.index)
            .expect("scope id should belong to this table")
    }

    fn check(&self, id: ScopeId) {
        if id.generation != self.generation {
            panic!("scope id should not predate the last clear of this table");
        }
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}
