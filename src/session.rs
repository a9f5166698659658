//! A current-scope cursor over a [`Table`], for front ends that walk the tree
//! one scope at a time.
//!
//! The [`Table`] itself accepts any string and leaves guarding against exiting
//! the root to its caller. A [`Session`] is such a caller: it trims and checks
//! input, refuses to exit the root, and reads and writes the tree as JSON files.
use crate::{
    report::{error_empty_field, error_io, Error},
    Entry, ScopeId, Table,
};
use std::{fs, path::Path};

/// Holds a [`Table`] and the scope that operations currently act on.
///
/// # Examples
///
/// ```
/// use burrow::Session;
///
/// let mut session = Session::new();
/// session.insert("y", "const", "float").unwrap();
/// session.enter();
/// session.insert("x", "variable", "int").unwrap();
///
/// assert_eq!(session.level(), 1);
/// assert_eq!(session.lookup("y").unwrap().kind(), "const");
///
/// assert!(session.exit());
/// assert!(session.lookup("x").is_err());
/// assert!(!session.exit());
/// ```
#[derive(Debug)]
pub struct Session {
    table: Table,
    current: ScopeId,
}

impl Session {
    /// Create a new [`Session`] over an empty [`Table`].
    #[inline]
    pub fn new() -> Self {
        Self::from_table(Table::new())
    }

    /// Create a new [`Session`] over the given [`Table`], starting at its root.
    pub fn from_table(table: Table) -> Self {
        let current = table.root();
        Self { table, current }
    }

    #[inline]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Consume the [`Session`] and return its [`Table`].
    #[inline]
    pub fn into_table(self) -> Table {
        self.table
    }

    #[inline]
    pub fn current(&self) -> ScopeId {
        self.current
    }

    /// Return how many scopes enclose the current scope.
    #[inline]
    pub fn level(&self) -> usize {
        self.table.depth(self.current)
    }

    /// Create a new scope inside the current one and move into it.
    pub fn enter(&mut self) -> ScopeId {
        self.current = self.table.enter(self.current);
        self.current
    }

    /// Move to the enclosing scope.
    ///
    /// Returns false and stays put if the current scope is the root.
    pub fn exit(&mut self) -> bool {
        if self.table.parent(self.current).is_none() {
            log::warn!("no parent scope to exit to");
            return false;
        }

        self.current = self.table.exit(self.current);
        log::debug!("exited to scope {}", self.current.index());
        true
    }

    /// Declare a new [`Entry`] in the current scope.
    ///
    /// Surrounding whitespace is trimmed from every field.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind `EmptyField` if any field is blank, or of kind
    /// `Duplicate` if the identifier is already declared in the current scope.
    pub fn insert(&mut self, identifier: &str, kind: &str, ty: &str) -> Result<(), Error> {
        let identifier = require("identifier", identifier)?;
        let kind = require("kind", kind)?;
        let ty = require("type", ty)?;

        self.table.insert(self.current, identifier, kind, ty)
    }

    /// Return the [`Entry`] that `identifier` refers to from the current scope.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind `NotFound` if neither the current scope nor
    /// any enclosing scope declares the identifier.
    #[inline]
    pub fn lookup(&self, identifier: &str) -> Result<&Entry, Error> {
        self.table.lookup(self.current, identifier.trim())
    }

    /// Remove the [`Entry`] declared in the current scope and return it.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind `NotFound` if the current scope itself does not
    /// declare the identifier.
    #[inline]
    pub fn delete(&mut self, identifier: &str) -> Result<Entry, Error> {
        self.table.delete(self.current, identifier.trim())
    }

    /// Return the entries declared in the current scope.
    #[inline]
    pub fn entries(&self) -> &[Entry] {
        self.table.entries(self.current)
    }

    /// Return the row of `identifier` within the current scope's entries.
    #[inline]
    pub fn position(&self, identifier: &str) -> Option<usize> {
        self.table.position(self.current, identifier.trim())
    }

    /// Discard the whole tree and return to an empty root.
    pub fn clear(&mut self) {
        self.table.clear();
        self.current = self.table.root();
    }

    /// Write the whole tree, starting at the root, to `path` as JSON.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind `TooDeep` if the tree nests deeper than
    /// [`JSON_SCOPE_LIMIT`][`crate::JSON_SCOPE_LIMIT`], or of kind `Io` if the
    /// file cannot be written. Nothing is written in the first case.
    pub fn save<P>(&self, path: P) -> Result<(), Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = self
            .table
            .to_json_pretty(self.table.root())
            .map_err(|e| e.with_name(path.display().to_string()))?;
        fs::write(path, text).map_err(|e| error_io(path, &e))?;
        log::debug!("saved {} scopes to {}", self.table.scope_count(), path.display());

        Ok(())
    }

    /// Replace the tree with the one stored at `path`, and move to its root.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind `Io` if the file cannot be read, or of kind
    /// `MalformedData` if it does not hold a valid tree. The session is unchanged
    /// in either case.
    pub fn load<P>(&mut self, path: P) -> Result<(), Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| error_io(path, &e))?;
        let table =
            Table::from_json(&text).map_err(|e| e.with_name(path.display().to_string()))?;
        log::debug!("loaded {} scopes from {}", table.scope_count(), path.display());

        *self = Self::from_table(table);
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Return the trimmed field, or an error if nothing is left.
fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, Error> {
    let value = value.trim();
    if value.is_empty() {
        log::warn!("rejected input: `{field}` is blank");
        return Err(error_empty_field(field));
    }

    Ok(value)
}
