use crate::{Entry, ScopeId, Table};
use std::fmt::{Display, Formatter, Result, Write};

const INDENT: &str = "  ";

/// Wraps some underlying buffer by providing methods that write a scope tree
/// to it as an indented outline.
///
/// Each scope is written as a header line followed by its entries in insertion
/// order, then its nested scopes.
///
/// ```text
/// scope 0 (level 0)
///   y: float (const)
///   scope 1 (level 1)
///     x: int (variable)
/// ```
pub struct Pipe<'buffer> {
    buffer: &'buffer mut (dyn Write + 'buffer),
}

impl<'buffer> Pipe<'buffer> {
    /// Create a new Pipe that writes to the given buffer.
    pub fn new(buffer: &'buffer mut (dyn Write + 'buffer)) -> Self {
        Self { buffer }
    }

    /// Write the subtree of `table` rooted at `scope` to the Pipe buffer.
    ///
    /// # Errors
    ///
    /// The only error that will be returned is propagated from the [write!]
    /// macro itself.
    pub fn write_scope(&mut self, table: &Table, scope: ScopeId) -> Result {
        let base = table.depth(scope);
        let mut stack = vec![(scope, 0)];

        while let Some((id, indent)) = stack.pop() {
            self.write_indent(indent)?;
            writeln!(self.buffer, "scope {} (level {})", id.index(), base + indent)?;
            for entry in table.entries(id) {
                self.write_entry(entry, indent + 1)?;
            }
            stack.extend(table.children(id).iter().rev().map(|&child| (child, indent + 1)));
        }

        Ok(())
    }

    fn write_entry(&mut self, entry: &Entry, indent: usize) -> Result {
        self.write_indent(indent)?;
        writeln!(self.buffer, "{entry}")
    }

    fn write_indent(&mut self, indent: usize) -> Result {
        for _ in 0..indent {
            self.buffer.write_str(INDENT)?;
        }
        Ok(())
    }
}

impl Table {
    /// Return the subtree rooted at `scope` as an indented outline.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::Table;
    ///
    /// let mut table = Table::new();
    /// let root = table.root();
    /// table.insert_must(root, "y", "const", "float");
    ///
    /// assert_eq!(table.outline(root), "scope 0 (level 0)\n  y: float (const)\n");
    /// ```
    pub fn outline(&self, scope: ScopeId) -> String {
        let mut buffer = String::new();
        Pipe::new(&mut buffer)
            .write_scope(self, scope)
            .expect("writing to a String should not fail");

        buffer
    }
}

impl Display for Table {
    /// Write the whole tree as an outline, starting at the root.
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Pipe::new(f).write_scope(self, self.root())
    }
}

#[cfg(test)]
mod tests {
    use crate::Table;

    #[test]
    fn test_outline_nested() {
        let mut table = Table::new();
        let root = table.root();
        table.insert_must(root, "y", "const", "float");
        let first = table.enter(root);
        table.insert_must(first, "x", "variable", "int");
        table.insert_must(first, "a", "variable", "bool");
        table.enter(first);
        table.enter(root);

        assert_eq!(
            table.to_string(),
            "scope 0 (level 0)\n\
             \x20 y: float (const)\n\
             \x20 scope 1 (level 1)\n\
             \x20   x: int (variable)\n\
             \x20   a: bool (variable)\n\
             \x20   scope 2 (level 2)\n\
             \x20 scope 3 (level 1)\n"
        );
    }

    #[test]
    fn test_outline_subtree() {
        let mut table = Table::new();
        let root = table.root();
        table.insert_must(root, "y", "const", "float");
        let child = table.enter(root);

        assert_eq!(table.outline(child), "scope 1 (level 1)\n");
    }

    #[test]
    fn test_outline_deep_chain() {
        let mut table = Table::new();
        let mut current = table.root();
        for _ in 0..4_000 {
            current = table.enter(current);
        }
        table.insert_must(current, "x", "variable", "int");
        let outline = table.outline(table.root());

        assert_eq!(outline.lines().count(), 4_002);
        assert!(outline.ends_with(&format!("{}x: int (variable)\n", "  ".repeat(4_001))));
    }
}
