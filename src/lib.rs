//! Burrow - Scoped Symbol Table
//!
//! A [`Table`] is a tree of lexical scopes. Each scope holds its own ordered list
//! of [`Entry`] values, and a lookup that misses in one scope falls back to the
//! scope enclosing it, so inner declarations shadow outer ones.
//!
//! ```
//! use burrow::{ErrorKind, Table};
//!
//! let mut table = Table::new();
//! let root = table.root();
//! let child = table.enter(root);
//!
//! table.insert(child, "x", "var", "int").unwrap();
//! let duplicate = table.insert(child, "x", "var", "bool");
//! assert_eq!(duplicate.unwrap_err().kind(), ErrorKind::Duplicate);
//!
//! assert_eq!(table.lookup(child, "x").unwrap().ty(), "int");
//! assert_eq!(table.exit(child), root);
//! assert_eq!(table.lookup(root, "x").unwrap_err().kind(), ErrorKind::NotFound);
//! ```
//!
//! Trees convert to and from plain [`ScopeData`], and through it to JSON. A
//! [`Session`] adds a current-scope cursor and file persistence on top.
mod data;
mod entry;
mod pipe;
mod region;
mod report;
mod session;
mod table;

pub use data::{ScopeData, JSON_SCOPE_LIMIT};
pub use entry::Entry;
pub use pipe::Pipe;
pub use region::Region;
pub use report::{Error, ErrorKind, Pointer, Visual};
pub use session::Session;
pub use table::{ScopeId, Table};
