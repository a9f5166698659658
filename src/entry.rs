use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// A single identifier declared in a scope.
///
/// An `Entry` is immutable once created. Replacing it means deleting it from its
/// scope and inserting a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The declared name, unique within its scope.
    identifier: String,
    /// Free-form classification, like "variable" or "function".
    kind: String,
    /// Free-form type descriptor.
    #[serde(rename = "type")]
    ty: String,
}

impl Entry {
    /// Create a new [`Entry`].
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::Entry;
    ///
    /// let entry = Entry::new("x", "variable", "int");
    ///
    /// assert_eq!(entry.identifier(), "x");
    /// assert_eq!(entry.to_string(), "x: int (variable)");
    /// ```
    pub fn new<I, K, T>(identifier: I, kind: K, ty: T) -> Self
    where
        I: Into<String>,
        K: Into<String>,
        T: Into<String>,
    {
        Self {
            identifier: identifier.into(),
            kind: kind.into(),
            ty: ty.into(),
        }
    }

    #[inline]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[inline]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Return the type descriptor.
    #[inline]
    pub fn ty(&self) -> &str {
        &self.ty
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}: {} ({})", self.identifier, self.ty, self.kind)
    }
}
