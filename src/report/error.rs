use super::{Pointer, RED, RESET};
use crate::{region::Region, report::Visual};
use std::fmt::{Debug, Display, Formatter, Result};

/// Classifies an [`Error`], so callers can react to the condition without
/// inspecting the reason text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The identifier is already declared in the target scope.
    Duplicate,
    /// The identifier could not be found.
    NotFound,
    /// Persisted data is missing required fields or has the wrong shape.
    MalformedData,
    /// A required input field was empty.
    EmptyField,
    /// The tree nests deeper than the chosen format can represent.
    TooDeep,
    /// Reading or writing persisted data failed.
    Io,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            ErrorKind::Duplicate => "duplicate",
            ErrorKind::NotFound => "not found",
            ErrorKind::MalformedData => "malformed data",
            ErrorKind::EmptyField => "empty field",
            ErrorKind::TooDeep => "too deep",
            ErrorKind::Io => "io",
        };

        write!(f, "{text}")
    }
}

/// Describes an error, and allows adding a contextual help text and visualization.
///
/// # Examples
///
/// Creating an [`Error`] that includes a [`Visual`] of type [`Pointer`]:
///
/// ```
/// use burrow::{Error, ErrorKind, Region};
///
/// Error::build(ErrorKind::MalformedData, "malformed data")
///     .with_pointer(r#"{ "entries": 5 }"#, Region::new(13..14))
///     .with_name("table.json")
///     .with_help("expected a list of entries");
/// ```
///
/// When printed with `println!("{:#}", error)` the [`Error`] produces this output:
///
/// ```text
/// error: malformed data
///   --> table.json:1:14
///    |
///  1 | { "entries": 5 }
///    |              ^--
///    |
///   = help: expected a list of entries
/// ```
pub struct Error {
    /// The condition that caused the [`Error`].
    kind: ErrorKind,
    /// Describes the cause of the [`Error`].
    reason: String,
    /// A visualization to help illustrate the [`Error`].
    visual: Option<Box<dyn Visual>>,
    /// Additional information to display with the [`Error`].
    help: Option<String>,
    /// The name of the file or input that the [`Error`] comes from.
    name: Option<String>,
}

impl Error {
    /// Create a new [`Error`] of the given kind with the given reason text.
    ///
    /// The additional fields may be populated using the various methods
    /// defined on `Error`.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{Error, ErrorKind};
    ///
    /// let error = Error::build(ErrorKind::NotFound, "entry not found")
    ///     .with_help("`x` is not declared in this scope or any enclosing scope");
    ///
    /// assert_eq!(error.kind(), ErrorKind::NotFound);
    /// ```
    pub fn build<T>(kind: ErrorKind, reason: T) -> Self
    where
        T: Into<String>,
    {
        Error {
            kind,
            reason: reason.into(),
            name: None,
            visual: None,
            help: None,
        }
    }

    /// Set the reason text, which is a short summary of the [`Error`].
    pub fn with_reason<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.reason = text.into();

        self
    }

    /// Set the name text, which is the name of the file or input that the
    /// [`Error`] is related to.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{Error, ErrorKind};
    ///
    /// let error = Error::build(ErrorKind::Io, "io failure").with_name("table.json");
    ///
    /// assert_eq!(error.get_name(), Some("table.json"));
    /// ```
    pub fn with_name<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.name = Some(text.into());

        self
    }

    /// Set the [`Visual`], which is a visualization that helps illustrate the
    /// cause of the error.
    pub fn with_visual(mut self, visual: impl Visual + 'static) -> Self {
        self.visual = Some(Box::new(visual));

        self
    }

    /// Set the visualization to a new [`Pointer`] with the given source text and
    /// [`Region`].
    ///
    /// This is a shortcut method for creating a `Pointer` yourself and then
    /// passing it to `with_visual`.
    pub fn with_pointer<T>(mut self, source: &str, region: T) -> Self
    where
        T: Into<Region>,
    {
        self.visual = Some(Box::new(Pointer::new(source, region.into())));

        self
    }

    /// Set the help text, which is contextual information to accompany the
    /// reason text.
    pub fn with_help<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.help = Some(text.into());

        self
    }

    /// Return the [`ErrorKind`] of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return the reason text.
    #[inline]
    pub fn get_reason(&self) -> &str {
        &self.reason
    }

    /// Return the help text, if any.
    #[inline]
    pub fn get_help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Return the name of the file or input that the error is related to.
    #[inline]
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Return true if a [`Visual`] is attached.
    #[inline]
    pub fn has_visual(&self) -> bool {
        self.visual.is_some()
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if !f.alternate() {
            writeln!(f, "{self:#}")?;
        }
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("reason", &self.reason)
            .field("name", &self.name)
            .field("visual", &self.visual)
            .field("help", &self.help)
            .finish()?;

        Ok(())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let header = format!("{RED}error{RESET}");
        write!(f, "{header}: {}", self.reason)?;

        if !f.alternate() {
            return Ok(());
        }

        match &self.visual {
            Some(visual) => visual.display(f, self.name.as_deref(), self.help.as_deref()),
            None => {
                if let Some(help) = &self.help {
                    write!(f, "\n  = help: {help}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.reason == other.reason
            && self.help == other.help
            && self.name == other.name
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn test_display_plain() {
        let error = Error::build(ErrorKind::Duplicate, "duplicate entry").with_help("ignored");

        assert_eq!(error.to_string(), "\x1B[31merror\x1B[0m: duplicate entry");
    }

    #[test]
    fn test_display_alternate_help() {
        let error = Error::build(ErrorKind::NotFound, "entry not found").with_help("declare it");

        assert!(format!("{error:#}").ends_with("\n  = help: declare it"));
    }

    #[test]
    fn test_display_alternate_pointer() {
        let error = Error::build(ErrorKind::MalformedData, "malformed data")
            .with_pointer("{ \"entries\": 5 }", 13..14)
            .with_name("table.json")
            .with_help("expected a list");
        let text = format!("{error:#}");

        assert!(text.contains("--> table.json:1:14"));
        assert!(text.contains("= help: expected a list"));
    }

    #[test]
    fn test_eq_ignores_visual() {
        let a = Error::build(ErrorKind::MalformedData, "malformed data").with_pointer("[]", 0..1);
        let b = Error::build(ErrorKind::MalformedData, "malformed data");

        assert_eq!(a, b);
        assert_ne!(a, b.with_reason("something else"));
    }
}
