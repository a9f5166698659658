mod pointer;

pub use pointer::Pointer;

use std::fmt::{Debug, Formatter, Result};

const BLANK: &str = "";
const PIPE: &str = "|";
const EQUAL: &str = "=";
const HIGHLIGHT: &str = "^";

/// Describes a type that can be associated with an Error and used
/// to print a visualization.
pub trait Visual: Debug {
    /// Display the visualization by writing to the given Formatter.
    ///
    /// `name` is the name of the file or input the visualization refers to.
    fn display(
        &self,
        formatter: &mut Formatter<'_>,
        name: Option<&str>,
        help: Option<&str>,
    ) -> Result;
}

/// Get the zero indexed line and byte column for the given byte offset.
///
/// Offsets past the end of the text resolve to the end of the last line.
fn get_line_and_column(lines: &[&str], offset: usize) -> (usize, usize) {
    let mut n = 0;

    for (i, line) in lines.iter().enumerate() {
        let len = line.len() + 1;
        if n + len > offset {
            return (i, offset - n);
        }
        n += len;
    }

    let last = lines.last().map(|line| line.len()).unwrap_or(0);

    (lines.len().saturating_sub(1), last)
}

/// Wrapper for UnicodeWidthStr::width.
fn get_width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}
