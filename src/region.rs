use std::ops::{Index, Range};

/// Represents an area within source text, in bytes.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Region {
    /// The beginning of the range, inclusive.
    pub begin: usize,
    /// The ending of the range, exclusive.
    pub end: usize,
}

impl Region {
    /// Create a new Region from the given range.
    pub fn new(position: Range<usize>) -> Self {
        Self {
            begin: position.start,
            end: position.end,
        }
    }

    /// Create a Region covering the character at the given one indexed line and
    /// byte column, as reported by `serde_json`.
    ///
    /// A column of zero refers to the start of the line. Positions past the end of
    /// the source produce an empty Region at the end of the source.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::Region;
    ///
    /// let source = "{\n  \"entries\": 5\n}";
    /// let region = Region::at_position(source, 2, 14);
    ///
    /// assert_eq!(&source[region], "5");
    /// ```
    pub fn at_position(source: &str, line: usize, column: usize) -> Self {
        let start = source
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum::<usize>();
        let mut begin = (start + column.saturating_sub(1)).min(source.len());
        while !source.is_char_boundary(begin) {
            begin -= 1;
        }
        let end = source[begin..]
            .chars()
            .next()
            .map_or(begin, |c| begin + c.len_utf8());

        Self { begin, end }
    }

    /// Access the literal value of a [`Region`].
    ///
    /// # Panics
    ///
    /// Panics if the `Region` is out of bounds in the given source text.
    pub fn literal<'source>(&self, source: &'source str) -> &'source str {
        source
            .get(self.begin..self.end)
            .expect("getting literal by region should not fail")
    }
}

impl Index<Region> for str {
    type Output = str;

    fn index(&self, region: Region) -> &Self::Output {
        let Region { begin, end } = region;

        &self[begin..end]
    }
}

impl From<Range<usize>> for Region {
    fn from(value: Range<usize>) -> Self {
        Self {
            begin: value.start,
            end: value.end,
        }
    }
}
