//! Flattened page text as an indexed line sequence.

use serde::{Deserialize, Serialize};

/// Ordered, immutable sequence of trimmed non-empty lines.
///
/// Every extraction pass works on indices into this sequence. It is built
/// once per document and only read afterwards.
///
/// # Examples
///
/// ```
/// use sitedump_core::LineSequence;
///
/// let lines = LineSequence::from_raw("  总访问量 \n\n5.2M\r\n+3.1% 自上个月\n");
/// assert_eq!(lines.len(), 3);
/// assert_eq!(lines.get(0), Some("总访问量"));
/// assert_eq!(lines.get(1), Some("5.2M"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineSequence {
    lines: Vec<String>,
}

impl LineSequence {
    /// Splits raw captured text into trimmed, non-empty lines.
    ///
    /// `\r\n` and bare `\r` line endings are treated like `\n`.
    pub fn from_raw(raw: &str) -> Self {
        let lines = raw
            .split(['\n', '\r'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        Self { lines }
    }

    /// Builds a sequence from already separated lines, applying the same
    /// trimming and empty-line filtering as [`from_raw`](Self::from_raw).
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }
}

impl<'a> IntoIterator for &'a LineSequence {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
