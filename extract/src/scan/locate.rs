//! Anchor lookup over a line sequence.

use regex::Regex;
use sitedump_core::LineSequence;

/// What a line must look like to serve as an anchor.
#[derive(Debug, Clone, Copy)]
pub enum Anchor<'a> {
    /// Whole-line equality.
    Exact(&'a str),
    /// Line contains the keyword.
    Contains(&'a str),
    /// Line is the keyword, or starts with it followed by whitespace.
    Leading(&'a str),
    /// Line matches the pattern.
    Pattern(&'a Regex),
}

impl Anchor<'_> {
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Anchor::Exact(keyword) => line == *keyword,
            Anchor::Contains(keyword) => line.contains(keyword),
            Anchor::Leading(keyword) => line
                .strip_prefix(keyword)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace)),
            Anchor::Pattern(pattern) => pattern.is_match(line),
        }
    }
}

/// Returns the index of the first line at or after `from` matching `anchor`.
///
/// # Examples
///
/// ```
/// use sitedump_core::LineSequence;
/// use sitedump_extract::scan::{Anchor, locate};
///
/// let lines = LineSequence::from_raw("直接\n35.1%\n外链\n8.2%\n外链行业");
/// assert_eq!(locate(&lines, Anchor::Exact("外链"), 0), Some(2));
/// assert_eq!(locate(&lines, Anchor::Contains("外链"), 3), Some(4));
/// assert_eq!(locate(&lines, Anchor::Exact("社交"), 0), None);
/// ```
pub fn locate(lines: &LineSequence, anchor: Anchor<'_>, from: usize) -> Option<usize> {
    lines
        .as_slice()
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, line)| anchor.matches(line))
        .map(|(index, _)| index)
}

/// Locates `primary`, falling back to `fallback` when it is absent.
pub fn locate_either(
    lines: &LineSequence,
    primary: Anchor<'_>,
    fallback: Anchor<'_>,
    from: usize,
) -> Option<usize> {
    locate(lines, primary, from).or_else(|| locate(lines, fallback, from))
}

/// Iterates over every line index matching `anchor`, in order.
///
/// Each step resumes the search one line after the previous hit.
pub fn locate_all<'a>(
    lines: &'a LineSequence,
    anchor: Anchor<'a>,
) -> impl Iterator<Item = usize> + 'a {
    let mut next = 0;
    std::iter::from_fn(move || {
        let found = locate(lines, anchor, next)?;
        next = found + 1;
        Some(found)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> LineSequence {
        LineSequence::from_lines(raw)
    }

    #[test]
    fn test_exact_requires_full_line() {
        let seq = lines(&["总访问量 (3 个月)", "总访问量"]);
        assert_eq!(locate(&seq, Anchor::Exact("总访问量"), 0), Some(1));
        assert_eq!(locate(&seq, Anchor::Contains("总访问量"), 0), Some(0));
    }

    #[test]
    fn test_leading_keyword() {
        let seq = lines(&["社交流量", "社交媒体 3%", "社交 3.81%", "社交"]);
        assert_eq!(locate(&seq, Anchor::Leading("社交"), 0), Some(2));
        assert_eq!(locate(&seq, Anchor::Leading("社交"), 3), Some(3));
    }

    #[test]
    fn test_search_starts_at_offset() {
        let seq = lines(&["Desktop 61%", "x", "Desktop 70%"]);
        assert_eq!(locate(&seq, Anchor::Contains("Desktop"), 1), Some(2));
        assert_eq!(locate(&seq, Anchor::Contains("Desktop"), 3), None);
        assert_eq!(locate(&seq, Anchor::Contains("Desktop"), 99), None);
    }

    #[test]
    fn test_pattern_anchor() {
        let header = Regex::new(r"^域\s*(\([\d,]+\))?$").unwrap();
        let seq = lines(&["外链", "域 (1,204)", "域"]);
        assert_eq!(locate(&seq, Anchor::Pattern(&header), 0), Some(1));
        assert_eq!(locate(&seq, Anchor::Pattern(&header), 2), Some(2));
    }

    #[test]
    fn test_locate_either_prefers_primary() {
        let seq = lines(&["热门有机关键词", "热门自然非品牌搜索词"]);
        let found = locate_either(
            &seq,
            Anchor::Contains("热门自然非品牌搜索词"),
            Anchor::Contains("热门有机关键词"),
            0,
        );
        assert_eq!(found, Some(1));

        let only_fallback = lines(&["热门有机关键词"]);
        let found = locate_either(
            &only_fallback,
            Anchor::Contains("热门自然非品牌搜索词"),
            Anchor::Contains("热门有机关键词"),
            0,
        );
        assert_eq!(found, Some(0));
    }

    #[test]
    fn test_locate_all_finds_recurring_keyword() {
        let seq = lines(&["直接", "12%", "直接", "直接 8%", "社交"]);
        let hits: Vec<usize> = locate_all(&seq, Anchor::Contains("直接")).collect();
        assert_eq!(hits, vec![0, 2, 3]);
    }
}
