//! Bounded look-ahead from an anchor line.
//!
//! Labels and their values are captured as separate lines, so a value is
//! searched for in the few lines after its label and nowhere else.

use std::ops::RangeInclusive;

use sitedump_core::{LineSequence, SENTINEL, ValueShape};

/// Returns the first match of `matcher` in lines `anchor+1 ..= anchor+window`.
///
/// `None` when the anchor is absent or nothing in the window matches.
pub fn window_find<'a, F>(
    lines: &'a LineSequence,
    anchor: Option<usize>,
    window: usize,
    matcher: F,
) -> Option<&'a str>
where
    F: Fn(&'a str) -> Option<&'a str>,
{
    window_position(lines, anchor, window, matcher).map(|(_, value)| value)
}

/// Like [`window_find`], also returning the index of the matching line.
pub fn window_position<'a, F>(
    lines: &'a LineSequence,
    anchor: Option<usize>,
    window: usize,
    matcher: F,
) -> Option<(usize, &'a str)>
where
    F: Fn(&'a str) -> Option<&'a str>,
{
    window_range(lines, anchor, window)?
        .filter_map(|index| lines.get(index).map(|line| (index, line)))
        .find_map(|(index, line)| matcher(line).map(|value| (index, value)))
}

/// Like [`window_find`], but the last match in the window wins.
pub fn window_find_last<'a, F>(
    lines: &'a LineSequence,
    anchor: Option<usize>,
    window: usize,
    matcher: F,
) -> Option<&'a str>
where
    F: Fn(&'a str) -> Option<&'a str>,
{
    window_range(lines, anchor, window)?
        .rev()
        .filter_map(|index| lines.get(index))
        .find_map(matcher)
}

fn window_range(
    lines: &LineSequence,
    anchor: Option<usize>,
    window: usize,
) -> Option<RangeInclusive<usize>> {
    let anchor = anchor?;
    let end = anchor.saturating_add(window).min(lines.len().saturating_sub(1));
    Some((anchor + 1)..=end)
}

/// Returns the first `shape` value within `window` lines after `anchor`, or
/// the sentinel.
///
/// # Examples
///
/// ```
/// use sitedump_core::{LineSequence, ValueShape};
/// use sitedump_extract::scan::window_value;
///
/// let lines = LineSequence::from_raw("跳出率\n平均\n38.2%\n");
/// assert_eq!(window_value(&lines, Some(0), 5, ValueShape::Percent), "38.2%");
/// assert_eq!(window_value(&lines, Some(0), 1, ValueShape::Percent), "-");
/// assert_eq!(window_value(&lines, None, 5, ValueShape::Percent), "-");
/// ```
pub fn window_value(
    lines: &LineSequence,
    anchor: Option<usize>,
    window: usize,
    shape: ValueShape,
) -> String {
    window_find(lines, anchor, window, |line| shape.find(line))
        .unwrap_or(SENTINEL)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> LineSequence {
        LineSequence::from_lines(raw)
    }

    #[test]
    fn test_window_skips_anchor_line_itself() {
        let seq = lines(&["每月访问量 12M", "说明", "510.3M"]);
        assert_eq!(window_value(&seq, Some(0), 5, ValueShape::Volume), "510.3M");
    }

    #[test]
    fn test_window_is_bounded() {
        let seq = lines(&["访问持续时间", "a", "b", "c", "d", "e", "00:03:41"]);
        assert_eq!(window_value(&seq, Some(0), 5, ValueShape::Duration), SENTINEL);
        assert_eq!(window_value(&seq, Some(0), 6, ValueShape::Duration), "00:03:41");
    }

    #[test]
    fn test_window_clamps_at_end_of_input() {
        let seq = lines(&["跳出率"]);
        assert_eq!(window_value(&seq, Some(0), 5, ValueShape::Percent), SENTINEL);
        assert_eq!(window_value(&seq, Some(7), 5, ValueShape::Percent), SENTINEL);
    }

    #[test]
    fn test_first_match_wins() {
        let seq = lines(&["页面数/访问", "4.21", "9.99"]);
        assert_eq!(window_value(&seq, Some(0), 5, ValueShape::Number), "4.21");
    }

    #[test]
    fn test_last_match_variant() {
        let seq = lines(&["总访问量", "4.8M", "5.2M", "x", "x", "9.9M"]);
        let last = window_find_last(&seq, Some(0), 4, |line| ValueShape::Volume.find(line));
        assert_eq!(last, Some("5.2M"));
        let first = window_find(&seq, Some(0), 4, |line| ValueShape::Volume.find(line));
        assert_eq!(first, Some("4.8M"));
        let absent = window_find_last(&seq, None, 4, |line| ValueShape::Volume.find(line));
        assert_eq!(absent, None);
    }

    #[test]
    fn test_window_position_reports_line() {
        let seq = lines(&["a.com", "x", "3.1%"]);
        let found = window_position(&seq, Some(0), 2, |line| ValueShape::Percent.find(line));
        assert_eq!(found, Some((2, "3.1%")));
    }

    #[test]
    fn test_custom_matcher() {
        let seq = lines(&["总访问量", "5.2M", "+3.1% 自上个月"]);
        let found = window_find(&seq, Some(0), 4, |line| {
            line.contains("自上个月")
                .then(|| ValueShape::SignedPercent.find(line))
                .flatten()
        });
        assert_eq!(found, Some("+3.1%"));
    }
}
