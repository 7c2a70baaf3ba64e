//! Lexical value shapes found in flattened analytics dumps.
//!
//! Every value the extractors look for belongs to one of a small, closed set
//! of grammars. They are compiled once and shared by all call sites.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::SENTINEL;

/// The closed set of value grammars.
///
/// Each shape can be searched for inside a line ([`find`](Self::find)),
/// required to span a whole line ([`is_whole`](Self::is_whole)), or required
/// to open a line ([`starts`](Self::starts)).
///
/// # Examples
///
/// ```
/// use sitedump_core::ValueShape;
///
/// assert_eq!(ValueShape::Volume.find("Total 1.53B visits"), Some("1.53B"));
/// assert_eq!(ValueShape::Rank.find("全球排名 #1,234"), Some("#1,234"));
/// assert!(ValueShape::Percent.is_whole("3.4%"));
/// assert!(!ValueShape::Percent.is_whole("+3.4%"));
/// assert!(ValueShape::SignedPercent.is_whole("+ 3.4%"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    /// Number with a magnitude suffix: `1.53B`, `510.3M`, `892.4K`.
    Volume,
    /// Number with an optional magnitude suffix: `1,204` or `3.3M`.
    Quantity,
    /// Plain number: `3.45`, `1,204`.
    Number,
    /// Unsigned percentage: `12.5%`.
    Percent,
    /// Percentage with an optional sign or lower bound: `+2.1%`, `- 0.3%`,
    /// `>1,000%`, `4%`.
    SignedPercent,
    /// Rank: `#1,234`.
    Rank,
    /// Clock duration: `00:03:41`.
    Duration,
}

impl ValueShape {
    pub const ALL: [ValueShape; 7] = [
        ValueShape::Volume,
        ValueShape::Quantity,
        ValueShape::Number,
        ValueShape::Percent,
        ValueShape::SignedPercent,
        ValueShape::Rank,
        ValueShape::Duration,
    ];

    /// Returns the first substring of `line` with this shape.
    pub fn find(self, line: &str) -> Option<&str> {
        self.patterns().find.find(line).map(|m| m.as_str())
    }

    /// Returns every non-overlapping substring of `line` with this shape.
    pub fn find_iter(self, line: &str) -> impl Iterator<Item = &str> {
        self.patterns().find.find_iter(line).map(|m| m.as_str())
    }

    /// Returns `true` when the entire line has this shape.
    pub fn is_whole(self, line: &str) -> bool {
        self.patterns().whole.is_match(line)
    }

    /// Returns `true` when the line opens with this shape.
    pub fn starts(self, line: &str) -> bool {
        self.patterns().prefix.is_match(line)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Volume => "volume",
            Self::Quantity => "quantity",
            Self::Number => "number",
            Self::Percent => "percent",
            Self::SignedPercent => "signed_percent",
            Self::Rank => "rank",
            Self::Duration => "duration",
        }
    }

    fn patterns(self) -> &'static ShapePatterns {
        let table = &*SHAPES;
        match self {
            Self::Volume => &table.volume,
            Self::Quantity => &table.quantity,
            Self::Number => &table.number,
            Self::Percent => &table.percent,
            Self::SignedPercent => &table.signed_percent,
            Self::Rank => &table.rank,
            Self::Duration => &table.duration,
        }
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct ShapePatterns {
    find: Regex,
    whole: Regex,
    prefix: Regex,
}

impl ShapePatterns {
    fn new(grammar: &str) -> Self {
        // Grammars are compile-time constants; a failure here is a programmer error.
        Self {
            find: Regex::new(grammar).expect("static regex must compile"),
            whole: Regex::new(&format!("^(?:{grammar})$")).expect("static regex must compile"),
            prefix: Regex::new(&format!("^(?:{grammar})")).expect("static regex must compile"),
        }
    }
}

struct ShapeTable {
    volume: ShapePatterns,
    quantity: ShapePatterns,
    number: ShapePatterns,
    percent: ShapePatterns,
    signed_percent: ShapePatterns,
    rank: ShapePatterns,
    duration: ShapePatterns,
}

static SHAPES: LazyLock<ShapeTable> = LazyLock::new(|| ShapeTable {
    volume: ShapePatterns::new(r"[0-9][0-9,.]*[BMK]"),
    quantity: ShapePatterns::new(r"[0-9][0-9,.]*[BMK]?"),
    number: ShapePatterns::new(r"[0-9][0-9,.]*"),
    percent: ShapePatterns::new(r"[0-9][0-9,.]*%"),
    signed_percent: ShapePatterns::new(r"(?:[+-]\s*|>)?[0-9][0-9,.]*%"),
    rank: ShapePatterns::new(r"#[0-9][0-9,]*"),
    duration: ShapePatterns::new(r"[0-9]{2}:[0-9]{2}:[0-9]{2}"),
});

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]*\.[A-Za-z][A-Za-z0-9-]+$")
        .expect("static regex must compile")
});

static COUNTER_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([0-9]+\)$").expect("static regex must compile"));

/// Strips a trailing parenthesized counter such as `(2)` from a cell.
///
/// ```
/// use sitedump_core::strip_counter_suffix;
///
/// assert_eq!(strip_counter_suffix("nexusmods.com(2)"), "nexusmods.com");
/// assert_eq!(strip_counter_suffix("nexusmods.com"), "nexusmods.com");
/// ```
pub fn strip_counter_suffix(line: &str) -> &str {
    match COUNTER_SUFFIX_RE.find(line) {
        Some(m) => &line[..m.start()],
        None => line,
    }
}

/// Returns `true` for `word.word.tld`-shaped lines.
///
/// The top-level label must start with a letter, so suffixed numbers like
/// `1.2M` never pass. A trailing `(N)` counter is ignored.
pub fn is_domain(line: &str) -> bool {
    DOMAIN_RE.is_match(strip_counter_suffix(line))
}

/// Normalizes a change cell: inner whitespace is removed and an unsigned
/// percentage gains a leading `+`. Signed values and the sentinel pass
/// through untouched.
///
/// ```
/// use sitedump_core::normalize_change;
///
/// assert_eq!(normalize_change("5.2%"), "+5.2%");
/// assert_eq!(normalize_change("- 1.1%"), "-1.1%");
/// assert_eq!(normalize_change("-"), "-");
/// ```
pub fn normalize_change(value: &str) -> String {
    if value == SENTINEL {
        return value.to_string();
    }
    let compact: String = value.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.starts_with(|ch: char| ch.is_ascii_digit()) {
        format!("+{compact}")
    } else {
        compact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_shape_grammars_compile() {
        for shape in ValueShape::ALL {
            assert!(!shape.is_whole(""), "{shape} must not match an empty line");
        }
    }

    #[test]
    fn test_volume_requires_suffix() {
        assert!(ValueShape::Volume.is_whole("892.4K"));
        assert!(ValueShape::Volume.is_whole("9M"));
        assert!(!ValueShape::Volume.is_whole("1,204"));
        assert!(ValueShape::Quantity.is_whole("1,204"));
        assert!(ValueShape::Quantity.is_whole("1.53B"));
    }

    #[test]
    fn test_volume_prefix() {
        assert!(ValueShape::Volume.starts("1.2M visits"));
        assert!(!ValueShape::Volume.starts("#12"));
        assert!(!ValueShape::Volume.starts("visits 1.2M"));
    }

    #[test]
    fn test_percent_shapes() {
        assert_eq!(ValueShape::Percent.find("Desktop 61.3%"), Some("61.3%"));
        assert_eq!(
            ValueShape::SignedPercent.find("+3.1% 自上个月"),
            Some("+3.1%")
        );
        assert!(ValueShape::SignedPercent.is_whole("-0.3%"));
        assert!(ValueShape::SignedPercent.is_whole(">1,000%"));
        assert!(ValueShape::SignedPercent.is_whole("4%"));
        assert!(!ValueShape::SignedPercent.is_whole("-"));
    }

    #[test]
    fn test_find_iter_collects_every_percentage() {
        let found: Vec<&str> = ValueShape::Percent.find_iter("45.1% 2.3%").collect();
        assert_eq!(found, vec!["45.1%", "2.3%"]);
    }

    #[test]
    fn test_rank_and_duration() {
        assert_eq!(ValueShape::Rank.find("行业排名 游戏 #3"), Some("#3"));
        assert!(ValueShape::Rank.is_whole("#1,234"));
        assert!(!ValueShape::Rank.is_whole("#"));
        assert_eq!(ValueShape::Duration.find("00:12:04"), Some("00:12:04"));
        assert_eq!(ValueShape::Duration.find("12:04"), None);
    }

    #[test]
    fn test_domain_predicate() {
        assert!(is_domain("a.com"));
        assert!(is_domain("www.nexusmods.com"));
        assert!(is_domain("nexusmods.com(2)"));
        assert!(!is_domain("Shopping"));
        assert!(!is_domain("1 2 3"));
        assert!(!is_domain("#12"));
        assert!(!is_domain("3.4%"));
        assert!(!is_domain("a.c"));
    }

    #[test]
    fn test_numbers_with_dots_are_not_domains() {
        assert!(!is_domain("1.2M"));
        assert!(!is_domain("3.4"));
        assert!(!is_domain("892.4K"));
    }

    #[test]
    fn test_normalize_change() {
        assert_eq!(normalize_change("5.2%"), "+5.2%");
        assert_eq!(normalize_change("+2.1%"), "+2.1%");
        assert_eq!(normalize_change("-1.1%"), "-1.1%");
        assert_eq!(normalize_change("+ 2.1%"), "+2.1%");
        assert_eq!(normalize_change(SENTINEL), SENTINEL);
    }
}
