//! Referrals table reconstruction.
//!
//! The incoming-referrals widget is dumped column by column with no
//! delimiters:
//!
//! ```text
//! 域 (1,204)          <- table header
//! 1 2 3 ... 100       <- row numbers
//! a.com               <- domain column
//! b.net(2)
//! Shopping            <- industry column
//! News
//! #12                 <- global rank column
//! -
//! 1.2M                <- traffic: absolute, percentage pairs
//! 3.4%
//! 500K
//! 1.1%
//! +2.1%               <- change column
//! -0.3%
//! ```
//!
//! The domain column is recovered first and fixes the row count; every later
//! column starts where the previous one stopped and is padded to that count.

use std::sync::LazyLock;

use regex::Regex;
use sitedump_core::{
    Column, LineSequence, SENTINEL, Table, ValueShape, is_domain, normalize_change,
    strip_counter_suffix,
};
use tracing::{debug, warn};

use crate::config::Thresholds;
use crate::error::{ExtractError, Result};
use crate::scan::{Anchor, ColumnScan, Verdict, locate, scan_run, scan_until};

static TABLE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^域\s*(\([0-9,]+\))?$").expect("static regex must compile")
});

static SEQUENCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1\s+2\s+3").expect("static regex must compile"));

/// Rebuilds the referrals table from a flattened dump.
///
/// # Errors
///
/// Returns [`ExtractError::MissingTableHeader`] when no `域` header line
/// exists and [`ExtractError::NoPrimaryRows`] when no domain follows it.
/// Every other gap is filled with the sentinel.
pub fn reconstruct_referrals(lines: &LineSequence, thresholds: &Thresholds) -> Result<Table> {
    let Some(header) = locate(lines, Anchor::Pattern(&TABLE_HEADER), 0) else {
        warn!(lines = lines.len(), "Referrals table header not found");
        return Err(ExtractError::MissingTableHeader);
    };

    let start = data_start(lines, header, thresholds);
    debug!(header, start, "Located referrals table");

    let domains = scan_run(lines, start, thresholds.miss_run, usize::MAX, domain_cell);
    if domains.is_empty() {
        warn!(header, start, "No domain rows after referrals table header");
        return Err(ExtractError::NoPrimaryRows {
            header_line: header,
        });
    }
    let rows = domains.len();

    let industries = industry_column(lines, domains.end, rows, thresholds);
    let ranks = scan_until(lines, industries.end, rows, rank_cell);
    let (absolute, percent) = traffic_columns(lines, ranks.end, rows);
    let changes = scan_until(lines, absolute.end, rows, change_cell);

    debug!(
        rows,
        industries = industries.len(),
        ranks = ranks.len(),
        traffic = absolute.len(),
        changes = changes.len(),
        "Reconstructed referrals columns"
    );

    Ok(Table::assemble(
        Column::new("domain", domains.values),
        vec![
            Column::new("industry", industries.values),
            Column::new("global_rank", ranks.values),
            Column::new("traffic_absolute", absolute.values),
            Column::new("traffic_percent", percent.values),
            Column::new("change", changes.values),
        ],
    ))
}

/// First data row: just past the `1 2 3` sequence line when one follows the
/// header closely, otherwise a fixed offset from the header.
fn data_start(lines: &LineSequence, header: usize, thresholds: &Thresholds) -> usize {
    let span_end = header.saturating_add(thresholds.sequence_span).min(lines.len());
    (header..span_end)
        .find(|&index| {
            lines
                .get(index)
                .is_some_and(|line| SEQUENCE_LINE.is_match(line))
        })
        .map_or(header + thresholds.fallback_offset, |index| index + 1)
}

fn domain_cell(line: &str) -> Option<String> {
    let cleaned = strip_counter_suffix(line);
    is_domain(cleaned).then(|| cleaned.to_string())
}

fn is_rank_or_sentinel(line: &str) -> bool {
    line == SENTINEL || ValueShape::Rank.is_whole(line)
}

fn is_industry_cell(line: &str, thresholds: &Thresholds) -> bool {
    let chars = line.chars().count();
    !is_domain(line)
        && !is_rank_or_sentinel(line)
        && !ValueShape::Quantity.is_whole(line)
        && !ValueShape::SignedPercent.is_whole(line)
        && (thresholds.cell_min_chars..=thresholds.cell_max_chars).contains(&chars)
}

fn industry_column(
    lines: &LineSequence,
    from: usize,
    rows: usize,
    thresholds: &Thresholds,
) -> ColumnScan {
    scan_until(lines, from, rows, |line| {
        if is_rank_or_sentinel(line) {
            Verdict::Stop
        } else if is_industry_cell(line, thresholds) {
            Verdict::Take(line.to_string())
        } else {
            Verdict::Skip
        }
    })
}

fn rank_cell(line: &str) -> Verdict {
    if is_rank_or_sentinel(line) {
        Verdict::Take(line.to_string())
    } else if ValueShape::Volume.starts(line) {
        Verdict::Stop
    } else {
        Verdict::Skip
    }
}

/// Collects `(absolute, percentage)` pairs. A volume whose next line is not a
/// percentage is paired with the sentinel and the next line is left for the
/// following iteration. The returned absolute scan carries the end index.
fn traffic_columns(lines: &LineSequence, from: usize, rows: usize) -> (ColumnScan, ColumnScan) {
    let mut absolute = Vec::new();
    let mut percent = Vec::new();
    let mut index = from;

    while absolute.len() < rows {
        let Some(line) = lines.get(index) else {
            break;
        };
        if ValueShape::Volume.is_whole(line) {
            absolute.push(line.to_string());
            match lines.get(index + 1) {
                Some(next) if ValueShape::Percent.is_whole(next) => {
                    percent.push(next.to_string());
                    index += 1;
                }
                _ => percent.push(SENTINEL.to_string()),
            }
        } else if ValueShape::SignedPercent.is_whole(line) {
            break;
        }
        index += 1;
    }

    let end = index.min(lines.len()).max(from);
    (
        ColumnScan {
            values: absolute,
            end,
        },
        ColumnScan {
            values: percent,
            end,
        },
    )
}

fn change_cell(line: &str) -> Verdict {
    if line == SENTINEL || ValueShape::SignedPercent.is_whole(line) {
        Verdict::Take(normalize_change(line))
    } else {
        Verdict::Skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> LineSequence {
        LineSequence::from_lines(raw)
    }

    fn cells(table: &Table, name: &str) -> Vec<String> {
        table.column(name).unwrap().cells.clone()
    }

    #[test]
    fn test_reference_dump() {
        let seq = lines(&[
            "域 (50)", "1 2 3", "a.com", "b.net", "Shopping", "News", "#12", "-", "1.2M",
            "3.4%", "500K", "1.1%", "+2.1%", "-0.3%",
        ]);
        let table = reconstruct_referrals(&seq, &Thresholds::default()).unwrap();

        assert_eq!(table.row_count(), 2);
        let first = table.record(0).unwrap();
        assert_eq!(
            first.cells,
            vec!["a.com", "Shopping", "#12", "1.2M", "3.4%", "+2.1%"]
        );
        let second = table.record(1).unwrap();
        assert_eq!(second.index, 2);
        assert_eq!(second.cells, vec!["b.net", "News", "-", "500K", "1.1%", "-0.3%"]);
    }

    #[test]
    fn test_missing_header_is_fatal() {
        let seq = lines(&["a.com", "b.net"]);
        let err = reconstruct_referrals(&seq, &Thresholds::default()).unwrap_err();
        assert_eq!(err, ExtractError::MissingTableHeader);
    }

    #[test]
    fn test_no_domains_is_fatal() {
        let seq = lines(&["域", "1 2 3", "Shopping", "#12", "1.2M"]);
        let err = reconstruct_referrals(&seq, &Thresholds::default()).unwrap_err();
        assert_eq!(err, ExtractError::NoPrimaryRows { header_line: 0 });
    }

    #[test]
    fn test_header_with_thousands_count() {
        let seq = lines(&["外链", "域 (1,204)", "1 2 3", "a.com", "Shopping", "#1", "9M", "4.5%", "3%"]);
        let table = reconstruct_referrals(&seq, &Thresholds::default()).unwrap();
        assert_eq!(cells(&table, "change"), vec!["+3%"]);
    }

    #[test]
    fn test_counter_suffix_is_stripped() {
        let seq = lines(&["域", "1 2 3", "nexusmods.com(2)", "Games", "#40", "9M", "4.5%", "-1%"]);
        let table = reconstruct_referrals(&seq, &Thresholds::default()).unwrap();
        assert_eq!(cells(&table, "domain"), vec!["nexusmods.com"]);
    }

    #[test]
    fn test_fallback_offset_without_sequence_line() {
        let seq = lines(&[
            "域", "网站", "行业", "排名", "流量份额", "变动", "筛选", "a.com", "Shopping", "#3",
            "1M", "2%", "+1%",
        ]);
        let table = reconstruct_referrals(&seq, &Thresholds::default()).unwrap();
        assert_eq!(cells(&table, "domain"), vec!["a.com"]);
        assert_eq!(cells(&table, "global_rank"), vec!["#3"]);
    }

    #[test]
    fn test_noise_inside_domain_column() {
        let seq = lines(&[
            "域", "1 2 3", "a.com", "广告", "b.net", "c.org", "News", "Games", "Shopping",
        ]);
        let table = reconstruct_referrals(&seq, &Thresholds::default()).unwrap();
        assert_eq!(cells(&table, "domain"), vec!["a.com", "b.net", "c.org"]);
        assert_eq!(cells(&table, "industry"), vec!["News", "Games", "Shopping"]);
    }

    #[test]
    fn test_short_columns_are_padded() {
        let seq = lines(&["域", "1 2 3", "a.com", "b.net", "c.org", "Shopping", "#5", "2M", "+4%"]);
        let table = reconstruct_referrals(&seq, &Thresholds::default()).unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(cells(&table, "industry"), vec!["Shopping", "-", "-"]);
        assert_eq!(cells(&table, "global_rank"), vec!["#5", "-", "-"]);
        assert_eq!(cells(&table, "traffic_absolute"), vec!["2M", "-", "-"]);
        assert_eq!(cells(&table, "traffic_percent"), vec!["-", "-", "-"]);
        assert_eq!(cells(&table, "change"), vec!["+4%", "-", "-"]);
    }

    #[test]
    fn test_volume_without_percentage_keeps_next_line() {
        let seq = lines(&[
            "域", "1 2 3", "a.com", "b.net", "Shopping", "News", "#1", "#2", "1M", "2M", "5%",
            "-2%", "+1%",
        ]);
        let table = reconstruct_referrals(&seq, &Thresholds::default()).unwrap();
        assert_eq!(cells(&table, "traffic_absolute"), vec!["1M", "2M"]);
        assert_eq!(cells(&table, "traffic_percent"), vec!["-", "5%"]);
        assert_eq!(cells(&table, "change"), vec!["-2%", "+1%"]);
    }

    #[test]
    fn test_industry_rejects_numbers_and_overlong_lines() {
        let long = "x".repeat(120);
        let seq = lines(&["域", "1 2 3", "a.com", "b.net", "1,204", long.as_str(), "Z", "Arts", "Games"]);
        let table = reconstruct_referrals(&seq, &Thresholds::default()).unwrap();
        assert_eq!(cells(&table, "industry"), vec!["Arts", "Games"]);
    }

    #[test]
    fn test_extra_cells_are_truncated() {
        let seq = lines(&[
            "域", "1 2 3", "a.com", "Shopping", "#1", "1M", "2%", "+1%", "+2%", "+3%",
        ]);
        let table = reconstruct_referrals(&seq, &Thresholds::default()).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(cells(&table, "change"), vec!["+1%"]);
    }
}
