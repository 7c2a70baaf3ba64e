//! Structured data recovery from flattened analytics page dumps.
//!
//! A captured page is a sequence of visible text lines with every table
//! flattened column by column and every label separated from its value. This
//! crate rebuilds two documents from such dumps:
//!
//! - [`extract_overview`]: the site overview (traffic, ranks, engagement,
//!   geography, channels, search, referrals, social, display ads).
//! - [`extract_referrals`]: the incoming referrals table.
//!
//! Missing fields degrade to the sentinel `"-"`. Only a referrals dump with
//! no table header or no domain rows is an error.
//!
//! # Example
//!
//! ```
//! use sitedump_extract::extract_referrals;
//!
//! let raw = "域 (50)\n1 2 3\na.com\nb.net\nShopping\nNews\n#12\n-\n\
//!            1.2M\n3.4%\n500K\n1.1%\n+2.1%\n-0.3%\n";
//! let table = extract_referrals(raw).unwrap();
//! assert_eq!(table.rows.len(), 2);
//! assert_eq!(table.rows[1].global_rank, "-");
//! assert_eq!(table.rows[1].change, "-0.3%");
//! ```
//!
//! Lower-level building blocks live in [`scan`] (anchor lookup, windowed
//! values, column recovery) and [`config`] (scan thresholds).

pub mod config;
pub mod error;
pub mod output;
pub mod overview;
pub mod referrals;
pub mod report;
pub mod scan;

use sitedump_core::{LineSequence, Overview, ReferralTable};
use tracing::debug;

use config::Thresholds;
use error::Result;
use overview::OverviewParser;
use report::ExtractionReport;

/// An extracted overview with its report.
#[derive(Debug, Clone)]
pub struct OverviewRun {
    pub overview: Overview,
    pub report: ExtractionReport,
}

/// An extracted referrals table with its report.
#[derive(Debug, Clone)]
pub struct ReferralRun {
    pub table: ReferralTable,
    pub report: ExtractionReport,
}

/// Extracts the overview of `domain` from a raw dump with default
/// thresholds.
///
/// # Examples
///
/// ```
/// use sitedump_extract::extract_overview;
///
/// let overview = extract_overview("example.com", "总访问量\n5.2M\n+3.1% 自上个月\n");
/// assert_eq!(overview.traffic.total_visits, "5.2M");
/// assert_eq!(overview.traffic.total_visits_change, "+3.1%");
/// assert_eq!(overview.ranks.global, "-");
/// ```
pub fn extract_overview(domain: &str, raw: &str) -> Overview {
    extract_overview_with(domain, raw, &Thresholds::default()).overview
}

/// Extracts an overview with explicit thresholds, reporting which fields
/// fell back to the sentinel.
pub fn extract_overview_with(domain: &str, raw: &str, thresholds: &Thresholds) -> OverviewRun {
    let lines = LineSequence::from_raw(raw);
    let overview = OverviewParser::new(&lines, domain, thresholds).parse();
    let report = ExtractionReport::for_overview(&overview, lines.len());
    debug!(
        domain,
        missing = report.missing_count(),
        "Overview extraction finished"
    );
    OverviewRun { overview, report }
}

/// Extracts the referrals table from a raw dump with default thresholds.
///
/// # Errors
///
/// Fails when the dump has no table header or no domain rows after it.
pub fn extract_referrals(raw: &str) -> Result<ReferralTable> {
    extract_referrals_with(raw, None, &Thresholds::default()).map(|run| run.table)
}

/// Extracts the referrals table with explicit thresholds.
///
/// `domain` is the subject site, recorded in the report only.
pub fn extract_referrals_with(
    raw: &str,
    domain: Option<&str>,
    thresholds: &Thresholds,
) -> Result<ReferralRun> {
    let lines = LineSequence::from_raw(raw);
    let table = referrals::reconstruct_referrals(&lines, thresholds)?;
    let table = ReferralTable::from_table(&table);
    let report = ExtractionReport::for_referrals(&table, domain, lines.len());
    debug!(
        rows = table.len(),
        padded = report.sentinel_cells,
        "Referrals extraction finished"
    );
    Ok(ReferralRun { table, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;

    #[test]
    fn test_extract_referrals_reference_rows() {
        let raw = "域 (50)\n1 2 3\na.com\nb.net\nShopping\nNews\n#12\n-\n1.2M\n3.4%\n500K\n1.1%\n+2.1%\n-0.3%\n";
        let run = extract_referrals_with(raw, Some("example.com"), &Thresholds::default()).unwrap();

        let first = &run.table.rows[0];
        assert_eq!(first.row_index, 1);
        assert_eq!(first.domain, "a.com");
        assert_eq!(first.industry, "Shopping");
        assert_eq!(first.global_rank, "#12");
        assert_eq!(first.traffic_absolute, "1.2M");
        assert_eq!(first.traffic_percent, "3.4%");
        assert_eq!(first.change, "+2.1%");
        assert_eq!(run.report.rows, 2);
        assert_eq!(run.report.line_count, 14);
        assert_eq!(run.report.domain.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_extract_referrals_without_header() {
        let err = extract_referrals("a.com\nb.net\n").unwrap_err();
        assert_eq!(err, ExtractError::MissingTableHeader);
    }

    #[test]
    fn test_extract_overview_report() {
        let run = extract_overview_with(
            "example.com",
            "总访问量\r\n5.2M\r\n+3.1% 自上个月\r\n",
            &Thresholds::default(),
        );
        assert_eq!(run.overview.traffic.total_visits, "5.2M");
        assert_eq!(run.report.line_count, 3);
        assert!(!run.report.missing_fields.contains(&"traffic.total_visits".to_string()));
        assert!(run.report.missing_fields.contains(&"ranks.global".to_string()));
    }
}
