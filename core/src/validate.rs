//! Structural validation of extracted documents.
//!
//! Catches invariant violations such as gaps in row numbering, blank cells
//! that should hold the sentinel, or unnormalized change values before a
//! document is written out.
//!
//! # Examples
//!
//! ```
//! use sitedump_core::*;
//!
//! let table = ReferralTable {
//!     rows: vec![ReferralRow {
//!         row_index: 1,
//!         domain: "a.com".into(),
//!         industry: "Shopping".into(),
//!         global_rank: "#12".into(),
//!         traffic_absolute: "1.2M".into(),
//!         traffic_percent: "3.4%".into(),
//!         change: "+2.1%".into(),
//!     }],
//! };
//! assert!(validate_referrals(&table).is_empty());
//!
//! let mut bad = table.clone();
//! bad.rows[0].change = "2.1%".into();
//! assert!(!validate_referrals(&bad).is_empty());
//! ```

use thiserror::Error;

use crate::{Overview, ReferralTable, SENTINEL, ShareRow, is_domain};

/// Document validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Referrals table has no rows.
    #[error("referrals table has no rows")]
    EmptyTable,
    /// Row numbering is not `1..=n`.
    #[error("row {found} out of sequence, expected {expected}")]
    RowOutOfSequence { expected: usize, found: usize },
    /// A cell is blank instead of holding a value or the sentinel.
    #[error("blank cell in row {row}, column {column}")]
    BlankCell { row: usize, column: &'static str },
    /// Primary column cell is not domain-shaped.
    #[error("row {row} domain is not domain-shaped: {value}")]
    InvalidDomain { row: usize, value: String },
    /// Change cell is neither signed nor the sentinel.
    #[error("row {row} change is not normalized: {value}")]
    UnsignedChange { row: usize, value: String },
    /// Overview domain is empty.
    #[error("overview domain cannot be empty")]
    EmptyDomain,
    /// An overview table row has a blank label.
    #[error("blank label in overview section {0}")]
    BlankLabel(&'static str),
}

/// Validates a referrals table.
pub fn validate_referrals(table: &ReferralTable) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if table.is_empty() {
        errors.push(ValidationError::EmptyTable);
        return errors;
    }

    for (position, row) in table.rows.iter().enumerate() {
        let expected = position + 1;
        if row.row_index != expected {
            errors.push(ValidationError::RowOutOfSequence {
                expected,
                found: row.row_index,
            });
        }

        let cells = [
            ("domain", &row.domain),
            ("industry", &row.industry),
            ("global_rank", &row.global_rank),
            ("traffic_absolute", &row.traffic_absolute),
            ("traffic_percent", &row.traffic_percent),
            ("change", &row.change),
        ];
        for (column, value) in cells {
            if value.trim().is_empty() {
                errors.push(ValidationError::BlankCell {
                    row: row.row_index,
                    column,
                });
            }
        }

        if !is_domain(&row.domain) {
            errors.push(ValidationError::InvalidDomain {
                row: row.row_index,
                value: row.domain.clone(),
            });
        }

        if row.change != SENTINEL && row.change.starts_with(|ch: char| ch.is_ascii_digit()) {
            errors.push(ValidationError::UnsignedChange {
                row: row.row_index,
                value: row.change.clone(),
            });
        }
    }

    errors
}

/// Validates an overview document.
pub fn validate_overview(overview: &Overview) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if overview.domain.trim().is_empty() {
        errors.push(ValidationError::EmptyDomain);
    }

    let share_sections: [(&'static str, &[ShareRow]); 4] = [
        ("geography", &overview.geography),
        ("search_terms", &overview.search_terms),
        ("top_referrals", &overview.top_referrals),
        ("display_ads", &overview.display_ads),
    ];
    for (section, rows) in share_sections {
        if rows.iter().any(|row| row.label.trim().is_empty()) {
            errors.push(ValidationError::BlankLabel(section));
        }
    }

    let labeled_sections = [
        ("competitors", &overview.competitors),
        ("channels", &overview.channels),
        ("referral_industries", &overview.referral_industries),
        ("social", &overview.social),
    ];
    for (section, rows) in labeled_sections {
        if rows.iter().any(|row| row.label.trim().is_empty()) {
            errors.push(ValidationError::BlankLabel(section));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LabeledValue, ReferralRow};

    fn row(index: usize, domain: &str, change: &str) -> ReferralRow {
        ReferralRow {
            row_index: index,
            domain: domain.to_string(),
            industry: SENTINEL.to_string(),
            global_rank: SENTINEL.to_string(),
            traffic_absolute: SENTINEL.to_string(),
            traffic_percent: SENTINEL.to_string(),
            change: change.to_string(),
        }
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let errors = validate_referrals(&ReferralTable::default());
        assert_eq!(errors, vec![ValidationError::EmptyTable]);
    }

    #[test]
    fn test_sentinel_rows_are_valid() {
        let table = ReferralTable {
            rows: vec![row(1, "a.com", SENTINEL), row(2, "b.net", "-0.3%")],
        };
        assert!(validate_referrals(&table).is_empty());
    }

    #[test]
    fn test_out_of_sequence_rows() {
        let table = ReferralTable {
            rows: vec![row(1, "a.com", SENTINEL), row(3, "b.net", SENTINEL)],
        };
        let errors = validate_referrals(&table);
        assert!(errors.contains(&ValidationError::RowOutOfSequence {
            expected: 2,
            found: 3
        }));
    }

    #[test]
    fn test_blank_cell_and_bad_domain() {
        let mut bad = row(1, "Shopping", SENTINEL);
        bad.industry = String::new();
        let errors = validate_referrals(&ReferralTable { rows: vec![bad] });
        assert!(errors.iter().any(|e| matches!(e, ValidationError::BlankCell { column: "industry", .. })));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidDomain { .. })));
    }

    #[test]
    fn test_overview_blank_label() {
        let mut overview = Overview::new("example.com");
        overview.social.push(LabeledValue::new(" ", "3.0%"));
        assert_eq!(
            validate_overview(&overview),
            vec![ValidationError::BlankLabel("social")]
        );
        assert_eq!(
            validate_overview(&Overview::new("")),
            vec![ValidationError::EmptyDomain]
        );
    }
}
