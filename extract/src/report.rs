//! Structured extraction reporting.
//!
//! A report lists which fields fell back to the sentinel so degraded runs are
//! visible without reading the rendered document.

use serde::{Deserialize, Serialize};
use sitedump_core::{DocumentKind, Overview, REFERRAL_COLUMNS, ReferralTable, is_found};

/// Per-document extraction report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub document: DocumentKind,
    /// Subject domain, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Non-empty input lines scanned.
    pub line_count: usize,
    /// Table rows extracted (referrals) or overview table rows in total.
    pub rows: usize,
    /// Fields that stayed at the sentinel or tables that stayed empty.
    pub missing_fields: Vec<String>,
    /// Referrals cells padded with the sentinel.
    #[serde(default)]
    pub sentinel_cells: usize,
}

impl ExtractionReport {
    /// Builds the report for an extracted overview.
    pub fn for_overview(overview: &Overview, line_count: usize) -> Self {
        let scalars = [
            ("time_range", &overview.time_range),
            ("site_description", &overview.site_description),
            ("traffic.total_visits", &overview.traffic.total_visits),
            ("traffic.total_visits_change", &overview.traffic.total_visits_change),
            ("traffic.desktop_share", &overview.traffic.desktop_share),
            ("traffic.mobile_share", &overview.traffic.mobile_share),
            ("ranks.global", &overview.ranks.global),
            ("ranks.country", &overview.ranks.country),
            ("ranks.industry", &overview.ranks.industry),
            ("engagement.monthly_visits", &overview.engagement.monthly_visits),
            ("engagement.unique_visitors", &overview.engagement.unique_visitors),
            (
                "engagement.deduplicated_audience",
                &overview.engagement.deduplicated_audience,
            ),
            ("engagement.visit_duration", &overview.engagement.visit_duration),
            ("engagement.pages_per_visit", &overview.engagement.pages_per_visit),
            ("engagement.bounce_rate", &overview.engagement.bounce_rate),
            ("organic.share", &overview.organic.share),
            ("organic.brand_share", &overview.organic.brand_share),
            ("organic.non_brand_share", &overview.organic.non_brand_share),
        ];
        let tables = [
            ("competitors", overview.competitors.len()),
            ("geography", overview.geography.len()),
            ("channels", overview.channels.len()),
            ("search_terms", overview.search_terms.len()),
            ("top_referrals", overview.top_referrals.len()),
            ("referral_industries", overview.referral_industries.len()),
            ("social", overview.social.len()),
            ("display_ads", overview.display_ads.len()),
        ];

        let mut missing_fields: Vec<String> = scalars
            .iter()
            .filter(|(_, value)| !is_found(value))
            .map(|(name, _)| (*name).to_string())
            .collect();
        missing_fields.extend(
            tables
                .iter()
                .filter(|(_, len)| *len == 0)
                .map(|(name, _)| (*name).to_string()),
        );

        Self {
            document: DocumentKind::Overview,
            domain: Some(overview.domain.clone()),
            line_count,
            rows: tables.iter().map(|(_, len)| len).sum(),
            missing_fields,
            sentinel_cells: 0,
        }
    }

    /// Builds the report for an extracted referrals table. A column is
    /// missing when every one of its cells is the sentinel.
    pub fn for_referrals(table: &ReferralTable, domain: Option<&str>, line_count: usize) -> Self {
        let columns: Vec<Vec<&str>> = table
            .rows
            .iter()
            .map(|row| {
                vec![
                    row.industry.as_str(),
                    row.global_rank.as_str(),
                    row.traffic_absolute.as_str(),
                    row.traffic_percent.as_str(),
                    row.change.as_str(),
                ]
            })
            .collect();

        let mut missing_fields = Vec::new();
        let mut sentinel_cells = 0;
        // Skip row_index and domain; neither can be padded.
        for (position, name) in REFERRAL_COLUMNS.iter().skip(2).enumerate() {
            let padded = columns
                .iter()
                .filter(|cells| !is_found(cells[position]))
                .count();
            sentinel_cells += padded;
            if !columns.is_empty() && padded == columns.len() {
                missing_fields.push((*name).to_string());
            }
        }

        Self {
            document: DocumentKind::Referrals,
            domain: domain.map(str::to_string),
            line_count,
            rows: table.len(),
            missing_fields,
            sentinel_cells,
        }
    }

    /// Number of degraded fields.
    pub fn missing_count(&self) -> usize {
        self.missing_fields.len()
    }

    /// One-line summary for terminal output.
    pub fn summary(&self) -> String {
        match self.document {
            DocumentKind::Overview => {
                format!("{} field(s) missing", self.missing_count())
            }
            DocumentKind::Referrals => format!(
                "Total rows: {} ({} padded cell(s))",
                self.rows, self.sentinel_cells
            ),
        }
    }
}
