//! Extracted document types.
//!
//! Two document shapes are recovered from page dumps: the site
//! [`Overview`] and the [`ReferralTable`]. Every scalar is a string cell;
//! anything the extractor could not find holds [`SENTINEL`].

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Placeholder for a value that was not found or does not apply.
pub const SENTINEL: &str = "-";

/// Column names of the referrals table, in output order.
pub const REFERRAL_COLUMNS: [&str; 7] = [
    "row_index",
    "domain",
    "industry",
    "global_rank",
    "traffic_absolute",
    "traffic_percent",
    "change",
];

/// Returns `true` unless `value` is the sentinel.
pub fn is_found(value: &str) -> bool {
    value != SENTINEL
}

fn sentinel() -> String {
    SENTINEL.to_string()
}

/// The two page shapes a dump can come from.
///
/// # Examples
///
/// ```
/// use sitedump_core::DocumentKind;
///
/// let url = DocumentKind::Overview.report_url("example.com");
/// assert!(url.ends_with("key=example.com"));
/// assert_eq!(DocumentKind::Referrals.file_stem(), "referrals_incoming");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Website performance overview page.
    Overview,
    /// Incoming referrals table page.
    Referrals,
}

impl DocumentKind {
    /// Report URL the page dump for `domain` is captured from.
    pub fn report_url(self, domain: &str) -> String {
        match self {
            Self::Overview => format!(
                "https://pro.similarweb.com/#/digitalsuite/websiteanalysis/overview/website-performance/*/999/3m?webSource=Total&key={domain}"
            ),
            Self::Referrals => format!(
                "https://pro.similarweb.com/#/digitalsuite/websiteanalysis/referrals/*/999/3m?webSource=Total&selectedTab=incomingTraffic&key={domain}"
            ),
        }
    }

    /// Default output file name without extension.
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Referrals => "referrals_incoming",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overview => write!(f, "overview"),
            Self::Referrals => write!(f, "referrals"),
        }
    }
}

/// A `(label, value)` pair, e.g. a channel and its traffic share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: String,
}

impl LabeledValue {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A `(label, share, change)` row, e.g. a country with its traffic share and
/// month-over-month delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRow {
    pub label: String,
    pub share: String,
    pub change: String,
}

impl ShareRow {
    pub fn new(label: impl Into<String>, share: impl Into<String>, change: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            share: share.into(),
            change: change.into(),
        }
    }
}

/// Aggregate visits and device split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSummary {
    pub total_visits: String,
    pub total_visits_change: String,
    pub desktop_share: String,
    pub mobile_share: String,
}

impl Default for TrafficSummary {
    fn default() -> Self {
        Self {
            total_visits: sentinel(),
            total_visits_change: sentinel(),
            desktop_share: sentinel(),
            mobile_share: sentinel(),
        }
    }
}

impl TrafficSummary {
    pub fn is_empty(&self) -> bool {
        [
            &self.total_visits,
            &self.total_visits_change,
            &self.desktop_share,
            &self.mobile_share,
        ]
        .iter()
        .all(|value| !is_found(value))
    }
}

/// Global, country and industry ranks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranks {
    pub global: String,
    pub country: String,
    pub country_name: String,
    pub industry: String,
    pub industry_name: String,
}

impl Default for Ranks {
    fn default() -> Self {
        Self {
            global: sentinel(),
            country: sentinel(),
            country_name: sentinel(),
            industry: sentinel(),
            industry_name: sentinel(),
        }
    }
}

impl Ranks {
    pub fn is_empty(&self) -> bool {
        [&self.global, &self.country, &self.industry]
            .iter()
            .all(|value| !is_found(value))
    }
}

/// The six engagement statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub monthly_visits: String,
    pub unique_visitors: String,
    pub deduplicated_audience: String,
    pub visit_duration: String,
    pub pages_per_visit: String,
    pub bounce_rate: String,
}

impl Default for Engagement {
    fn default() -> Self {
        Self {
            monthly_visits: sentinel(),
            unique_visitors: sentinel(),
            deduplicated_audience: sentinel(),
            visit_duration: sentinel(),
            pages_per_visit: sentinel(),
            bounce_rate: sentinel(),
        }
    }
}

impl Engagement {
    pub fn is_empty(&self) -> bool {
        [
            &self.monthly_visits,
            &self.unique_visitors,
            &self.deduplicated_audience,
            &self.visit_duration,
            &self.pages_per_visit,
            &self.bounce_rate,
        ]
        .iter()
        .all(|value| !is_found(value))
    }
}

/// Organic search share and its brand split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganicSearch {
    pub share: String,
    pub brand_share: String,
    pub non_brand_share: String,
}

impl Default for OrganicSearch {
    fn default() -> Self {
        Self {
            share: sentinel(),
            brand_share: sentinel(),
            non_brand_share: sentinel(),
        }
    }
}

impl OrganicSearch {
    pub fn is_empty(&self) -> bool {
        [&self.share, &self.brand_share, &self.non_brand_share]
            .iter()
            .all(|value| !is_found(value))
    }
}

/// Every field recovered from an overview page.
///
/// Scalars default to [`SENTINEL`]; tables default to empty and stay empty
/// when their anchor is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    pub domain: String,
    pub time_range: String,
    pub site_description: String,
    pub traffic: TrafficSummary,
    pub ranks: Ranks,
    pub engagement: Engagement,
    pub competitors: Vec<LabeledValue>,
    pub geography: Vec<ShareRow>,
    pub channels: Vec<LabeledValue>,
    pub organic: OrganicSearch,
    pub search_terms: Vec<ShareRow>,
    pub top_referrals: Vec<ShareRow>,
    pub referral_industries: Vec<LabeledValue>,
    pub social: Vec<LabeledValue>,
    pub display_ads: Vec<ShareRow>,
}

impl Overview {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            time_range: sentinel(),
            site_description: sentinel(),
            traffic: TrafficSummary::default(),
            ranks: Ranks::default(),
            engagement: Engagement::default(),
            competitors: Vec::new(),
            geography: Vec::new(),
            channels: Vec::new(),
            organic: OrganicSearch::default(),
            search_terms: Vec::new(),
            top_referrals: Vec::new(),
            referral_industries: Vec::new(),
            social: Vec::new(),
            display_ads: Vec::new(),
        }
    }

    /// Looks up the traffic share of a channel by its label.
    pub fn channel_share(&self, name: &str) -> Option<&str> {
        self.channels
            .iter()
            .find(|channel| channel.label == name)
            .map(|channel| channel.value.as_str())
    }
}

/// One row of the incoming referrals table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralRow {
    pub row_index: usize,
    pub domain: String,
    pub industry: String,
    pub global_rank: String,
    pub traffic_absolute: String,
    pub traffic_percent: String,
    pub change: String,
}

/// The incoming referrals table, one row per recovered domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralTable {
    pub rows: Vec<ReferralRow>,
}

impl ReferralTable {
    /// Converts an assembled table whose columns follow
    /// [`REFERRAL_COLUMNS`] (without `row_index`).
    pub fn from_table(table: &Table) -> Self {
        let rows = table
            .records()
            .map(|record| ReferralRow {
                row_index: record.index,
                domain: record.cell(0).to_string(),
                industry: record.cell(1).to_string(),
                global_rank: record.cell(2).to_string(),
                traffic_absolute: record.cell(3).to_string(),
                traffic_percent: record.cell(4).to_string(),
                change: record.cell(5).to_string(),
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
