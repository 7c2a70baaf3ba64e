//! Single-value overview metrics.

use std::sync::LazyLock;

use regex::Regex;
use sitedump_core::{Engagement, Ranks, SENTINEL, ValueShape, normalize_change};
use tracing::debug;

use super::{OverviewParser, keywords};
use crate::scan::{Anchor, window_find, window_find_last, window_value};

static MONTH_OVER_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((?:[+-]\s*)?[0-9][0-9,.]*%)\s*自上个月").expect("static regex must compile")
});

static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Z][a-z]{2}\s+[0-9]{4}\s*-\s*[A-Z][a-z]{2}\s+[0-9]{4}")
        .expect("static regex must compile")
});

static COUNTRY_RANK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"国家/地区排名\s*(.+?)\s*#[0-9][0-9,]*").expect("static regex must compile")
});

/// Values read from the window after the total-visits label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct VisitTrend {
    pub visits: String,
    pub change: String,
    pub time_range: String,
}

impl OverviewParser<'_> {
    /// The first long prose line near the `Join ` call to action, or near the
    /// domain when no call to action was captured.
    pub(super) fn site_description(&self) -> String {
        let anchor = self
            .find(Anchor::Contains(keywords::DESCRIPTION), 0)
            .or_else(|| {
                (!self.domain.is_empty())
                    .then(|| self.find(Anchor::Contains(self.domain), 0))
                    .flatten()
            });
        let Some(anchor) = anchor else {
            return SENTINEL.to_string();
        };

        let start = anchor.saturating_sub(2);
        let end = anchor.saturating_add(5).min(self.lines.len());
        (start..end)
            .filter_map(|index| self.lines.get(index))
            .find(|line| {
                line.chars().count() > self.thresholds.description_min_chars
                    && !line.contains(keywords::DESCRIPTION_BRAND)
                    && !line.starts_with('#')
            })
            .unwrap_or(SENTINEL)
            .to_string()
    }

    /// Total visits, its month-over-month change and the reporting period.
    /// When the window holds several candidates of a kind, the last wins.
    pub(super) fn total_visits(&self) -> VisitTrend {
        let anchor = self.find(Anchor::Exact(keywords::TOTAL_VISITS), 0);
        let window = self.thresholds.trend_window;

        let visits = window_find_last(self.lines, anchor, window, |line| {
            ValueShape::Volume.is_whole(line).then_some(line)
        });
        let change = window_find_last(self.lines, anchor, window, |line| {
            MONTH_OVER_MONTH
                .captures(line)
                .and_then(|captures| captures.get(1))
                .map(|found| found.as_str())
        });
        let time_range = window_find_last(self.lines, anchor, window, |line| {
            TIME_RANGE.find(line).map(|found| found.as_str())
        });

        VisitTrend {
            visits: visits.unwrap_or(SENTINEL).to_string(),
            change: change.map_or_else(|| SENTINEL.to_string(), normalize_change),
            time_range: time_range.unwrap_or(SENTINEL).to_string(),
        }
    }

    /// Device share: the percentage on the device label line, or shortly
    /// after it.
    pub(super) fn device_share(&self, device: &str) -> String {
        let anchor = self.find(Anchor::Contains(device), 0);
        self.inline_or_window(anchor, ValueShape::Percent, self.thresholds.pair_window)
    }

    pub(super) fn ranks(&self) -> Ranks {
        let mut ranks = Ranks::default();

        let global = self.find(Anchor::Contains(keywords::GLOBAL_RANK), 0);
        ranks.global = self.rank_near(global);

        if let Some(index) = self.find(Anchor::Contains(keywords::COUNTRY_RANK), 0) {
            ranks.country = self.rank_near(Some(index));
            ranks.country_name = self.lines.get(index).map_or_else(
                || SENTINEL.to_string(),
                |line| country_name(line, &ranks.country),
            );
        }

        if let Some(index) = self.find(Anchor::Contains(keywords::INDUSTRY_RANK), 0) {
            ranks.industry = self.rank_near(Some(index));
            ranks.industry_name = self.lines.get(index).map_or_else(
                || SENTINEL.to_string(),
                |line| industry_name(line, &ranks.industry),
            );
        }

        debug!(global = %ranks.global, country = %ranks.country, industry = %ranks.industry, "Ranks");
        ranks
    }

    pub(super) fn engagement(&self) -> Engagement {
        let Some(section) = self.find(Anchor::Exact(keywords::ENGAGEMENT), 0) else {
            return Engagement::default();
        };
        let value = |keyword: &str, shape: ValueShape| {
            let anchor = self.find(Anchor::Contains(keyword), section);
            window_value(self.lines, anchor, self.thresholds.value_window, shape)
        };

        Engagement {
            monthly_visits: value(keywords::MONTHLY_VISITS, ValueShape::Quantity),
            unique_visitors: value(keywords::UNIQUE_VISITORS, ValueShape::Quantity),
            deduplicated_audience: value(keywords::DEDUPLICATED_AUDIENCE, ValueShape::Quantity),
            visit_duration: value(keywords::VISIT_DURATION, ValueShape::Duration),
            pages_per_visit: value(keywords::PAGES_PER_VISIT, ValueShape::Number),
            bounce_rate: value(keywords::BOUNCE_RATE, ValueShape::Percent),
        }
    }

    /// A rank on the label line itself, else the first rank in the following
    /// lines that is not another rank label.
    fn rank_near(&self, anchor: Option<usize>) -> String {
        let Some(index) = anchor else {
            return SENTINEL.to_string();
        };
        if let Some(rank) = self.lines.get(index).and_then(|line| ValueShape::Rank.find(line)) {
            return rank.to_string();
        }
        window_find(self.lines, anchor, self.thresholds.pair_window, |line| {
            if line.contains(keywords::RANK_LABEL) {
                None
            } else {
                ValueShape::Rank.find(line)
            }
        })
        .unwrap_or(SENTINEL)
        .to_string()
    }

    pub(super) fn inline_or_window(
        &self,
        anchor: Option<usize>,
        shape: ValueShape,
        window: usize,
    ) -> String {
        let inline = anchor
            .and_then(|index| self.lines.get(index))
            .and_then(|line| shape.find(line));
        match inline {
            Some(value) => value.to_string(),
            None => window_value(self.lines, anchor, window, shape),
        }
    }
}

/// Country name between the label and the rank, e.g. `美国` in
/// `国家/地区排名 美国 #82`.
fn country_name(line: &str, rank: &str) -> String {
    if let Some(name) = COUNTRY_RANK
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|found| found.as_str().trim())
        .filter(|name| !name.is_empty())
    {
        return name.to_string();
    }
    leftover_label(line, keywords::COUNTRY_RANK, rank)
}

/// Industry name from the rank line. Category paths keep only their last
/// segment: `Games/Video Games` yields `Video Games`.
fn industry_name(line: &str, rank: &str) -> String {
    let leftover = leftover_label(line, keywords::INDUSTRY_RANK, rank);
    if leftover == SENTINEL {
        return leftover;
    }
    match leftover.rsplit_once('/') {
        Some((_, last)) if !last.trim().is_empty() => last.trim().to_string(),
        _ => leftover,
    }
}

fn leftover_label(line: &str, label: &str, rank: &str) -> String {
    let mut rest = line.replacen(label, "", 1);
    if rank != SENTINEL {
        rest = rest.replacen(rank, "", 1);
    }
    let rest = rest.trim();
    if rest.is_empty() {
        SENTINEL.to_string()
    } else {
        rest.to_string()
    }
}
