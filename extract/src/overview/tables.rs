//! Row-oriented overview sections.
//!
//! Each table is scanned from its anchor for at most `section_span` lines and
//! `row_cap` rows, stopping early at the heading of the next section.

use std::sync::LazyLock;

use regex::Regex;
use sitedump_core::{
    LabeledValue, OrganicSearch, Overview, SENTINEL, ShareRow, ValueShape, is_domain,
    normalize_change,
};
use tracing::debug;

use super::{OverviewParser, keywords};
use crate::scan::{Anchor, locate_either, window_find, window_position};

// ASCII word characters only, so column headings such as `搜索词` never pass.
static SEARCH_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\s/-]+$").expect("static regex must compile"));

impl OverviewParser<'_> {
    /// Competitor domains with their visit volumes.
    pub(super) fn competitors(&self) -> Vec<LabeledValue> {
        let Some(anchor) = self.find(Anchor::Contains(keywords::COMPETITORS), 0) else {
            return Vec::new();
        };
        let stops = [
            Anchor::Exact(keywords::GEOGRAPHY_HEADING),
            Anchor::Contains(keywords::TOP_COUNTRIES),
        ];
        self.scan_rows(anchor + 1, self.thresholds.section_span, &stops, |index, line| {
            if !is_domain(line) {
                return None;
            }
            let visits = window_find(self.lines, Some(index), self.thresholds.pair_window, |next| {
                if is_domain(next) {
                    None
                } else {
                    ValueShape::Quantity.find(next)
                }
            });
            Some(LabeledValue::new(line, visits.unwrap_or(SENTINEL)))
        })
    }

    /// Countries with traffic share and month-over-month delta.
    pub(super) fn geography(&self) -> Vec<ShareRow> {
        let Some(anchor) = self.find(Anchor::Contains(keywords::GEOGRAPHY), 0) else {
            return Vec::new();
        };
        let stops = [
            Anchor::Contains(keywords::TRAFFIC_SOURCES),
            Anchor::Contains(keywords::CHANNELS),
        ];
        self.scan_rows(anchor + 1, self.thresholds.section_span, &stops, |index, line| {
            let label = self.label_before(anchor, index)?;
            let mut percents = ValueShape::SignedPercent.find_iter(line);
            let share = percents.next()?;
            let change = percents.next().map_or_else(|| SENTINEL.to_string(), normalize_change);
            Some(ShareRow::new(label, share, change))
        })
    }

    /// The seven traffic channels in fixed order. Channels are looked up from
    /// the channel overview heading when it was captured, else from the top.
    /// A channel line starts with the channel name, so headings such as
    /// `社交流量` are not mistaken for it.
    pub(super) fn channels(&self) -> Vec<LabeledValue> {
        let section = self.find(Anchor::Contains(keywords::CHANNELS), 0);
        keywords::CHANNEL_NAMES
            .iter()
            .filter_map(|&name| {
                let anchor = section
                    .and_then(|from| self.find(Anchor::Leading(name), from))
                    .or_else(|| self.find(Anchor::Leading(name), 0))?;
                let share =
                    self.inline_or_window(Some(anchor), ValueShape::Percent, self.thresholds.pair_window);
                Some(LabeledValue::new(name, share))
            })
            .collect()
    }

    /// Organic search share with its brand and non-brand split.
    pub(super) fn organic(&self, overview: &Overview) -> OrganicSearch {
        let mut organic = OrganicSearch::default();
        if let Some(share) = overview.channel_share(keywords::ORGANIC_CHANNEL) {
            organic.share = share.to_string();
        }

        let Some(anchor) = self.find(Anchor::Contains(keywords::ORGANIC_SEARCH), 0) else {
            return organic;
        };
        let end = anchor
            .saturating_add(self.thresholds.breakdown_span)
            .min(self.lines.len());
        for line in (anchor..end).filter_map(|index| self.lines.get(index)) {
            let Some(share) = ValueShape::Percent.find(line) else {
                continue;
            };
            if line.contains(keywords::NON_BRAND) {
                if organic.non_brand_share == SENTINEL {
                    organic.non_brand_share = share.to_string();
                }
            } else if line.contains(keywords::BRAND) && organic.brand_share == SENTINEL {
                organic.brand_share = share.to_string();
            }
        }
        organic
    }

    /// Top organic search terms with share and change.
    pub(super) fn search_terms(&self) -> Vec<ShareRow> {
        let Some(anchor) = locate_either(
            self.lines,
            Anchor::Contains(keywords::SEARCH_TERMS),
            Anchor::Contains(keywords::SEARCH_TERMS_FALLBACK),
            0,
        ) else {
            debug!("Search terms section not found");
            return Vec::new();
        };
        let stops = [Anchor::Contains(keywords::PAID_SEARCH)];
        self.scan_rows(anchor + 1, self.thresholds.section_span, &stops, |index, line| {
            if !self.is_search_term(line) {
                return None;
            }
            let (share, change) = self.share_and_change(index)?;
            Some(ShareRow::new(line, share, change))
        })
    }

    /// Top referring sites with share and change.
    pub(super) fn top_referrals(&self) -> Vec<ShareRow> {
        self.domain_share_rows(
            keywords::TOP_REFERRALS,
            &[Anchor::Contains(keywords::REFERRAL_INDUSTRIES)],
        )
    }

    /// Industries of the referring sites with their share.
    pub(super) fn referral_industries(&self) -> Vec<LabeledValue> {
        let Some(anchor) = self.find(Anchor::Contains(keywords::REFERRAL_INDUSTRIES), 0) else {
            return Vec::new();
        };
        let stops = [Anchor::Contains(keywords::OUTGOING)];
        self.scan_rows(anchor + 1, self.thresholds.section_span, &stops, |index, line| {
            let label = self.label_before(anchor, index)?;
            let share = ValueShape::Percent.find(line)?;
            Some(LabeledValue::new(label, share))
        })
    }

    /// Social platforms with their share of social traffic. A line names at
    /// most one platform and each platform is reported once. Platform names
    /// match regardless of ASCII case; the page writes `Youtube`.
    pub(super) fn social(&self) -> Vec<LabeledValue> {
        let Some(anchor) = self.find(Anchor::Contains(keywords::SOCIAL), 0) else {
            return Vec::new();
        };
        let stops = [Anchor::Contains(keywords::DISPLAY_ADS_CHANNEL)];
        let mut seen: Vec<&str> = Vec::new();
        self.scan_rows(anchor, self.thresholds.platform_span, &stops, |index, line| {
            let folded = line.to_ascii_lowercase();
            let platform = keywords::SOCIAL_PLATFORMS
                .iter()
                .copied()
                .find(|platform| folded.contains(&platform.to_ascii_lowercase()))?;
            if seen.contains(&platform) {
                return None;
            }
            let share =
                self.inline_or_window(Some(index), ValueShape::Percent, self.thresholds.pair_window);
            if share == SENTINEL {
                return None;
            }
            seen.push(platform);
            Some(LabeledValue::new(platform, share))
        })
    }

    /// Top display advertising publishers with share and change.
    pub(super) fn display_ads(&self) -> Vec<ShareRow> {
        self.domain_share_rows(keywords::DISPLAY_PUBLISHERS, &[])
    }

    /// Walks `span` lines from `start`, collecting up to `row_cap` rows.
    /// Stop lines end the scan after they are offered to `row_at`.
    fn scan_rows<T>(
        &self,
        start: usize,
        span: usize,
        stops: &[Anchor<'_>],
        mut row_at: impl FnMut(usize, &str) -> Option<T>,
    ) -> Vec<T> {
        let end = start.saturating_add(span).min(self.lines.len());
        let mut rows = Vec::new();
        for index in start..end {
            let Some(line) = self.lines.get(index) else {
                break;
            };
            if let Some(row) = row_at(index, line) {
                rows.push(row);
            }
            if rows.len() >= self.thresholds.row_cap {
                break;
            }
            if let Some(stop) = stops.iter().find(|stop| stop.matches(line)) {
                debug!(?stop, index, rows = rows.len(), "Section ended");
                break;
            }
        }
        rows
    }

    fn domain_share_rows(&self, heading: &str, stops: &[Anchor<'_>]) -> Vec<ShareRow> {
        let Some(anchor) = self.find(Anchor::Contains(heading), 0) else {
            return Vec::new();
        };
        self.scan_rows(anchor + 1, self.thresholds.section_span, stops, |index, line| {
            if !is_domain(line) {
                return None;
            }
            let (share, change) = self.share_and_change(index)?;
            Some(ShareRow::new(line, share, change))
        })
    }

    /// Share is the first percentage within `pair_window` lines after the
    /// label; change is the signed percentage on the line right after the
    /// share, if any.
    fn share_and_change(&self, label: usize) -> Option<(String, String)> {
        let (at, share) = window_position(self.lines, Some(label), self.thresholds.pair_window, |line| {
            ValueShape::Percent.find(line)
        })?;
        let change = self
            .lines
            .get(at + 1)
            .filter(|line| ValueShape::SignedPercent.is_whole(line))
            .map_or_else(|| SENTINEL.to_string(), normalize_change);
        Some((share.to_string(), change))
    }

    /// The label for a share line at `index`: the preceding line, when it
    /// lies after the section anchor, carries no numbers and is short.
    fn label_before(&self, anchor: usize, index: usize) -> Option<&str> {
        if index <= anchor + 1 {
            return None;
        }
        let label = self.lines.get(index - 1)?;
        let plausible = label != SENTINEL
            && ValueShape::Percent.find(label).is_none()
            && !ValueShape::Number.is_whole(label)
            && label.chars().count() <= self.thresholds.label_max_chars;
        plausible.then_some(label)
    }

    fn is_search_term(&self, line: &str) -> bool {
        SEARCH_TERM.is_match(line)
            && line.chars().any(char::is_alphanumeric)
            && line.chars().count() <= self.thresholds.term_max_chars
            && !line.starts_with(|ch: char| ch.is_ascii_digit())
            && !line.contains(keywords::TOP_MARKER)
            && !line.contains(keywords::PAID)
    }
}
