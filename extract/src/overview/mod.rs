//! Overview page extraction.
//!
//! The overview dump is a long run of labels followed by their values. Each
//! metric is found by its anchor keyword, then either read from a short window
//! after the anchor (scalars) or collected row by row from a bounded span
//! (tables). A missing anchor leaves the sentinel or an empty table; nothing
//! here fails.
//!
//! The primary entry point is [`OverviewParser::new`] followed by
//! [`OverviewParser::parse`]; most callers use
//! [`extract_overview`](crate::extract_overview) instead.

mod scalars;
mod tables;

use sitedump_core::{LineSequence, Overview};
use tracing::debug;

use crate::config::Thresholds;
use crate::scan::{Anchor, locate};

/// Anchor keywords as they appear in the captured page.
pub(crate) mod keywords {
    pub const DESCRIPTION: &str = "Join ";
    pub const DESCRIPTION_BRAND: &str = "SimilarWeb";
    pub const TOTAL_VISITS: &str = "总访问量";
    pub const DESKTOP: &str = "Desktop";
    pub const MOBILE: &str = "Mobile Web";
    pub const GLOBAL_RANK: &str = "全球排名";
    pub const COUNTRY_RANK: &str = "国家/地区排名";
    pub const INDUSTRY_RANK: &str = "行业排名";
    pub const RANK_LABEL: &str = "排名";
    pub const ENGAGEMENT: &str = "参与度概览";
    pub const MONTHLY_VISITS: &str = "每月访问量";
    pub const UNIQUE_VISITORS: &str = "月独立访客数";
    pub const DEDUPLICATED_AUDIENCE: &str = "已消除重叠的受众";
    pub const VISIT_DURATION: &str = "访问持续时间";
    pub const PAGES_PER_VISIT: &str = "页面数/访问";
    pub const BOUNCE_RATE: &str = "跳出率";
    pub const COMPETITORS: &str = "随着时间的访问";
    pub const GEOGRAPHY_HEADING: &str = "地理分布";
    pub const TOP_COUNTRIES: &str = "热门国家";
    pub const GEOGRAPHY: &str = "热门国家/地区";
    pub const TRAFFIC_SOURCES: &str = "流量来源";
    pub const CHANNELS: &str = "渠道概况";
    pub const ORGANIC_SEARCH: &str = "自然搜索";
    pub const ORGANIC_CHANNEL: &str = "有机搜索";
    pub const BRAND: &str = "品牌";
    pub const NON_BRAND: &str = "非品牌";
    pub const SEARCH_TERMS: &str = "热门自然非品牌搜索词";
    pub const SEARCH_TERMS_FALLBACK: &str = "热门有机关键词";
    pub const TOP_MARKER: &str = "热门";
    pub const PAID: &str = "付费";
    pub const PAID_SEARCH: &str = "付费搜索";
    pub const TOP_REFERRALS: &str = "热门外链网站";
    pub const REFERRAL_INDUSTRIES: &str = "热门外链行业";
    pub const OUTGOING: &str = "出站";
    pub const SOCIAL: &str = "社交流量";
    pub const REFERRAL_CHANNEL: &str = "外链";
    pub const SOCIAL_CHANNEL: &str = "社交";
    pub const DISPLAY_ADS_CHANNEL: &str = "显示广告";
    pub const DISPLAY_PUBLISHERS: &str = "热门媒体";

    /// Traffic channels in display order.
    pub const CHANNEL_NAMES: [&str; 7] = [
        "直接",
        "有机搜索",
        "付费搜索",
        "外链",
        "显示广告",
        "社交",
        "电子邮件",
    ];

    /// Social platforms in match priority order. `X (Twitter)` precedes
    /// `Twitter` so the longer label wins on a shared line.
    pub const SOCIAL_PLATFORMS: [&str; 11] = [
        "YouTube",
        "Facebook",
        "Reddit",
        "X (Twitter)",
        "Twitter",
        "Instagram",
        "LinkedIn",
        "WhatsApp",
        "Discord",
        "Pinterest",
        "TikTok",
    ];
}

/// Section extractor for one overview dump.
pub struct OverviewParser<'a> {
    lines: &'a LineSequence,
    domain: &'a str,
    thresholds: &'a Thresholds,
}

impl<'a> OverviewParser<'a> {
    /// Creates a parser over `lines` for the site `domain`.
    pub fn new(lines: &'a LineSequence, domain: &'a str, thresholds: &'a Thresholds) -> Self {
        Self {
            lines,
            domain,
            thresholds,
        }
    }

    /// Extracts every overview metric. Missing metrics keep their sentinel
    /// or stay empty.
    pub fn parse(&self) -> Overview {
        let mut overview = Overview::new(self.domain);

        overview.site_description = self.site_description();

        let trend = self.total_visits();
        overview.traffic.total_visits = trend.visits;
        overview.traffic.total_visits_change = trend.change;
        overview.time_range = trend.time_range;
        overview.traffic.desktop_share = self.device_share(keywords::DESKTOP);
        overview.traffic.mobile_share = self.device_share(keywords::MOBILE);

        overview.ranks = self.ranks();
        overview.engagement = self.engagement();

        overview.competitors = self.competitors();
        overview.geography = self.geography();
        overview.channels = self.channels();
        overview.organic = self.organic(&overview);
        overview.search_terms = self.search_terms();
        overview.top_referrals = self.top_referrals();
        overview.referral_industries = self.referral_industries();
        overview.social = self.social();
        overview.display_ads = self.display_ads();

        debug!(
            domain = self.domain,
            lines = self.lines.len(),
            competitors = overview.competitors.len(),
            geography = overview.geography.len(),
            channels = overview.channels.len(),
            search_terms = overview.search_terms.len(),
            "Parsed overview"
        );
        overview
    }

    /// Locates `anchor` from `from`, logging misses.
    fn find(&self, anchor: Anchor<'_>, from: usize) -> Option<usize> {
        let found = locate(self.lines, anchor, from);
        match found {
            Some(index) => debug!(?anchor, index, "Located anchor"),
            None => debug!(?anchor, from, "Anchor not found"),
        }
        found
    }
}
