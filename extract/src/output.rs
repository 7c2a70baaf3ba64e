//! Output formatting for extracted documents and reports.

use sitedump_core::{
    DocumentKind, LabeledValue, Overview, REFERRAL_COLUMNS, ReferralTable, ShareRow, is_found,
};

use crate::overview::keywords;
use crate::report::ExtractionReport;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Markdown,
    Csv,
    Json,
    Yaml,
}

impl OutputFormat {
    /// File extension for documents written in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Default format for a document kind.
    pub fn default_for(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Overview => Self::Markdown,
            DocumentKind::Referrals => Self::Csv,
        }
    }
}

/// Formats an overview in the requested output format.
///
/// CSV is rejected: an overview is a set of differently shaped tables.
pub fn format_overview(overview: &Overview, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Markdown => Ok(overview_to_markdown(overview)),
        OutputFormat::Csv => Err("overview cannot be rendered as CSV".to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(overview)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(overview).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

/// Formats a referrals table in the requested output format.
pub fn format_referrals(table: &ReferralTable, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Markdown => Ok(referrals_to_markdown(table)),
        OutputFormat::Csv => referrals_to_csv(table),
        OutputFormat::Json => serde_json::to_string_pretty(table)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(table).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

/// Formats an extraction report. Markdown and CSV fall back to JSON.
pub fn format_report(report: &ExtractionReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        _ => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
    }
}

fn referrals_to_csv(table: &ReferralTable) -> Result<String, String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(REFERRAL_COLUMNS)
        .map_err(|e| format!("CSV serialization failed: {e}"))?;
    for row in &table.rows {
        let index = row.row_index.to_string();
        writer
            .write_record([
                index.as_str(),
                row.domain.as_str(),
                row.industry.as_str(),
                row.global_rank.as_str(),
                row.traffic_absolute.as_str(),
                row.traffic_percent.as_str(),
                row.change.as_str(),
            ])
            .map_err(|e| format!("CSV serialization failed: {e}"))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| format!("CSV flush failed: {e}"))?;
    String::from_utf8(bytes).map_err(|e| format!("CSV output is not UTF-8: {e}"))
}

fn referrals_to_markdown(table: &ReferralTable) -> String {
    let mut out = String::new();

    out.push_str("# 外链来源\n\n");
    out.push_str(&format!("**Total rows:** {}\n\n", table.len()));
    if table.is_empty() {
        return out;
    }

    out.push_str(&format!("| {} |\n", REFERRAL_COLUMNS.join(" | ")));
    out.push_str(&format!("|{}\n", "------|".repeat(REFERRAL_COLUMNS.len())));
    for row in &table.rows {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            row.row_index,
            cell(&row.domain),
            cell(&row.industry),
            cell(&row.global_rank),
            cell(&row.traffic_absolute),
            cell(&row.traffic_percent),
            cell(&row.change),
        ));
    }
    out
}

fn overview_to_markdown(overview: &Overview) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {} 网站分析概览\n\n", overview.domain));
    if is_found(&overview.time_range) {
        out.push_str(&format!("**时间范围:** {}\n\n", overview.time_range));
    }

    if is_found(&overview.site_description) {
        out.push_str("## 网站描述\n\n");
        out.push_str(&format!("{}\n\n", overview.site_description));
    }

    push_traffic_and_engagement(&mut out, overview);

    if !overview.competitors.is_empty() {
        out.push_str("## 竞争对手\n\n");
        push_labeled_table(&mut out, ["网站", "访问量"], &overview.competitors);
    }

    if !overview.geography.is_empty() {
        out.push_str("## 地理分布\n\n");
        push_share_table(&mut out, ["国家/地区", "流量占比", "变化"], &overview.geography);
    }

    if !overview.channels.is_empty() {
        out.push_str("## 流量渠道\n\n");
        push_labeled_table(&mut out, ["渠道", "占比"], &overview.channels);
    }

    if !overview.organic.is_empty() || !overview.search_terms.is_empty() {
        out.push_str("## 自然搜索\n\n");
        push_metric_table(
            &mut out,
            &[
                ("有机搜索占比", &overview.organic.share),
                ("品牌词占比", &overview.organic.brand_share),
                ("非品牌词占比", &overview.organic.non_brand_share),
            ],
        );
        if !overview.search_terms.is_empty() {
            out.push_str("### 热门搜索词\n\n");
            push_share_table(&mut out, ["搜索词", "流量占比", "变化"], &overview.search_terms);
        }
    }

    let referral_share = found_channel(overview, keywords::REFERRAL_CHANNEL);
    if referral_share.is_some()
        || !overview.top_referrals.is_empty()
        || !overview.referral_industries.is_empty()
    {
        out.push_str("## 外链\n\n");
        push_channel_share(&mut out, referral_share);
        if !overview.top_referrals.is_empty() {
            out.push_str("### 热门外链网站\n\n");
            push_share_table(&mut out, ["网站", "流量占比", "变化"], &overview.top_referrals);
        }
        if !overview.referral_industries.is_empty() {
            out.push_str("### 热门外链行业\n\n");
            push_labeled_table(&mut out, ["行业", "占比"], &overview.referral_industries);
        }
    }

    let social_share = found_channel(overview, keywords::SOCIAL_CHANNEL);
    if social_share.is_some() || !overview.social.is_empty() {
        out.push_str("## 社交\n\n");
        push_channel_share(&mut out, social_share);
        if !overview.social.is_empty() {
            push_labeled_table(&mut out, ["平台", "占比"], &overview.social);
        }
    }

    let display_share = found_channel(overview, keywords::DISPLAY_ADS_CHANNEL);
    if display_share.is_some() || !overview.display_ads.is_empty() {
        out.push_str("## 显示广告\n\n");
        push_channel_share(&mut out, display_share);
        if !overview.display_ads.is_empty() {
            push_share_table(&mut out, ["媒体", "流量占比", "变化"], &overview.display_ads);
        }
    }

    out
}

fn push_traffic_and_engagement(out: &mut String, overview: &Overview) {
    if overview.traffic.is_empty() && overview.ranks.is_empty() && overview.engagement.is_empty() {
        return;
    }
    out.push_str("## 流量与参与度\n\n");

    if !overview.traffic.is_empty() {
        out.push_str("### 流量概况\n\n");
        push_metric_table(
            out,
            &[
                ("总访问量", &overview.traffic.total_visits),
                ("环比变化", &overview.traffic.total_visits_change),
                ("桌面端占比", &overview.traffic.desktop_share),
                ("移动端占比", &overview.traffic.mobile_share),
            ],
        );
    }

    if !overview.ranks.is_empty() {
        let ranks = &overview.ranks;
        out.push_str("### 排名\n\n");
        out.push_str("| 排名类型 | 排名 | 范围 |\n");
        out.push_str("|------|------|------|\n");
        let rows = [
            ("全球排名", &ranks.global, "全球"),
            ("国家/地区排名", &ranks.country, ranks.country_name.as_str()),
            ("行业排名", &ranks.industry, ranks.industry_name.as_str()),
        ];
        for (label, rank, scope) in rows {
            if is_found(rank) {
                out.push_str(&format!("| {label} | {} | {} |\n", cell(rank), cell(scope)));
            }
        }
        out.push('\n');
    }

    if !overview.engagement.is_empty() {
        let engagement = &overview.engagement;
        out.push_str("### 参与度\n\n");
        push_metric_table(
            out,
            &[
                ("每月访问量", &engagement.monthly_visits),
                ("月独立访客数", &engagement.unique_visitors),
                ("已消除重叠的受众", &engagement.deduplicated_audience),
                ("平均访问时长", &engagement.visit_duration),
                ("页面数/访问", &engagement.pages_per_visit),
                ("跳出率", &engagement.bounce_rate),
            ],
        );
    }
}

/// Two-column metric table holding only the rows that were found.
fn push_metric_table(out: &mut String, rows: &[(&str, &String)]) {
    let found: Vec<_> = rows.iter().filter(|(_, value)| is_found(value)).collect();
    if found.is_empty() {
        return;
    }
    out.push_str("| 指标 | 数值 |\n");
    out.push_str("|------|------|\n");
    for (label, value) in found {
        out.push_str(&format!("| {label} | {} |\n", cell(value)));
    }
    out.push('\n');
}

fn push_labeled_table(out: &mut String, header: [&str; 2], rows: &[LabeledValue]) {
    out.push_str(&format!("| {} | {} |\n", header[0], header[1]));
    out.push_str("|------|------|\n");
    for row in rows {
        out.push_str(&format!("| {} | {} |\n", cell(&row.label), cell(&row.value)));
    }
    out.push('\n');
}

fn push_share_table(out: &mut String, header: [&str; 3], rows: &[ShareRow]) {
    out.push_str(&format!("| {} | {} | {} |\n", header[0], header[1], header[2]));
    out.push_str("|------|------|------|\n");
    for row in rows {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            cell(&row.label),
            cell(&row.share),
            cell(&row.change)
        ));
    }
    out.push('\n');
}

fn push_channel_share(out: &mut String, share: Option<&str>) {
    if let Some(share) = share {
        out.push_str(&format!("**渠道占比:** {share}\n\n"));
    }
}

fn found_channel<'a>(overview: &'a Overview, name: &str) -> Option<&'a str> {
    overview.channel_share(name).filter(|share| is_found(share))
}

/// Escapes pipes so a value cannot split a Markdown table cell.
fn cell(value: &str) -> String {
    value.replace('|', "\\|")
}
