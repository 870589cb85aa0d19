//! Markdown report generation.
//!
//! Each list renderer is a pure mapping from a slice to Markdown. An empty
//! list renders a fixed "none detected" line instead of an empty table.

use crate::analysis::{AuditStats, Pagination, ScoreSummary};
use crate::models::{
    AnalysisDocument, GtmAccount, GtmSetupReport, HistoryPage, ReportMetadata, TrackingCookie,
    TrackingProvider, TrackingScript,
};
use anyhow::Result;
use serde::Serialize;

pub const NO_PROVIDERS: &str = "No tracking providers detected.";
pub const NO_COOKIES: &str = "No tracking cookies detected.";
pub const NO_SCRIPTS: &str = "No tracking JavaScript detected.";
pub const NO_SUGGESTIONS: &str = "No recommendations available.";
pub const NO_AUDITS: &str = "No audits found.";

/// Generate a complete Markdown report for one analysis.
pub fn generate_markdown_report(doc: &AnalysisDocument) -> String {
    let mut output = String::new();

    output.push_str("# WebDoctor Report\n\n");
    output.push_str(&generate_metadata_section(&doc.metadata));
    output.push_str(&generate_lighthouse_section(&doc.scores));
    output.push_str(&generate_summary_section(&doc.report.summarizer));

    output.push_str("## Tracking Providers\n\n");
    output.push_str(&render_providers(&doc.report.tracking_providers));

    output.push_str("## Tracking Cookies\n\n");
    output.push_str(&render_cookies(&doc.report.tracking_cookies));

    output.push_str("## Tracking JavaScript\n\n");
    output.push_str(&render_scripts(&doc.report.tracking_javascript));

    output.push_str("## Recommendations\n\n");
    output.push_str(&render_suggestions(&doc.report.suggestions));

    output.push_str(&generate_footer());

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Website:** {}\n", metadata.url));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if metadata.demo {
        section.push_str("- **Source:** bundled demo dataset\n");
    } else {
        section.push_str(&format!("- **Analyzer:** {}\n", metadata.analyzer));
    }
    section.push_str(&format!(
        "- **Analysis Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Overall score, per-metric table and insight values.
fn generate_lighthouse_section(scores: &ScoreSummary) -> String {
    let mut section = String::new();

    section.push_str("## Lighthouse Analysis\n\n");
    section.push_str(&format!(
        "**Overall Score: {}/100** {} {}\n\n",
        scores.overall,
        scores.rating.emoji(),
        scores.rating
    ));

    section.push_str("| Metric | Score | |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for m in &scores.metrics {
        section.push_str(&format!(
            "| {} {} | {}/100 | {} |\n",
            m.metric.emoji(),
            m.metric,
            m.score,
            m.band.emoji()
        ));
    }
    section.push('\n');

    section.push_str("### Performance Insights\n\n");
    section.push_str("| Avg Score | Best Metric | Needs Work | Range |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        scores.overall, scores.best, scores.worst, scores.range
    ));

    section
}

fn generate_summary_section(summary: &str) -> String {
    if summary.trim().is_empty() {
        return String::new();
    }

    format!("## Summary\n\n{}\n\n", summary.trim())
}

pub fn render_providers(providers: &[TrackingProvider]) -> String {
    if providers.is_empty() {
        return format!("{}\n\n", NO_PROVIDERS);
    }

    let mut table = String::new();
    table.push_str("| Name | Provider | Category | Data Sent To | Method |\n");
    table.push_str("|:---|:---|:---|:---|:---|\n");
    for p in providers {
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            cell(&p.name),
            cell(&p.provider),
            cell(&p.category),
            cell(&p.data_is_sent_to),
            cell(&p.tracking_method)
        ));
    }
    table.push('\n');
    table
}

pub fn render_cookies(cookies: &[TrackingCookie]) -> String {
    if cookies.is_empty() {
        return format!("{}\n\n", NO_COOKIES);
    }

    let mut table = String::new();
    table.push_str("| Name | Provider | Category | Data Sent To | Lifetime |\n");
    table.push_str("|:---|:---|:---|:---|:---|\n");
    for c in cookies {
        table.push_str(&format!(
            "| `{}` | {} | {} | {} | {} |\n",
            c.name.replace('`', "'"),
            cell(&c.provider),
            cell(&c.category),
            cell(&c.data_is_sent_to),
            cell(&c.lifetime)
        ));
    }
    table.push('\n');
    table
}

pub fn render_scripts(scripts: &[TrackingScript]) -> String {
    if scripts.is_empty() {
        return format!("{}\n\n", NO_SCRIPTS);
    }

    let mut table = String::new();
    table.push_str("| Name | Provider | Category | Transfer Size | Blocking Time |\n");
    table.push_str("|:---|:---|:---|:---:|:---:|\n");
    for s in scripts {
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            cell(&s.name),
            cell(&s.provider),
            cell(&s.category),
            cell(&s.transfer_size),
            cell(&s.blocking_time)
        ));
    }
    table.push('\n');
    table
}

pub fn render_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return format!("{}\n\n", NO_SUGGESTIONS);
    }

    let mut list = String::new();
    for (i, suggestion) in suggestions.iter().enumerate() {
        list.push_str(&format!("{}. {}\n", i + 1, suggestion));
    }
    list.push('\n');
    list
}

/// Render one page of audit history with its pagination footer.
///
/// An empty page renders a call-to-action instead of a table.
pub fn render_history(page: &HistoryPage, pagination: &Pagination) -> String {
    let mut output = String::new();

    output.push_str("# Audit History\n\n");

    if page.audits.is_empty() {
        output.push_str(&format!("{}\n\n", NO_AUDITS));
        output.push_str("> Start your first audit: `webdoctor analyze <URL>`\n");
        return output;
    }

    output.push_str("| Website | Type | Status | Date | ID |\n");
    output.push_str("|:---|:---|:---|:---|:---|\n");
    for audit in &page.audits {
        let date = audit
            .created_on()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "| **{}**<br>{} | {} | {} {} | {} | `{}` |\n",
            cell(&audit.hostname()),
            cell(&audit.url),
            cell(&audit.audit_type),
            audit.status.emoji(),
            audit.status,
            date,
            audit.id
        ));
    }
    output.push('\n');

    if pagination.total_pages() > 1 {
        output.push_str(&format!(
            "Page {} of {} ({} audits)\n\n",
            pagination.page,
            pagination.total_pages(),
            pagination.total
        ));
        if pagination.has_previous() {
            output.push_str(&format!("- Previous: `--page {}`\n", pagination.previous()));
        }
        if pagination.has_next() {
            output.push_str(&format!("- Next: `--page {}`\n", pagination.next()));
        }
    }

    output
}

pub fn render_stats(stats: &AuditStats) -> String {
    let mut output = String::new();

    output.push_str("# Audit Statistics\n\n");
    output.push_str("| Total Audits | 🟢 Completed | 🟡 Pending | 🔴 Failed |\n");
    output.push_str("|:---:|:---:|:---:|:---:|\n");
    output.push_str(&format!(
        "| {} | {} | {} | {} |\n",
        stats.total, stats.completed, stats.pending, stats.failed
    ));

    output
}

pub fn render_gtm_accounts(accounts: &[GtmAccount]) -> String {
    let mut output = String::new();

    output.push_str("# GTM Accounts\n\n");

    if accounts.is_empty() {
        output.push_str("No GTM accounts found.\n");
        return output;
    }

    for account in accounts {
        output.push_str(&format!(
            "## {} (`{}`)\n\n",
            account.name, account.account_id
        ));
        if account.container.is_empty() {
            output.push_str("No containers.\n\n");
            continue;
        }
        output.push_str("| Container | ID | Public ID |\n");
        output.push_str("|:---|:---|:---|\n");
        for c in &account.container {
            output.push_str(&format!(
                "| {} | `{}` | {} |\n",
                cell(&c.name),
                c.container_id,
                cell(&c.public_id)
            ));
        }
        output.push('\n');
    }

    output
}

pub fn render_gtm_report(report: &GtmSetupReport) -> String {
    let mut output = String::new();
    let info = &report.container_info;
    let tags = &report.tags_analysis;

    output.push_str("# GTM Setup Analysis\n\n");

    output.push_str("## Container Information\n\n");
    output.push_str(&format!("- **Name:** {}\n", info.name));
    output.push_str(&format!("- **Public ID:** {}\n", info.public_id));
    output.push_str(&format!(
        "- **Domain:** {}\n",
        joined_or(&info.domain_name, "All domains")
    ));
    output.push_str(&format!(
        "- **Usage Context:** {}\n\n",
        joined_or(&info.usage_context, "Web")
    ));

    output.push_str("## Tags Analysis\n\n");
    output.push_str("| Total Tags | Paused Tags | Tags Without Triggers |\n");
    output.push_str("|:---:|:---:|:---:|\n");
    output.push_str(&format!(
        "| {} | {} | {} |\n\n",
        tags.total_tags, tags.paused_tags, tags.tags_without_triggers
    ));

    if let Some(types) = tags.tag_types.as_ref().filter(|t| !t.is_empty()) {
        output.push_str("### Tag Types\n\n");
        output.push_str("| Type | Count |\n");
        output.push_str("|:---|:---:|\n");
        for (tag_type, count) in types {
            output.push_str(&format!("| {} | {} |\n", cell(tag_type), count));
        }
        output.push('\n');
    }

    if !report.recommendations.is_empty() {
        output.push_str("## Recommendations\n\n");
        for rec in &report.recommendations {
            output.push_str(&format!("- {}\n", rec));
        }
        output.push('\n');
    }

    output
}

fn generate_footer() -> String {
    "---\n\n*Report generated by WebDoctor*\n".to_string()
}

/// Generate a pretty-printed JSON document.
pub fn generate_json_report<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

/// Escape a value for a Markdown table cell; blanks render as "-".
fn cell(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        "-".to_string()
    } else {
        value.replace('|', "\\|").replace('\n', " ")
    }
}

fn joined_or(values: &Option<Vec<String>>, fallback: &str) -> String {
    match values {
        Some(v) if !v.is_empty() => v.join(", "),
        _ => fallback.to_string(),
    }
}
