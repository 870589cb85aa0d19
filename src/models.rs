//! Data models for the analyzer client.
//!
//! This module contains the wire types exchanged with the analyzer, history
//! and GTM backends. Every server-sourced field is defaulted so that a payload
//! with missing fields still decodes; absent values render as empty.

use crate::analysis::ScoreSummary;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A third-party tracking provider detected on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingProvider {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provider: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data_is_sent_to: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tracking_method: String,
}

/// A tracking cookie set by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingCookie {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provider: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data_is_sent_to: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lifetime: String,
}

/// A tracking script loaded by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingScript {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provider: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub transfer_size: String,
    #[serde(deserialize_with = "null_as_default")]
    pub blocking_time: String,
}

/// Lighthouse sub-scores as reported by the analyzer (0-100 each).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LighthouseScores {
    #[serde(deserialize_with = "lenient_score")]
    pub performance: u8,
    #[serde(deserialize_with = "lenient_score")]
    pub accessibility: u8,
    #[serde(deserialize_with = "lenient_score")]
    pub best_practices: u8,
    #[serde(deserialize_with = "lenient_score")]
    pub seo: u8,
}

impl LighthouseScores {
    pub fn new(performance: u8, accessibility: u8, best_practices: u8, seo: u8) -> Self {
        Self {
            performance,
            accessibility,
            best_practices,
            seo,
        }
    }
}

/// The analyzer's report for a single URL.
///
/// Replaced wholesale by each new analysis; never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisReport {
    #[serde(deserialize_with = "null_as_default")]
    pub tracking_providers: Vec<TrackingProvider>,
    #[serde(deserialize_with = "null_as_default")]
    pub tracking_cookies: Vec<TrackingCookie>,
    #[serde(deserialize_with = "null_as_default")]
    pub tracking_javascript: Vec<TrackingScript>,
    #[serde(deserialize_with = "null_as_default")]
    pub lighthouse: LighthouseScores,
    #[serde(deserialize_with = "null_as_default")]
    pub summarizer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub suggestions: Vec<String>,
}

/// Server-side status of a queued audit.
///
/// Statuses are matched exactly; anything else, including a missing status,
/// is kept as `Other` and counts toward no status bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuditStatus {
    Pending,
    Completed,
    Failed,
    Other(String),
}

impl AuditStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AuditStatus::Pending => "pending",
            AuditStatus::Completed => "completed",
            AuditStatus::Failed => "failed",
            AuditStatus::Other(s) => s,
        }
    }

    /// Returns the badge shown next to the status in history listings.
    pub fn emoji(&self) -> &'static str {
        match self {
            AuditStatus::Completed => "🟢",
            AuditStatus::Failed => "🔴",
            AuditStatus::Pending => "🟡",
            AuditStatus::Other(_) => "⚪",
        }
    }
}

impl Default for AuditStatus {
    fn default() -> Self {
        AuditStatus::Other(String::new())
    }
}

impl From<&str> for AuditStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => AuditStatus::Pending,
            "completed" => AuditStatus::Completed,
            "failed" => AuditStatus::Failed,
            _ => AuditStatus::Other(s.to_string()),
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for AuditStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AuditStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(AuditStatus::from)
            .unwrap_or_else(|| AuditStatus::Other(String::new())))
    }
}

/// A snapshot of a previously queued audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub audit_type: String,
    pub status: AuditStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
}

impl AuditRecord {
    /// Host part of the audited URL, falling back to the raw URL.
    pub fn hostname(&self) -> String {
        reqwest::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(String::from))
            .unwrap_or_else(|| self.url.clone())
    }

    /// Calendar date of `created_at`, accepting RFC 3339 or naive ISO timestamps.
    pub fn created_on(&self) -> Option<NaiveDate> {
        let raw = self.created_at.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|dt| dt.date())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }
}

/// One page of audit history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryPage {
    #[serde(deserialize_with = "null_as_default")]
    pub audits: Vec<AuditRecord>,
    #[serde(deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub per_page: u32,
}

/// A Google Tag Manager container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GtmContainer {
    #[serde(rename = "containerId", deserialize_with = "null_as_default")]
    pub container_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "publicId", deserialize_with = "null_as_default")]
    pub public_id: String,
}

/// A Google Tag Manager account and its containers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GtmAccount {
    #[serde(rename = "accountId", deserialize_with = "null_as_default")]
    pub account_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub container: Vec<GtmContainer>,
}

/// Response body of the GTM accounts endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GtmAccountsResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub account: Vec<GtmAccount>,
}

/// Body of a GTM setup analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GtmAnalysisRequest {
    pub account_id: String,
    pub container_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "publicId", deserialize_with = "null_as_default")]
    pub public_id: String,
    #[serde(rename = "domainName")]
    pub domain_name: Option<Vec<String>>,
    #[serde(rename = "usageContext")]
    pub usage_context: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagsAnalysis {
    #[serde(deserialize_with = "null_as_default")]
    pub total_tags: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub paused_tags: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub tags_without_triggers: u64,
    pub tag_types: Option<BTreeMap<String, u64>>,
}

/// GTM setup report returned by the GTM backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GtmSetupReport {
    #[serde(deserialize_with = "null_as_default")]
    pub container_info: ContainerInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub tags_analysis: TagsAnalysis,
    #[serde(deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
}

/// Error body some backends send alongside a non-2xx status.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    pub detail: Option<String>,
}

/// Metadata about a rendered analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// The analyzed website.
    pub url: String,
    /// When the analysis finished.
    pub analysis_date: DateTime<Utc>,
    /// Analyzer the report came from.
    pub analyzer: String,
    /// Whether the report is the bundled demo dataset.
    pub demo: bool,
    pub duration_seconds: f64,
}

/// A received report together with its derived scores.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisDocument {
    pub metadata: ReportMetadata,
    pub scores: ScoreSummary,
    pub report: AnalysisReport,
}

impl AnalysisDocument {
    pub fn new(metadata: ReportMetadata, report: AnalysisReport) -> Self {
        Self {
            scores: ScoreSummary::from_scores(&report.lighthouse),
            metadata,
            report,
        }
    }
}

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Scores may be null, fractional or out of range; round and clamp to 0..=100.
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

/// Audit ids arrive as integers from some backends and strings from others.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_with_missing_fields_decodes() {
        let report: AnalysisReport =
            serde_json::from_str(r#"{"lighthouse": {"performance": 50}}"#).unwrap();
        assert_eq!(report.lighthouse.performance, 50);
        assert_eq!(report.lighthouse.seo, 0);
        assert!(report.tracking_cookies.is_empty());
        assert!(report.summarizer.is_empty());
    }

    #[test]
    fn test_audit_status_from_str() {
        assert_eq!(AuditStatus::from("completed"), AuditStatus::Completed);
        assert_eq!(
            AuditStatus::from("FAILED"),
            AuditStatus::Other("FAILED".to_string())
        );
        assert_eq!(AuditStatus::from("pending"), AuditStatus::Pending);
        assert_eq!(
            AuditStatus::from("running"),
            AuditStatus::Other("running".to_string())
        );
    }

    #[test]
    fn test_audit_record_decodes_numeric_id() {
        let record: AuditRecord = serde_json::from_str(
            r#"{"id": 42, "url": "https://shop.example.org/cart", "audit_type": "full",
                "status": "completed", "created_at": "2024-03-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.status, AuditStatus::Completed);
        assert_eq!(record.hostname(), "shop.example.org");
        assert_eq!(
            record.created_on(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_created_on_accepts_naive_timestamp() {
        let record = AuditRecord {
            created_at: "2024-05-17T08:30:12.123456".to_string(),
            ..Default::default()
        };
        assert_eq!(record.created_on(), NaiveDate::from_ymd_opt(2024, 5, 17));

        let garbage = AuditRecord {
            created_at: "yesterday".to_string(),
            ..Default::default()
        };
        assert_eq!(garbage.created_on(), None);
    }

    #[test]
    fn test_gtm_account_field_names() {
        let accounts: GtmAccountsResponse = serde_json::from_str(
            r#"{"account": [{"accountId": "1", "name": "Main",
                "container": [{"containerId": "9", "name": "Web", "publicId": "GTM-ABC"}]}]}"#,
        )
        .unwrap();
        assert_eq!(accounts.account[0].account_id, "1");
        assert_eq!(accounts.account[0].container[0].public_id, "GTM-ABC");
    }

    #[test]
    fn test_status_serializes_as_plain_string() {
        let json = serde_json::to_string(&AuditStatus::Other("queued".into())).unwrap();
        assert_eq!(json, "\"queued\"");
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let report: AnalysisReport = serde_json::from_str(
            r#"{"tracking_providers": null, "tracking_cookies": null,
                "tracking_javascript": null, "lighthouse": null,
                "summarizer": null, "suggestions": null}"#,
        )
        .unwrap();
        assert_eq!(report, AnalysisReport::default());

        let page: HistoryPage =
            serde_json::from_str(r#"{"audits": null, "total": null, "per_page": null}"#).unwrap();
        assert!(page.audits.is_empty());
        assert_eq!(page.total, 0);

        let accounts: GtmAccountsResponse = serde_json::from_str(r#"{"account": null}"#).unwrap();
        assert!(accounts.account.is_empty());
    }

    #[test]
    fn test_scores_are_rounded_and_clamped() {
        let scores: LighthouseScores = serde_json::from_str(
            r#"{"performance": 47.5, "accessibility": null,
                "best_practices": 300, "seo": -4}"#,
        )
        .unwrap();
        assert_eq!(scores, LighthouseScores::new(48, 0, 100, 0));
    }

    #[test]
    fn test_null_tracking_entry_fields() {
        let report: AnalysisReport = serde_json::from_str(
            r#"{"tracking_cookies": [{"name": "_ga", "lifetime": null}]}"#,
        )
        .unwrap();
        assert_eq!(report.tracking_cookies[0].name, "_ga");
        assert!(report.tracking_cookies[0].lifetime.is_empty());
    }

    #[test]
    fn test_missing_status_is_not_pending() {
        let records: Vec<AuditRecord> =
            serde_json::from_str(r#"[{"id": 1, "url": "https://a.org"}]"#).unwrap();
        assert_eq!(records[0].status, AuditStatus::Other(String::new()));
        assert_eq!(records[0].status.emoji(), "⚪");

        let stats = crate::analysis::AuditStats::from_records(&records);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.failed, 0);
    }
}
