//! Client for the remote website analyzer.

use super::{build_http_client, decode_json, endpoint, ensure_success, validate_url};
use crate::error::ClientError;
use crate::fixtures;
use crate::models::AnalysisReport;
use std::time::Duration;
use tracing::{debug, info};

/// Demo mode: one literal URL is answered from the bundled fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoMode {
    pub url: String,
    pub delay: Duration,
}

impl Default for DemoMode {
    fn default() -> Self {
        Self {
            url: "https://example.com".to_string(),
            delay: Duration::from_millis(1000),
        }
    }
}

/// Issues analysis requests against `GET {base}/analyze?url=...`.
#[derive(Debug, Clone)]
pub struct AnalyzerClient {
    http: reqwest::Client,
    base_url: String,
    demo: Option<DemoMode>,
}

impl AnalyzerClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        demo: Option<DemoMode>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url: base_url.into(),
            demo,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// True when `url` would be served from the demo fixture.
    pub fn is_demo(&self, url: &str) -> bool {
        self.demo
            .as_ref()
            .is_some_and(|demo| demo.url == url.trim())
    }

    /// Analyze a website.
    ///
    /// Invalid input fails locally. The demo URL resolves to the fixture
    /// after the configured delay. Anything else is exactly one GET.
    pub async fn analyze(&self, url: &str) -> Result<AnalysisReport, ClientError> {
        let target = validate_url(url)?;

        if let Some(demo) = self.demo.as_ref().filter(|d| d.url == url.trim()) {
            info!("Serving demo report for {}", demo.url);
            tokio::time::sleep(demo.delay).await;
            return fixtures::demo_report();
        }

        let request_url = endpoint(&self.base_url, "analyze");
        info!("Requesting analysis of {}", target);
        debug!("Analyzer endpoint: {}", request_url);

        let response = self
            .http
            .get(&request_url)
            .query(&[("url", url.trim())])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let report: AnalysisReport = decode_json(response).await?;

        debug!(
            "Report: {} providers, {} cookies, {} scripts",
            report.tracking_providers.len(),
            report.tracking_cookies.len(),
            report.tracking_javascript.len()
        );

        Ok(report)
    }
}
