//! Analysis session state.
//!
//! Tracks the loading flag, last error and last successful report for a
//! sequence of analysis requests. Each request gets a monotonically
//! increasing ticket; only the completion for the latest ticket may touch
//! state, so a slow response can never overwrite a newer one.

use crate::client::AnalyzerClient;
use crate::error::{ClientError, ErrorContext};
use crate::models::AnalysisReport;
use tracing::{debug, error};

/// Identifies one issued analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

/// What happened to a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The report was stored.
    Applied,
    /// The error message was stored.
    Failed,
    /// A newer request was issued; the result was discarded.
    Stale,
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    latest: u64,
    in_flight: Option<String>,
    loading: bool,
    error: Option<String>,
    report: Option<AnalysisReport>,
    analyzed_url: Option<String>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    pub fn analyzed_url(&self) -> Option<&str> {
        self.analyzed_url.as_deref()
    }

    /// Start a request: mark loading and clear the previous error.
    pub fn begin(&mut self, url: &str) -> RequestTicket {
        self.latest += 1;
        self.loading = true;
        self.error = None;
        self.in_flight = Some(url.trim().to_string());
        debug!("Issued analysis request #{} for {}", self.latest, url);
        RequestTicket(self.latest)
    }

    /// Record the outcome of a request.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<AnalysisReport, ClientError>,
    ) -> Completion {
        if ticket.0 != self.latest {
            debug!(
                "Discarding response for request #{} (latest is #{})",
                ticket.0, self.latest
            );
            return Completion::Stale;
        }

        self.loading = false;
        let url = self.in_flight.take();

        match result {
            Ok(report) => {
                self.report = Some(report);
                self.analyzed_url = url;
                Completion::Applied
            }
            Err(e) => {
                if !e.is_local() {
                    error!("Error analyzing website: {}", e);
                }
                self.error = Some(e.user_message(ErrorContext::Analysis));
                Completion::Failed
            }
        }
    }

    /// Run one request to completion against the analyzer.
    pub async fn analyze(&mut self, client: &AnalyzerClient, url: &str) -> Completion {
        let ticket = self.begin(url);
        let result = client.analyze(url).await;
        self.complete(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::DemoMode;
    use crate::models::LighthouseScores;
    use std::time::Duration;

    fn report(performance: u8) -> AnalysisReport {
        AnalysisReport {
            lighthouse: LighthouseScores::new(performance, 90, 90, 90),
            ..Default::default()
        }
    }

    #[test]
    fn test_success_stores_report_and_url() {
        let mut session = AnalysisSession::new();
        let ticket = session.begin("https://a.example");
        assert!(session.is_loading());

        assert_eq!(session.complete(ticket, Ok(report(10))), Completion::Applied);
        assert!(!session.is_loading());
        assert_eq!(session.analyzed_url(), Some("https://a.example"));
        assert_eq!(session.report().unwrap().lighthouse.performance, 10);
        assert!(session.error().is_none());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut session = AnalysisSession::new();
        let first = session.begin("https://slow.example");
        let second = session.begin("https://fast.example");

        assert_eq!(session.complete(second, Ok(report(20))), Completion::Applied);
        assert_eq!(session.complete(first, Ok(report(99))), Completion::Stale);

        assert_eq!(session.analyzed_url(), Some("https://fast.example"));
        assert_eq!(session.report().unwrap().lighthouse.performance, 20);
    }

    #[test]
    fn test_stale_completion_keeps_newer_request_loading() {
        let mut session = AnalysisSession::new();
        let first = session.begin("https://one.example");
        let _second = session.begin("https://two.example");

        assert_eq!(
            session.complete(first, Err(ClientError::EmptyUrl)),
            Completion::Stale
        );
        assert!(session.is_loading());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_failure_keeps_previous_report() {
        let mut session = AnalysisSession::new();
        let ok = session.begin("https://a.example");
        session.complete(ok, Ok(report(50)));

        let failing = session.begin("https://b.example");
        let outcome = session.complete(
            failing,
            Err(ClientError::Status {
                status: 500,
                body: String::new(),
            }),
        );

        assert_eq!(outcome, Completion::Failed);
        assert_eq!(
            session.error(),
            Some("Failed to analyze website. Please try again.")
        );
        assert_eq!(session.analyzed_url(), Some("https://a.example"));
        assert_eq!(session.report().unwrap().lighthouse.performance, 50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_with_demo_client() {
        let client = AnalyzerClient::new(
            "http://127.0.0.1:1",
            Duration::from_secs(5),
            Some(DemoMode::default()),
        )
        .unwrap();
        let mut session = AnalysisSession::new();

        let outcome = session.analyze(&client, "https://example.com").await;
        assert_eq!(outcome, Completion::Applied);
        assert_eq!(session.report().unwrap().tracking_cookies.len(), 2);
    }

    #[tokio::test]
    async fn test_analyze_invalid_url_sets_validation_message() {
        let client =
            AnalyzerClient::new("http://127.0.0.1:1", Duration::from_secs(5), None).unwrap();
        let mut session = AnalysisSession::new();

        assert_eq!(session.analyze(&client, "").await, Completion::Failed);
        assert_eq!(session.error(), Some("Please enter a URL"));
    }
}
