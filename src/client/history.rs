//! Client for the audit-history backend.

use super::{build_http_client, decode_json, endpoint, ensure_success};
use crate::analysis::Pagination;
use crate::error::ClientError;
use crate::models::HistoryPage;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct HistoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HistoryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    /// Fetch one page of audit history.
    ///
    /// `page` is omitted from the query when `None`, which the backend treats
    /// as the first page. Every call hits the network; nothing is cached.
    pub async fn list_audits(
        &self,
        user_id: Option<&str>,
        page: Option<u32>,
        per_page: u32,
    ) -> Result<HistoryPage, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(user_id) = user_id.filter(|id| !id.is_empty()) {
            query.push(("user_id", user_id.to_string()));
        }
        if let Some(page) = page {
            query.push(("page", page.max(1).to_string()));
        }
        query.push(("per_page", per_page.max(1).to_string()));

        let url = endpoint(&self.base_url, "audits/history");
        info!("Fetching audit history (page {:?}, {} per page)", page, per_page);
        debug!("History query: {:?}", query);

        let response = self.http.get(&url).query(&query).send().await?;
        let response = ensure_success(response).await?;
        let mut history: HistoryPage = decode_json(response).await?;

        if history.per_page == 0 {
            history.per_page = per_page.max(1);
        }

        debug!(
            "Received {} of {} audits",
            history.audits.len(),
            history.total
        );
        Ok(history)
    }

    /// Fetch `page`, re-fetching once at the last page if it is past the end.
    pub async fn list_audits_clamped(
        &self,
        user_id: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> Result<(HistoryPage, Pagination), ClientError> {
        let history = self.list_audits(user_id, Some(page), per_page).await?;
        let pagination = Pagination::new(page, history.per_page, history.total);
        if pagination.page == page {
            return Ok((history, pagination));
        }

        info!(
            "Page {} is out of range, showing page {} instead",
            page, pagination.page
        );
        let history = self
            .list_audits(user_id, Some(pagination.page), per_page)
            .await?;
        let pagination = Pagination::new(pagination.page, history.per_page, history.total);
        Ok((history, pagination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_server::{serve_once, serve_sequence};
    use crate::models::AuditStatus;

    #[tokio::test]
    async fn test_list_audits_query_and_decode() {
        let body = r#"{"audits": [{"id": 7, "url": "https://example.org", "audit_type": "tracking",
                        "status": "failed", "created_at": "2024-02-10T09:00:00"}],
                       "total": 15, "per_page": 10}"#;
        let (base, request) = serve_once(200, body).await;
        let client = HistoryClient::new(base, Duration::from_secs(5)).unwrap();

        let page = client.list_audits(Some("u-1"), Some(2), 10).await.unwrap();
        assert_eq!(page.total, 15);
        assert_eq!(page.audits[0].status, AuditStatus::Failed);

        let request = request.await.unwrap();
        assert!(request.starts_with("GET /audits/history?user_id=u-1&page=2&per_page=10 "));
    }

    #[tokio::test]
    async fn test_list_audits_without_user_or_page() {
        let (base, request) = serve_once(200, r#"{"audits": [], "total": 0}"#).await;
        let client = HistoryClient::new(base, Duration::from_secs(5)).unwrap();

        let page = client.list_audits(None, None, 100).await.unwrap();
        assert!(page.audits.is_empty());
        assert_eq!(page.per_page, 100);

        let request = request.await.unwrap();
        assert!(request.starts_with("GET /audits/history?per_page=100 "));
    }

    #[tokio::test]
    async fn test_list_audits_status_error() {
        let (base, _request) = serve_once(500, "oops").await;
        let client = HistoryClient::new(base, Duration::from_secs(5)).unwrap();

        let err = client.list_audits(None, Some(1), 10).await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_past_the_end_page_is_refetched_at_last_page() {
        let first = r#"{"audits": [], "total": 15, "per_page": 10}"#;
        let second = r#"{"audits": [{"id": 11, "url": "https://a.org", "status": "completed"}],
                         "total": 15, "per_page": 10}"#;
        let (base, requests) = serve_sequence(vec![
            (200, first.to_string()),
            (200, second.to_string()),
        ])
        .await;
        let client = HistoryClient::new(base, Duration::from_secs(5)).unwrap();

        let (history, pagination) = client.list_audits_clamped(None, 9, 10).await.unwrap();
        assert_eq!(pagination.page, 2);
        assert!(!pagination.has_next());
        assert_eq!(history.audits.len(), 1);

        let requests = requests.await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].starts_with("GET /audits/history?page=9&per_page=10 "));
        assert!(requests[1].starts_with("GET /audits/history?page=2&per_page=10 "));
    }

    #[tokio::test]
    async fn test_in_range_page_is_fetched_once() {
        let (base, request) =
            serve_once(200, r#"{"audits": [], "total": 15, "per_page": 10}"#).await;
        let client = HistoryClient::new(base, Duration::from_secs(5)).unwrap();

        let (_, pagination) = client.list_audits_clamped(None, 2, 10).await.unwrap();
        assert_eq!(pagination.page, 2);
        assert!(request.await.unwrap().contains("page=2"));
    }
}
