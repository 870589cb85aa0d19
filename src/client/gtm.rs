//! Client for the Google Tag Manager backend.

use super::{build_http_client, decode_json, endpoint};
use crate::error::ClientError;
use crate::models::{
    ApiErrorBody, GtmAccount, GtmAccountsResponse, GtmAnalysisRequest, GtmSetupReport,
};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct GtmClient {
    http: reqwest::Client,
    base_url: String,
}

/// URL the user opens to connect their Google account.
pub fn connect_url(base_url: &str) -> String {
    endpoint(base_url, "auth/google")
}

impl GtmClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    /// List the GTM accounts visible to a user.
    ///
    /// A 401 means the user has not connected a Google account yet.
    pub async fn accounts(&self, user_id: &str) -> Result<Vec<GtmAccount>, ClientError> {
        let url = endpoint(&self.base_url, &format!("gtm/accounts/{}", user_id));
        info!("Fetching GTM accounts for user {}", user_id);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("GTM accounts request unauthorized for user {}", user_id);
            return Err(ClientError::NotConnected);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GTM accounts request failed with {}: {}", status, body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let accounts: GtmAccountsResponse = decode_json(response).await?;
        Ok(accounts.account)
    }

    /// Analyze one container's setup.
    ///
    /// A `detail` message in an error body is passed through to the caller.
    pub async fn analyze(
        &self,
        request: &GtmAnalysisRequest,
    ) -> Result<GtmSetupReport, ClientError> {
        if request.account_id.trim().is_empty() || request.container_id.trim().is_empty() {
            return Err(ClientError::MissingSelection);
        }

        let url = endpoint(&self.base_url, "gtm/analyze");
        info!(
            "Analyzing GTM container {} in account {}",
            request.container_id, request.account_id
        );

        let response = self.http.post(&url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GTM analysis failed with {}: {}", status, body);
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail)
                .filter(|d| !d.is_empty());
            return Err(match detail {
                Some(detail) => ClientError::Api { detail },
                None => ClientError::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        decode_json(response).await
    }
}
