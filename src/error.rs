//! Error types for backend calls and local validation.

use thiserror::Error;

/// Which screen an error surfaced on; picks the generic failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorContext {
    Analysis,
    History,
    GtmAccounts,
    GtmAnalysis,
}

/// Errors raised by the analyzer, history and GTM clients.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please enter a URL")]
    EmptyUrl,

    #[error("Please enter a valid URL (include https:// or http://)")]
    InvalidUrl { input: String },

    #[error("Please select an account and container")]
    MissingSelection,

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Please connect your Google account first")]
    NotConnected,

    #[error("{detail}")]
    Api { detail: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    /// True for failures detected before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::EmptyUrl | ClientError::InvalidUrl { .. } | ClientError::MissingSelection
        )
    }

    /// The message shown to the user. Status codes are never included.
    pub fn user_message(&self, context: ErrorContext) -> String {
        match self {
            ClientError::EmptyUrl
            | ClientError::InvalidUrl { .. }
            | ClientError::MissingSelection
            | ClientError::NotConnected
            | ClientError::Api { .. } => self.to_string(),
            ClientError::Network(_) if context != ErrorContext::Analysis => {
                "Network error. Please try again.".to_string()
            }
            ClientError::Network(_) | ClientError::Status { .. } | ClientError::Decode(_) => {
                generic_failure(context).to_string()
            }
        }
    }
}

fn generic_failure(context: ErrorContext) -> &'static str {
    match context {
        ErrorContext::Analysis => "Failed to analyze website. Please try again.",
        ErrorContext::History => "Failed to load audit history. Please try again.",
        ErrorContext::GtmAccounts => "Failed to fetch GTM accounts",
        ErrorContext::GtmAnalysis => "Failed to analyze GTM setup",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_not_surfaced() {
        let err = ClientError::Status {
            status: 503,
            body: "upstream down".to_string(),
        };
        let msg = err.user_message(ErrorContext::Analysis);
        assert_eq!(msg, "Failed to analyze website. Please try again.");
        assert!(!msg.contains("503"));
    }

    #[test]
    fn test_local_errors() {
        assert!(ClientError::EmptyUrl.is_local());
        assert!(ClientError::InvalidUrl {
            input: "nope".into()
        }
        .is_local());
        assert!(!ClientError::NotConnected.is_local());
    }

    #[test]
    fn test_not_connected_message() {
        assert_eq!(
            ClientError::NotConnected.user_message(ErrorContext::GtmAccounts),
            "Please connect your Google account first"
        );
    }

    #[test]
    fn test_api_detail_is_shown() {
        let err = ClientError::Api {
            detail: "Container not found".to_string(),
        };
        assert_eq!(
            err.user_message(ErrorContext::GtmAnalysis),
            "Container not found"
        );
    }
}
