//! HTTP clients for the analyzer, audit-history and GTM backends.
//!
//! Each client owns a `reqwest::Client` configured with the request timeout
//! and issues exactly one request per call. Nothing is retried.

pub mod analyzer;
pub mod gtm;
pub mod history;

pub use analyzer::{AnalyzerClient, DemoMode};
pub use gtm::{connect_url, GtmClient};
pub use history::HistoryClient;

use crate::error::ClientError;
use reqwest::{Response, Url};
use std::time::Duration;
use tracing::warn;

/// Build the shared HTTP client with the configured timeout.
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ClientError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("webdoctor/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Join a base URL and an endpoint path without doubling slashes.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Validate a user-supplied website URL before any request is made.
///
/// The input must parse as an absolute URL with both a scheme and a host.
pub fn validate_url(input: &str) -> Result<Url, ClientError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ClientError::EmptyUrl);
    }

    let invalid = || ClientError::InvalidUrl {
        input: trimmed.to_string(),
    };

    let url = Url::parse(trimmed).map_err(|_| invalid())?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(invalid()),
    }
}

/// Turn a non-2xx response into `ClientError::Status`, logging the details.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    warn!("{} responded with {}: {}", url, status, body);
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Decode a JSON body, mapping failures to `ClientError::Decode`.
pub(crate) async fn decode_json<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, ClientError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

/// One-shot HTTP responder for exercising the clients in tests.
#[cfg(test)]
pub(crate) mod test_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve a single request with the given status and body.
    ///
    /// Returns the base URL and a handle resolving to the raw request text.
    pub async fn serve_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
        let (base, handle) = serve_sequence(vec![(status, body.to_string())]).await;
        let handle = tokio::spawn(async move {
            handle
                .await
                .unwrap()
                .into_iter()
                .next()
                .unwrap_or_default()
        });
        (base, handle)
    }

    /// Serve one request per canned response, in order, on the same address.
    pub async fn serve_sequence(
        responses: Vec<(u16, String)>,
    ) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);

                let response = format!(
                    "HTTP/1.1 {} Canned\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
            requests
        });

        (format!("http://{}", addr), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&buf).into_owned()
    }
}
