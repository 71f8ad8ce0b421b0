//! HTTP transport boundary.
//!
//! The session client speaks to the service through the [`Transport`] trait
//! so the login/logout lifecycle can be exercised without network access.
//! [`HttpTransport`] is the production implementation backed by `reqwest`.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use super::error::TransportError;

/// HTTP request timeout in seconds.
/// The underlying transport default is effectively unbounded; 30s tolerates
/// the service's slow responses while still failing fast.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Body of a single POST to the service.
///
/// Login is the only endpoint that takes JSON, and the service wants it
/// compactly encoded; every other endpoint takes conventional form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Pre-encoded compact JSON (login only).
    Json(String),
    /// Form fields (session-backed endpoints).
    Form(Vec<(&'static str, String)>),
}

/// One POST to the service, resolving to the response body text on 2xx.
///
/// A non-2xx response is a [`TransportError::Status`] carrying the status
/// code and raw body; connection-level failures are
/// [`TransportError::Network`].
pub trait Transport {
    async fn post(&self, url: &str, body: RequestBody) -> Result<String, TransportError>;
}

/// Production transport over `reqwest`.
/// Clone is cheap - `reqwest::Client` uses Arc internally for connection
/// pooling.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .default_headers(Self::fixed_headers())
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Headers the service expects on every call. The empty `User-Agent` is
    /// deliberate: the service misbehaves when one is populated.
    fn fixed_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(""));
        headers
    }
}

impl Transport for HttpTransport {
    async fn post(&self, url: &str, body: RequestBody) -> Result<String, TransportError> {
        let request = match body {
            // The login endpoint reads the JSON body as-is; no content type.
            RequestBody::Json(json) => self.client.post(url).body(json),
            RequestBody::Form(fields) => self.client.post(url).form(&fields),
        };

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(url, status = %status, "POST completed");

        if status.is_success() {
            Ok(text)
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}
