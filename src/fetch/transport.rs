//! HTTP transport
//!
//! The single place that talks to the network. The resilient fetcher only
//! sees the [`Transport`] trait, which keeps retry behaviour testable without
//! a server.

use crate::config::{FetchConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// HTTP method used by the auditor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Head => write!(f, "HEAD"),
        }
    }
}

/// A response as returned by the transport, before retry classification
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Transport-level failures
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Host unreachable, DNS failure, refused connection or connect timeout
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request was sent but did not complete in time
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Any other request failure
    #[error("request failed: {0}")]
    Other(String),
}

/// Sends single HTTP requests
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, url: &str) -> Result<RawResponse, TransportError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site_audit::config::{FetchConfig, UserAgentConfig};
/// use site_audit::fetch::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetch: &FetchConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(fetch.request_timeout_secs))
        .connect_timeout(Duration::from_secs(fetch.connect_timeout_secs))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Transport`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(
        user_agent: &UserAgentConfig,
        fetch: &FetchConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, fetch)?))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: Method, url: &str) -> Result<RawResponse, TransportError> {
        let request = match method {
            Method::Get => self.client.get(url),
            Method::Head => self.client.head(url),
        };

        let response = request.send().await.map_err(classify_error)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();

        let body = match method {
            Method::Head => Vec::new(),
            Method::Get => response.bytes().await.map_err(classify_error)?.to_vec(),
        };

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Maps a reqwest error onto the transport taxonomy
///
/// Connect errors are checked first: a connect timeout is both a connect
/// and a timeout error, and must be treated as unreachable.
fn classify_error(error: reqwest::Error) -> TransportError {
    if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else if error.is_timeout() {
        TransportError::Timeout(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}
