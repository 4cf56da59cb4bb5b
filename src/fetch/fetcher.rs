//! Resilient fetcher
//!
//! Wraps a [`Transport`] with the audit's retry rules:
//!
//! | Condition | Action |
//! |-----------|--------|
//! | HTTP 429 | Retry with backoff, `RateLimited` once attempts run out |
//! | Connection failure | Immediate → `Unreachable` |
//! | Timeout / other transport error | Retry with backoff, `Request` error once exhausted |
//! | Any other status | Returned as-is, including 4xx and 5xx |

use super::retry::{Pause, RetryPolicy, TokioPause};
use super::transport::{HttpTransport, Method, RawResponse, Transport, TransportError};
use crate::config::Config;
use reqwest::header::HeaderMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// A completed HTTP exchange
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Requested URL
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body (empty for HEAD)
    pub body: Vec<u8>,
    /// Wall time of the whole fetch, retries and backoff included
    pub elapsed: Duration,
}

impl FetchResult {
    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Returns a header value if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// Outcome of a fetch that did not hit a retry-exhaustion error
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The server answered (any status other than an exhausted 429)
    Fetched(FetchResult),
    /// The host could not be reached at all
    Unreachable { url: String, reason: String },
}

impl FetchOutcome {
    /// Returns the response if the server answered
    pub fn response(&self) -> Option<&FetchResult> {
        match self {
            Self::Fetched(result) => Some(result),
            Self::Unreachable { .. } => None,
        }
    }
}

/// Errors raised once the retry budget is spent
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("{url} still rate limited after {attempts} attempts")]
    RateLimited { url: String, attempts: u32 },

    #[error("{url} failed after {attempts} attempts: {message}")]
    Request {
        url: String,
        attempts: u32,
        message: String,
    },
}

/// HTTP fetcher with bounded exponential-backoff retries
pub struct ResilientFetcher {
    transport: Box<dyn Transport>,
    pause: Box<dyn Pause>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for ResilientFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientFetcher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ResilientFetcher {
    /// Creates a fetcher that sleeps with tokio between attempts
    pub fn new(transport: Box<dyn Transport>, policy: RetryPolicy) -> Self {
        Self::with_pause(transport, Box::new(TokioPause), policy)
    }

    /// Creates a fetcher with a custom pause implementation
    pub fn with_pause(
        transport: Box<dyn Transport>,
        pause: Box<dyn Pause>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            pause,
            policy,
        }
    }

    /// Builds a reqwest-backed fetcher from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let transport = HttpTransport::from_config(&config.user_agent, &config.fetch)?;
        Ok(Self::new(Box::new(transport), config.fetch.retry_policy()))
    }

    /// Issues a GET request
    pub async fn get(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        self.fetch(Method::Get, url).await
    }

    /// Issues a HEAD request
    pub async fn head(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        self.fetch(Method::Head, url).await
    }

    /// Issues a request, retrying rate limits and transient failures
    pub async fn fetch(&self, method: Method, url: &str) -> Result<FetchOutcome, FetchError> {
        let mut attempt = 0;
        let started = Instant::now();

        loop {
            attempt += 1;
            let attempt_started = Instant::now();
            let result = self.transport.send(method, url).await;
            let attempt_elapsed = attempt_started.elapsed();

            match result {
                Ok(RawResponse { status: 429, .. }) => {
                    if !self.policy.allows_retry_after(attempt) {
                        warn!("{} {} rate limited after {} attempts", method, url, attempt);
                        return Err(FetchError::RateLimited {
                            url: url.to_string(),
                            attempts: attempt,
                        });
                    }
                    debug!("{} {} returned 429 (attempt {})", method, url, attempt);
                }
                Ok(response) => {
                    debug!(
                        "{} {} -> {} in {:?}",
                        method, url, response.status, attempt_elapsed
                    );
                    return Ok(FetchOutcome::Fetched(FetchResult {
                        url: url.to_string(),
                        status: response.status,
                        headers: response.headers,
                        body: response.body,
                        elapsed: started.elapsed(),
                    }));
                }
                Err(TransportError::Connect(reason)) => {
                    warn!("{} {} unreachable: {}", method, url, reason);
                    return Ok(FetchOutcome::Unreachable {
                        url: url.to_string(),
                        reason,
                    });
                }
                Err(error) => {
                    if !self.policy.allows_retry_after(attempt) {
                        warn!("{} {} failed after {} attempts: {}", method, url, attempt, error);
                        return Err(FetchError::Request {
                            url: url.to_string(),
                            attempts: attempt,
                            message: error.to_string(),
                        });
                    }
                    debug!("{} {} attempt {} failed: {}", method, url, attempt, error);
                }
            }

            self.pause.pause(self.policy.backoff_for(attempt)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    type Script = Arc<Mutex<VecDeque<Result<RawResponse, TransportError>>>>;

    struct ScriptedTransport {
        script: Script,
        calls: Arc<Mutex<u32>>,
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, _method: Method, _url: &str) -> Result<RawResponse, TransportError> {
            *self.calls.lock().unwrap() += 1;
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Other("script exhausted".into())))
        }
    }

    #[derive(Default)]
    struct RecordingPause {
        pauses: Arc<Mutex<Vec<Duration>>>,
    }

    #[async_trait]
    impl Pause for RecordingPause {
        async fn pause(&self, duration: Duration) {
            self.pauses.lock().unwrap().push(duration);
        }
    }

    fn status(code: u16) -> Result<RawResponse, TransportError> {
        Ok(RawResponse {
            status: code,
            headers: HeaderMap::new(),
            body: b"<html></html>".to_vec(),
        })
    }

    struct Harness {
        fetcher: ResilientFetcher,
        calls: Arc<Mutex<u32>>,
        pauses: Arc<Mutex<Vec<Duration>>>,
    }

    fn harness(steps: Vec<Result<RawResponse, TransportError>>) -> Harness {
        let calls = Arc::new(Mutex::new(0));
        let pauses = Arc::new(Mutex::new(Vec::new()));
        let transport = ScriptedTransport {
            script: Arc::new(Mutex::new(steps.into_iter().collect())),
            calls: Arc::clone(&calls),
        };
        let pause = RecordingPause {
            pauses: Arc::clone(&pauses),
        };
        Harness {
            fetcher: ResilientFetcher::with_pause(
                Box::new(transport),
                Box::new(pause),
                RetryPolicy::default(),
            ),
            calls,
            pauses,
        }
    }

    #[tokio::test]
    async fn test_rate_limit_then_success() {
        let h = harness(vec![status(429), status(429), status(200)]);
        let outcome = h.fetcher.get("https://example.com/").await.unwrap();

        let response = outcome.response().expect("fetched");
        assert_eq!(response.status, 200);
        assert_eq!(*h.calls.lock().unwrap(), 3);
        assert_eq!(
            *h.pauses.lock().unwrap(),
            vec![Duration::from_secs(4), Duration::from_secs(8)]
        );
    }

    #[tokio::test]
    async fn test_elapsed_covers_backoff() {
        let transport = ScriptedTransport {
            script: Arc::new(Mutex::new(vec![status(429), status(200)].into_iter().collect())),
            calls: Arc::new(Mutex::new(0)),
        };
        let policy = RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(30),
            max_backoff: Duration::from_millis(30),
        };
        let fetcher = ResilientFetcher::new(Box::new(transport), policy);

        let outcome = fetcher.get("https://example.com/").await.unwrap();
        let response = outcome.response().expect("fetched");
        assert!(response.elapsed >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_rate_limit_exhausted() {
        let h = harness(vec![status(429), status(429), status(429)]);
        let result = h.fetcher.get("https://example.com/").await;

        assert!(matches!(
            result,
            Err(FetchError::RateLimited { attempts: 3, .. })
        ));
        assert_eq!(h.pauses.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_connect_error_is_unreachable_without_retry() {
        let h = harness(vec![Err(TransportError::Connect("refused".into()))]);
        let outcome = h.fetcher.get("https://example.com/").await.unwrap();

        assert!(matches!(outcome, FetchOutcome::Unreachable { .. }));
        assert_eq!(*h.calls.lock().unwrap(), 1);
        assert!(h.pauses.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_retried() {
        let h = harness(vec![
            Err(TransportError::Timeout("slow".into())),
            status(200),
        ]);
        let outcome = h.fetcher.head("https://example.com/").await.unwrap();

        assert!(outcome.response().unwrap().is_success());
        assert_eq!(h.pauses.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_request_error_after_exhaustion() {
        let h = harness(vec![
            Err(TransportError::Other("reset".into())),
            Err(TransportError::Other("reset".into())),
            Err(TransportError::Other("reset".into())),
        ]);
        let result = h.fetcher.get("https://example.com/").await;

        assert!(matches!(result, Err(FetchError::Request { attempts: 3, .. })));
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_retried() {
        let h = harness(vec![status(404)]);
        let outcome = h.fetcher.head("https://example.com/missing").await.unwrap();

        let response = outcome.response().unwrap();
        assert_eq!(response.status, 404);
        assert!(!response.is_success());
        assert_eq!(*h.calls.lock().unwrap(), 1);
    }
}
