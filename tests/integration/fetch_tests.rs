//! Resilient fetcher against a live mock server

use crate::{fast_config, fetcher};
use site_audit::fetch::FetchError;
use site_audit::FetchOutcome;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn requests_to(server: &MockServer, wanted: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == wanted)
        .count()
}

#[tokio::test]
async fn test_rate_limited_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(200).set_body_string("finally"))
        .mount(&mock_server)
        .await;

    let config = fast_config();
    let outcome = fetcher(&config)
        .get(&format!("{}/busy", mock_server.uri()))
        .await
        .expect("Fetch should succeed after retries");

    let response = outcome.response().expect("Expected a response");
    assert_eq!(response.status, 200);
    assert_eq!(response.text(), "finally");
    assert_eq!(requests_to(&mock_server, "/busy").await, 3);
}

#[tokio::test]
async fn test_rate_limited_until_attempts_run_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let config = fast_config();
    let result = fetcher(&config)
        .get(&format!("{}/busy", mock_server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(FetchError::RateLimited { attempts: 3, .. })
    ));
    assert_eq!(requests_to(&mock_server, "/busy").await, 3);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = fast_config();
    let outcome = fetcher(&config)
        .head(&format!("{}/gone", mock_server.uri()))
        .await
        .expect("A 404 is a response, not an error");

    assert_eq!(outcome.response().map(|r| r.status), Some(404));
    assert_eq!(requests_to(&mock_server, "/gone").await, 1);
}

#[tokio::test]
async fn test_connection_refused_is_unreachable() {
    let config = fast_config();
    let outcome = fetcher(&config)
        .get("http://127.0.0.1:1/")
        .await
        .expect("Connection failures are reported as an outcome");

    assert!(matches!(outcome, FetchOutcome::Unreachable { .. }));
}

#[tokio::test]
async fn test_user_agent_header_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(wiremock::matchers::header_regex("user-agent", "^site-audit/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = fast_config();
    let outcome = fetcher(&config)
        .get(&format!("{}/", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(outcome.response().map(|r| r.status), Some(200));
}
