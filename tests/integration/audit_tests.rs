//! End-to-end audits against a mock site

use crate::{fast_config, fetcher};
use site_audit::audit::{AuditSession, PageAnalyzer, PageOutcome, Scope};
use site_audit::output::{build_report, write_report};
use site_audit::{AuditError, Category};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNMINIFIED_CSS: &str = "body {\n    margin: 0;\n}\n\np {\n    color: black;\n}\n";

fn home_page() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
<title>A reasonably descriptive page title here</title>
<link rel="stylesheet" href="/style.css">
</head>
<body>
<h1>Welcome</h1>
<img src="/hero.png">
<a href="/missing">Missing page</a>
<a href="https://other.example.org/">Elsewhere</a>
<div id="footer-page"><img src="/footer-logo.png"></div>
</body>
</html>"#
        .to_string()
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html")
                .insert_header("server", "mock-server"),
        )
        .mount(server)
        .await;
}

async fn mount_head(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_page_audit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", home_page()).await;
    mount_head(&mock_server, "/missing", 404).await;
    mount_head(&mock_server, "/robots.txt", 200).await;
    mount_head(&mock_server, "/sitemap.xml", 404).await;
    mount_head(&mock_server, "/sitemap_index.xml", 200).await;
    Mock::given(method("GET"))
        .and(path("/style.css"))
        .respond_with(ResponseTemplate::new(200).set_body_string(UNMINIFIED_CSS))
        .mount(&mock_server)
        .await;

    let config = fast_config();
    let fetcher = fetcher(&config);
    let analyzer = PageAnalyzer::new(&fetcher, &config.audit);
    let page_url = Url::parse(&format!("{}/", base_url)).unwrap();

    let outcome = analyzer.analyze(&page_url, None).await;
    let result = outcome.as_completed().expect("Page should complete");

    assert_eq!(
        result.title.as_deref(),
        Some("A reasonably descriptive page title here")
    );
    assert_eq!(result.server.as_deref(), Some("mock-server"));
    assert_eq!(result.internal_links, 1);
    assert_eq!(result.external_links, 1);
    assert!(result.heading_hierarchy_ok);

    // The footer image is pruned before the rules run
    assert_eq!(result.findings.count(Category::MissingAltText), 1);

    assert_eq!(
        result.findings.get(Category::BrokenLinks),
        [format!("{}/missing", base_url)]
    );
    assert_eq!(result.findings.get(Category::UnminifiedCss), ["/style.css"]);
    assert!(!result.findings.contains(Category::Robots));
    assert!(!result.findings.contains(Category::Sitemap));
    assert!(!result.findings.contains(Category::DuplicateContent));
    assert_eq!(
        result.sitemap_url.as_deref(),
        Some(format!("{}/sitemap_index.xml", base_url).as_str())
    );
    assert!(result
        .seo_summary
        .contains(&format!("Robots URL: {}/robots.txt", base_url)));
}

#[tokio::test]
async fn test_missing_robots_and_sitemap_are_reported() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        "<html><body><p>Bare</p></body></html>".to_string(),
    )
    .await;

    let config = fast_config();
    let fetcher = fetcher(&config);
    let analyzer = PageAnalyzer::new(&fetcher, &config.audit);
    let page_url = Url::parse(&mock_server.uri()).unwrap();

    let outcome = analyzer.analyze(&page_url, None).await;
    let result = outcome.as_completed().unwrap();

    assert_eq!(
        result.findings.get(Category::Robots),
        ["No robots.txt file found"]
    );
    assert_eq!(
        result.findings.get(Category::Sitemap),
        ["Neither sitemap.xml nor sitemap_index.xml found"]
    );
    assert!(result.sitemap_url.is_none());
}

#[tokio::test]
async fn test_server_error_fails_the_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = fast_config();
    let fetcher = fetcher(&config);
    let analyzer = PageAnalyzer::new(&fetcher, &config.audit);
    let page_url = Url::parse(&format!("{}/broken", mock_server.uri())).unwrap();

    match analyzer.analyze(&page_url, None).await {
        PageOutcome::Failed { url, reason } => {
            assert_eq!(url, page_url.to_string());
            assert_eq!(reason, "HTTP status 500");
        }
        PageOutcome::Completed(_) => panic!("Expected the page to fail"),
    }
}

#[tokio::test]
async fn test_site_audit_detects_duplicates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
            <a href="/a">A</a>
            <a href="/b">B</a>
            <a href="/c">C</a>
            <a href="/a">A again</a>
            <a href="/banner.png">Banner</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/a",
        format!(
            r#"<html><body><p>Shared text. See {}/a</p><div id="footer-page">Footer A</div></body></html>"#,
            base_url
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/b",
        format!(
            r#"<html><body><p>Shared text. See {}/b</p><div id="footer-page">Footer B</div></body></html>"#,
            base_url
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/c",
        "<html><body><p>Something else entirely</p></body></html>".to_string(),
    )
    .await;

    let config = fast_config();
    let fetcher = fetcher(&config);
    let seed = Url::parse(&format!("{}/", base_url)).unwrap();
    let session = AuditSession::new(&fetcher, &config, seed, Scope::Site);

    let report = session.run().await.expect("Seed should be reachable");

    let targets: Vec<String> = report.targets.iter().map(Url::to_string).collect();
    assert_eq!(
        targets,
        [
            format!("{}/a", base_url),
            format!("{}/b", base_url),
            format!("{}/c", base_url)
        ]
    );
    assert_eq!(report.outcomes.len(), 3);
    let first = report.outcomes[0].as_completed().unwrap();
    assert_eq!(first.server.as_deref(), Some("mock-server"));

    let expected = format!("{}/a and {}/b", base_url, base_url);
    for outcome in &report.outcomes[..2] {
        let result = outcome.as_completed().unwrap();
        assert_eq!(result.findings.get(Category::DuplicateContent), [expected.clone()]);
    }
    let other = report.outcomes[2].as_completed().unwrap();
    assert!(!other.findings.contains(Category::DuplicateContent));
}

#[tokio::test]
async fn test_site_audit_keeps_going_after_page_failure() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/ok">Ok</a><a href="/down">Down</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/ok",
        "<html><head><title>Ok</title></head><body><p>Fine</p></body></html>".to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = fast_config();
    let fetcher = fetcher(&config);
    let seed = Url::parse(&mock_server.uri()).unwrap();
    let report = AuditSession::new(&fetcher, &config, seed, Scope::Site)
        .run()
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert!(report.outcomes[0].is_completed());
    assert!(!report.outcomes[1].is_completed());
    assert_eq!(report.failed_count(), 1);

    let combined = build_report(&report).unwrap();
    assert_eq!(combined.pages.len(), 1);
    assert_eq!(combined.general_info.total_urls, 1);
}

#[tokio::test]
async fn test_unreachable_seed_aborts_session() {
    let config = fast_config();
    let fetcher = fetcher(&config);
    let seed = Url::parse("http://127.0.0.1:1/").unwrap();

    let result = AuditSession::new(&fetcher, &config, seed, Scope::Page)
        .run()
        .await;

    assert!(matches!(result, Err(AuditError::SeedUnavailable { .. })));
}

#[tokio::test]
async fn test_report_written_to_disk() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", home_page()).await;

    let dir = TempDir::new().unwrap();
    let mut config = fast_config();
    config.output.report_path = dir.path().join("report.html").display().to_string();

    let fetcher = fetcher(&config);
    let seed = Url::parse(&mock_server.uri()).unwrap();
    let session = AuditSession::new(&fetcher, &config, seed, Scope::Page)
        .run()
        .await
        .unwrap();

    let report = build_report(&session).unwrap();
    let written = write_report(&report, &config.output).unwrap();
    let html = std::fs::read_to_string(written).unwrap();

    assert!(html.contains("General information"));
    assert!(html.contains("Web server: mock-server"));
    assert!(html.contains(r#"id="accordion-0-0""#));

    let high = html.find(r#"data-severity="high""#).unwrap();
    let low = html.find(r#"data-severity="low""#).unwrap();
    assert!(high < low);
}
