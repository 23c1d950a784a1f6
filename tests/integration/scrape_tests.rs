//! Integration tests for the scraper
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full scrape cycle end-to-end over real HTTP.

use async_trait::async_trait;
use sitescope::config::ScraperConfig;
use sitescope::crawler::{scrape, DelayOutcome, HttpFetcher, ScrapeSettings, Scraper, Sleeper};
use sitescope::{FetchError, ScopeError, UrlError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records requested crawl delays and returns at once
#[derive(Clone, Default)]
struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    fn new() -> Self {
        Self::default()
    }

    fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) -> DelayOutcome {
        self.delays.lock().unwrap().push(delay);
        DelayOutcome::Elapsed
    }
}

/// Creates a scraper over HTTP whose crawl delays return immediately
fn create_test_scraper(sleeper: &RecordingSleeper) -> Scraper {
    let config = ScraperConfig {
        user_agent: "TestBot/1.0".to_string(),
        timeout_ms: 5_000,
        ..ScraperConfig::default()
    };

    Scraper::new(
        Arc::new(HttpFetcher::new(&config).expect("Failed to build HTTP client")),
        Arc::new(sleeper.clone()),
        ScrapeSettings::from_config(&config),
    )
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

fn text(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/plain")
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_scrape_with_sitemap_index() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/robots.txt",
        text(format!(
            "# test site\nUser-agent: *\nDisallow: /private\nCrawl-delay: 0.25\n\nSitemap: {}/sitemap_index.xml\n",
            base
        )),
    )
    .await;

    mount(
        &server,
        "/sitemap_index.xml",
        ResponseTemplate::new(200).set_body_raw(
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{base}/sitemap-pages.xml</loc></sitemap>
  <sitemap><loc>{base}/sitemap-extra.txt</loc></sitemap>
</sitemapindex>"#
            ),
            "application/xml",
        ),
    )
    .await;

    mount(
        &server,
        "/sitemap-pages.xml",
        ResponseTemplate::new(200).set_body_raw(
            format!(
                r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base}/from-sitemap</loc></url>
  <url><loc>{base}/page1</loc></url>
  <url><loc>https://other.org/elsewhere</loc></url>
</urlset>"#
            ),
            "application/xml",
        ),
    )
    .await;

    mount(
        &server,
        "/sitemap-extra.txt",
        text(format!("{base}/from-text\n\n{base}/private\n")),
    )
    .await;

    mount(
        &server,
        "/start",
        html(
            r##"<html><head><title>Start</title></head><body>
            <a href="page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="/private">Private</a>
            <a href="https://other.org/x">Elsewhere</a>
            <a href="#top">Top</a>
            <a href="mailto:owner@example.com">Mail</a>
            <a href="/page1">Page 1 again</a>
            </body></html>"##,
        ),
    )
    .await;

    let sleeper = RecordingSleeper::new();
    let report = create_test_scraper(&sleeper)
        .scrape(&format!("{}/start", base))
        .await
        .expect("Scrape failed");

    assert_eq!(report.page.url, format!("{}/start", base));
    assert_eq!(
        report.links().collect::<Vec<_>>(),
        vec![
            format!("{base}/page1"),
            format!("{base}/page2"),
            format!("{base}/from-sitemap"),
            format!("{base}/from-text"),
        ]
    );
    assert!(!report.robots_degraded);
    assert_eq!(report.crawl_delay, Duration::from_millis(250));
    assert_eq!(report.sitemap_urls, 5);
    assert_eq!(sleeper.delays(), vec![Duration::from_millis(250)]);
}

#[tokio::test]
async fn test_missing_robots_allows_all() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/robots.txt", ResponseTemplate::new(404)).await;
    mount(
        &server,
        "/",
        html(r#"<a href="/admin">Admin</a><a href="/about">About</a>"#),
    )
    .await;

    let sleeper = RecordingSleeper::new();
    let report = create_test_scraper(&sleeper)
        .scrape(&base)
        .await
        .expect("Scrape failed");

    assert!(report.robots_degraded);
    assert_eq!(report.crawl_delay, Duration::from_millis(1000));
    assert_eq!(report.links().count(), 2);
}

#[tokio::test]
async fn test_page_server_error_is_fatal() {
    let server = MockServer::start().await;

    mount(&server, "/robots.txt", text("User-agent: *\nAllow: /")).await;
    mount(&server, "/broken", ResponseTemplate::new(500)).await;

    let sleeper = RecordingSleeper::new();
    let result = create_test_scraper(&sleeper)
        .scrape(&format!("{}/broken", server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(ScopeError::PageFetch(FetchError::Status { status: 500, .. }))
    ));
}

#[tokio::test]
async fn test_forbidden_page_yields_no_links() {
    let server = MockServer::start().await;

    mount(&server, "/robots.txt", ResponseTemplate::new(404)).await;
    mount(&server, "/", ResponseTemplate::new(403)).await;

    let sleeper = RecordingSleeper::new();
    let report = create_test_scraper(&sleeper)
        .scrape(&server.uri())
        .await
        .expect("403 should not be fatal");

    assert!(report.page.links.is_empty());
}

#[tokio::test]
async fn test_non_html_page_rejected() {
    let server = MockServer::start().await;

    mount(&server, "/robots.txt", ResponseTemplate::new(404)).await;
    mount(
        &server,
        "/data.json",
        ResponseTemplate::new(200).set_body_raw(r#"{"links": []}"#, "application/json"),
    )
    .await;

    let sleeper = RecordingSleeper::new();
    let result = create_test_scraper(&sleeper)
        .scrape(&format!("{}/data.json", server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(ScopeError::PageFetch(FetchError::UnsupportedContentType { .. }))
    ));
}

#[tokio::test]
async fn test_invalid_url_makes_no_requests() {
    let server = MockServer::start().await;

    let sleeper = RecordingSleeper::new();
    let scraper = create_test_scraper(&sleeper);

    assert!(matches!(
        scraper.scrape("not a url").await,
        Err(ScopeError::InvalidUrl(UrlError::Parse(_)))
    ));
    assert!(matches!(
        scraper.scrape("").await,
        Err(ScopeError::InvalidUrl(UrlError::Empty))
    ));

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_disallowed_target_is_not_fetched() {
    let server = MockServer::start().await;

    mount(&server, "/robots.txt", text("User-agent: testbot\nDisallow: /members/*")).await;
    Mock::given(method("GET"))
        .and(path("/members/area"))
        .respond_with(html("<a href=\"/secret\">x</a>"))
        .expect(0)
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::new();
    let report = create_test_scraper(&sleeper)
        .scrape(&format!("{}/members/area", server.uri()))
        .await
        .expect("Disallowed target should not be an error");

    assert!(report.disallowed);
    assert!(report.page.links.is_empty());
    assert!(sleeper.delays().is_empty());
}

#[tokio::test]
async fn test_broken_sitemaps_are_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/robots.txt",
        text(format!(
            "User-agent: *\nSitemap: {base}/missing.xml\nSitemap: {base}/broken.xml\nSitemap: {base}/good.txt"
        )),
    )
    .await;
    mount(&server, "/missing.xml", ResponseTemplate::new(500)).await;
    mount(
        &server,
        "/broken.xml",
        text("<urlset><url><loc>unterminated</url>"),
    )
    .await;
    mount(&server, "/good.txt", text(format!("{base}/listed\n"))).await;
    mount(&server, "/", html("<p>No links here</p>")).await;

    let sleeper = RecordingSleeper::new();
    let report = create_test_scraper(&sleeper)
        .scrape(&base)
        .await
        .expect("Sitemap failures should not be fatal");

    assert_eq!(
        report.links().collect::<Vec<_>>(),
        vec![format!("{base}/listed")]
    );
    assert_eq!(report.sitemap_urls, 1);
}

#[tokio::test]
async fn test_links_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/robots.txt", ResponseTemplate::new(404)).await;
    let location = format!("{base}/docs/new");
    mount(
        &server,
        "/old",
        ResponseTemplate::new(301).insert_header("Location", location.as_str()),
    )
    .await;
    mount(&server, "/docs/new", html(r#"<a href="child">Child</a>"#)).await;

    let sleeper = RecordingSleeper::new();
    let report = create_test_scraper(&sleeper)
        .scrape(&format!("{base}/old"))
        .await
        .expect("Scrape failed");

    assert_eq!(
        report.links().collect::<Vec<_>>(),
        vec![format!("{base}/docs/child")]
    );
}

#[tokio::test]
async fn test_scrape_entry_point() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/robots.txt", text("User-agent: *\nAllow: /")).await;
    mount(&server, "/", html(r#"<a href="/one">One</a>"#)).await;

    let config = ScraperConfig {
        default_crawl_delay_ms: 0,
        ..ScraperConfig::default()
    };
    let report = scrape(&config, &base, CancellationToken::new())
        .await
        .expect("Scrape failed");

    assert_eq!(report.crawl_delay, Duration::ZERO);
    assert_eq!(
        report.links().collect::<Vec<_>>(),
        vec![format!("{base}/one")]
    );
}
