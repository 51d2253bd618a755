//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full expand-then-visit cycle end-to-end.

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use sitemap_seo::config::Config;
use sitemap_seo::crawler::{crawl, run_crawl, Crawler, Document, Fetcher};
use sitemap_seo::output::write_csv;
use sitemap_seo::SeoError;
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with a short timeout and fixed agent seed
fn create_test_config(concurrency: usize) -> Config {
    let mut config = Config::default();
    config.crawler.concurrency = concurrency;
    config.crawler.request_timeout_secs = 2;
    config.user_agent.agents = vec!["TestBot/1.0".to_string(), "TestBot/2.0".to_string()];
    config.user_agent.seed = Some(11);
    config
}

fn sitemap_index(children: &[String]) -> String {
    let entries: String = children
        .iter()
        .map(|child| format!("<sitemap><loc>{}</loc></sitemap>", child))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

fn urlset(pages: &[String]) -> String {
    let entries: String = pages
        .iter()
        .map(|page| format!("<url><loc>{}</loc></url>", page))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn html_page(title: &str) -> String {
    format!(
        r#"<html><head><title>{title}</title>
        <meta name="description" content="About {title}"></head>
        <body><h1>{title} heading</h1></body></html>"#
    )
}

async fn mount_xml(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, route: &str, title: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page(title))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn sorted_titles(records: &[sitemap_seo::SeoRecord]) -> Vec<String> {
    let mut titles: Vec<String> = records.iter().map(|r| r.title.clone()).collect();
    titles.sort();
    titles
}

#[tokio::test]
async fn test_full_crawl_two_child_sitemaps() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/a.xml", base_url), format!("{}/b.xml", base_url)]),
    )
    .await;
    mount_xml(
        &mock_server,
        "/a.xml",
        urlset(&[format!("{}/a1", base_url), format!("{}/a2", base_url)]),
    )
    .await;
    mount_xml(
        &mock_server,
        "/b.xml",
        urlset(&[
            format!("{}/b1", base_url),
            format!("{}/b2", base_url),
            format!("{}/b3", base_url),
        ]),
    )
    .await;
    for name in ["a1", "a2", "b1", "b2", "b3"] {
        mount_page(&mock_server, &format!("/{}", name), name).await;
    }

    let config = create_test_config(3);
    let report = run_crawl(&config, &format!("{}/sitemap.xml", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(report.sitemaps_fetched, 3);
    assert_eq!(report.frontier_len, 5);
    assert_eq!(report.pages_visited, 5);
    assert_eq!(report.failures(), 0);
    assert_eq!(sorted_titles(&report.records), vec!["a1", "a2", "b1", "b2", "b3"]);

    let a1 = report
        .records
        .iter()
        .find(|r| r.title == "a1")
        .expect("a1 record");
    assert_eq!(a1.url, format!("{}/a1", base_url));
    assert_eq!(a1.h1, "a1 heading");
    assert_eq!(a1.meta_description, "About a1");
    assert_eq!(a1.status_code, 200);
    assert!(report.records.iter().all(|r| !r.url.contains(".xml")));
}

#[tokio::test]
async fn test_page_in_two_branches_is_visited_twice() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let shared = format!("{}/shared", base_url);

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/a.xml", base_url), format!("{}/b.xml", base_url)]),
    )
    .await;
    mount_xml(&mock_server, "/a.xml", urlset(&[shared.clone()])).await;
    mount_xml(&mock_server, "/b.xml", urlset(&[shared.clone()])).await;
    mount_page(&mock_server, "/shared", "Shared").await;

    let report = run_crawl(&create_test_config(2), &format!("{}/sitemap.xml", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(report.frontier_len, 2);
    assert_eq!(report.records.len(), 2);
    assert!(report.records.iter().all(|r| r.url == shared));
}

#[tokio::test]
async fn test_failed_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[
            format!("{}/ok1", base_url),
            format!("{}/broken", base_url),
            format!("{}/ok2", base_url),
        ]),
    )
    .await;
    mount_page(&mock_server, "/ok1", "ok1").await;
    mount_page(&mock_server, "/ok2", "ok2").await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let report = run_crawl(&create_test_config(2), &format!("{}/sitemap.xml", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.page_failures, 1);
    assert_eq!(sorted_titles(&report.records), vec!["ok1", "ok2"]);
}

#[tokio::test]
async fn test_gzip_child_sitemap() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(urlset(&[format!("{}/zipped", base_url)]).as_bytes())
        .unwrap();
    let compressed = encoder.finish().unwrap();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/pages.xml.gz", base_url)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/pages.xml.gz"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(compressed)
                .insert_header("content-type", "application/x-gzip"),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/zipped", "Zipped").await;

    let report = run_crawl(&create_test_config(1), &format!("{}/sitemap.xml", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(report.sitemap_failures, 0);
    assert_eq!(sorted_titles(&report.records), vec!["Zipped"]);
}

#[tokio::test]
async fn test_redirected_page_records_final_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/old", base_url)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", "New").await;

    let report = run_crawl(&create_test_config(1), &format!("{}/sitemap.xml", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].url, format!("{}/new", base_url));
    assert_eq!(report.records[0].status_code, 200);
}

#[tokio::test]
async fn test_requests_carry_configured_user_agent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/p1", base_url), format!("{}/p2", base_url)]),
    )
    .await;
    // Pages only answer requests carrying one of the configured agents
    for agent in ["TestBot/1.0", "TestBot/2.0"] {
        Mock::given(method("GET"))
            .and(path_regex("^/p[0-9]$"))
            .and(header("user-agent", agent))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(html_page(agent))
                    .insert_header("content-type", "text/html"),
            )
            .mount(&mock_server)
            .await;
    }

    let report = run_crawl(&create_test_config(2), &format!("{}/sitemap.xml", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(report.page_failures, 0);
    assert_eq!(report.records.len(), 2);
    for record in &report.records {
        assert!(
            record.title == "TestBot/1.0" || record.title == "TestBot/2.0",
            "unexpected agent {}",
            record.title
        );
    }
}

#[tokio::test]
async fn test_unreachable_root_terminates_cleanly() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let report = run_crawl(
        &create_test_config(4),
        &format!("{}/sitemap.xml", mock_server.uri()),
    )
    .await
    .expect("Crawl failed");

    assert!(report.records.is_empty());
    assert_eq!(report.sitemap_failures, 1);
    assert_eq!(report.frontier_len, 0);
}

#[tokio::test]
async fn test_crawl_rejects_zero_concurrency() {
    let result = crawl("http://127.0.0.1:9/sitemap.xml", 0).await;
    assert!(matches!(result, Err(SeoError::Config(_))));
}

#[tokio::test]
async fn test_results_export_to_csv() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/only", base_url)]),
    )
    .await;
    mount_page(&mock_server, "/only", "Only").await;

    let report = crawl(&format!("{}/sitemap.xml", base_url), 2)
        .await
        .expect("Crawl failed");

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("scraped_data.csv");
    write_csv(&report.records, &csv_path).unwrap();

    let content = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "url,title,h1,meta_description,status_code");
    assert_eq!(
        lines[1],
        format!("{}/only,Only,Only heading,About Only,200", base_url)
    );
}

/// In-memory fetcher recording how many requests overlap
struct InstrumentedFetcher {
    documents: HashMap<String, String>,
    delay: Duration,
    current: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl Fetcher for InstrumentedFetcher {
    async fn get(
        &self,
        url: &str,
        _user_agent: &str,
        _timeout: Duration,
    ) -> Result<Document, SeoError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.current.fetch_sub(1, Ordering::SeqCst);

        let body = self.documents.get(url).cloned().ok_or(SeoError::HttpStatus {
            url: url.to_string(),
            status: 404,
        })?;

        Ok(Document {
            url: url.to_string(),
            status: 200,
            body,
        })
    }
}

#[tokio::test]
async fn test_peak_concurrency_never_exceeds_limit() {
    let pages: Vec<String> = (0..30).map(|i| format!("https://site.test/p{}", i)).collect();

    let mut documents = HashMap::new();
    documents.insert("https://site.test/sitemap.xml".to_string(), urlset(&pages));
    for (i, page) in pages.iter().enumerate() {
        documents.insert(page.clone(), html_page(&format!("p{}", i)));
    }

    let fetcher = Arc::new(InstrumentedFetcher {
        documents,
        delay: Duration::from_millis(15),
        current: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });

    let crawler = Crawler::with_fetcher(&create_test_config(4), fetcher.clone()).unwrap();
    let report = crawler.run("https://site.test/sitemap.xml").await;

    assert_eq!(report.records.len(), 30);
    let peak = fetcher.peak.load(Ordering::SeqCst);
    assert!(peak <= 4, "peak concurrency was {}", peak);
    assert!(peak >= 1);
}
