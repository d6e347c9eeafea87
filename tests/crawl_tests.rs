//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock registries and exercise the full
//! crawl cycle end-to-end: index discovery, per-package distribution
//! discovery, size probing, and the CSV output.

use registry_sounder::config::{Config, CrawlerConfig, OutputConfig, RegistryConfig, ReportConfig};
use registry_sounder::crawler::{build_http_client, crawl, CrawlOutcome, RequestGate};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the given index URL
fn create_test_config(index_url: &str, csv_path: &str) -> Config {
    Config {
        registry: RegistryConfig {
            index_url: index_url.to_string(),
        },
        crawler: CrawlerConfig {
            max_concurrent_requests: 8,
            launch_delay_micros: 0,
            fail_fast: false,
        },
        output: OutputConfig {
            csv_path: csv_path.to_string(),
        },
        report: ReportConfig::default(),
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("output file should exist")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Mounts a GET mock serving an HTML body at the given path
async fn mount_page(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a HEAD mock whose Content-Length reports the given size
async fn mount_file(server: &MockServer, at: &str, size: usize) {
    Mock::given(method("HEAD"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; size]))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_two_packages() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Index lists two packages through relative hrefs
    mount_page(
        &server,
        "/simple/",
        "<html><body>\n<a href=\"pkga/\">pkgA</a>\n<a href=\"pkgb/\">pkgB</a>\n</body></html>"
            .to_string(),
    )
    .await;

    // Each package page exposes one distribution through an absolute href
    mount_page(
        &server,
        "/simple/pkga/",
        format!("<a href=\"{}/files/pkg_a-1.0.tar.gz\">pkg_a-1.0.tar.gz</a>\n", base),
    )
    .await;
    mount_page(
        &server,
        "/simple/pkgb/",
        format!("<a href=\"{}/files/pkg_b-2.0.tar.gz\">pkg_b-2.0.tar.gz</a>\n", base),
    )
    .await;

    mount_file(&server, "/files/pkg_a-1.0.tar.gz", 1024).await;
    mount_file(&server, "/files/pkg_b-2.0.tar.gz", 2048).await;

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("out.csv");
    let config = create_test_config(&format!("{}/simple/", base), csv_path.to_str().unwrap());

    let report = crawl(config).await.expect("crawl should succeed");

    assert_eq!(report.outcome, CrawlOutcome::Complete);
    assert_eq!(report.packages_total, 2);
    assert_eq!(report.packages_scraped, 2);
    assert_eq!(report.distributions_found, 2);
    assert_eq!(report.total_size_bytes, 3072);
    assert!(report.failures.is_empty());

    let lines = read_lines(&csv_path);
    assert_eq!(lines.len(), 3, "expected header plus two rows");
    assert_eq!(lines[0], "Package,Distribution,Size");
    // Row order follows probe completion, so compare as a set
    assert!(lines.contains(&"pkgA,pkg_a-1.0.tar.gz,1024".to_string()));
    assert!(lines.contains(&"pkgB,pkg_b-2.0.tar.gz,2048".to_string()));
}

#[tokio::test]
async fn test_index_redirect_resolves_against_final_url() {
    let server = MockServer::start().await;
    let base = server.uri();

    // The configured index URL redirects to the real one; relative hrefs
    // must resolve against the post-redirect URL
    Mock::given(method("GET"))
        .and(path("/old-index"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/simple/"))
        .mount(&server)
        .await;

    mount_page(
        &server,
        "/simple/",
        "<a href=\"pkg-a/\">pkg-a</a>\n".to_string(),
    )
    .await;
    mount_page(
        &server,
        "/simple/pkg-a/",
        format!("<a href=\"{}/files/pkg_a-0.1.zip\">pkg_a-0.1.zip</a>\n", base),
    )
    .await;
    mount_file(&server, "/files/pkg_a-0.1.zip", 512).await;

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("out.csv");
    let config = create_test_config(&format!("{}/old-index", base), csv_path.to_str().unwrap());

    let report = crawl(config).await.expect("crawl should succeed");

    assert_eq!(report.packages_total, 1);
    assert_eq!(report.total_size_bytes, 512);

    let lines = read_lines(&csv_path);
    assert!(lines.contains(&"pkg-a,pkg_a-0.1.zip,512".to_string()));
}

#[tokio::test]
async fn test_package_failure_is_isolated_by_default() {
    let server = MockServer::start().await;
    let base = server.uri();

    // One healthy package, one whose page lives on a dead endpoint
    mount_page(
        &server,
        "/simple/",
        "<a href=\"pkga/\">pkgA</a>\n<a href=\"http://127.0.0.1:1/simple/broken/\">broken</a>\n"
            .to_string(),
    )
    .await;
    mount_page(
        &server,
        "/simple/pkga/",
        format!("<a href=\"{}/files/pkg_a-1.0.tar.gz\">pkg_a-1.0.tar.gz</a>\n", base),
    )
    .await;
    mount_file(&server, "/files/pkg_a-1.0.tar.gz", 1024).await;

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("out.csv");
    let config = create_test_config(&format!("{}/simple/", base), csv_path.to_str().unwrap());

    let report = crawl(config).await.expect("run should complete despite the failure");

    assert_eq!(report.outcome, CrawlOutcome::CompletedWithFailures(1));
    assert_eq!(report.packages_total, 2);
    assert_eq!(report.packages_scraped, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].package, "broken");

    let lines = read_lines(&csv_path);
    assert_eq!(lines[0], "Package,Distribution,Size");
    assert!(lines.contains(&"pkgA,pkg_a-1.0.tar.gz,1024".to_string()));
}

#[tokio::test]
async fn test_fail_fast_aborts_the_run() {
    let server = MockServer::start().await;

    // A single package on a dead endpoint; fail-fast must surface the error
    mount_page(
        &server,
        "/simple/",
        "<a href=\"http://127.0.0.1:1/simple/broken/\">broken</a>\n".to_string(),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("out.csv");
    let mut config =
        create_test_config(&format!("{}/simple/", server.uri()), csv_path.to_str().unwrap());
    config.crawler.fail_fast = true;

    let result = crawl(config).await;

    assert!(result.is_err());

    // The file stays on disk in its last-flushed state: header only
    let lines = read_lines(&csv_path);
    assert_eq!(lines, vec!["Package,Distribution,Size"]);
}

#[tokio::test]
async fn test_gate_ceiling_is_a_hard_bound() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("ok")
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let gate = Arc::new(RequestGate::new(build_http_client().unwrap(), 2));
    let url = format!("{}/slow", server.uri());

    let mut requests = Vec::new();
    for _ in 0..8 {
        let gate = Arc::clone(&gate);
        let url = url.clone();
        requests.push(tokio::spawn(async move { gate.get(&url).await }));
    }

    // Sample the in-flight count while the requests drain
    let mut max_in_flight = 0;
    for _ in 0..60 {
        max_in_flight = max_in_flight.max(gate.in_flight());
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    for request in requests {
        request.await.unwrap().expect("request should succeed");
    }

    assert!(
        max_in_flight <= 2,
        "ceiling of 2 exceeded: saw {} in flight",
        max_in_flight
    );
    assert_eq!(gate.issued(), 8);
    assert_eq!(gate.in_flight(), 0);
}

#[tokio::test]
async fn test_probe_size_reads_content_length() {
    let server = MockServer::start().await;
    mount_file(&server, "/files/artifact.tar.gz", 4096).await;

    let gate = RequestGate::new(build_http_client().unwrap(), 2);
    let url = format!("{}/files/artifact.tar.gz", server.uri());

    let size = registry_sounder::crawler::probe_size(&gate, &url)
        .await
        .expect("probe should succeed");

    assert_eq!(size, 4096);
}
