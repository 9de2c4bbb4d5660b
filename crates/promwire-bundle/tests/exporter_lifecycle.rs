#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Instant;

use prometheus::{IntCounter, Registry};

use promwire_bundle::config::ExporterSection;
use promwire_bundle::{Bundle, SHUTDOWN_TIMEOUT};
use promwire_core::{Lifecycle, PromwireError};

fn section(yaml: &str) -> ExporterSection {
    promwire_bundle::config::load_from_str(yaml).unwrap()
}

async fn scrape(bundle: &Bundle, path: &str) -> reqwest::Response {
    let port = bundle.local_addr().unwrap().port();
    reqwest::get(format!("http://127.0.0.1:{port}{path}"))
        .await
        .unwrap()
}

#[tokio::test]
async fn scrape_returns_baseline_families() {
    // Everything defaulted: ephemeral port, all interfaces, path "/".
    let mut bundle = Bundle::builder().build(ExporterSection::default()).unwrap();
    bundle.start().await.unwrap();

    let response = scrape(&bundle, "/").await;
    assert!(response.status().is_success());
    let content_type = response.headers()["content-type"].to_str().unwrap().to_owned();
    assert!(content_type.starts_with("text/plain"), "{content_type}");

    let body = response.text().await.unwrap();
    assert!(body.contains("tokio_workers"), "{body}");
    assert!(body.contains("tokio_alive_tasks"), "{body}");
    #[cfg(target_os = "linux")]
    assert!(body.contains("process_cpu_seconds_total"), "{body}");

    bundle.stop().await.unwrap();
}

#[tokio::test]
async fn scrapes_count_themselves() {
    let mut bundle = Bundle::builder().build(ExporterSection::default()).unwrap();
    bundle.start().await.unwrap();

    let first = scrape(&bundle, "/").await.text().await.unwrap();
    assert!(first.contains("promwire_scrape_requests_total 1"), "{first}");

    let second = scrape(&bundle, "/").await.text().await.unwrap();
    assert!(second.contains("promwire_scrape_requests_total 2"), "{second}");

    bundle.stop().await.unwrap();
}

#[tokio::test]
async fn custom_path_is_the_only_route() {
    let mut bundle = Bundle::builder()
        .build(section("prometheus:\n  path: \"/metrics\"\n"))
        .unwrap();
    bundle.start().await.unwrap();

    let ok = scrape(&bundle, "/metrics").await;
    assert!(ok.status().is_success());

    let missing = scrape(&bundle, "/").await;
    assert_eq!(missing.status().as_u16(), 404);

    bundle.stop().await.unwrap();
}

#[tokio::test]
async fn flag_port_overrides_configured_port() {
    // The configured port cannot be bound; the flag rescues the build, which
    // proves the override is what reaches the listener.
    let mut bundle = Bundle::builder()
        .port_flag("0")
        .build(section("prometheus:\n  port: \"67000\"\n"))
        .unwrap();
    bundle.start().await.unwrap();
    assert!(bundle.local_addr().is_some());
    bundle.stop().await.unwrap();
}

#[tokio::test]
async fn unbindable_port_fails_start_synchronously() {
    let mut bundle = Bundle::builder()
        .build(section("prometheus:\n  port: \"67000\"\n"))
        .unwrap();
    let err = bundle.start().await.expect_err("bind must fail");
    assert!(matches!(err, PromwireError::Bind { .. }), "{err}");
}

#[tokio::test]
async fn stop_before_start_is_a_noop() {
    let mut bundle = Bundle::builder().build(ExporterSection::default()).unwrap();
    bundle.stop().await.unwrap();
}

#[tokio::test]
async fn stop_twice_is_a_noop() {
    let mut bundle = Bundle::builder().build(ExporterSection::default()).unwrap();
    bundle.start().await.unwrap();
    bundle.stop().await.unwrap();
    bundle.stop().await.unwrap();
}

#[tokio::test]
async fn second_start_is_rejected() {
    let mut bundle = Bundle::builder().build(ExporterSection::default()).unwrap();
    bundle.start().await.unwrap();

    let err = bundle.start().await.expect_err("second start must fail");
    assert!(matches!(err, PromwireError::AlreadyStarted), "{err}");

    bundle.stop().await.unwrap();
}

#[tokio::test]
async fn stop_with_no_inflight_requests_is_prompt() {
    let mut bundle = Bundle::builder().build(ExporterSection::default()).unwrap();
    bundle.start().await.unwrap();
    let _ = scrape(&bundle, "/").await;

    let begun = Instant::now();
    bundle.stop().await.unwrap();
    assert!(begun.elapsed() < SHUTDOWN_TIMEOUT);
}

#[tokio::test]
async fn external_registry_scrape_serves_host_metrics_only() {
    let registry = Registry::new();
    let counter = IntCounter::new("host_jobs_total", "host metric").unwrap();
    registry.register(Box::new(counter.clone())).unwrap();
    counter.inc();

    let mut bundle = Bundle::builder()
        .registry(registry)
        .build(ExporterSection::default())
        .unwrap();
    bundle.start().await.unwrap();

    let body = scrape(&bundle, "/").await.text().await.unwrap();
    assert!(body.contains("host_jobs_total 1"), "{body}");
    assert!(!body.contains("tokio_workers"), "{body}");

    bundle.stop().await.unwrap();
}
