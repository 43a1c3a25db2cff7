mod common;

use std::time::{Duration, Instant};

use common::{session, MockTransport};
use regex::Regex;
use waf_probe::catalog::{Catalog, VendorProfile};
use waf_probe::errors::{ExternalToolError, TransportErrorKind};
use waf_probe::external::PayloadGenerator;
use waf_probe::probe::Pacer;
use waf_probe::session::{NOTE_NOT_BLOCKED, NOTE_WAF_FUNCTIONING, NOTE_WAF_MALFUNCTIONING};
use waf_probe::ProbeResult;

fn scenario_catalog() -> Catalog {
    Catalog::new(vec![
        VendorProfile::new("x", &["http://x/"], &["BLOCKED-PAGE"]).with_canonical_payload("/backup.mdb"),
    ])
    .unwrap()
}

fn two_vendor_catalog() -> Catalog {
    Catalog::new(vec![
        VendorProfile::new("alpha", &["http://a1/", "http://a2/"], &["ALPHA-BLOCK"])
            .with_canonical_payload("/backup.mdb")
            .with_pattern("event", Regex::new(r"event=(\w+)").unwrap()),
        VendorProfile::new("beta", &["https://b1/"], &["BETA-BLOCK"]),
    ])
    .unwrap()
}

#[tokio::test]
async fn self_check_blocked_payload() {
    let transport = MockTransport::new().respond("http://x/backup.mdb", 403, "<h1>BLOCKED-PAGE</h1>");
    let report = session(scenario_catalog(), transport).verify_waf_status().await;

    assert_eq!(report.results, vec![ProbeResult {
        vendor: "x".into(),
        site: "http://x/".into(),
        reachable: true,
        blocked: true,
        status_code: Some(403),
        notes: NOTE_WAF_FUNCTIONING.into(),
    }]);
    assert!(report.skipped.is_empty());
}

#[tokio::test]
async fn self_check_payload_not_blocked() {
    let transport = MockTransport::new().respond("http://x/backup.mdb", 200, "<html>welcome</html>");
    let report = session(scenario_catalog(), transport).verify_waf_status().await;

    assert_eq!(report.results.len(), 1);
    let r = &report.results[0];
    assert!(r.reachable);
    assert!(!r.blocked);
    assert_eq!(r.status_code, Some(200));
    assert_eq!(r.notes, NOTE_WAF_MALFUNCTIONING);
    assert_eq!(r.notes, "WAF may be malfunctioning — test payload not blocked");
}

#[tokio::test]
async fn self_check_skips_vendor_without_payload() {
    let transport = MockTransport::new();
    let s = session(two_vendor_catalog(), transport);
    let report = s.verify_waf_status().await;

    assert_eq!(report.results.len(), 2);
    assert!(report.results.iter().all(|r| r.vendor == "alpha"));
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].vendor, "beta");
    assert_eq!(s.dispatcher().transport().seen_urls(), vec!["http://a1/backup.mdb", "http://a2/backup.mdb"]);
}

#[tokio::test]
async fn url_payload_rewritten_per_site() {
    let transport = MockTransport::new()
        .respond("http://a1/?q=1' OR 1=1--", 403, "ALPHA-BLOCK event=abc123")
        .respond("https://b1/?q=1' OR 1=1--", 200, "ok");
    let s = session(two_vendor_catalog(), transport);
    let report = s.test_url_payload("https://evil.example/?q=1' OR 1=1--").await;

    assert_eq!(s.dispatcher().transport().seen_urls(), vec![
        "http://a1/?q=1' OR 1=1--",
        "http://a2/?q=1' OR 1=1--",
        "https://b1/?q=1' OR 1=1--",
    ]);
    let notes: Vec<&str> = report.results.iter().map(|r| r.notes.as_str()).collect();
    assert_eq!(notes, vec!["event: abc123", NOTE_NOT_BLOCKED, NOTE_NOT_BLOCKED]);
    assert_eq!(report.blocked_count(), 1);
}

#[tokio::test]
async fn connection_error_recorded_and_session_continues() {
    let transport = MockTransport::new()
        .fail("http://a1/?file=/etc/passwd", TransportErrorKind::Connect)
        .respond("http://a2/?file=/etc/passwd", 403, "ALPHA-BLOCK");
    let report = session(two_vendor_catalog(), transport).test_url_payload("?file=/etc/passwd").await;

    assert_eq!(report.results.len(), 3);
    assert_eq!(report.results[0], ProbeResult {
        vendor: "alpha".into(),
        site: "http://a1/".into(),
        reachable: false,
        blocked: false,
        status_code: None,
        notes: "none".into(),
    });
    assert!(report.results[1].reachable && report.results[1].blocked);
    assert_eq!(report.results[1].notes, "none");
    assert_eq!(report.unreachable_count(), 1);
}

#[tokio::test]
async fn results_follow_vendor_then_site_order() {
    let transport = MockTransport::new()
        .fail("http://a2//x", TransportErrorKind::Timeout)
        .respond("https://b1//x", 403, "BETA-BLOCK");
    let report = session(two_vendor_catalog(), transport)
        .with_vendors(vec!["beta".into(), "alpha".into()])
        .test_url_payload("/x")
        .await;

    let order: Vec<(&str, &str)> = report.results.iter().map(|r| (r.vendor.as_str(), r.site.as_str())).collect();
    assert_eq!(order, vec![("beta", "https://b1/"), ("alpha", "http://a1/"), ("alpha", "http://a2/")]);
}

#[tokio::test]
async fn unknown_vendor_is_skipped_with_warning() {
    let report = session(two_vendor_catalog(), MockTransport::new())
        .with_vendors(vec!["nope".into(), "beta".into()])
        .test_url_payload("/")
        .await;

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].vendor, "nope");
    assert!(report.skipped[0].reason.contains("unknown"));
}

#[tokio::test]
async fn raw_request_replayed_with_host_rewritten() {
    let raw = "POST /admin HTTP/1.1\nHost: orig.example\nUser-Agent: captured/1.0\nCookie: s=1\n\na=1\nb=2";
    let s = session(two_vendor_catalog(), MockTransport::new().respond("https://b1/admin", 403, "BETA-BLOCK"));
    let report = s.test_request_from_file(raw).await;

    assert_eq!(report.results.len(), 3);
    let seen = s.dispatcher().transport().seen.lock().unwrap().clone();
    let hosts: Vec<&str> = seen.iter().map(|r| r.header("host").unwrap()).collect();
    assert_eq!(hosts, vec!["a1", "a2", "b1"]);
    let last = &seen[2];
    assert_eq!(last.url, "https://b1/admin");
    assert_eq!(last.method, reqwest::Method::POST);
    assert_eq!(last.body.as_deref(), Some("a=1\nb=2"));
    // replayed User-Agent beats the injected default
    assert_eq!(last.header("user-agent"), Some("captured/1.0"));
    assert!(report.results[2].blocked);
}

#[tokio::test]
async fn malformed_raw_request_skips_each_pair() {
    let s = session(two_vendor_catalog(), MockTransport::new());
    let report = s.test_request_from_file("NOT-A-REQUEST").await;

    assert!(report.results.is_empty());
    assert_eq!(report.skipped.len(), 3);
    assert!(report.skipped.iter().all(|sk| sk.site.is_some() && sk.reason.contains("malformed")));
    assert!(s.dispatcher().transport().seen_urls().is_empty());
}

#[tokio::test]
async fn user_agent_injected_when_absent() {
    let s = session(scenario_catalog(), MockTransport::new());
    s.test_url_payload("/").await;
    let seen = s.dispatcher().transport().seen.lock().unwrap().clone();
    assert_eq!(seen[0].header("User-Agent"), Some("probe-test/1.0"));
}

#[tokio::test]
async fn repeated_runs_produce_identical_results() {
    let make = || MockTransport::new()
        .respond("http://a1/?id=1", 403, "ALPHA-BLOCK event=e1")
        .fail("http://a2/?id=1", TransportErrorKind::Connect)
        .respond("https://b1/?id=1", 200, "fine");
    let first = session(two_vendor_catalog(), make()).test_url_payload("?id=1").await;
    let second = session(two_vendor_catalog(), make()).test_url_payload("?id=1").await;
    assert_eq!(first.results, second.results);
}

struct FixedGenerator(Option<&'static str>);

#[async_trait::async_trait]
impl PayloadGenerator for FixedGenerator {
    async fn generate_payload(&self, id: &str) -> Result<String, ExternalToolError> {
        self.0.map(str::to_string).ok_or_else(|| ExternalToolError::MarkerNotFound(id.to_string()))
    }
}

#[tokio::test]
async fn generated_payload_is_replayed() {
    let s = session(scenario_catalog(), MockTransport::new().respond("http://x/cgi-bin/test", 403, "BLOCKED-PAGE"));
    let generator = FixedGenerator(Some("GET /cgi-bin/test HTTP/1.1\nHost: example.com\n"));
    let report = s.test_generated_payload(&generator, "CVE-2021-0001").await.unwrap();
    assert_eq!(report.results.len(), 1);
    assert!(report.results[0].blocked);
}

#[tokio::test]
async fn generator_failure_is_returned_not_panicked() {
    let s = session(scenario_catalog(), MockTransport::new());
    let err = s.test_generated_payload(&FixedGenerator(None), "CVE-2021-0002").await.unwrap_err();
    assert!(matches!(err, ExternalToolError::MarkerNotFound(_)));
    assert!(s.dispatcher().transport().seen_urls().is_empty());
}

#[tokio::test]
async fn polite_pacer_spaces_out_dispatches() {
    let catalog = Catalog::new(vec![VendorProfile::new("p", &["http://p1/", "http://p2/", "http://p3/"], &["X"])]).unwrap();
    let s = session(catalog, MockTransport::new()).with_pacer(Pacer::polite());
    let start = Instant::now();
    let report = s.test_url_payload("/").await;
    assert_eq!(report.results.len(), 3);
    // two gaps of at least 0.5s each
    assert!(start.elapsed() >= Duration::from_millis(1000));
}
