use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::{Catalog, VendorProfile};
use crate::errors::{ExternalToolError, ProbeError};
use crate::external::PayloadGenerator;
use crate::probe::{Dispatcher, Pacer, Transport};
use crate::request::{build, PayloadSpec};
use crate::waf::classifier::{classify, Verdict, NO_NOTES};

pub const NOTE_WAF_FUNCTIONING: &str = "WAF functioning";
pub const NOTE_WAF_MALFUNCTIONING: &str = "WAF may be malfunctioning — test payload not blocked";
pub const NOTE_NOT_BLOCKED: &str = "not blocked";

/// Outcome of one vendor×site probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub vendor: String,
    pub site: String,
    /// A response arrived.
    pub reachable: bool,
    /// Only meaningful when `reachable`.
    pub blocked: bool,
    pub status_code: Option<u16>,
    pub notes: String,
}

/// A vendor or vendor×site pair that was not probed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedProbe {
    pub vendor: String,
    pub site: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionReport {
    /// Vendor-major, site-minor order, whatever each probe's outcome.
    pub results: Vec<ProbeResult>,
    pub skipped: Vec<SkippedProbe>,
}

impl SessionReport {
    fn skip(&mut self, vendor: &str, site: Option<&str>, err: ProbeError) {
        match site {
            Some(site) => warn!(vendor, site, "skipping probe: {}", err),
            None => warn!(vendor, "skipping vendor: {}", err),
        }
        self.skipped.push(SkippedProbe {
            vendor: vendor.to_string(),
            site: site.map(|s| s.to_string()),
            reason: err.to_string(),
        });
    }

    pub fn blocked_count(&self) -> usize {
        self.results.iter().filter(|r| r.reachable && r.blocked).count()
    }

    pub fn unreachable_count(&self) -> usize {
        self.results.iter().filter(|r| !r.reachable).count()
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode<'a> {
    Verify,
    UrlPayload(&'a str),
    RawRequest(&'a str),
}

/// Runs one mode over the selected vendors and their sites, one request at a time.
pub struct ProbeSession<T> {
    catalog: Arc<Catalog>,
    dispatcher: Dispatcher<T>,
    pacer: Pacer,
    selection: Option<Vec<String>>,
}

impl<T: Transport> ProbeSession<T> {
    pub fn new(catalog: Arc<Catalog>, dispatcher: Dispatcher<T>) -> Self {
        Self { catalog, dispatcher, pacer: Pacer::polite(), selection: None }
    }

    /// Restrict the run to these vendors, in this order.
    pub fn with_vendors(mut self, names: Vec<String>) -> Self {
        self.selection = Some(names);
        self
    }

    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// Send each vendor's canonical payload and check that it gets blocked.
    pub async fn verify_waf_status(&self) -> SessionReport {
        info!("verifying WAF status");
        self.run(Mode::Verify).await
    }

    pub async fn test_url_payload(&self, payload: &str) -> SessionReport {
        info!(payload, "testing URL payload");
        self.run(Mode::UrlPayload(payload)).await
    }

    /// Replay a captured request against every site, Host rewritten per site.
    pub async fn test_request_from_file(&self, raw_request: &str) -> SessionReport {
        info!("testing raw request");
        self.run(Mode::RawRequest(raw_request)).await
    }

    /// Generate a request for `id` and replay it. Generator failures abort only this run.
    pub async fn test_generated_payload(
        &self,
        generator: &dyn PayloadGenerator,
        id: &str,
    ) -> Result<SessionReport, ExternalToolError> {
        let raw_request = generator.generate_payload(id).await?;
        info!(id, "generated payload:\n{}", raw_request);
        Ok(self.test_request_from_file(&raw_request).await)
    }

    async fn run(&self, mode: Mode<'_>) -> SessionReport {
        let mut report = SessionReport::default();
        let (vendors, unknown) = self.catalog.select(self.selection.as_deref());
        for name in unknown {
            report.skip(name, None, ProbeError::UnknownVendor(name.to_string()));
        }

        for vendor in vendors {
            let spec = match mode {
                Mode::Verify => match vendor.canonical_payload.as_deref() {
                    Some(payload) => PayloadSpec::SelfCheck(payload),
                    None => {
                        report.skip(&vendor.name, None, ProbeError::MissingCanonicalPayload(vendor.name.clone()));
                        continue;
                    }
                },
                Mode::UrlPayload(payload) => PayloadSpec::UrlPayload(payload),
                Mode::RawRequest(text) => PayloadSpec::RawRequest(text),
            };

            for site in &vendor.sites {
                match self.probe(vendor, site, &spec, mode).await {
                    Ok(result) => report.results.push(result),
                    Err(e) => report.skip(&vendor.name, Some(site.as_str()), e),
                }
            }
        }
        report
    }

    async fn probe(
        &self,
        vendor: &VendorProfile,
        site: &str,
        spec: &PayloadSpec<'_>,
        mode: Mode<'_>,
    ) -> Result<ProbeResult, ProbeError> {
        let request = build(site, spec)?;
        info!(vendor = %vendor.name, method = %request.method, url = %request.url, "probing");

        self.pacer.wait().await;
        let response = self.dispatcher.send(&request).await;
        let reachable = response.is_some();
        let verdict = classify(response.as_ref(), vendor);

        let result = ProbeResult {
            vendor: vendor.name.clone(),
            site: site.to_string(),
            reachable,
            blocked: verdict.blocked,
            status_code: response.as_ref().map(|r| r.status),
            notes: annotate(mode, reachable, verdict),
        };

        match mode {
            Mode::Verify if reachable && result.blocked => info!(vendor = %vendor.name, site, "WAF functioning"),
            Mode::Verify if reachable => warn!(vendor = %vendor.name, site, "test payload was not blocked"),
            _ if reachable => info!(vendor = %vendor.name, site, blocked = result.blocked, status = ?result.status_code, "probe finished"),
            _ => {}
        }
        Ok(result)
    }
}

fn annotate(mode: Mode<'_>, reachable: bool, verdict: Verdict) -> String {
    if !reachable {
        return NO_NOTES.to_string();
    }
    match (mode, verdict.blocked) {
        (Mode::Verify, true) => NOTE_WAF_FUNCTIONING.to_string(),
        (Mode::Verify, false) => NOTE_WAF_MALFUNCTIONING.to_string(),
        (_, true) => verdict.notes,
        (_, false) => NOTE_NOT_BLOCKED.to_string(),
    }
}
