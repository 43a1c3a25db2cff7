use reqwest::Method;
use url::Url;

use crate::errors::ProbeError;
use crate::request::raw::{parse_raw_request, RawRequest};

/// How the payload for one probe is described.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSpec<'a> {
    /// Vendor's canonical path+query, known to trigger a block.
    SelfCheck(&'a str),
    /// Full URL (host gets replaced) or bare path/query fragment.
    UrlPayload(&'a str),
    /// Full text of a captured HTTP request.
    RawRequest(&'a str),
}

/// A concrete request for one (vendor, site, payload) triple. Built fresh per probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl OutboundRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self { method: Method::GET, url: url.into(), headers: Vec::new(), body: None }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Replace the first header with this name (case-insensitive), or append it.
    pub fn set_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }
}

pub fn build(site: &str, spec: &PayloadSpec<'_>) -> Result<OutboundRequest, ProbeError> {
    match *spec {
        PayloadSpec::SelfCheck(payload) => {
            Ok(OutboundRequest::get(format!("{}{}", site.trim_end_matches('/'), payload)))
        }
        PayloadSpec::UrlPayload(payload) => Ok(OutboundRequest::get(rewrite_payload_url(site, payload))),
        PayloadSpec::RawRequest(text) => {
            let raw = parse_raw_request(text)?;
            retarget_raw_request(site, raw)
        }
    }
}

/// Point a user-supplied payload at `site`. When the payload carries its own host, only
/// its path, query and fragment are kept, byte for byte.
pub fn rewrite_payload_url(site: &str, payload: &str) -> String {
    match split_authority(payload) {
        Some((_, rest)) => format!("{}{}", site.trim_end_matches('/'), rest),
        None => format!("{}{}", site, payload),
    }
}

/// The site's base path is kept whether or not the capture carries a Host header; only
/// the Host value is rewritten, to the site's authority.
fn retarget_raw_request(site: &str, raw: RawRequest) -> Result<OutboundRequest, ProbeError> {
    let RawRequest { method, path, headers, body } = raw;
    let url = format!("{}{}", site.trim_end_matches('/'), path);
    let mut request = OutboundRequest { method, url, headers, body };

    if request.header("Host").is_some() {
        request.set_header("Host", &site_authority(site)?);
    }
    Ok(request)
}

fn site_authority(site: &str) -> Result<String, ProbeError> {
    let parsed = Url::parse(site)
        .map_err(|e| ProbeError::MalformedRequest(format!("site {} is not a valid URL: {}", site, e)))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ProbeError::MalformedRequest(format!("site {} has no host", site)))?;
    Ok(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Split `scheme://netloc/rest` (or `//netloc/rest`) into netloc and the untouched
/// remainder. Returns `None` when there is no non-empty network location.
///
/// Deliberately textual: a URL parser would percent-encode the payload.
pub fn split_authority(input: &str) -> Option<(&str, &str)> {
    let after_scheme = match input.find(':') {
        Some(idx) if is_scheme(&input[..idx]) => &input[idx + 1..],
        _ => input,
    };
    let rest = after_scheme.strip_prefix("//")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (netloc, tail) = rest.split_at(end);
    if netloc.is_empty() {
        None
    } else {
        Some((netloc, tail))
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}
