use reqwest::Method;

use crate::errors::ProbeError;
use crate::request::builder::split_authority;

/// A captured HTTP/1.x request, parsed but not yet pointed at any site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    pub method: Method,
    /// Origin-form target (path + query) exactly as captured.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RawRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Parse request line, headers and body. The protocol version is discarded.
///
/// Header lines run until the first blank line (or the end of input); lines without a
/// colon are ignored. Everything after the blank line is the body, rejoined with `\n`.
pub fn parse_raw_request(text: &str) -> Result<RawRequest, ProbeError> {
    let normalized = text.replace("\r\n", "\n");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return Err(ProbeError::MalformedRequest("empty request".to_string()));
    }

    let lines: Vec<&str> = trimmed.split('\n').collect();
    let request_line = lines[0].trim();
    let mut tokens = request_line.split_whitespace();
    let (method, target) = match (tokens.next(), tokens.next()) {
        (Some(m), Some(t)) => (m, t),
        _ => {
            return Err(ProbeError::MalformedRequest(format!(
                "request line needs a method and a path: {:?}",
                request_line
            )))
        }
    };
    let method = Method::from_bytes(method.as_bytes())
        .map_err(|_| ProbeError::MalformedRequest(format!("invalid method {:?}", method)))?;

    // proxy captures may carry an absolute-form target
    let path = match split_authority(target) {
        Some((_, rest)) if rest.is_empty() => "/".to_string(),
        Some((_, rest)) => rest.to_string(),
        None => target.to_string(),
    };

    let mut headers = Vec::new();
    let mut body_start = None;
    for (i, line) in lines.iter().enumerate().skip(1) {
        if line.trim().is_empty() {
            body_start = Some(i + 1);
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    let body = body_start
        .filter(|&start| start < lines.len())
        .map(|start| lines[start..].join("\n"))
        .filter(|b| !b.is_empty());

    Ok(RawRequest { method, path, headers, body })
}
