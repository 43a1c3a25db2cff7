use std::path::PathBuf;
use thiserror::Error;

/// Recoverable failures while building a single probe. None of these abort a session;
/// the affected vendor/site pair is skipped and reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("malformed raw request: {0}")]
    MalformedRequest(String),

    #[error("unknown WAF vendor: {0}")]
    UnknownVendor(String),

    #[error("vendor {0} has no test payload configured")]
    MissingCanonicalPayload(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Connect,
    Timeout,
    InvalidRequest,
    Other,
}

/// A send that produced no response (DNS, refused connection, TLS, timeout).
#[derive(Error, Debug, Clone)]
#[error("request to {url} failed ({kind:?}): {reason}")]
pub struct TransportError {
    pub url: String,
    pub kind: TransportErrorKind,
    pub reason: String,
}

impl TransportError {
    pub fn new(url: impl Into<String>, kind: TransportErrorKind, reason: impl Into<String>) -> Self {
        Self { url: url.into(), kind, reason: reason.into() }
    }

    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_builder() {
            TransportErrorKind::InvalidRequest
        } else {
            TransportErrorKind::Other
        };
        Self::new(url, kind, err.to_string())
    }
}

/// Failures of the exploit-template tool. They abort only the payload build for one id.
#[derive(Error, Debug)]
pub enum ExternalToolError {
    #[error("payload generator not found: {0}")]
    ToolMissing(String),

    #[error("template directory not found: {}", .0.display())]
    TemplatesMissing(PathBuf),

    #[error("no template matches {0}")]
    TemplateNotFound(String),

    #[error("no dumped HTTP request found in generator output for {0}")]
    MarkerNotFound(String),

    #[error("failed to run payload generator: {0}")]
    Io(#[from] std::io::Error),
}

/// Catalog load failures. Fatal for the binary, never raised inside a session.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("vendor {vendor}: {reason}")]
    InvalidVendor { vendor: String, reason: String },

    #[error("vendor {vendor}: pattern for {label} is invalid: {source}")]
    InvalidPattern {
        vendor: String,
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("duplicate vendor name: {0}")]
    DuplicateVendor(String),
}
