#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use waf_probe::catalog::Catalog;
use waf_probe::errors::{TransportError, TransportErrorKind};
use waf_probe::probe::{Dispatcher, Pacer, RawResponse, Transport};
use waf_probe::request::OutboundRequest;
use waf_probe::ProbeSession;

/// Canned responses keyed by URL; unknown URLs get a plain 404.
#[derive(Default)]
pub struct MockTransport {
    responses: HashMap<String, Result<RawResponse, TransportErrorKind>>,
    pub seen: Mutex<Vec<OutboundRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(url.to_string(), Ok(RawResponse::new(status, body)));
        self
    }

    pub fn fail(mut self, url: &str, kind: TransportErrorKind) -> Self {
        self.responses.insert(url.to_string(), Err(kind));
        self
    }

    pub fn seen_urls(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|r| r.url.clone()).collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        match self.responses.get(&request.url) {
            Some(Ok(resp)) => Ok(resp.clone()),
            Some(Err(kind)) => Err(TransportError::new(request.url.as_str(), *kind, "mock failure")),
            None => Ok(RawResponse::new(404, "not found")),
        }
    }
}

pub fn session(catalog: Catalog, transport: MockTransport) -> ProbeSession<MockTransport> {
    ProbeSession::new(Arc::new(catalog), Dispatcher::new(transport, "probe-test/1.0"))
        .with_pacer(Pacer::disabled())
}
