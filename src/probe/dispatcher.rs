use crate::config::ProbeConfig;
use crate::probe::encoding::decode_body;
use crate::probe::transport::{ReqwestTransport, Transport};
use crate::request::OutboundRequest;

/// A response with its body already decoded for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

pub struct Dispatcher<T> {
    transport: T,
    user_agent: String,
}

impl Dispatcher<ReqwestTransport> {
    pub fn from_config(config: &ProbeConfig) -> reqwest::Result<Self> {
        Ok(Self::new(ReqwestTransport::new(config)?, config.user_agent()))
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T, user_agent: impl Into<String>) -> Self {
        Self { transport, user_agent: user_agent.into() }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Copy of `request` with the User-Agent injected. Caller headers win on conflict.
    pub fn prepare(&self, request: &OutboundRequest) -> OutboundRequest {
        let mut headers = Vec::with_capacity(request.headers.len() + 1);
        headers.push(("User-Agent".to_string(), self.user_agent.clone()));
        for (key, value) in &request.headers {
            if key.eq_ignore_ascii_case("user-agent") {
                headers[0] = (key.clone(), value.clone());
            } else {
                headers.push((key.clone(), value.clone()));
            }
        }
        OutboundRequest { headers, ..request.clone() }
    }

    /// Send once. Transport failures are logged and come back as `None`.
    pub async fn send(&self, request: &OutboundRequest) -> Option<ProbeResponse> {
        let prepared = self.prepare(request);
        match self.transport.send(&prepared).await {
            Ok(raw) => Some(ProbeResponse {
                status: raw.status,
                body: decode_body(raw.content_type.as_deref(), &raw.body),
            }),
            Err(e) => {
                tracing::error!(url = %e.url, kind = ?e.kind, "request failed: {}", e.reason);
                None
            }
        }
    }
}
