pub mod runner;
pub mod tools;

use async_trait::async_trait;

use crate::errors::ExternalToolError;

pub use tools::{extract_http_request, NucleiConfig, NucleiGenerator};

/// Produces raw HTTP request text for a vulnerability id (e.g. a CVE).
#[async_trait]
pub trait PayloadGenerator: Send + Sync {
    async fn generate_payload(&self, id: &str) -> Result<String, ExternalToolError>;
}
