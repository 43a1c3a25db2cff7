use serde::Deserialize;

/// Sent when the caller does not override the User-Agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    pub timeout_secs: u64,
    pub verify_tls: bool,
    pub user_agent: Option<String>,
}

impl ProbeConfig {
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout_secs: 10, verify_tls: true, user_agent: None }
    }
}
