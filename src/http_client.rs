use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::config::ProbeConfig;

pub const MAX_REDIRECTS: usize = 10;

/// Build the client used for every probe of a session.
pub fn create_probe_client(config: &ProbeConfig) -> reqwest::Result<Client> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(5).max(1)))

        // Compression
        .gzip(true)
        .brotli(true)
        .deflate(true)

        .use_rustls_tls()
        .tls_sni(true)
        // Test sites are often self-signed; verification is a user toggle
        .danger_accept_invalid_certs(!config.verify_tls)

        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))

        // Default only; the dispatcher also sends it per request
        .user_agent(config.user_agent())
        .build()
}
