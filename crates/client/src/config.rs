use std::time::Duration;

use artisync_reconcile::ValidationError;
use reqwest::Url;

use crate::auth::Credentials;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Connection settings for one Artifactory server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme, host, and port; `/artifactory/` is appended per request.
    pub base_url: Url,
    pub credentials: Credentials,
    /// Skip TLS certificate validation. Off unless explicitly requested.
    pub ignore_ca_error: bool,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(
        base_url: &str,
        auth_type: &str,
        auth_string: &str,
        ignore_ca_error: bool,
        timeout: Duration,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            credentials: Credentials::parse(auth_type, auth_string)?,
            ignore_ca_error,
            timeout,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ValidationError> {
    let invalid = |message: &str| ValidationError::InvalidBaseUrl {
        url: raw.to_string(),
        message: message.to_string(),
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    Ok(url)
}
