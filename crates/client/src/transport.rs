//! Blocking HTTP transport for the Artifactory REST API.

use artisync_reconcile::{Error, Operation, ValidationError};
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use reqwest::{Method, Url};
use serde_json::Value;
use thiserror::Error;

use crate::config::ClientConfig;

/// Operator warning emitted when certificate validation is disabled.
pub const INSECURE_TLS_WARNING: &str =
    "API calls to Artifactory are not validating CA certs. Auth tokens vulnerable to MITM attack.";

/// A request that did not produce a success response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", status_label(.status))]
pub struct TransportError {
    /// HTTP status, or `None` when no response arrived (DNS, TLS, timeout).
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    /// Maps a failed read into the reconciliation error taxonomy.
    pub fn into_query(self, what: impl Into<String>) -> Error {
        Error::RemoteQuery {
            what: what.into(),
            status: self.status,
            message: self.message,
        }
    }

    /// Maps a failed create/update/delete into the reconciliation error taxonomy.
    pub fn into_mutation(self, operation: Operation, key: impl Into<String>) -> Error {
        Error::RemoteMutation {
            operation,
            key: key.into(),
            status: self.status,
            message: self.message,
        }
    }
}

/// Failure to construct an [`HttpTransport`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportBuildError {
    /// The credentials cannot be turned into a request header.
    #[error(transparent)]
    Credentials(#[from] ValidationError),

    /// The HTTP client itself failed to initialise (TLS backend, resolver).
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Sends authenticated JSON requests below `<base_url>/artifactory/`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: Url,
    client: Client,
    warnings: Vec<String>,
}

impl HttpTransport {
    /// Builds the HTTP client.
    ///
    /// Must not be called from inside an async runtime; the blocking
    /// client owns its own.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportBuildError> {
        let (name, value) = config.credentials.header()?;
        let mut headers = HeaderMap::new();
        headers.insert(name, value);

        let mut warnings = Vec::new();
        if config.ignore_ca_error {
            tracing::warn!(
                base_url = %config.base_url,
                "TLS certificate validation is disabled"
            );
            warnings.push(INSECURE_TLS_WARNING.to_string());
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.ignore_ca_error)
            .build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
            warnings,
        })
    }

    /// Warnings the operator should see, e.g. disabled TLS validation.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Resolves API path segments, percent-encoding each one.
    ///
    /// `endpoint(&["api", "repositories", "my repo"], &[])` yields
    /// `<base>/artifactory/api/repositories/my%20repo`.
    pub fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("artifactory").extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    /// Sends one request and returns the parsed response body.
    ///
    /// Empty bodies parse as `Null` and non-JSON text as a string.
    pub fn send_request(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        tracing::debug!(method = %method, url = %url, "Sending request");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(|e| TransportError {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        })?;
        let status = response.status();
        let text = response.text().map_err(|e| TransportError {
            status: Some(status.as_u16()),
            message: format!("failed to read response body: {e}"),
        })?;
        let parsed = parse_body(&text);

        if !status.is_success() {
            return Err(TransportError {
                status: Some(status.as_u16()),
                message: error_message(&parsed, status.canonical_reason()),
            });
        }
        Ok(parsed)
    }

    /// Sends a mutating request unless `dry_run` is set.
    pub fn send_mutation(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        dry_run: bool,
    ) -> Result<(), TransportError> {
        if dry_run {
            tracing::debug!(method = %method, url = %url, "Check mode: request not sent");
            return Ok(());
        }
        self.send_request(method, url, body).map(|_| ())
    }
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "transport error".to_string(),
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Pulls the message out of Artifactory's error envelopes.
fn error_message(body: &Value, reason: Option<&str>) -> String {
    let from_envelope = body
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; ")
        })
        .filter(|m| !m.is_empty());

    from_envelope
        .or_else(|| body.get("message").and_then(Value::as_str).map(String::from))
        .or_else(|| body.as_str().map(|s| s.trim().to_string()))
        .filter(|m| !m.is_empty())
        .or_else(|| reason.map(String::from))
        .unwrap_or_else(|| "request failed".to_string())
}
