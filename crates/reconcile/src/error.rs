//! Error taxonomy for reconciliation runs.
//!
//! Validation errors are raised locally before any network activity.
//! Remote errors abort the run; mutations already committed stay committed.

use thiserror::Error;

// ============================================================================
// Validation
// ============================================================================

/// Input rejected before any remote call was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// Two desired records share an identity key (compared case-insensitively).
    #[error("desired records must have unique keys: '{first}' collides with '{second}'")]
    DuplicateKey {
        /// Key of the earlier record.
        first: String,
        /// Key of the later record.
        second: String,
    },

    /// A record lacks a field required by its resource kind.
    #[error("\"{field}\" is a required field (missing in record #{index})")]
    MissingField {
        /// Name of the missing field.
        field: String,
        /// Zero-based position of the record in the desired list.
        index: usize,
    },

    /// A record is not a JSON object.
    #[error("record #{index} must be an object or a JSON string of an object")]
    NotAnObject {
        /// Zero-based position of the record in the desired list.
        index: usize,
    },

    /// A record given as a string did not parse as JSON.
    #[error("record #{index} is not valid JSON: {message}")]
    InvalidJson { index: usize, message: String },

    /// The requested target state is not one of Present, Absent, Prune.
    #[error("state must be \"Present\", \"Absent\", or \"Prune\" (got \"{0}\")")]
    InvalidState(String),

    /// The requested authentication mode is unknown.
    #[error("auth_type must be \"Basic\", \"AccessToken\", or \"ApiKey\" (got \"{0}\")")]
    InvalidAuthMode(String),

    /// A required connection setting was not supplied.
    #[error("\"{0}\" is a required argument")]
    MissingSetting(String),

    /// The auth string cannot be sent as an HTTP header.
    #[error("auth_string is not usable: {0}")]
    InvalidAuthString(String),

    /// Basic auth credentials are not in `username:password` form.
    #[error("Basic auth_type requires auth_string in the format username:password")]
    MalformedBasicAuth,

    /// The server base URL cannot be used.
    #[error("invalid base url '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },
}

// ============================================================================
// Run errors
// ============================================================================

/// Errors returned by a reconciliation run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Input validation failed; nothing was sent to the remote system.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Listing or reading remote records failed.
    #[error("Querying {what} failed with {}: {message}", status_label(.status))]
    RemoteQuery {
        /// Human-readable description of what was queried.
        what: String,
        /// HTTP status, or `None` for transport-level failures.
        status: Option<u16>,
        /// Remote-provided message text.
        message: String,
    },

    /// A create, update, or delete call failed.
    #[error("{} '{key}' failed with {}: {message}", .operation.gerund(), status_label(.status))]
    RemoteMutation {
        /// The operation that failed.
        operation: crate::report::Operation,
        /// Identity key of the record being mutated.
        key: String,
        /// HTTP status, or `None` for transport-level failures.
        status: Option<u16>,
        /// Remote-provided message text.
        message: String,
    },
}

impl Error {
    /// Returns true when the error was raised before any remote call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "transport error".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
