//! Artifactory REST client for artisync.
//!
//! Provides the authenticated [`HttpTransport`] and the concrete
//! [`RemoteResourceAdapter`](artisync_reconcile::RemoteResourceAdapter)
//! implementations the reconciler drives:
//!
//! - [`RepositoryAdapter`] for repository configuration
//! - [`LdapSettingsAdapter`] for LDAP settings (requires the server plugin)

#![deny(unsafe_code)]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod transport;

pub use adapters::{LdapSettingsAdapter, RepositoryAdapter};
pub use auth::{Credentials, API_KEY_HEADER};
pub use config::{ClientConfig, DEFAULT_TIMEOUT_MS};
pub use transport::{HttpTransport, TransportBuildError, TransportError, INSECURE_TLS_WARNING};
