//! Credentials and the authorization header they produce.

use artisync_reconcile::ValidationError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use std::fmt;

/// Header Artifactory reads API keys from.
pub const API_KEY_HEADER: &str = "X-JFrog-Art-Api";

/// How requests authenticate against the server.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Username and password, sent base64-encoded.
    Basic { username: String, password: String },
    /// Access token, sent as a bearer token.
    BearerToken(String),
    /// Legacy API key, sent in [`API_KEY_HEADER`].
    ApiKey(String),
}

impl Credentials {
    /// Parses an auth mode name and its secret.
    ///
    /// Mode names are case-insensitive: `basic`, `accesstoken` (or
    /// `bearer`), `apikey`. Basic auth expects `username:password`; the
    /// password may itself contain colons.
    ///
    /// ```
    /// use artisync_client::Credentials;
    ///
    /// let creds = Credentials::parse("Basic", "admin:s3cr:et").unwrap();
    /// assert_eq!(
    ///     creds,
    ///     Credentials::Basic { username: "admin".into(), password: "s3cr:et".into() }
    /// );
    /// assert!(Credentials::parse("Basic", "no-colon").is_err());
    /// assert!(Credentials::parse("kerberos", "x").is_err());
    /// ```
    pub fn parse(auth_type: &str, auth_string: &str) -> Result<Self, ValidationError> {
        let creds = match auth_type.trim().to_lowercase().as_str() {
            "basic" => {
                let (username, password) = auth_string
                    .split_once(':')
                    .ok_or(ValidationError::MalformedBasicAuth)?;
                Self::Basic {
                    username: username.to_string(),
                    password: password.to_string(),
                }
            }
            "accesstoken" | "bearer" => Self::BearerToken(auth_string.to_string()),
            "apikey" => Self::ApiKey(auth_string.to_string()),
            _ => return Err(ValidationError::InvalidAuthMode(auth_type.to_string())),
        };
        if auth_string.is_empty() {
            return Err(ValidationError::MissingSetting("auth_string".to_string()));
        }
        creds.header()?;
        Ok(creds)
    }

    /// Mode name as accepted by [`parse`](Self::parse).
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "Basic",
            Self::BearerToken(_) => "AccessToken",
            Self::ApiKey(_) => "ApiKey",
        }
    }

    /// Builds the header that carries these credentials.
    ///
    /// The value is marked sensitive so it stays out of debug output.
    pub fn header(&self) -> Result<(HeaderName, HeaderValue), ValidationError> {
        let (name, raw) = match self {
            Self::Basic { username, password } => (
                AUTHORIZATION,
                format!("Basic {}", STANDARD.encode(format!("{username}:{password}"))),
            ),
            Self::BearerToken(token) => (AUTHORIZATION, format!("Bearer {token}")),
            Self::ApiKey(key) => (HeaderName::from_static("x-jfrog-art-api"), key.clone()),
        };
        let mut value = HeaderValue::from_str(&raw).map_err(|_| {
            ValidationError::InvalidAuthString(
                "contains characters not allowed in an HTTP header".to_string(),
            )
        })?;
        value.set_sensitive(true);
        Ok((name, value))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::BearerToken(_) => f.write_str("BearerToken(<redacted>)"),
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_header_is_base64_of_user_colon_password() {
        let creds = Credentials::parse("basic", "admin:password").unwrap();
        let (name, value) = creds.header().unwrap();
        assert_eq!(name, AUTHORIZATION);
        assert_eq!(value.to_str().unwrap(), "Basic YWRtaW46cGFzc3dvcmQ=");
        assert!(value.is_sensitive());
    }

    #[test]
    fn access_token_is_sent_as_bearer() {
        let creds = Credentials::parse("AccessToken", "tok123").unwrap();
        let (name, value) = creds.header().unwrap();
        assert_eq!(name, AUTHORIZATION);
        assert_eq!(value.to_str().unwrap(), "Bearer tok123");
    }

    #[test]
    fn api_key_uses_vendor_header() {
        let creds = Credentials::parse("APIKEY", "key-abc").unwrap();
        let (name, value) = creds.header().unwrap();
        assert_eq!(name.as_str(), API_KEY_HEADER.to_lowercase());
        assert_eq!(value.to_str().unwrap(), "key-abc");
    }

    #[test]
    fn malformed_basic_auth_is_rejected() {
        assert_eq!(
            Credentials::parse("Basic", "adminpassword"),
            Err(ValidationError::MalformedBasicAuth)
        );
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert_eq!(
            Credentials::parse("oauth", "x"),
            Err(ValidationError::InvalidAuthMode("oauth".into()))
        );
    }

    #[test]
    fn empty_token_is_rejected() {
        assert_eq!(
            Credentials::parse("apikey", ""),
            Err(ValidationError::MissingSetting("auth_string".into()))
        );
    }

    #[test]
    fn header_breaking_token_is_rejected() {
        let err = Credentials::parse("accesstoken", "line\nbreak").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAuthString(_)));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let creds = Credentials::parse("basic", "admin:hunter2").unwrap();
        let shown = format!("{creds:?}");
        assert!(shown.contains("admin"));
        assert!(!shown.contains("hunter2"));

        let token = Credentials::parse("accesstoken", "tok-secret").unwrap();
        assert!(!format!("{token:?}").contains("tok-secret"));
    }
}
