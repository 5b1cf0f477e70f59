//! Immutable client configuration.
//!
//! The session password and base endpoint are fixed at construction and
//! owned by the client instance; there is no ambient or process-wide
//! credential state.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP basic-auth credential sent on every call when configured.
///
/// This protects the web server itself (for example behind a reverse
/// proxy); it is unrelated to the daemon's session password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// Basic-auth username.
    pub username: String,
    /// Basic-auth password.
    pub password: String,
}

impl BasicAuth {
    /// The `Authorization` header value for this credential.
    #[must_use]
    pub fn header_value(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {encoded}")
    }
}

/// Configuration for a [`crate::DelugeClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Deluge web server; the RPC endpoint is `<base>/json`.
    pub(crate) base_url: Url,
    /// Session password used for `auth.login`.
    pub(crate) password: String,
    /// Optional HTTP basic-auth credential.
    pub(crate) basic_auth: Option<BasicAuth>,
    /// Per-request timeout.
    pub(crate) timeout: Duration,
}

impl ClientConfig {
    /// Configuration for `base_url` with the daemon session `password`.
    #[must_use]
    pub fn new(base_url: Url, password: impl Into<String>) -> Self {
        Self {
            base_url,
            password: password.into(),
            basic_auth: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Attach an HTTP basic-auth credential.
    #[must_use]
    pub fn with_basic_auth(mut self, auth: BasicAuth) -> Self {
        self.basic_auth = Some(auth);
        self
    }

    /// Override the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_header_encodes_credentials() {
        let auth = BasicAuth {
            username: "deluge".to_string(),
            password: "hunter2".to_string(),
        };
        assert_eq!(auth.header_value(), "Basic ZGVsdWdlOmh1bnRlcjI=");
    }
}
