//! The client handle tying transport, authentication, and catalog together.

use std::sync::Arc;

use deluge_proto::envelope::RpcRequest;
use deluge_proto::error::DelugeResult;
use serde_json::Value;

use crate::auth::{AuthStrategy, PasswordLogin, call_with_reauth};
use crate::config::ClientConfig;
use crate::transport::RpcTransport;

/// Asynchronous client for one Deluge web server.
///
/// Cheap to clone; every call is an independent request/response exchange
/// and the client holds no mutable state, so a single instance is safe to
/// share across tasks.
#[derive(Clone)]
pub struct DelugeClient {
    transport: RpcTransport,
    auth: Arc<dyn AuthStrategy>,
}

impl DelugeClient {
    /// Build a client that re-authenticates with the configured session
    /// password.
    ///
    /// # Errors
    ///
    /// Fails when the transport cannot be constructed from `config`.
    pub fn new(config: ClientConfig) -> DelugeResult<Self> {
        let auth = Arc::new(PasswordLogin::new(config.password.clone()));
        Self::with_strategy(&config, auth)
    }

    /// Build a client with a custom re-authentication strategy.
    ///
    /// # Errors
    ///
    /// Fails when the transport cannot be constructed from `config`.
    pub fn with_strategy(
        config: &ClientConfig,
        auth: Arc<dyn AuthStrategy>,
    ) -> DelugeResult<Self> {
        Ok(Self {
            transport: RpcTransport::from_config(config)?,
            auth,
        })
    }

    /// Log in explicitly, establishing a session up front.
    ///
    /// Calls re-authenticate on demand, so this is optional; it exists for
    /// callers that want to validate the password early.
    ///
    /// # Errors
    ///
    /// Surfaces strategy failures; the default password strategy reports
    /// a bad password as `Ok(false)` rather than an error.
    pub async fn login(&self) -> DelugeResult<bool> {
        self.auth.attempt_reauthenticate(&self.transport).await
    }

    /// Dispatch one catalog call through the re-authentication coordinator.
    pub(crate) async fn call(&self, method: &str, params: Vec<Value>) -> DelugeResult<Value> {
        let request = RpcRequest::new(method, params);
        call_with_reauth(&self.transport, self.auth.as_ref(), &request).await
    }
}
