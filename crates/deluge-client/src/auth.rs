//! Session re-authentication and the single-retry coordinator.
//!
//! The daemon signals an expired session with reserved error code 1. The
//! dispatch path intercepts that failure at most once per original call,
//! asks the configured [`AuthStrategy`] to re-establish the session, and
//! retries the call exactly one time. Per call, the flow moves through
//! idle, authenticating, and then authenticated or failed; there is no
//! cross-call authentication state.

use async_trait::async_trait;
use deluge_proto::envelope::RpcRequest;
use deluge_proto::error::{DelugeError, DelugeResult};
use serde_json::Value;
use tracing::debug;

use crate::transport::RpcCall;

/// Wire name of the session login method.
pub(crate) const AUTH_LOGIN: &str = "auth.login";

/// Strategy for re-establishing an expired session.
///
/// Decoupled from any one transport so the retry policy composes with every
/// request rather than being baked into a captured closure.
#[async_trait]
pub trait AuthStrategy: Send + Sync {
    /// Attempt to re-authenticate over `rpc`.
    ///
    /// `Ok(true)` means the session was re-established and the failed call
    /// may be retried.
    ///
    /// # Errors
    ///
    /// Implementations may surface their own failures; the coordinator
    /// treats any error the same as `Ok(false)`.
    async fn attempt_reauthenticate(&self, rpc: &dyn RpcCall) -> DelugeResult<bool>;
}

/// Default strategy: log in again with the configured session password.
#[derive(Debug, Clone)]
pub struct PasswordLogin {
    password: String,
}

impl PasswordLogin {
    /// Strategy holding the session `password`.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

#[async_trait]
impl AuthStrategy for PasswordLogin {
    async fn attempt_reauthenticate(&self, rpc: &dyn RpcCall) -> DelugeResult<bool> {
        let request = RpcRequest::new(AUTH_LOGIN, vec![Value::String(self.password.clone())]);
        match rpc.call(&request).await {
            Ok(value) => Ok(value.as_bool().unwrap_or(false)),
            Err(error) => {
                debug!(%error, "re-login call failed");
                Ok(false)
            }
        }
    }
}

/// Issue `request`, re-authenticating and retrying at most once.
///
/// On a successful re-login the retry's outcome, success or failure, is
/// returned verbatim; when re-login fails, the original unauthenticated
/// error surfaces unchanged. Concurrent calls that each fail
/// authentication each run their own re-login; simultaneous expiry can
/// therefore produce a burst of login calls.
pub(crate) async fn call_with_reauth(
    rpc: &dyn RpcCall,
    auth: &dyn AuthStrategy,
    request: &RpcRequest,
) -> DelugeResult<Value> {
    match rpc.call(request).await {
        Err(DelugeError::Unauthenticated) => {
            debug!(method = request.method(), "session expired, re-authenticating");
            match auth.attempt_reauthenticate(rpc).await {
                Ok(true) => {
                    debug!(method = request.method(), "re-authenticated, retrying once");
                    rpc.call(request).await
                }
                Ok(false) => {
                    debug!(method = request.method(), "re-authentication failed");
                    Err(DelugeError::Unauthenticated)
                }
                Err(error) => {
                    debug!(method = request.method(), %error, "re-authentication errored");
                    Err(DelugeError::Unauthenticated)
                }
            }
        }
        outcome => outcome,
    }
}
