//! HTTP transport for the daemon's JSON-RPC endpoint.
//!
//! One logical exchange per call: POST the body, read the bytes, decode the
//! generic envelope, and run the shared classifier before handing the raw
//! result value back. The daemon answers HTTP 200 even for failures, so the
//! envelope is the only authority on success.

use async_trait::async_trait;
use deluge_proto::envelope::{RpcRequest, decode_envelope};
use deluge_proto::error::{DelugeError, DelugeResult};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;

/// A single request/response exchange against the RPC endpoint.
///
/// The trait is the seam between the retry coordinator and the concrete
/// transport; tests substitute scripted implementations.
#[async_trait]
pub trait RpcCall: Send + Sync {
    /// Issue `request` once and return the raw result value.
    async fn call(&self, request: &RpcRequest) -> DelugeResult<Value>;
}

/// reqwest-backed transport bound to one web server endpoint.
#[derive(Debug, Clone)]
pub struct RpcTransport {
    http: reqwest::Client,
    endpoint: Url,
}

impl RpcTransport {
    /// Build a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Fails when the base URL cannot host the `json` endpoint, when the
    /// basic-auth credential is not header-safe, or when the HTTP client
    /// cannot be constructed.
    pub fn from_config(config: &ClientConfig) -> DelugeResult<Self> {
        let endpoint = config
            .base_url
            .join("json")
            .map_err(DelugeError::transport)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(auth) = &config.basic_auth {
            let value = HeaderValue::from_str(&auth.header_value())
                .map_err(DelugeError::transport)?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(map_transport_error)?;

        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl RpcCall for RpcTransport {
    async fn call(&self, request: &RpcRequest) -> DelugeResult<Value> {
        let body = request.to_bytes()?;

        let response = self
            .http
            .post(self.endpoint.clone())
            .body(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(DelugeError::server(format!(
                "server returned status code: {status}"
            )));
        }

        let bytes = response.bytes().await.map_err(map_transport_error)?;
        let envelope = decode_envelope(&bytes)?;
        envelope.check()?;

        tracing::debug!(method = request.method(), "call succeeded");
        Ok(envelope.result.unwrap_or(Value::Null))
    }
}

/// Split reqwest failures into network-level and unclassifiable ones.
fn map_transport_error(error: reqwest::Error) -> DelugeError {
    if error.is_connect() || error.is_timeout() || error.is_request() || error.is_body() {
        DelugeError::transport(error)
    } else {
        DelugeError::UnknownTransport {
            source: Box::new(error),
        }
    }
}
