//! Request body builder, response envelope, and the shared error classifier.
//!
//! The daemon answers every call with HTTP 200 and wraps failures inside the
//! JSON body, so classification of the `error` field is the only authority on
//! success vs. failure. The same classifier runs on the raw envelope before
//! any method-specific decoding and again inside every typed result
//! transform.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DelugeError, DelugeResult};

/// Fixed request identifier; the layer never pipelines calls over one
/// exchange, so correlation is not needed.
const REQUEST_ID: u32 = 1;

/// Reserved error code signaling a missing or expired session.
const AUTH_ERROR_CODE: i64 = 1;

/// Message substrings identifying the daemon's duplicate-torrent defect,
/// where re-adding an existing torrent reports a generic error instead of
/// succeeding idempotently.
const DUPLICATE_TORRENT_MARKERS: [&str; 2] =
    ["Torrent already in session", "deluge.error.AddTorrentError"];

/// Outgoing call body: `{"id": 1, "method": ..., "params": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    id: u32,
    method: String,
    params: Vec<Value>,
}

impl RpcRequest {
    /// Build a call body for `method` with positional `params`.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            id: REQUEST_ID,
            method: method.into(),
            params,
        }
    }

    /// Remote method name carried by this request.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Serialize the body for the wire.
    ///
    /// # Errors
    ///
    /// Returns [`DelugeError::Encoding`] when a parameter cannot be
    /// serialized.
    pub fn to_bytes(&self) -> DelugeResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|source| DelugeError::Encoding { source })
    }
}

/// Error object embedded in a response envelope.
///
/// Both fields are decoded leniently; an envelope whose `error` carries
/// neither a code nor a message is uninterpretable rather than malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    /// Human-readable failure message from the daemon.
    #[serde(default)]
    pub message: Option<String>,
    /// Numeric failure code; `1` is reserved for authentication.
    #[serde(default)]
    pub code: Option<i64>,
}

/// Response envelope: `{"id": <int>, "result": <any|null>, "error": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Identifier echoed back by the server.
    pub id: i64,
    /// Call result; `None` both when absent and when explicitly `null`.
    #[serde(default)]
    pub result: Option<T>,
    /// Failure detail; checked before `result` is ever interpreted.
    #[serde(default)]
    pub error: Option<RpcError>,
}

impl<T> Envelope<T> {
    /// Classify the envelope's error field, if any.
    ///
    /// `Ok(())` means the call succeeded as far as the envelope is
    /// concerned; the result may still be `null` for void methods.
    ///
    /// # Errors
    ///
    /// Returns the classified failure when the error field is populated.
    pub fn check(&self) -> DelugeResult<()> {
        self.error
            .as_ref()
            .map_or(Ok(()), |error| Err(classify_error(error)))
    }

    /// Classify the envelope and extract a mandatory result.
    ///
    /// # Errors
    ///
    /// Returns the classified failure, or
    /// [`DelugeError::UnexpectedResponse`] when neither a result nor an
    /// interpretable error is present.
    pub fn into_result(self) -> DelugeResult<T> {
        self.check()?;
        self.result.ok_or(DelugeError::UnexpectedResponse)
    }
}

/// Map an envelope error object onto the error taxonomy.
///
/// The authentication code wins over any message text; the
/// duplicate-torrent markers are matched as substrings because the daemon
/// wraps the underlying exception inconsistently across versions.
#[must_use]
pub fn classify_error(error: &RpcError) -> DelugeError {
    if error.code == Some(AUTH_ERROR_CODE) {
        return DelugeError::Unauthenticated;
    }

    let Some(message) = &error.message else {
        return DelugeError::UnexpectedResponse;
    };

    if DUPLICATE_TORRENT_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
    {
        tracing::debug!(%message, "recovering duplicate-torrent server bug");
        DelugeError::DuplicateTorrent
    } else {
        DelugeError::server(message)
    }
}

/// Decode a raw response body into the generic envelope.
///
/// Every response goes through this before any method-specific coercion so
/// that the `error` field is inspected first, even when the typed result
/// shape would not match.
///
/// # Errors
///
/// Returns [`DelugeError::Decoding`] when the body is not valid JSON or
/// does not match the envelope shape.
pub fn decode_envelope(bytes: &[u8]) -> DelugeResult<Envelope<Value>> {
    serde_json::from_slice(bytes).map_err(|source| DelugeError::Decoding { source })
}
