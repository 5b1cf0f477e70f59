//! Error taxonomy for Deluge web-API calls.

use std::error::Error;

use thiserror::Error;

/// Primary error type for Deluge operations.
#[derive(Debug, Error)]
pub enum DelugeError {
    /// Failed to encode the outgoing request body.
    #[error("failed to encode request body")]
    Encoding {
        /// Serialization failure detail.
        #[source]
        source: serde_json::Error,
    },
    /// Failed to decode the response body into the envelope shape.
    #[error("failed to decode response body")]
    Decoding {
        /// Deserialization failure detail.
        #[source]
        source: serde_json::Error,
    },
    /// The HTTP exchange itself failed.
    #[error("transport failure")]
    Transport {
        /// Underlying network-level failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The transport failed in a way it could not itself classify.
    #[error("unknown transport failure")]
    UnknownTransport {
        /// Underlying failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The session is missing or has expired (reserved error code 1).
    #[error("authentication required")]
    Unauthenticated,
    /// The server answered, but the envelope was uninterpretable.
    #[error("unexpected response")]
    UnexpectedResponse,
    /// The server reported an error message.
    #[error("server error: {message}")]
    Server {
        /// Message carried in the envelope's error field.
        message: String,
    },
    /// The torrent is already in the session. The daemon reports this as a
    /// generic error instead of an idempotent success.
    #[error("torrent already in session")]
    DuplicateTorrent,
    /// The web server is reachable but no daemon host is connected.
    #[error("daemon is not connected to a host")]
    DaemonUnconnected,
}

impl DelugeError {
    /// Wrap a network-level failure from the transport.
    #[must_use]
    pub fn transport(source: impl Error + Send + Sync + 'static) -> Self {
        Self::Transport {
            source: Box::new(source),
        }
    }

    /// Build a server error from an envelope message.
    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }
}

/// Convenience alias for Deluge call results.
pub type DelugeResult<T> = Result<T, DelugeError>;
