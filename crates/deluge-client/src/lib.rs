#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Asynchronous client for the Deluge web API.
//!
//! The daemon speaks an idiosyncratic JSON-RPC dialect: every response is
//! HTTP 200 with failures embedded in the body, sessions expire silently
//! and are re-established transparently with a single retry, and results
//! are weakly-typed structures coerced defensively into the records of
//! [`deluge_proto`].
//!
//! Layout:
//! - `config.rs`: immutable client configuration
//! - `transport.rs`: the reqwest-backed exchange and its trait seam
//! - `auth.rs`: the re-authentication strategy and single-retry coordinator
//! - `client.rs`: the shared client handle
//! - `requests.rs`: the typed request catalog

pub mod auth;
pub mod client;
pub mod config;
pub mod requests;
pub mod transport;

pub use auth::{AuthStrategy, PasswordLogin};
pub use client::DelugeClient;
pub use config::{BasicAuth, ClientConfig};
pub use deluge_proto::error::{DelugeError, DelugeResult};
pub use deluge_proto::model::{
    FilePriority, Host, Label, PropertyKey, RemovalFailure, Torrent, TorrentFile, TorrentItem,
    TorrentOptions, TorrentState, UiSnapshot,
};
pub use transport::{RpcCall, RpcTransport};
