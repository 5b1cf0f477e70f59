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

//! Protocol layer for the Deluge web API: envelope codec, error
//! classification, and defensive parsers for the daemon's weakly-typed
//! results.
//!
//! Everything here is a pure, reentrant transform over already-received
//! bytes or about-to-be-sent bodies; transport concerns live in the client
//! crate.
//!
//! Layout:
//! - `envelope.rs`: request bodies, the `{id, result, error}` envelope, and
//!   the shared success/failure classifier
//! - `error.rs`: the error taxonomy for every call
//! - `model.rs`: typed domain records
//! - `parse.rs`: best-effort parsers that drop malformed elements

pub mod envelope;
pub mod error;
pub mod model;
pub mod parse;

pub use envelope::{Envelope, RpcError, RpcRequest, classify_error, decode_envelope};
pub use error::{DelugeError, DelugeResult};
pub use model::{
    FilePriority, Host, Label, PropertyKey, RemovalFailure, Torrent, TorrentFile, TorrentItem,
    TorrentOptions, TorrentState, UiSnapshot,
};
pub use parse::{parse_hosts, parse_removal_failures, parse_torrent_items, parse_ui_snapshot};
