//! Defensive parsers turning weakly-typed result payloads into domain
//! records.
//!
//! The daemon's results are heterogeneous JSON: maps of `Any`, positional
//! arrays standing in for tuples, and a recursive directory tree. Each
//! parser coerces best-effort and drops only the elements that fail, so one
//! bad entry never poisons a batch. A top-level result of the wrong shape is
//! still an [`DelugeError::UnexpectedResponse`].

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{DelugeError, DelugeResult};
use crate::model::{
    FilePriority, Host, Label, RemovalFailure, Torrent, TorrentFile, TorrentItem, TorrentState,
    UiSnapshot,
};

/// Parse the result of a `web.update_ui` poll.
///
/// Torrent entries that cannot be fully constructed are dropped
/// individually; the parse as a whole only fails when the result is not the
/// expected map, or when the daemon reports that no host is connected.
///
/// # Errors
///
/// Returns [`DelugeError::UnexpectedResponse`] when the result shape is not
/// a snapshot map, and [`DelugeError::DaemonUnconnected`] when the web
/// server has no backing daemon session.
pub fn parse_ui_snapshot(result: &Value) -> DelugeResult<UiSnapshot> {
    let map = result.as_object().ok_or(DelugeError::UnexpectedResponse)?;

    if map.get("connected").and_then(Value::as_bool) == Some(false) {
        return Err(DelugeError::DaemonUnconnected);
    }

    let entries = map
        .get("torrents")
        .and_then(Value::as_object)
        .ok_or(DelugeError::UnexpectedResponse)?;

    let mut torrents = Vec::with_capacity(entries.len());
    for (hash, properties) in entries {
        match parse_torrent(hash, properties) {
            Some(torrent) => torrents.push(torrent),
            None => debug!(%hash, "dropping unparseable torrent entry"),
        }
    }

    Ok(UiSnapshot {
        torrents,
        labels: parse_labels(map),
    })
}

/// Build one torrent record from its per-hash property map.
///
/// `name` and `state` are required; everything else degrades to `None`.
fn parse_torrent(hash: &str, properties: &Value) -> Option<Torrent> {
    let map = properties.as_object()?;
    let name = map.get("name")?.as_str()?.to_string();
    let state = TorrentState::from_name(map.get("state")?.as_str()?)?;

    Some(Torrent {
        hash: hash.to_string(),
        name,
        state,
        progress: field(map, "progress", Value::as_f64),
        eta: field(map, "eta", Value::as_i64),
        label: field(map, "label", Value::as_str).map(str::to_string),
        size: field(map, "total_size", Value::as_u64),
        downloaded: field(map, "total_done", Value::as_u64),
        download_rate: field(map, "download_payload_rate", Value::as_f64),
        upload_rate: field(map, "upload_payload_rate", Value::as_f64),
        peers: field(map, "num_peers", Value::as_u64),
        total_peers: field(map, "total_peers", Value::as_i64),
        seeds: field(map, "num_seeds", Value::as_u64),
        total_seeds: field(map, "total_seeds", Value::as_i64),
        download_path: field(map, "save_path", Value::as_str).map(str::to_string),
        date_added: field(map, "time_added", Value::as_f64).and_then(timestamp),
        tracker: field(map, "tracker_host", Value::as_str).map(str::to_string),
    })
}

/// The daemon reports `time_added` as fractional epoch seconds.
#[allow(clippy::cast_possible_truncation)]
fn timestamp(seconds: f64) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp(seconds as i64, 0)
}

fn field<'a, T>(
    map: &'a Map<String, Value>,
    key: &str,
    coerce: impl FnOnce(&'a Value) -> Option<T>,
) -> Option<T> {
    map.get(key).and_then(coerce)
}

/// Extract labels from the snapshot's filter tree.
///
/// Labels ride under `filters.label` as `[name, count]` pairs. Pairs with
/// the wrong arity or types, and the synthetic "All" aggregate, are
/// excluded; a missing filter tree yields no labels rather than an error.
fn parse_labels(result: &Map<String, Value>) -> Vec<Label> {
    let Some(pairs) = result
        .get("filters")
        .and_then(|filters| filters.get("label"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    pairs
        .iter()
        .filter_map(|pair| {
            let pair = pair.as_array()?;
            if pair.len() != 2 {
                return None;
            }
            let name = pair[0].as_str()?;
            if name == "All" {
                return None;
            }
            Some(Label {
                name: name.to_string(),
                count: pair[1].as_u64()?,
            })
        })
        .collect()
}

/// Parse the result of `web.get_torrent_files` into the item tree.
///
/// # Errors
///
/// Returns [`DelugeError::UnexpectedResponse`] when the result carries no
/// `contents` map.
pub fn parse_torrent_items(result: &Value) -> DelugeResult<Vec<TorrentItem>> {
    let contents = result
        .get("contents")
        .and_then(Value::as_object)
        .ok_or(DelugeError::UnexpectedResponse)?;

    Ok(parse_directory(contents))
}

/// Recursive descent over one directory's named nodes.
///
/// Nodes without a recognized `type` are skipped; a directory whose nested
/// contents are malformed becomes an empty directory instead of failing the
/// parse. Emitted order follows map iteration and carries no guarantee.
fn parse_directory(contents: &Map<String, Value>) -> Vec<TorrentItem> {
    let mut items = Vec::new();
    for (name, node) in contents {
        let Some(kind) = node.get("type").and_then(Value::as_str) else {
            debug!(%name, "skipping content node without a type");
            continue;
        };
        match kind {
            "dir" => {
                let children = node
                    .get("contents")
                    .and_then(Value::as_object)
                    .map(parse_directory)
                    .unwrap_or_default();
                items.push(TorrentItem::Directory {
                    name: name.clone(),
                    items: children,
                });
            }
            "file" => match parse_file(name, node) {
                Some(file) => items.push(TorrentItem::File(file)),
                None => debug!(%name, "dropping unparseable file node"),
            },
            _ => debug!(%name, %kind, "skipping content node of unknown type"),
        }
    }
    items
}

fn parse_file(name: &str, node: &Value) -> Option<TorrentFile> {
    let map = node.as_object()?;
    Some(TorrentFile {
        name: name.to_string(),
        size: map.get("size")?.as_u64()?,
        priority: field(map, "priority", Value::as_i64)
            .map(FilePriority::from_wire)
            .unwrap_or_default(),
        progress: field(map, "progress", Value::as_f64),
        index: field(map, "index", Value::as_u64),
    })
}

/// Parse the result of `web.get_hosts`.
///
/// Each element must be a 4-tuple of `(id, address, port, name)`; elements
/// failing arity, a field type, or address parsing are dropped.
///
/// # Errors
///
/// Returns [`DelugeError::UnexpectedResponse`] when the result is not an
/// array at all.
pub fn parse_hosts(result: &Value) -> DelugeResult<Vec<Host>> {
    let entries = result.as_array().ok_or(DelugeError::UnexpectedResponse)?;

    Ok(entries
        .iter()
        .filter_map(|entry| {
            let host = parse_host(entry);
            if host.is_none() {
                debug!("dropping malformed host entry");
            }
            host
        })
        .collect())
}

fn parse_host(entry: &Value) -> Option<Host> {
    let fields = entry.as_array()?;
    if fields.len() != 4 {
        return None;
    }
    Some(Host {
        id: fields[0].as_str()?.to_string(),
        address: url::Host::parse(fields[1].as_str()?).ok()?,
        port: u16::try_from(fields[2].as_u64()?).ok()?,
        name: fields[3].as_str()?.to_string(),
    })
}

/// Parse the per-hash failures of a batch `core.remove_torrents` call.
///
/// The daemon lists only the hashes that failed; absence means success.
///
/// # Errors
///
/// Returns [`DelugeError::UnexpectedResponse`] when the result is not an
/// array.
pub fn parse_removal_failures(result: &Value) -> DelugeResult<Vec<RemovalFailure>> {
    let entries = result.as_array().ok_or(DelugeError::UnexpectedResponse)?;

    Ok(entries
        .iter()
        .filter_map(|entry| {
            let pair = entry.as_array()?;
            if pair.len() != 2 {
                return None;
            }
            Some(RemovalFailure {
                hash: pair[0].as_str()?.to_string(),
                message: pair[1].as_str()?.to_string(),
            })
        })
        .collect())
}
