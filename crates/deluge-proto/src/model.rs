//! Domain entities built from the daemon's weakly-typed payloads.
//!
//! All records are immutable values once constructed; nothing here holds a
//! reference to the transport or any shared mutable state.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Wire names for the `state` strings the daemon emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TorrentState {
    /// Disk space is being allocated.
    Allocating,
    /// Data is being checked against the metainfo.
    Checking,
    /// Actively downloading.
    Downloading,
    /// Complete and uploading to peers.
    Seeding,
    /// Paused by the user or the queue.
    Paused,
    /// Waiting in the queue.
    Queued,
    /// Storage is being moved.
    Moving,
    /// The daemon flagged the torrent as faulted.
    Error,
}

impl TorrentState {
    /// Parse a daemon state string; unrecognized states are rejected.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Allocating" => Some(Self::Allocating),
            "Checking" => Some(Self::Checking),
            "Downloading" => Some(Self::Downloading),
            "Seeding" => Some(Self::Seeding),
            "Paused" => Some(Self::Paused),
            "Queued" => Some(Self::Queued),
            "Moving" => Some(Self::Moving),
            "Error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Torrent properties that can be requested through `web.update_ui`.
///
/// The wire names are part of the daemon's contract and must match exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKey {
    /// Display name.
    Name,
    /// Lifecycle state string.
    State,
    /// Completion percentage (0–100).
    Progress,
    /// Estimated seconds until completion.
    Eta,
    /// Assigned label.
    Label,
    /// Total payload size in bytes.
    Size,
    /// Bytes downloaded so far.
    Downloaded,
    /// Current download rate in bytes per second.
    DownloadRate,
    /// Current upload rate in bytes per second.
    UploadRate,
    /// Connected peers.
    Peers,
    /// Peers in the swarm.
    TotalPeers,
    /// Connected seeds.
    Seeds,
    /// Seeds in the swarm.
    TotalSeeds,
    /// Download directory on the daemon host.
    DownloadPath,
    /// Epoch timestamp of when the torrent was added.
    DateAdded,
    /// Hostname of the active tracker.
    Tracker,
}

impl PropertyKey {
    /// Every known property, in a stable order.
    pub const ALL: [Self; 16] = [
        Self::Name,
        Self::State,
        Self::Progress,
        Self::Eta,
        Self::Label,
        Self::Size,
        Self::Downloaded,
        Self::DownloadRate,
        Self::UploadRate,
        Self::Peers,
        Self::TotalPeers,
        Self::Seeds,
        Self::TotalSeeds,
        Self::DownloadPath,
        Self::DateAdded,
        Self::Tracker,
    ];

    /// The daemon-side key string.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::State => "state",
            Self::Progress => "progress",
            Self::Eta => "eta",
            Self::Label => "label",
            Self::Size => "total_size",
            Self::Downloaded => "total_done",
            Self::DownloadRate => "download_payload_rate",
            Self::UploadRate => "upload_payload_rate",
            Self::Peers => "num_peers",
            Self::TotalPeers => "total_peers",
            Self::Seeds => "num_seeds",
            Self::TotalSeeds => "total_seeds",
            Self::DownloadPath => "save_path",
            Self::DateAdded => "time_added",
            Self::Tracker => "tracker_host",
        }
    }
}

/// A torrent known to the daemon, keyed by its info-hash.
///
/// The hash is supplied by the server as a map key, never generated here.
/// Beyond `name` and `state`, every attribute is optional: the caller
/// controls which properties the snapshot request asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct Torrent {
    /// Stable identifying info-hash.
    pub hash: String,
    /// Display name.
    pub name: String,
    /// Lifecycle state.
    pub state: TorrentState,
    /// Completion percentage (0–100).
    pub progress: Option<f64>,
    /// Estimated seconds until completion.
    pub eta: Option<i64>,
    /// Assigned label, when the label plugin is active.
    pub label: Option<String>,
    /// Total payload size in bytes.
    pub size: Option<u64>,
    /// Bytes downloaded so far.
    pub downloaded: Option<u64>,
    /// Download rate in bytes per second.
    pub download_rate: Option<f64>,
    /// Upload rate in bytes per second.
    pub upload_rate: Option<f64>,
    /// Connected peers.
    pub peers: Option<u64>,
    /// Peers in the swarm; `-1` when the tracker has not reported.
    pub total_peers: Option<i64>,
    /// Connected seeds.
    pub seeds: Option<u64>,
    /// Seeds in the swarm; `-1` when the tracker has not reported.
    pub total_seeds: Option<i64>,
    /// Download directory on the daemon host.
    pub download_path: Option<String>,
    /// When the torrent was added.
    pub date_added: Option<DateTime<Utc>>,
    /// Hostname of the active tracker.
    pub tracker: Option<String>,
}

/// One entry of a torrent's content listing: a file leaf or a directory of
/// further items.
///
/// The structure is trusted to be acyclic and of bounded depth; the daemon
/// derives it from file paths inside the metainfo.
#[derive(Debug, Clone, PartialEq)]
pub enum TorrentItem {
    /// A single file.
    File(TorrentFile),
    /// A directory and its children. Child order is whatever the parse of
    /// the underlying JSON object yields; the wire format guarantees none.
    Directory {
        /// Directory name.
        name: String,
        /// Items nested under this directory.
        items: Vec<TorrentItem>,
    },
}

impl TorrentItem {
    /// Name of the file or directory.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File(file) => &file.name,
            Self::Directory { name, .. } => name,
        }
    }
}

/// A file inside a torrent's content listing.
#[derive(Debug, Clone, PartialEq)]
pub struct TorrentFile {
    /// File name (not the full path).
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Transfer priority.
    pub priority: FilePriority,
    /// Completion percentage (0–1) when reported.
    pub progress: Option<f64>,
    /// Position of the file within the torrent.
    pub index: Option<u64>,
}

/// File transfer priority on the daemon's sparse integer scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilePriority {
    /// Do not download (0).
    Skip,
    /// Low priority (1).
    Low,
    /// Normal priority (4).
    #[default]
    Normal,
    /// High priority (7).
    High,
}

impl FilePriority {
    /// The integer the daemon uses for this priority.
    #[must_use]
    pub const fn wire_value(self) -> u8 {
        match self {
            Self::Skip => 0,
            Self::Low => 1,
            Self::Normal => 4,
            Self::High => 7,
        }
    }

    /// Map a daemon integer back onto the scale. Integers the scale does
    /// not name (the daemon has historically emitted 2, 3, 5, and 6) read
    /// as normal.
    #[must_use]
    pub const fn from_wire(value: i64) -> Self {
        match value {
            0 => Self::Skip,
            1 => Self::Low,
            7 => Self::High,
            _ => Self::Normal,
        }
    }
}

impl Serialize for FilePriority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.wire_value())
    }
}

/// A user-visible label and how many torrents carry it.
///
/// The synthetic "All" aggregate the web UI prepends is not a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Label name.
    pub name: String,
    /// Number of torrents carrying the label.
    pub count: u64,
}

/// A daemon host the web server knows how to connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Server-assigned host identifier.
    pub id: String,
    /// Daemon address; a bare hostname or IP, not a full URL.
    pub address: url::Host<String>,
    /// Daemon RPC port.
    pub port: u16,
    /// Display name.
    pub name: String,
}

/// One per-hash failure from a batch torrent removal.
///
/// Hashes absent from the failure list were removed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalFailure {
    /// Hash the daemon could not remove.
    pub hash: String,
    /// Daemon-supplied failure message.
    pub message: String,
}

/// The torrent and label snapshot returned by a UI poll.
#[derive(Debug, Clone, PartialEq)]
pub struct UiSnapshot {
    /// All torrents the daemon reported, one per parseable entry.
    pub torrents: Vec<Torrent>,
    /// Labels from the filter tree, excluding the synthetic "All".
    pub labels: Vec<Label>,
}

/// Per-torrent option overrides for `core.set_torrent_options`.
///
/// `None` fields are omitted from the wire payload, leaving the daemon's
/// current value untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct TorrentOptions {
    /// Per-file priorities, indexed by file position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_priorities: Option<Vec<FilePriority>>,
    /// Download rate cap in KiB/s; `-1` lifts the cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_download_speed: Option<f64>,
    /// Upload rate cap in KiB/s; `-1` lifts the cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_upload_speed: Option<f64>,
    /// Peer connection cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<i64>,
    /// Upload slot cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_upload_slots: Option<i64>,
    /// Whether the queue manages this torrent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_managed: Option<bool>,
    /// Stop seeding once the share ratio is reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_at_ratio: Option<bool>,
    /// Share ratio at which seeding stops.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_ratio: Option<f64>,
    /// Remove the torrent when the stop ratio is reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_at_ratio: Option<bool>,
    /// Move the payload when the download completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_completed: Option<bool>,
    /// Destination for the completed-move.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_completed_path: Option<String>,
    /// Prioritize the first and last pieces of each file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prioritize_first_last_pieces: Option<bool>,
    /// Enable super-seeding mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_seeding: Option<bool>,
}
