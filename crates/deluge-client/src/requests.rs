//! The request catalog: one typed method per supported remote call.
//!
//! Method name strings and parameter order are the daemon's wire contract
//! and are reproduced exactly; each method binds its parameters and result
//! transform and routes through the shared dispatch path.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use deluge_proto::error::{DelugeError, DelugeResult};
use deluge_proto::model::{
    Host, PropertyKey, RemovalFailure, TorrentItem, TorrentOptions, UiSnapshot,
};
use deluge_proto::parse;
use serde_json::{Value, json};
use url::Url;

use crate::client::DelugeClient;

pub(crate) mod methods {
    //! Remote method names, fixed by the daemon.

    pub(crate) const WEB_UPDATE_UI: &str = "web.update_ui";
    pub(crate) const WEB_GET_TORRENT_FILES: &str = "web.get_torrent_files";
    pub(crate) const WEB_CONNECTED: &str = "web.connected";
    pub(crate) const WEB_GET_HOSTS: &str = "web.get_hosts";
    pub(crate) const WEB_CONNECT: &str = "web.connect";
    pub(crate) const CORE_ADD_TORRENT_FILE: &str = "core.add_torrent_file";
    pub(crate) const CORE_ADD_TORRENT_MAGNET: &str = "core.add_torrent_magnet";
    pub(crate) const CORE_ADD_TORRENT_URL: &str = "core.add_torrent_url";
    pub(crate) const CORE_REMOVE_TORRENTS: &str = "core.remove_torrents";
    pub(crate) const CORE_PAUSE_TORRENT: &str = "core.pause_torrent";
    pub(crate) const CORE_RESUME_TORRENT: &str = "core.resume_torrent";
    pub(crate) const CORE_MOVE_STORAGE: &str = "core.move_storage";
    pub(crate) const CORE_FORCE_RECHECK: &str = "core.force_recheck";
    pub(crate) const CORE_FORCE_REANNOUNCE: &str = "core.force_reannounce";
    pub(crate) const CORE_SET_TORRENT_OPTIONS: &str = "core.set_torrent_options";
    pub(crate) const LABEL_SET_TORRENT: &str = "label.set_torrent";
}

impl DelugeClient {
    /// Poll the torrent and label snapshot, requesting `properties` for
    /// each torrent.
    ///
    /// # Errors
    ///
    /// [`DelugeError::DaemonUnconnected`] when the web server has no daemon
    /// session, plus the usual transport and classification failures.
    pub async fn update_ui(&self, properties: &[PropertyKey]) -> DelugeResult<UiSnapshot> {
        let keys: Vec<&str> = properties.iter().map(|key| key.wire_name()).collect();
        let result = self
            .call(methods::WEB_UPDATE_UI, vec![json!(keys), json!({})])
            .await?;
        parse::parse_ui_snapshot(&result)
    }

    /// Fetch the file/directory tree for the torrent identified by `hash`.
    ///
    /// # Errors
    ///
    /// [`DelugeError::UnexpectedResponse`] when the daemon returns no
    /// content listing for the hash.
    pub async fn torrent_items(&self, hash: &str) -> DelugeResult<Vec<TorrentItem>> {
        let result = self
            .call(methods::WEB_GET_TORRENT_FILES, vec![json!(hash)])
            .await?;
        parse::parse_torrent_items(&result)
    }

    /// Whether the web server is connected to a daemon.
    ///
    /// # Errors
    ///
    /// [`DelugeError::UnexpectedResponse`] when the result is not a
    /// boolean.
    pub async fn connected(&self) -> DelugeResult<bool> {
        let result = self.call(methods::WEB_CONNECTED, Vec::new()).await?;
        result.as_bool().ok_or(DelugeError::UnexpectedResponse)
    }

    /// List the daemon hosts the web server knows about.
    ///
    /// # Errors
    ///
    /// [`DelugeError::UnexpectedResponse`] when the result is not a host
    /// array; individual malformed entries are dropped, not fatal.
    pub async fn hosts(&self) -> DelugeResult<Vec<Host>> {
        let result = self.call(methods::WEB_GET_HOSTS, Vec::new()).await?;
        parse::parse_hosts(&result)
    }

    /// Connect the web server to the daemon host identified by `host_id`.
    ///
    /// # Errors
    ///
    /// Transport and classification failures.
    pub async fn connect_host(&self, host_id: &str) -> DelugeResult<()> {
        self.call(methods::WEB_CONNECT, vec![json!(host_id)])
            .await
            .map(|_| ())
    }

    /// Add a torrent from an in-memory metainfo file.
    ///
    /// Returns the new torrent's hash. Re-adding an existing torrent
    /// surfaces the daemon's defect as [`DelugeError::DuplicateTorrent`].
    ///
    /// # Errors
    ///
    /// [`DelugeError::DuplicateTorrent`], [`DelugeError::UnexpectedResponse`]
    /// when no hash comes back, and the usual transport failures.
    pub async fn add_torrent_file(&self, filename: &str, content: &[u8]) -> DelugeResult<String> {
        let encoded = STANDARD.encode(content);
        let result = self
            .call(
                methods::CORE_ADD_TORRENT_FILE,
                vec![json!(filename), json!(encoded), json!({})],
            )
            .await?;
        expect_hash(result)
    }

    /// Add several metainfo files, one call per file, collecting the
    /// returned hashes. Fails fast on the first error.
    ///
    /// # Errors
    ///
    /// The first failing add aborts the remainder.
    pub async fn add_torrent_files<'a, I>(&self, files: I) -> DelugeResult<Vec<String>>
    where
        I: IntoIterator<Item = (&'a str, &'a [u8])> + Send,
    {
        let mut hashes = Vec::new();
        for (filename, content) in files {
            hashes.push(self.add_torrent_file(filename, content).await?);
        }
        Ok(hashes)
    }

    /// Add a torrent from a magnet link.
    ///
    /// # Errors
    ///
    /// Same failure surface as [`Self::add_torrent_file`].
    pub async fn add_torrent_magnet(&self, uri: &str) -> DelugeResult<String> {
        let result = self
            .call(
                methods::CORE_ADD_TORRENT_MAGNET,
                vec![json!(uri), json!({})],
            )
            .await?;
        expect_hash(result)
    }

    /// Add a torrent from a web URL the daemon downloads itself.
    ///
    /// # Errors
    ///
    /// Same failure surface as [`Self::add_torrent_file`].
    pub async fn add_torrent_url(&self, url: &Url) -> DelugeResult<String> {
        let result = self
            .call(
                methods::CORE_ADD_TORRENT_URL,
                vec![json!(url.as_str()), json!({})],
            )
            .await?;
        expect_hash(result)
    }

    /// Remove torrents by hash, optionally deleting downloaded data.
    ///
    /// The call succeeds even when some hashes fail; the returned list
    /// names only the failures, so an empty list means every hash was
    /// removed.
    ///
    /// # Errors
    ///
    /// [`DelugeError::UnexpectedResponse`] when the result is not a failure
    /// list, plus transport failures.
    pub async fn remove_torrents(
        &self,
        hashes: &[&str],
        remove_data: bool,
    ) -> DelugeResult<Vec<RemovalFailure>> {
        let result = self
            .call(
                methods::CORE_REMOVE_TORRENTS,
                vec![json!(hashes), json!(remove_data)],
            )
            .await?;
        parse::parse_removal_failures(&result)
    }

    /// Pause the given torrents.
    ///
    /// # Errors
    ///
    /// Transport and classification failures.
    pub async fn pause(&self, hashes: &[&str]) -> DelugeResult<()> {
        self.call(methods::CORE_PAUSE_TORRENT, vec![json!(hashes)])
            .await
            .map(|_| ())
    }

    /// Resume the given torrents.
    ///
    /// # Errors
    ///
    /// Transport and classification failures.
    pub async fn resume(&self, hashes: &[&str]) -> DelugeResult<()> {
        self.call(methods::CORE_RESUME_TORRENT, vec![json!(hashes)])
            .await
            .map(|_| ())
    }

    /// Move the given torrents' storage to `path` on the daemon host.
    ///
    /// # Errors
    ///
    /// Transport and classification failures.
    pub async fn move_storage(&self, hashes: &[&str], path: &str) -> DelugeResult<()> {
        self.call(
            methods::CORE_MOVE_STORAGE,
            vec![json!(hashes), json!(path)],
        )
        .await
        .map(|_| ())
    }

    /// Force a data recheck of the given torrents.
    ///
    /// # Errors
    ///
    /// Transport and classification failures.
    pub async fn recheck(&self, hashes: &[&str]) -> DelugeResult<()> {
        self.call(methods::CORE_FORCE_RECHECK, vec![json!(hashes)])
            .await
            .map(|_| ())
    }

    /// Force a tracker reannounce for the given torrents.
    ///
    /// # Errors
    ///
    /// Transport and classification failures.
    pub async fn reannounce(&self, hashes: &[&str]) -> DelugeResult<()> {
        self.call(methods::CORE_FORCE_REANNOUNCE, vec![json!(hashes)])
            .await
            .map(|_| ())
    }

    /// Assign `label` to the torrent identified by `hash`. An empty label
    /// clears the assignment.
    ///
    /// # Errors
    ///
    /// Transport and classification failures; the daemon rejects the call
    /// when the label plugin is disabled.
    pub async fn set_label(&self, hash: &str, label: &str) -> DelugeResult<()> {
        self.call(methods::LABEL_SET_TORRENT, vec![json!(hash), json!(label)])
            .await
            .map(|_| ())
    }

    /// Apply option overrides to the given torrents. Unset fields are left
    /// untouched on the daemon.
    ///
    /// # Errors
    ///
    /// [`DelugeError::Encoding`] when the options cannot be serialized,
    /// plus transport and classification failures.
    pub async fn set_options(
        &self,
        hashes: &[&str],
        options: &TorrentOptions,
    ) -> DelugeResult<()> {
        let options =
            serde_json::to_value(options).map_err(|source| DelugeError::Encoding { source })?;
        self.call(
            methods::CORE_SET_TORRENT_OPTIONS,
            vec![json!(hashes), options],
        )
        .await
        .map(|_| ())
    }
}

/// The add calls answer with the new torrent's hash as a bare string.
fn expect_hash(result: Value) -> DelugeResult<String> {
    match result {
        Value::String(hash) => Ok(hash),
        _ => Err(DelugeError::UnexpectedResponse),
    }
}
