//! End-to-end tests against a mock web server speaking the daemon's
//! dialect: always HTTP 200, failures embedded in the JSON envelope.

use deluge_client::{
    BasicAuth, ClientConfig, DelugeClient, DelugeError, FilePriority, PropertyKey, TorrentItem,
    TorrentOptions, TorrentState,
};
use httpmock::MockServer;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;

fn client_for(server: &MockServer) -> anyhow::Result<DelugeClient> {
    let base: Url = server.base_url().parse()?;
    Ok(DelugeClient::new(ClientConfig::new(base, "deluge"))?)
}

#[tokio::test]
async fn connectivity_check_sends_exact_body_and_reads_bool() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/json")
            .header("content-type", "application/json")
            .json_body(json!({"id": 1, "method": "web.connected", "params": []}));
        then.status(200)
            .json_body(json!({"id": 1, "result": true, "error": null}));
    });

    let client = client_for(&server)?;
    assert!(client.connected().await?);
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn duplicate_torrent_error_is_recovered_as_known_bug() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST)
            .path("/json")
            .json_body_partial(r#"{"method": "core.add_torrent_file"}"#);
        then.status(200).json_body(json!({
            "id": 1,
            "result": null,
            "error": {"message": "Torrent already in session", "code": 5}
        }));
    });

    let client = client_for(&server)?;
    let outcome = client.add_torrent_file("linux.torrent", b"d8:announce0:e").await;
    assert!(matches!(outcome, Err(DelugeError::DuplicateTorrent)));
    Ok(())
}

#[tokio::test]
async fn torrent_items_builds_the_content_tree() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST)
            .path("/json")
            .json_body(json!({
                "id": 1,
                "method": "web.get_torrent_files",
                "params": ["aaaa"]
            }));
        then.status(200).json_body(json!({
            "id": 1,
            "result": {
                "contents": {
                    "a.txt": {"type": "file", "size": 10},
                    "sub": {"type": "dir", "contents": {}}
                }
            },
            "error": null
        }));
    });

    let client = client_for(&server)?;
    let items = client.torrent_items("aaaa").await?;
    assert_eq!(items.len(), 2);

    let file = items
        .iter()
        .find_map(|item| match item {
            TorrentItem::File(file) => Some(file),
            TorrentItem::Directory { .. } => None,
        })
        .expect("file leaf expected");
    assert_eq!(file.name, "a.txt");
    assert_eq!(file.size, 10);

    assert!(items.iter().any(
        |item| matches!(item, TorrentItem::Directory { name, items } if name == "sub" && items.is_empty())
    ));
    Ok(())
}

#[tokio::test]
async fn batch_remove_reports_per_hash_failures_without_failing() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST)
            .path("/json")
            .json_body(json!({
                "id": 1,
                "method": "core.remove_torrents",
                "params": [["a"], false]
            }));
        then.status(200).json_body(json!({
            "id": 1,
            "result": [["a", "torrent_id a not in session."]],
            "error": null
        }));
    });

    let client = client_for(&server)?;
    let failures = client.remove_torrents(&["a"], false).await?;
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].hash, "a");
    assert!(!failures[0].message.is_empty());
    Ok(())
}

#[tokio::test]
async fn expired_session_triggers_one_login_and_one_retry() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let method = server.mock(|when, then| {
        when.method(POST)
            .path("/json")
            .json_body_partial(r#"{"method": "web.connected"}"#);
        then.status(200).json_body(json!({
            "id": 1,
            "result": null,
            "error": {"message": "Not authenticated", "code": 1}
        }));
    });
    let login = server.mock(|when, then| {
        when.method(POST)
            .path("/json")
            .json_body(json!({"id": 1, "method": "auth.login", "params": ["deluge"]}));
        then.status(200)
            .json_body(json!({"id": 1, "result": true, "error": null}));
    });

    let client = client_for(&server)?;
    let outcome = client.connected().await;
    assert!(matches!(outcome, Err(DelugeError::Unauthenticated)));

    // One original call, one retry, nothing beyond that.
    method.assert_hits(2);
    login.assert_hits(1);
    Ok(())
}

#[tokio::test]
async fn failed_login_stops_the_retry() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let method = server.mock(|when, then| {
        when.method(POST)
            .path("/json")
            .json_body_partial(r#"{"method": "web.connected"}"#);
        then.status(200).json_body(json!({
            "id": 1,
            "result": null,
            "error": {"message": "Not authenticated", "code": 1}
        }));
    });
    let login = server.mock(|when, then| {
        when.method(POST)
            .path("/json")
            .json_body_partial(r#"{"method": "auth.login"}"#);
        then.status(200)
            .json_body(json!({"id": 1, "result": false, "error": null}));
    });

    let client = client_for(&server)?;
    let outcome = client.connected().await;
    assert!(matches!(outcome, Err(DelugeError::Unauthenticated)));

    method.assert_hits(1);
    login.assert_hits(1);
    Ok(())
}

#[tokio::test]
async fn update_ui_parses_snapshot_and_drops_bad_entries() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST)
            .path("/json")
            .json_body_partial(r#"{"method": "web.update_ui"}"#);
        then.status(200).json_body(json!({
            "id": 1,
            "result": {
                "connected": true,
                "torrents": {
                    "aaaa": {
                        "name": "linux.iso",
                        "state": "Downloading",
                        "progress": 12.5,
                        "total_size": 4096,
                        "tracker_host": "tracker.example.net"
                    },
                    "bbbb": {"progress": 99.9}
                },
                "filters": {"label": [["All", 2], ["linux", 1]]}
            },
            "error": null
        }));
    });

    let client = client_for(&server)?;
    let snapshot = client.update_ui(&PropertyKey::ALL).await?;

    assert_eq!(snapshot.torrents.len(), 1);
    let torrent = &snapshot.torrents[0];
    assert_eq!(torrent.hash, "aaaa");
    assert_eq!(torrent.state, TorrentState::Downloading);
    assert_eq!(torrent.size, Some(4096));
    assert_eq!(torrent.tracker.as_deref(), Some("tracker.example.net"));

    assert_eq!(snapshot.labels.len(), 1);
    assert_eq!(snapshot.labels[0].name, "linux");
    Ok(())
}

#[tokio::test]
async fn unconnected_daemon_surfaces_as_typed_error() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST)
            .path("/json")
            .json_body_partial(r#"{"method": "web.update_ui"}"#);
        then.status(200).json_body(json!({
            "id": 1,
            "result": {"connected": false, "torrents": {}, "filters": {}},
            "error": null
        }));
    });

    let client = client_for(&server)?;
    let outcome = client.update_ui(&[PropertyKey::Name]).await;
    assert!(matches!(outcome, Err(DelugeError::DaemonUnconnected)));
    Ok(())
}

#[tokio::test]
async fn hosts_drop_malformed_entries() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST)
            .path("/json")
            .json_body_partial(r#"{"method": "web.get_hosts"}"#);
        then.status(200).json_body(json!({
            "id": 1,
            "result": [["h1", "127.0.0.1", 58846, "Home"], ["bad-entry"]],
            "error": null
        }));
    });

    let client = client_for(&server)?;
    let hosts = client.hosts().await?;
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].id, "h1");
    assert_eq!(hosts[0].name, "Home");
    Ok(())
}

#[tokio::test]
async fn unknown_method_surfaces_the_server_message() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/json");
        then.status(200).json_body(json!({
            "id": 1,
            "result": null,
            "error": {"message": "Unknown method", "code": 2}
        }));
    });

    let client = client_for(&server)?;
    let outcome = client.set_label("aaaa", "linux").await;
    assert!(
        matches!(outcome, Err(DelugeError::Server { message }) if message == "Unknown method")
    );
    Ok(())
}

#[tokio::test]
async fn set_options_sends_only_populated_fields() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST).path("/json").json_body(json!({
            "id": 1,
            "method": "core.set_torrent_options",
            "params": [["aaaa"], {"file_priorities": [0, 7]}]
        }));
        then.status(200)
            .json_body(json!({"id": 1, "result": null, "error": null}));
    });

    let client = client_for(&server)?;
    let options = TorrentOptions {
        file_priorities: Some(vec![FilePriority::Skip, FilePriority::High]),
        ..TorrentOptions::default()
    };
    client.set_options(&["aaaa"], &options).await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn magnet_add_returns_the_new_hash() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/json").json_body(json!({
            "id": 1,
            "method": "core.add_torrent_magnet",
            "params": ["magnet:?xt=urn:btih:cafebabe", {}]
        }));
        then.status(200)
            .json_body(json!({"id": 1, "result": "cafebabe", "error": null}));
    });

    let client = client_for(&server)?;
    let hash = client
        .add_torrent_magnet("magnet:?xt=urn:btih:cafebabe")
        .await?;
    assert_eq!(hash, "cafebabe");
    Ok(())
}

#[tokio::test]
async fn basic_auth_header_rides_on_every_call() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/json")
            .header("authorization", "Basic dXNlcjpwYXNz");
        then.status(200)
            .json_body(json!({"id": 1, "result": true, "error": null}));
    });

    let base: Url = server.base_url().parse()?;
    let config = ClientConfig::new(base, "deluge").with_basic_auth(BasicAuth {
        username: "user".to_string(),
        password: "pass".to_string(),
    });
    let client = DelugeClient::new(config)?;

    assert!(client.connected().await?);
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn explicit_login_reports_the_daemon_verdict() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST)
            .path("/json")
            .json_body(json!({"id": 1, "method": "auth.login", "params": ["deluge"]}));
        then.status(200)
            .json_body(json!({"id": 1, "result": true, "error": null}));
    });

    let client = client_for(&server)?;
    assert!(client.login().await?);
    Ok(())
}
