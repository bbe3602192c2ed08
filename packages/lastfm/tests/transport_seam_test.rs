//! Integration tests for custom transports
//!
//! Embedding applications can bring their own HTTP stack by implementing
//! `Transport`; these tests exercise that seam through the public API only.

use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use serde::Serialize;
use tapedeck_lastfm::{
    flatten, BoxError, ClientConfig, LastfmClient, LastfmError, Params, Transport,
};
use tapedeck_test_utils::fixtures;

/// Transport answering every call with the same body and counting calls
#[derive(Clone)]
struct CannedTransport {
    body: String,
    calls: Arc<Mutex<Vec<Params>>>,
}

impl CannedTransport {
    fn new(body: serde_json::Value) -> Self {
        Self {
            body: body.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Transport for CannedTransport {
    fn post_form(&self, _url: &str, form: &Params) -> Result<Box<dyn Read + Send>, BoxError> {
        self.calls.lock().unwrap().push(form.clone());
        Ok(Box::new(Cursor::new(self.body.clone().into_bytes())))
    }
}

fn config() -> ClientConfig {
    ClientConfig::new("seam_key", "seam_secret")
}

#[test]
fn test_boxed_transport_is_accepted() {
    let transport: Box<dyn Transport> =
        Box::new(CannedTransport::new(fixtures::session("listener", "boxed-key")));
    let mut client = LastfmClient::with_transport(config(), transport).unwrap();

    client.login("listener", "hunter2").unwrap();
    assert_eq!(client.session_key(), Some("boxed-key"));
}

#[test]
fn test_borrowed_transport_is_accepted() {
    let transport = CannedTransport::new(fixtures::session("listener", "borrowed-key"));
    let mut client = LastfmClient::with_transport(config(), &transport).unwrap();

    client.login("listener", "hunter2").unwrap();
    assert_eq!(transport.calls.lock().unwrap().len(), 1);
}

#[test]
fn test_rejected_login_reports_server_values() {
    let transport = CannedTransport::new(fixtures::error(4, "Invalid session key"));
    let mut client = LastfmClient::with_transport(config(), transport.clone()).unwrap();

    let err = client.login("listener", "hunter2").unwrap_err();
    assert_matches!(
        err,
        LastfmError::RemoteAuth { code: 4, ref message } if message == "Invalid session key"
    );
    assert!(!client.is_authenticated());
}

#[test]
fn test_validation_failures_never_reach_transport() {
    let transport = CannedTransport::new(fixtures::session("listener", "key"));
    let mut client = LastfmClient::with_transport(config(), transport.clone()).unwrap();

    assert_matches!(
        client.scrobble("Rush", "Tom Sawyer", None),
        Err(LastfmError::NotAuthenticated)
    );
    client.login("listener", "hunter2").unwrap();
    assert_matches!(
        client.scrobble("", "Tom Sawyer", None),
        Err(LastfmError::InvalidArgument(_))
    );

    assert_eq!(transport.calls.lock().unwrap().len(), 1);
}

#[test]
fn test_flatten_matches_call_parameters() {
    #[derive(Serialize)]
    struct NowPlaying {
        artist: String,
        track: String,
    }

    let record = NowPlaying {
        artist: "Rush".to_string(),
        track: "Limelight".to_string(),
    };
    let transport = CannedTransport::new(serde_json::json!({"nowplaying": {}}));
    let client = LastfmClient::with_transport(config(), transport.clone()).unwrap();

    client.call("track.updateNowPlaying", &record).unwrap();

    let sent = transport.calls.lock().unwrap()[0].clone();
    for (key, value) in flatten(&record).unwrap() {
        assert_eq!(sent[&key], value);
    }
    // Anonymous client: no session key attached
    assert!(!sent.contains_key("sk"));
}
