//! Mock Last.fm server for testing authentication and scrobbling
//!
//! Provides a [`MockLastfmServer`] that answers form-encoded POSTs on the
//! `/2.0/` endpoint the way Last.fm does, dispatching on the `method` field
//! of the request body.

use std::collections::BTreeMap;

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// API path served by the mock, mirroring `ws.audioscrobbler.com/2.0/`
const API_PATH: &str = "/2.0/";

/// JSON bodies shaped like real Last.fm replies
pub mod fixtures {
    use serde_json::{json, Value};

    /// Successful `auth.getMobileSession` reply
    pub fn session(name: &str, key: &str) -> Value {
        json!({
            "session": {
                "name": name,
                "key": key,
                "subscriber": 0
            }
        })
    }

    /// Error envelope (`{"error": code, "message": ...}`)
    pub fn error(code: i32, message: &str) -> Value {
        json!({
            "error": code,
            "message": message
        })
    }

    /// Accepted `track.scrobble` reply echoing the submitted fields
    pub fn scrobble_accepted(artist: &str, track: &str, album: &str, timestamp: &str) -> Value {
        json!({
            "scrobbles": {
                "scrobble": {
                    "track": {"corrected": "0", "#text": track},
                    "artist": {"corrected": "0", "#text": artist},
                    "album": {"corrected": "0", "#text": album},
                    "albumArtist": {"corrected": "0", "#text": ""},
                    "timestamp": timestamp,
                    "ignoredMessage": {"code": "0", "#text": ""}
                },
                "@attr": {"accepted": 1, "ignored": 0}
            }
        })
    }

    /// `track.scrobble` reply where Last.fm ignored the play
    pub fn scrobble_ignored(artist: &str, track: &str, code: u32, reason: &str) -> Value {
        json!({
            "scrobbles": {
                "scrobble": {
                    "track": {"corrected": "0", "#text": track},
                    "artist": {"corrected": "0", "#text": artist},
                    "album": {"corrected": "0"},
                    "albumArtist": {"corrected": "0", "#text": ""},
                    "timestamp": "0",
                    "ignoredMessage": {"code": code.to_string(), "#text": reason}
                },
                "@attr": {"accepted": 0, "ignored": 1}
            }
        })
    }
}

/// Mock Last.fm server for testing the scrobbling client
///
/// This struct wraps a [`wiremock::MockServer`] and provides convenience methods
/// for setting up common Last.fm responses including sessions, scrobbles, and
/// error scenarios.
///
/// # Example
///
/// ```rust,ignore
/// use tapedeck_test_utils::MockLastfmServer;
///
/// #[tokio::test]
/// async fn test_scrobble() {
///     let server = MockLastfmServer::start().await;
///     server.mock_login_success("listener", "session-key").await;
///     server.mock_scrobble_success("Rush", "Tom Sawyer", "", "1700000000").await;
///
///     // Configure your client with server.api_url()
/// }
/// ```
pub struct MockLastfmServer {
    server: MockServer,
}

impl MockLastfmServer {
    /// Start a new mock Last.fm server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Get the API endpoint URL to configure a client with
    pub fn api_url(&self) -> String {
        format!("{}{}", self.server.uri(), API_PATH)
    }

    /// Mount a mock answering `auth.getMobileSession` for `username`
    pub async fn mock_login_success(&self, username: &str, session_key: &str) {
        // Match the form-encoded pair, as clients send it
        let username_pair = serde_urlencoded::to_string(&[("username", username)])
            .unwrap_or_else(|_| format!("username={}", username));

        Mock::given(method("POST"))
            .and(path(API_PATH))
            .and(body_string_contains("method=auth.getMobileSession"))
            .and(body_string_contains(username_pair))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(fixtures::session(username, session_key)),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a mock rejecting every login attempt
    ///
    /// Last.fm answers failed logins with HTTP 403 and an error envelope.
    pub async fn mock_login_failure(&self, code: i32, message: &str) {
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .and(body_string_contains("method=auth.getMobileSession"))
            .respond_with(ResponseTemplate::new(403).set_body_json(fixtures::error(code, message)))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock accepting every scrobble with the given echo fields
    pub async fn mock_scrobble_success(
        &self,
        artist: &str,
        track: &str,
        album: &str,
        timestamp: &str,
    ) {
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .and(body_string_contains("method=track.scrobble"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                fixtures::scrobble_accepted(artist, track, album, timestamp),
            ))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock ignoring every scrobble with the given reason
    pub async fn mock_scrobble_ignored(&self, code: u32, reason: &str) {
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .and(body_string_contains("method=track.scrobble"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(fixtures::scrobble_ignored("", "", code, reason)),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a mock answering `api_method` with an error envelope
    pub async fn mock_api_error(&self, api_method: &str, code: i32, message: &str) {
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .and(body_string_contains(format!("method={}", api_method)))
            .respond_with(ResponseTemplate::new(400).set_body_json(fixtures::error(code, message)))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock answering `api_method` with an arbitrary body
    pub async fn mock_raw(&self, api_method: &str, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .and(body_string_contains(format!("method={}", api_method)))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Decoded form bodies of every request received so far, in order
    pub async fn received_forms(&self) -> Vec<BTreeMap<String, String>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| {
                serde_urlencoded::from_bytes::<Vec<(String, String)>>(&request.body)
                    .unwrap_or_default()
                    .into_iter()
                    .collect()
            })
            .collect()
    }
}
