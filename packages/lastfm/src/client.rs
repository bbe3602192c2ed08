//! Last.fm API client implementation

use std::fmt;
use std::io::Read;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{LastfmError, LastfmResult};
use crate::models::{ErrorResponse, LoginResponse, ScrobbleResponse, ScrobbleResult, Session};
use crate::params::{flatten, LoginRequest, Params, ScrobbleRequest, ToParams};
use crate::signature::sign;
use crate::transport::{HttpTransport, Transport};

/// Method used to exchange user credentials for a session key
const METHOD_GET_MOBILE_SESSION: &str = "auth.getMobileSession";

/// Method used to submit a played track
const METHOD_SCROBBLE: &str = "track.scrobble";

/// Response format requested on every call
const RESPONSE_FORMAT: &str = "json";

/// Authentication state of a [`LastfmClient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// No session yet; only `login` and unauthenticated calls are possible
    Anonymous,
    /// `login` succeeded; the session key is attached to scrobbles
    Authenticated,
}

/// Last.fm API client
///
/// Generic over the [`Transport`] so tests can replace the network. Session
/// state changes need `&mut self`; wrap the client in a `Mutex` to share it
/// between threads.
pub struct LastfmClient<T = HttpTransport> {
    transport: T,
    api_key: String,
    api_secret: String,
    api_url: String,
    session: Option<Session>,
}

impl<T> fmt::Debug for LastfmClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastfmClient")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("state", &self.state())
            .finish()
    }
}

impl LastfmClient<HttpTransport> {
    /// Create a new Last.fm client with the given credentials
    ///
    /// # Errors
    /// Returns `LastfmError::Config` if the key or secret is empty
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> LastfmResult<Self> {
        Self::from_config(ClientConfig::new(api_key, api_secret))
    }

    /// Create a client talking to Last.fm over HTTP as described by `config`
    ///
    /// # Errors
    /// - `LastfmError::Config` if the configuration is invalid
    /// - `LastfmError::Transport` if the HTTP client cannot be built
    pub fn from_config(config: ClientConfig) -> LastfmResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, transport)
    }

    /// Create a Last.fm client from environment variables
    ///
    /// See [`ClientConfig::from_env`] for the variables read.
    pub fn from_env() -> LastfmResult<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }
}

impl<T> LastfmClient<T> {
    /// Current authentication state
    pub fn state(&self) -> ClientState {
        if self.session.is_some() {
            ClientState::Authenticated
        } else {
            ClientState::Anonymous
        }
    }

    /// Whether `login` has succeeded
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// The established session, if any
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The session key, if logged in
    pub fn session_key(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.key.as_str())
    }
}

impl<T: Transport> LastfmClient<T> {
    /// Create a client that sends requests through `transport`
    ///
    /// # Errors
    /// Returns `LastfmError::Config` if the configuration is invalid
    pub fn with_transport(config: ClientConfig, transport: T) -> LastfmResult<Self> {
        config.validate()?;

        Ok(Self {
            transport,
            api_key: config.api_key,
            api_secret: config.api_secret,
            api_url: config.api_url,
            session: None,
        })
    }

    /// Authenticate with a username and password
    ///
    /// On success the session is stored and the client becomes
    /// [`ClientState::Authenticated`]. A failed attempt leaves the previous
    /// state untouched.
    ///
    /// # Errors
    /// - `LastfmError::RemoteAuth` - If Last.fm rejects the credentials
    /// - `LastfmError::Transport` / `LastfmError::Read` - If the request fails
    /// - `LastfmError::Decode` - If the response is not the expected JSON
    #[instrument(skip(self, password))]
    pub fn login(&mut self, username: &str, password: &str) -> LastfmResult<&Session> {
        debug!("Requesting mobile session from Last.fm");

        let body = self.post(METHOD_GET_MOBILE_SESSION, &LoginRequest { username, password })?;
        let response: LoginResponse = serde_json::from_slice(&body)?;

        if response.session.key.is_empty() {
            warn!(
                code = response.error,
                reason = %response.message,
                "Last.fm login rejected"
            );
            return Err(LastfmError::RemoteAuth {
                code: response.error,
                message: response.message,
            });
        }

        let session = Session::from(response.session);
        info!(user = %session.name, "Last.fm session established");

        Ok(self.session.insert(session))
    }

    /// Scrobble a track played now
    ///
    /// `album` is optional; `None` and `Some("")` both leave it out of the
    /// request.
    ///
    /// # Errors
    /// - `LastfmError::NotAuthenticated` - If `login` has not succeeded
    /// - `LastfmError::InvalidArgument` - If artist or track is empty
    /// - `LastfmError::Api` - If Last.fm returns an error
    /// - `LastfmError::Transport` / `LastfmError::Read` - If the request fails
    /// - `LastfmError::Decode` - If the response is not the expected JSON
    pub fn scrobble(
        &self,
        artist: &str,
        track: &str,
        album: Option<&str>,
    ) -> LastfmResult<ScrobbleResult> {
        self.scrobble_at(artist, track, album, Utc::now())
    }

    /// Scrobble a track that started playing at `played_at`
    ///
    /// Same contract as [`scrobble`](Self::scrobble).
    #[instrument(skip(self))]
    pub fn scrobble_at(
        &self,
        artist: &str,
        track: &str,
        album: Option<&str>,
        played_at: DateTime<Utc>,
    ) -> LastfmResult<ScrobbleResult> {
        let session_key = self.session_key().ok_or(LastfmError::NotAuthenticated)?;

        if artist.is_empty() || track.is_empty() {
            return Err(LastfmError::InvalidArgument(
                "artist and track must not be empty".to_string(),
            ));
        }

        let request = ScrobbleRequest {
            artist,
            track,
            album,
            timestamp: played_at.timestamp(),
            session_key,
        };

        debug!(timestamp = request.timestamp, "Submitting scrobble to Last.fm");

        let body = self.post(METHOD_SCROBBLE, &request)?;
        check_api_error(&body)?;

        let response: ScrobbleResponse = serde_json::from_slice(&body)?;
        let result = response.into_result().ok_or_else(|| {
            LastfmError::Decode(serde::de::Error::custom(
                "scrobble response contained no scrobbles",
            ))
        })?;

        match &result.ignored_message {
            Some(ignored) => warn!(
                code = ignored.code,
                reason = %ignored.message,
                "Last.fm ignored scrobble"
            ),
            None if !result.is_accepted() => warn!(
                track = %result.track.text,
                "Last.fm accepted no scrobbles"
            ),
            None => info!(
                track = %result.track.text,
                artist = %result.artist.text,
                "Scrobble accepted"
            ),
        }

        Ok(result)
    }

    /// Make a signed call to any API method with a flat record of string
    /// fields
    ///
    /// Field names become lowercase parameter names. When the client is
    /// authenticated and the record has no `sk` field, the session key is
    /// added. Returns the decoded JSON reply.
    ///
    /// # Errors
    /// - `LastfmError::UnsupportedFieldType` - If a field is not a string
    /// - `LastfmError::Api` - If Last.fm returns an error
    /// - `LastfmError::Transport` / `LastfmError::Read` - If the request fails
    /// - `LastfmError::Decode` - If the response is not JSON
    #[instrument(skip(self, record))]
    pub fn call<R>(&self, method: &str, record: &R) -> LastfmResult<Value>
    where
        R: Serialize + ?Sized,
    {
        let mut params = flatten(record)?;
        if let Some(key) = self.session_key() {
            params
                .entry("sk".to_string())
                .or_insert_with(|| key.to_string());
        }

        let body = self.post(method, &params)?;
        check_api_error(&body)?;

        Ok(serde_json::from_slice(&body)?)
    }

    /// Sign `request` for `method` and send it, returning the raw body
    fn post<R>(&self, method: &str, request: &R) -> LastfmResult<Vec<u8>>
    where
        R: ToParams + ?Sized,
    {
        let params = self.signed_params(method, request);

        debug!(method, param_count = params.len(), "Sending signed Last.fm request");

        let mut reader = self
            .transport
            .post_form(&self.api_url, &params)
            .map_err(LastfmError::Transport)?;

        let mut body = Vec::new();
        reader.read_to_end(&mut body).map_err(LastfmError::Read)?;

        debug!(method, bytes = body.len(), "Received Last.fm response");

        Ok(body)
    }

    /// Full parameter set for `method`: request fields, `method`, `api_key`,
    /// then `api_sig` over all of those, then `format`
    fn signed_params<R>(&self, method: &str, request: &R) -> Params
    where
        R: ToParams + ?Sized,
    {
        let mut params = request.to_params();
        params.insert("method".to_string(), method.to_string());
        params.insert("api_key".to_string(), self.api_key.clone());

        let api_sig = sign(
            params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            &self.api_secret,
        );
        params.insert("api_sig".to_string(), api_sig);
        params.insert("format".to_string(), RESPONSE_FORMAT.to_string());
        params
    }
}

/// Map a Last.fm error envelope to `LastfmError::Api`
fn check_api_error(body: &[u8]) -> LastfmResult<()> {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(error) => {
            warn!(code = error.error, reason = %error.message, "Last.fm API error");
            Err(LastfmError::Api {
                code: error.error,
                message: error.message,
            })
        }
        Err(_) => Ok(()),
    }
}
