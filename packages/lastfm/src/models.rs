//! Last.fm API response models

use serde::{Deserialize, Serialize};

/// Authenticated Last.fm session obtained through `auth.getMobileSession`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// User name the session belongs to
    pub name: String,
    /// Opaque session key sent as `sk` on authenticated calls
    pub key: String,
    /// Whether the user has a paid subscription
    pub subscriber: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("name", &self.name)
            .field("key", &"[REDACTED]")
            .field("subscriber", &self.subscriber)
            .finish()
    }
}

/// A submitted field as Last.fm recorded it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectedText {
    /// Text stored by Last.fm (the corrected value when `corrected` is set)
    pub text: String,
    /// Whether Last.fm auto-corrected the submitted value
    pub corrected: bool,
}

/// Reason Last.fm gave for ignoring a scrobble
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoredMessage {
    /// Ignore reason code (1 = artist ignored, 2 = track ignored, ...)
    pub code: u32,
    /// Human-readable reason
    pub message: String,
}

/// Outcome of a `track.scrobble` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrobbleResult {
    pub track: CorrectedText,
    pub artist: CorrectedText,
    pub album: CorrectedText,
    pub album_artist: CorrectedText,
    /// Timestamp Last.fm accepted, as sent (Unix seconds)
    pub timestamp: String,
    /// Number of scrobbles accepted, when the reply carries `@attr`
    pub accepted: Option<u32>,
    /// Number of scrobbles ignored, when the reply carries `@attr`
    pub ignored: Option<u32>,
    /// Present when Last.fm ignored the scrobble
    pub ignored_message: Option<IgnoredMessage>,
}

impl ScrobbleResult {
    /// Whether the scrobble was recorded
    ///
    /// Without `@attr` counts, a scrobble with no ignore reason counts as
    /// accepted.
    pub fn is_accepted(&self) -> bool {
        self.ignored_message.is_none() && self.accepted != Some(0)
    }
}

// Internal response types for deserialization

/// Value Last.fm encodes either as a JSON string or a JSON number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Flexible {
    Text(String),
    Number(i64),
}

impl Default for Flexible {
    fn default() -> Self {
        Flexible::Number(0)
    }
}

impl Flexible {
    fn as_u32(&self) -> u32 {
        match self {
            Flexible::Text(s) => s.trim().parse().unwrap_or(0),
            Flexible::Number(n) => u32::try_from(*n).unwrap_or(0),
        }
    }

    fn is_set(&self) -> bool {
        self.as_u32() != 0
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub error: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub session: RawSession,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawSession {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub subscriber: Flexible,
}

impl From<RawSession> for Session {
    fn from(raw: RawSession) -> Self {
        Self {
            name: raw.name,
            key: raw.key,
            subscriber: raw.subscriber.is_set(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScrobbleResponse {
    pub scrobbles: ScrobblesWrapper,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScrobblesWrapper {
    pub scrobble: OneOrMany<RawScrobble>,
    #[serde(rename = "@attr", default)]
    pub attr: Option<ScrobblesAttr>,
}

/// Last.fm returns a bare object for a single scrobble and an array for
/// batches
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    // Listed first: a struct would also accept a JSON array positionally
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::One(item) => Some(item),
            OneOrMany::Many(items) => items.into_iter().next(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScrobblesAttr {
    #[serde(default)]
    pub accepted: Flexible,
    #[serde(default)]
    pub ignored: Flexible,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawScrobble {
    #[serde(default)]
    pub track: RawCorrectedText,
    #[serde(default)]
    pub artist: RawCorrectedText,
    #[serde(default)]
    pub album: RawCorrectedText,
    #[serde(rename = "albumArtist", default)]
    pub album_artist: RawCorrectedText,
    #[serde(default)]
    pub timestamp: String,
    #[serde(rename = "ignoredMessage", default)]
    pub ignored_message: Option<RawIgnoredMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawCorrectedText {
    #[serde(rename = "#text", default)]
    pub text: String,
    #[serde(default)]
    pub corrected: Flexible,
}

impl From<RawCorrectedText> for CorrectedText {
    fn from(raw: RawCorrectedText) -> Self {
        Self {
            text: raw.text,
            corrected: raw.corrected.is_set(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawIgnoredMessage {
    #[serde(default)]
    pub code: Flexible,
    #[serde(rename = "#text", default)]
    pub text: String,
}

impl ScrobbleResponse {
    /// Flatten the nested reply into a [`ScrobbleResult`].
    ///
    /// Returns `None` when the reply holds an empty batch.
    pub(crate) fn into_result(self) -> Option<ScrobbleResult> {
        let attr = self.scrobbles.attr;
        let raw = self.scrobbles.scrobble.into_first()?;

        // Code 0 means "not ignored"
        let ignored_message = raw
            .ignored_message
            .filter(|m| m.code.is_set())
            .map(|m| IgnoredMessage {
                code: m.code.as_u32(),
                message: m.text,
            });

        Some(ScrobbleResult {
            track: raw.track.into(),
            artist: raw.artist.into(),
            album: raw.album.into(),
            album_artist: raw.album_artist.into(),
            timestamp: raw.timestamp,
            accepted: attr.as_ref().map(|a| a.accepted.as_u32()),
            ignored: attr.as_ref().map(|a| a.ignored.as_u32()),
            ignored_message,
        })
    }
}

/// Last.fm API error response
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: i32,
    #[serde(default)]
    pub message: String,
}
