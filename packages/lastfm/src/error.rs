//! Last.fm client error types

use thiserror::Error;

/// Boxed error produced by a [`Transport`](crate::Transport) implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Last.fm client errors
#[derive(Error, Debug)]
pub enum LastfmError {
    /// A request record contained a field that is not a string
    #[error("unsupported field type for `{field}`: expected string, found {kind}")]
    UnsupportedFieldType { field: String, kind: &'static str },

    /// Invalid argument provided to a client operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation requires a session obtained through `login`
    #[error("not authenticated: log in before scrobbling")]
    NotAuthenticated,

    /// Last.fm rejected the login attempt
    #[error("Last.fm login rejected ({code}): {message}")]
    RemoteAuth { code: i32, message: String },

    /// Last.fm answered a signed call with an error envelope
    #[error("Last.fm API error {code}: {message}")]
    Api { code: i32, message: String },

    /// The transport failed to perform the request
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The response body could not be read to the end
    #[error("failed to read Last.fm response body: {0}")]
    Read(#[source] std::io::Error),

    /// JSON parsing failed
    #[error("Failed to parse Last.fm response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client configuration is incomplete or invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Missing required environment variable
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid value for a configuration setting
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Result type for Last.fm operations
pub type LastfmResult<T> = Result<T, LastfmError>;
