//! Last.fm authentication and scrobbling client for Tapedeck
//!
//! This crate provides a blocking client for the Last.fm write API:
//! - Mobile session login (`auth.getMobileSession`)
//! - Track scrobbling (`track.scrobble`)
//! - Signed calls to other methods from flat records
//!
//! Every write call is signed with the application's shared secret; see
//! [`sign`] for the algorithm.
//!
//! # Example
//!
//! ```rust,no_run
//! use tapedeck_lastfm::LastfmClient;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = LastfmClient::new("your_api_key", "your_api_secret")?;
//!
//! client.login("username", "password")?;
//!
//! let result = client.scrobble("Rush", "Tom Sawyer", Some("Moving Pictures"))?;
//! if result.track.corrected {
//!     println!("Last.fm corrected the title to {}", result.track.text);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! Read by [`LastfmClient::from_env`]:
//!
//! - `LASTFM_API_KEY`: API key for Last.fm (required)
//! - `LASTFM_API_SECRET`: shared secret for request signing (required)
//! - `LASTFM_API_URL`: API endpoint override
//! - `LASTFM_TIMEOUT` / `LASTFM_CONNECT_TIMEOUT`: timeouts in seconds

mod client;
mod config;
mod error;
mod models;
mod params;
mod signature;
mod transport;

pub use client::{ClientState, LastfmClient};
pub use config::{ClientConfig, LASTFM_API_URL};
pub use error::{BoxError, ConfigError, LastfmError, LastfmResult};
pub use models::{CorrectedText, IgnoredMessage, ScrobbleResult, Session};
pub use params::{flatten, Params, ToParams};
pub use signature::sign;
pub use transport::{HttpTransport, Transport};
