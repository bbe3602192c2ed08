//! Shared test utilities for Tapedeck workspace
//!
//! This crate provides mock implementations of external services for testing
//! without network dependencies.
//!
//! # Mock Services
//!
//! - [`MockLastfmServer`] - Mock Last.fm API endpoint for login and scrobble tests
//!
//! # Example
//!
//! ```rust,ignore
//! use tapedeck_test_utils::MockLastfmServer;
//!
//! #[tokio::test]
//! async fn test_with_mocks() {
//!     let lastfm = MockLastfmServer::start().await;
//!     lastfm.mock_login_success("listener", "session-key").await;
//!
//!     // Point your client at lastfm.api_url()
//! }
//! ```

mod lastfm;

pub use lastfm::{fixtures, MockLastfmServer};
