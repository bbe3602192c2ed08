//! HTTP transport seam
//!
//! The client never talks to the network directly. It hands a fully signed,
//! form-encodable parameter set to a [`Transport`] and reads whatever body
//! comes back. [`HttpTransport`] is the production implementation; tests
//! substitute their own.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{BoxError, LastfmError, LastfmResult};
use crate::params::Params;

/// Minimal blocking transport for form-encoded POST requests
pub trait Transport {
    /// POST `form` as `application/x-www-form-urlencoded` to `url` and return
    /// a reader over the response body.
    ///
    /// Non-success HTTP statuses are not errors here; Last.fm reports
    /// failures in the JSON body.
    fn post_form(&self, url: &str, form: &Params) -> Result<Box<dyn Read + Send>, BoxError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_form(&self, url: &str, form: &Params) -> Result<Box<dyn Read + Send>, BoxError> {
        (**self).post_form(url, form)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post_form(&self, url: &str, form: &Params) -> Result<Box<dyn Read + Send>, BoxError> {
        (**self).post_form(url, form)
    }
}

/// [`Transport`] backed by a blocking `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: Client,
}

impl HttpTransport {
    /// Build a transport using the timeouts and user agent from `config`
    ///
    /// # Errors
    /// `LastfmError::Transport` if the underlying HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialize)
    pub fn new(config: &ClientConfig) -> LastfmResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| LastfmError::Transport(Box::new(e)))?;

        Ok(Self { http_client })
    }

    /// Wrap an already configured `reqwest` client
    pub fn from_client(http_client: Client) -> Self {
        Self { http_client }
    }
}

impl Transport for HttpTransport {
    fn post_form(&self, url: &str, form: &Params) -> Result<Box<dyn Read + Send>, BoxError> {
        let response = self.http_client.post(url).form(form).send()?;

        let status = response.status();
        if status.is_success() {
            debug!(%status, "Last.fm responded");
        } else {
            warn!(%status, "Last.fm responded with non-success status");
        }

        Ok(Box::new(response))
    }
}
