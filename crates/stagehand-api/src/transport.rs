// Transport configuration for building the reqwest::Client.
//
// One client serves both traffic shapes. One-shot requests carry a short
// per-request timeout; the status stream relies on the connect timeout plus
// a long idle-read timeout so quiet periods don't tear the connection down.

use std::time::Duration;

use crate::error::Error;

/// Default ProPresenter network API port.
pub const DEFAULT_PORT: u16 = 50001;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Total timeout applied to each one-shot request.
    pub request_timeout: Duration,
    /// TCP connect timeout, shared by requests and the stream.
    pub connect_timeout: Duration,
    /// Maximum silence tolerated between stream chunks.
    pub stream_idle_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
            stream_idle_timeout: Duration::from_secs(600),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// No total timeout is set on the client itself; callers apply
    /// `request_timeout` per request so the stream can stay open.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.stream_idle_timeout)
            .user_agent(concat!("stagehand/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Transport)
    }
}
