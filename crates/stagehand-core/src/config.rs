// ── Runtime configuration ──
//
// Describes how to reach ProPresenter and how the synchronizers pace
// themselves. Built by `stagehand-config` from profiles, or directly
// by embedders.

use std::time::Duration;

use stagehand_api::TransportConfig;
use url::Url;

/// Reconnect pacing for the status stream.
///
/// The delay before attempt `n` (zero-based, counting consecutive failures)
/// is `min(initial_delay * multiplier^n, max_delay)`.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    pub initial_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            multiplier: 1.5,
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Configuration for a [`Bridge`](crate::Bridge) and its synchronizers.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// API root, e.g. `http://192.168.1.20:50001`.
    pub url: Url,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Longest silence tolerated on the status stream.
    pub stream_idle_timeout: Duration,
    /// Period of the static refresh timer.
    pub static_refresh_interval: Duration,
    pub media_poll_interval: Duration,
    /// Pause after a failed active-media poll.
    pub media_poll_retry: Duration,
    /// Upper bound on the peer refresh performed after the stream connects.
    pub peer_refresh_timeout: Duration,
    pub reconnect: ReconnectConfig,
    /// A repeated stream error is logged again only every this many repeats.
    pub log_repeat_every: u32,
}

impl BridgeConfig {
    /// Configuration for `url` with default timeouts and pacing.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
            stream_idle_timeout: Duration::from_secs(600),
            static_refresh_interval: Duration::from_secs(30),
            media_poll_interval: Duration::from_secs(2),
            media_poll_retry: Duration::from_secs(5),
            peer_refresh_timeout: Duration::from_secs(10),
            reconnect: ReconnectConfig::default(),
            log_repeat_every: 10,
        }
    }

    /// Configuration for `http://{host}:{port}` with default pacing.
    pub fn for_host(host: &str, port: u16) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(&format!("http://{host}:{port}"))?))
    }

    /// Transport settings for the API client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            request_timeout: self.request_timeout,
            connect_timeout: self.connect_timeout,
            stream_idle_timeout: self.stream_idle_timeout,
        }
    }
}
