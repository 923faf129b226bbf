// ── Reconnect pacing and log throttling ──
//
// Pure helpers for the status-stream loop: how long to wait before the
// next attempt, and whether a repeated failure is worth another log line.

use std::time::Duration;

use crate::config::ReconnectConfig;

/// Delay before reconnect attempt `attempt` (zero-based count of
/// consecutive failures already seen minus one).
///
/// `min(initial_delay * multiplier^attempt, max_delay)`, no jitter.
pub fn reconnect_delay(attempt: u32, config: &ReconnectConfig) -> Duration {
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let raw = config.initial_delay.as_secs_f64() * config.multiplier.powi(exponent);
    let capped = raw.min(config.max_delay.as_secs_f64()).max(0.0);
    Duration::from_secs_f64(capped)
}

/// Consecutive-failure counter driving [`reconnect_delay`].
#[derive(Debug, Clone)]
pub struct Backoff {
    config: ReconnectConfig,
    failures: u32,
}

impl Backoff {
    pub fn new(config: ReconnectConfig) -> Self {
        Self {
            config,
            failures: 0,
        }
    }

    /// Record a failure and return how long to wait before retrying.
    pub fn next_delay(&mut self) -> Duration {
        let delay = reconnect_delay(self.failures, &self.config);
        self.failures = self.failures.saturating_add(1);
        delay
    }

    /// Back to the initial delay after a successful connection.
    pub fn reset(&mut self) {
        self.failures = 0;
    }

    /// Failures recorded since the last reset.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}

/// Rate limiter for a repeating error message.
///
/// A message that differs from the previous one is always logged. The
/// same message is logged once more on its first repeat, then only when
/// the running count is a multiple of `every`.
#[derive(Debug, Clone)]
pub struct LogThrottle {
    every: u32,
    last: Option<String>,
    count: u32,
}

impl LogThrottle {
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            last: None,
            count: 0,
        }
    }

    /// Record an occurrence of `message`; returns whether to log it.
    pub fn should_log(&mut self, message: &str) -> bool {
        if self.last.as_deref() != Some(message) {
            self.last = Some(message.to_owned());
            self.count = 1;
            return true;
        }

        let log = self.count == 1 || self.count % self.every == 0;
        self.count = self.count.saturating_add(1);
        log
    }
}

/// Suffix for a stream failure that looks like a server too old for
/// `/v1/status/updates`.
pub fn version_hint(error: &str, host_description: Option<&str>) -> Option<String> {
    if !error.contains("400") {
        return None;
    }
    let host = host_description.filter(|h| !h.is_empty())?;
    Some(format!(
        " - Current version: {host}. If using v7.9 or below, the /v1/status/updates \
         endpoint is not supported. Please upgrade to v7.9.1 or higher."
    ))
}
