// ── Core error types ──
//
// Errors surfaced by the synchronizers and controls. Raw transport
// failures never escape this crate as-is: `From<stagehand_api::Error>`
// folds them into connection / timeout / API variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Synchronization ──────────────────────────────────────────────
    /// A static refresh cycle was aborted; the previous snapshot stands.
    #[error("Error communicating with ProPresenter: {reason}")]
    UpdateFailed { reason: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to ProPresenter at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("ProPresenter request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap any failure of a refresh cycle as `UpdateFailed`.
    pub(crate) fn update_failed(err: impl std::fmt::Display) -> Self {
        Self::UpdateFailed {
            reason: err.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<stagehand_api::Error> for CoreError {
    fn from(err: stagehand_api::Error) -> Self {
        match err {
            stagehand_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            stagehand_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            stagehand_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            stagehand_api::Error::Http { status: 404, path } => CoreError::NotFound {
                entity: "endpoint".into(),
                identifier: path,
            },
            stagehand_api::Error::Http { status, path } => CoreError::Api {
                message: format!("HTTP {status} from {path}"),
                status: Some(status),
            },
            stagehand_api::Error::StreamEnded => CoreError::ConnectionFailed {
                url: stagehand_api::STATUS_UPDATES_PATH.into(),
                reason: "stream closed by ProPresenter".into(),
            },
            stagehand_api::Error::Deserialization { message, .. } => CoreError::Api {
                message: format!("Deserialization error: {message}"),
                status: None,
            },
            stagehand_api::Error::MissingData { path } => CoreError::Api {
                message: format!("No data returned from {path}"),
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_keep_their_status() {
        let err: CoreError = stagehand_api::Error::Http {
            status: 400,
            path: "/v1/status/updates".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Api { status: Some(400), .. }));
    }

    #[test]
    fn update_failed_message_names_the_cause() {
        let err = CoreError::update_failed("HTTP 500 from /v1/macros");
        assert_eq!(
            err.to_string(),
            "Error communicating with ProPresenter: HTTP 500 from /v1/macros"
        );
    }
}
