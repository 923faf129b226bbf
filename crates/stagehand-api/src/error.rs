use thiserror::Error;

/// Top-level error type for the `stagehand-api` crate.
///
/// Every failure talking to ProPresenter funnels through here, whether it
/// came from a one-shot request or the status-update stream. `stagehand-core`
/// maps these into synchronizer-level conditions.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, reset, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Non-success HTTP status other than 404.
    #[error("HTTP {status} from {path}")]
    Http { status: u16, path: String },

    // ── Stream ──────────────────────────────────────────────────────
    /// The status-update stream was closed by the server.
    #[error("Status stream closed by ProPresenter")]
    StreamEnded,

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// An endpoint that must return data returned nothing.
    #[error("No data returned from {path}")]
    MissingData { path: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_body(),
            Self::Timeout { .. } | Self::StreamEnded => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Http { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
