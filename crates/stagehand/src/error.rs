//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use stagehand_config::ConfigError;
use stagehand_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to ProPresenter at {url}")]
    #[diagnostic(
        code(stagehand::connection_failed),
        help(
            "Check that ProPresenter is running with Network enabled\n\
             (Settings > Network) and that the port matches.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("ProPresenter is unavailable: {reason}")]
    #[diagnostic(
        code(stagehand::unavailable),
        help("The last refresh failed. Retry once ProPresenter is reachable.")
    )]
    Unavailable { reason: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(stagehand::not_found),
        help("Run: stagehand status to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error: {message}")]
    #[diagnostic(code(stagehand::api_error))]
    ApiError { message: String, status: Option<u16> },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(stagehand::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(stagehand::profile_not_found),
        help(
            "Add a [profiles.{name}] section with a host to {path},\n\
             or pass --host directly."
        )
    )]
    ProfileNotFound { name: String, path: String },

    #[error(transparent)]
    #[diagnostic(code(stagehand::config))]
    Config(Box<figment::Error>),

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(stagehand::timeout),
        help("Increase timeout with --timeout or check ProPresenter responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(stagehand::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Unavailable { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::UpdateFailed { reason } => CliError::Unavailable { reason },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::NotFound { entity, identifier } => CliError::NotFound {
                resource_type: entity,
                identifier,
            },
            CoreError::Api { message, status } => CliError::ApiError { message, status },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::ApiError {
                message,
                status: None,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                path: stagehand_config::config_path().display().to_string(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
