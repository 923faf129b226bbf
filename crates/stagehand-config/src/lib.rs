//! Configuration for the stagehand bridge.
//!
//! TOML profiles merged with `STAGEHAND_`-prefixed environment variables,
//! and translation to `stagehand_core::BridgeConfig`. The CLI layers its
//! own flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stagehand_api::DEFAULT_PORT;
use stagehand_core::BridgeConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    /// Pacing shared by every profile.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named ProPresenter instances.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

/// Timeouts and intervals, in seconds.
#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_stream_idle_timeout")]
    pub stream_idle_timeout: u64,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    #[serde(default = "default_media_poll_interval")]
    pub media_poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            stream_idle_timeout: default_stream_idle_timeout(),
            refresh_interval: default_refresh_interval(),
            media_poll_interval: default_media_poll_interval(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
fn default_stream_idle_timeout() -> u64 {
    600
}
fn default_refresh_interval() -> u64 {
    30
}
fn default_media_poll_interval() -> u64 {
    2
}

/// A named ProPresenter instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Hostname or IP address of the ProPresenter machine.
    pub host: String,

    /// Remote Control API port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Override the request timeout.
    pub timeout: Option<u64>,

    /// Override the static refresh interval.
    pub refresh_interval: Option<u64>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Profile {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            timeout: None,
            refresh_interval: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "stagehand", "stagehand").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("stagehand");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the platform config file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// A missing file is not an error; environment variables such as
/// `STAGEHAND_PROFILES__STAGE__HOST` fill in or override file values.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("STAGEHAND_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Profile resolution ──────────────────────────────────────────────

/// Pick the profile named `name`, else the configured default.
pub fn resolve_profile<'a>(
    config: &'a Config,
    name: Option<&str>,
) -> Result<(String, &'a Profile), ConfigError> {
    let name = name
        .map(str::to_owned)
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    config
        .profiles
        .get(&name)
        .map(|profile| (name.clone(), profile))
        .ok_or(ConfigError::UnknownProfile { name })
}

/// Build a `BridgeConfig` for `profile`, with `defaults` filling the gaps.
pub fn profile_to_bridge_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<BridgeConfig, ConfigError> {
    if profile.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }

    let mut config =
        BridgeConfig::for_host(&profile.host, profile.port).map_err(|e| ConfigError::Validation {
            field: "host".into(),
            reason: format!("{}: {e}", profile.host),
        })?;

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.request_timeout = timeout;
    config.connect_timeout = timeout;
    config.stream_idle_timeout = Duration::from_secs(defaults.stream_idle_timeout);
    config.static_refresh_interval = Duration::from_secs(
        profile
            .refresh_interval
            .unwrap_or(defaults.refresh_interval),
    );
    config.media_poll_interval = Duration::from_secs(defaults.media_poll_interval);
    Ok(config)
}
