//! Resolution of the effective `BridgeConfig` from profiles and flags.

use std::time::Duration;

use stagehand_config::{Config, Profile, profile_to_bridge_config, resolve_profile};
use stagehand_core::BridgeConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build the bridge configuration for this invocation.
///
/// `--host` bypasses profile lookup entirely; otherwise the named (or
/// default) profile is used, with `--port` / `--timeout` layered on top.
pub fn build_bridge_config(global: &GlobalOpts, cfg: &Config) -> Result<BridgeConfig, CliError> {
    let mut profile = match global.host {
        Some(ref host) => Profile::new(host.clone()),
        None => resolve_profile(cfg, global.profile.as_deref())?.1.clone(),
    };

    if let Some(port) = global.port {
        profile.port = port;
    }

    let mut bridge = profile_to_bridge_config(&profile, &cfg.defaults)?;
    if let Some(secs) = global.timeout {
        let timeout = Duration::from_secs(secs);
        bridge.request_timeout = timeout;
        bridge.connect_timeout = timeout;
    }
    Ok(bridge)
}
