// ── Device registry hook ──

use crate::error::CoreError;

/// Sink for device metadata owned by the host platform.
///
/// The static synchronizer calls [`update_sw_version`](Self::update_sw_version)
/// only when the parsed ProPresenter version differs from the last one it
/// recorded. Errors are logged by the caller and never abort a refresh.
pub trait DeviceRegistry: Send + Sync {
    fn update_sw_version(&self, version: &str) -> Result<(), CoreError>;
}
