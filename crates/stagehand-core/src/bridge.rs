// ── Bridge facade ──
//
// Owns the API client, both synchronizers and the controls for one
// ProPresenter instance, and sequences their startup and shutdown.

use std::sync::Arc;

use stagehand_api::ProPresenterClient;
use tracing::{debug, info};

use crate::config::BridgeConfig;
use crate::controls::Controls;
use crate::error::CoreError;
use crate::registry::DeviceRegistry;
use crate::remote::RemoteControl;
use crate::store::{LiveSnapshot, StaticSnapshot};
use crate::stream::SnapshotStream;
use crate::sync::{LiveSynchronizer, StaticSynchronizer};

/// Entry point for consumers: one bridge per ProPresenter instance.
///
/// ```ignore
/// let bridge = Bridge::new(BridgeConfig::for_host("10.0.0.20", 50001)?, None)?;
/// bridge.connect().await?;
/// let live = bridge.live_snapshot();
/// bridge.shutdown().await;
/// ```
pub struct Bridge<R: RemoteControl = ProPresenterClient> {
    config: BridgeConfig,
    remote: Arc<R>,
    static_sync: StaticSynchronizer<R>,
    live: LiveSynchronizer<R>,
    controls: Controls<R>,
}

impl Bridge<ProPresenterClient> {
    /// Build the HTTP client and both synchronizers from `config`.
    pub fn new(
        config: BridgeConfig,
        registry: Option<Arc<dyn DeviceRegistry>>,
    ) -> Result<Self, CoreError> {
        let client = ProPresenterClient::new(config.url.clone(), &config.transport())?;
        Ok(Self::with_remote(Arc::new(client), config, registry))
    }
}

impl<R: RemoteControl> Bridge<R> {
    /// Assemble a bridge over an existing remote.
    pub fn with_remote(
        remote: Arc<R>,
        config: BridgeConfig,
        registry: Option<Arc<dyn DeviceRegistry>>,
    ) -> Self {
        let static_sync = StaticSynchronizer::new(
            Arc::clone(&remote),
            config.static_refresh_interval,
            registry,
        );
        let live = LiveSynchronizer::new(Arc::clone(&remote), &config, Some(static_sync.clone()));
        let controls = Controls::new(Arc::clone(&remote), live.clone(), static_sync.clone());

        Self {
            config,
            remote,
            static_sync,
            live,
            controls,
        }
    }

    /// Bring the bridge up.
    ///
    /// The first static refresh must succeed; its error is returned and
    /// nothing is started. Then the live snapshot is bootstrapped, the
    /// static timer started and the status stream opened.
    pub async fn connect(&self) -> Result<(), CoreError> {
        debug!(url = %self.config.url, "connecting to ProPresenter");
        let snapshot = self.static_sync.refresh().await?;
        self.live.refresh().await;

        self.static_sync.start().await;
        self.live.start_streaming().await;

        info!(
            url = %self.config.url,
            version = %snapshot.firmware_version(),
            "bridge connected"
        );
        Ok(())
    }

    /// Stop every background task. Idempotent.
    pub async fn shutdown(&self) {
        self.live.shutdown().await;
        self.static_sync.shutdown().await;
        debug!("bridge shut down");
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn remote(&self) -> &Arc<R> {
        &self.remote
    }

    pub fn static_sync(&self) -> &StaticSynchronizer<R> {
        &self.static_sync
    }

    pub fn live(&self) -> &LiveSynchronizer<R> {
        &self.live
    }

    pub fn controls(&self) -> &Controls<R> {
        &self.controls
    }

    pub fn static_snapshot(&self) -> Arc<StaticSnapshot> {
        self.static_sync.snapshot()
    }

    pub fn live_snapshot(&self) -> Arc<LiveSnapshot> {
        self.live.snapshot()
    }

    pub fn subscribe_static(&self) -> SnapshotStream<StaticSnapshot> {
        self.static_sync.subscribe()
    }

    pub fn subscribe_live(&self) -> SnapshotStream<LiveSnapshot> {
        self.live.subscribe()
    }

    /// Whether both the status stream and the last static refresh are up.
    pub fn is_available(&self) -> bool {
        self.live.is_connected() && self.static_sync.status().is_available()
    }
}
