// ── Static synchronizer ──
//
// Polls the collections that only change through administrative action in
// ProPresenter (version, clear groups, macros, timers, video inputs,
// playlists) and republishes them as one snapshot per cycle. Playlist
// details are expensive to resolve and are cached until invalidated.

use std::sync::{Arc, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use stagehand_api::{Endpoint, Error as ApiError};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::registry::DeviceRegistry;
use crate::remote::RemoteControl;
use crate::store::{
    CachedPlaylists, FromPayload, PlaylistCache, PlaylistKind, StaticSnapshot,
    collect_playlist_uuids, firmware_version, item_uuid,
};
use crate::stream::SnapshotStream;

/// Availability of the static snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshStatus {
    /// No refresh has completed yet.
    Pending,
    /// The last cycle succeeded.
    Ready { at: DateTime<Utc> },
    /// The last cycle failed, or the live stream reported the device gone.
    Failed { reason: String },
}

impl RefreshStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Timer-driven poller for rarely-changing ProPresenter collections.
///
/// Cheaply cloneable; all clones share one snapshot, cache and timer.
pub struct StaticSynchronizer<R: RemoteControl> {
    inner: Arc<StaticInner<R>>,
}

impl<R: RemoteControl> Clone for StaticSynchronizer<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct StaticInner<R: RemoteControl> {
    remote: Arc<R>,
    refresh_interval: Duration,
    registry: Option<Arc<dyn DeviceRegistry>>,
    snapshot: watch::Sender<Arc<StaticSnapshot>>,
    status: watch::Sender<RefreshStatus>,
    cache: std::sync::Mutex<PlaylistCache>,
    last_version: std::sync::Mutex<Option<String>>,
    /// Serializes refresh cycles (timer tick vs. on-demand request).
    refresh_lock: Mutex<()>,
    cancel: CancellationToken,
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<R: RemoteControl> StaticSynchronizer<R> {
    /// Create a synchronizer with an empty snapshot. Nothing is fetched
    /// until [`refresh()`](Self::refresh) or [`start()`](Self::start).
    pub fn new(
        remote: Arc<R>,
        refresh_interval: Duration,
        registry: Option<Arc<dyn DeviceRegistry>>,
    ) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(StaticSnapshot::default()));
        let (status, _) = watch::channel(RefreshStatus::Pending);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(StaticInner {
                remote,
                refresh_interval,
                registry,
                snapshot,
                status,
                cache: std::sync::Mutex::new(PlaylistCache::default()),
                last_version: std::sync::Mutex::new(None),
                refresh_lock: Mutex::new(()),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// The last successfully synchronized snapshot.
    pub fn snapshot(&self) -> Arc<StaticSnapshot> {
        self.inner.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes. Drop the handle to unsubscribe.
    pub fn subscribe(&self) -> SnapshotStream<StaticSnapshot> {
        SnapshotStream::new(self.inner.snapshot.subscribe())
    }

    pub fn status(&self) -> RefreshStatus {
        self.inner.status.borrow().clone()
    }

    /// Subscribe to availability changes.
    pub fn watch_status(&self) -> watch::Receiver<RefreshStatus> {
        self.inner.status.subscribe()
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Run one refresh cycle.
    ///
    /// On failure the previous snapshot stays in place and the status turns
    /// `Failed`; the next timer tick is the retry.
    pub async fn refresh(&self) -> Result<Arc<StaticSnapshot>, CoreError> {
        let _cycle = self.inner.refresh_lock.lock().await;

        match self.fetch_all().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.inner.snapshot.send_replace(Arc::clone(&snapshot));
                self.inner.status.send_replace(RefreshStatus::Ready { at: Utc::now() });
                self.record_version(&snapshot);
                debug!(
                    macros = snapshot.macros.len(),
                    playlists = snapshot.presentation_playlist_details.len(),
                    "static refresh complete"
                );
                Ok(snapshot)
            }
            Err(e) => {
                let err = CoreError::update_failed(&e);
                self.inner.status.send_replace(RefreshStatus::Failed {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Refresh now, logging instead of returning a failure.
    pub async fn request_refresh(&self) {
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "requested refresh failed");
        }
    }

    /// Drop all cached playlist data; the next cycle refetches it.
    pub fn invalidate_playlist_cache(&self) {
        self.lock_cache().invalidate();
        info!("playlist cache invalidated");
    }

    /// Flag the snapshot as unavailable without touching its contents.
    pub fn mark_unavailable(&self, reason: impl Into<String>) {
        self.inner.status.send_replace(RefreshStatus::Failed {
            reason: reason.into(),
        });
    }

    async fn fetch_all(&self) -> Result<StaticSnapshot, ApiError> {
        let remote = &*self.inner.remote;

        let version = remote
            .fetch(Endpoint::Version)
            .await?
            .ok_or_else(|| ApiError::MissingData {
                path: Endpoint::Version.path(),
            })?;
        let clear_groups = list("clear_groups", remote.fetch(Endpoint::ClearGroups).await?);
        let macros = list("macros", remote.fetch(Endpoint::Macros).await?);
        let timers = list("timers", remote.fetch(Endpoint::Timers).await?);
        let video_inputs = list("video_inputs", remote.fetch(Endpoint::VideoInputs).await?);

        let presentation = self.playlists(PlaylistKind::Presentation).await?;
        let audio = self.playlists(PlaylistKind::Audio).await?;
        let media = self.playlists(PlaylistKind::Media).await?;

        Ok(StaticSnapshot {
            version: FromPayload::from_payload("version", version),
            clear_groups,
            macros,
            timers,
            video_inputs,
            presentation_playlists: presentation.playlists,
            presentation_playlist_details: presentation.details,
            audio_playlists: audio.playlists,
            audio_playlist_details: audio.details,
            media_playlists: media.playlists,
            media_playlist_details: media.details,
            refreshed_at: Some(Utc::now()),
        })
    }

    // ── Playlist cache ───────────────────────────────────────────────

    async fn playlists(&self, kind: PlaylistKind) -> Result<CachedPlaylists, ApiError> {
        let (cached, generation) = {
            let cache = self.lock_cache();
            (cache.get(kind), cache.generation())
        };
        if let Some(cached) = cached {
            return Ok(cached);
        }

        let fetched = match kind {
            PlaylistKind::Presentation => self.fetch_presentation_playlists().await?,
            PlaylistKind::Audio => self.fetch_audio_playlists().await?,
            PlaylistKind::Media => self.fetch_media_playlists().await?,
        };

        if !self.lock_cache().store(kind, generation, fetched.clone()) {
            debug!(?kind, "cache invalidated mid-refresh, result not cached");
        }
        Ok(fetched)
    }

    async fn fetch_presentation_playlists(&self) -> Result<CachedPlaylists, ApiError> {
        let remote = &*self.inner.remote;
        let playlists = list(
            "presentation_playlists",
            remote.fetch(Endpoint::PresentationPlaylists).await?,
        );

        let mut details = Vec::new();
        for uuid in collect_playlist_uuids(&playlists) {
            if let Some(detail) = remote.fetch(Endpoint::PresentationPlaylist(uuid)).await? {
                details.push(detail);
            }
        }
        Ok(CachedPlaylists { playlists, details })
    }

    async fn fetch_audio_playlists(&self) -> Result<CachedPlaylists, ApiError> {
        let remote = &*self.inner.remote;
        let playlists = list("audio_playlists", remote.fetch(Endpoint::AudioPlaylists).await?);

        let mut details = Vec::new();
        for uuid in top_level_uuids(&playlists) {
            if let Some(detail) = remote.fetch(Endpoint::AudioPlaylist(uuid)).await? {
                details.push(detail);
            }
        }
        Ok(CachedPlaylists { playlists, details })
    }

    async fn fetch_media_playlists(&self) -> Result<CachedPlaylists, ApiError> {
        let remote = &*self.inner.remote;
        let playlists = list("media_playlists", remote.fetch(Endpoint::MediaPlaylists).await?);

        let mut details = Vec::new();
        for uuid in top_level_uuids(&playlists) {
            match remote.fetch(Endpoint::MediaPlaylist(uuid.clone())).await {
                Ok(Some(detail)) => details.push(detail),
                Ok(None) => {}
                Err(e) => debug!(error = %e, uuid, "skipping media playlist"),
            }
        }
        Ok(CachedPlaylists { playlists, details })
    }

    fn lock_cache(&self) -> MutexGuard<'_, PlaylistCache> {
        self.inner
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ── Device registry ──────────────────────────────────────────────

    fn record_version(&self, snapshot: &StaticSnapshot) {
        let version = firmware_version(&snapshot.version);
        {
            let mut last = self
                .inner
                .last_version
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if last.as_deref() == Some(version.as_str()) {
                return;
            }
            *last = Some(version.clone());
        }

        info!(%version, "ProPresenter version changed");
        let Some(registry) = &self.inner.registry else {
            return;
        };
        if let Err(e) = registry.update_sw_version(&version) {
            debug!(error = %e, "device registry update failed");
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Start the refresh timer. A no-op while the timer is already running.
    pub async fn start(&self) {
        let mut handles = self.inner.task_handles.lock().await;
        if handles.iter().any(|h| !h.is_finished()) {
            return;
        }
        handles.clear();

        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        let sync = self.clone();
        handles.push(tokio::spawn(refresh_task(
            sync,
            self.inner.refresh_interval,
            child,
        )));
    }

    /// Stop the refresh timer and wait for it to exit. Idempotent.
    pub async fn shutdown(&self) {
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
    }
}

fn list(field: &'static str, value: Option<Value>) -> Vec<Value> {
    FromPayload::from_payload(field, value.unwrap_or(Value::Null))
}

fn top_level_uuids(playlists: &[Value]) -> Vec<String> {
    playlists
        .iter()
        .filter_map(item_uuid)
        .map(str::to_owned)
        .collect()
}

// ── Background task ──────────────────────────────────────────────────

async fn refresh_task<R: RemoteControl>(
    sync: StaticSynchronizer<R>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    result = sync.refresh() => {
                        if let Err(e) = result {
                            warn!(error = %e, "periodic static refresh failed");
                        }
                    }
                }
            }
        }
    }

    debug!("static refresh task stopped");
}
