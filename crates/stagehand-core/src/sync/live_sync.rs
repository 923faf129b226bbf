// ── Live synchronizer ──
//
// Keeps the fast-changing presentation state current from the server-push
// status stream. A one-time bootstrap fan-out seeds the snapshot, the
// stream task replaces one field per event, and a small poll loop covers
// the active media playlist, which the stream never reports.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::future::join_all;
use serde_json::{Map, Value};
use stagehand_api::{Endpoint, Error as ApiError, parse_status_line};
use strum::IntoEnumIterator;
use tokio::sync::{Mutex, OnceCell, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::backoff::{Backoff, LogThrottle, version_hint};
use crate::config::{BridgeConfig, ReconnectConfig};
use crate::error::CoreError;
use crate::remote::RemoteControl;
use crate::store::{FromPayload, LiveSnapshot};
use crate::stream::SnapshotStream;
use crate::sync::static_sync::StaticSynchronizer;
use crate::topic::Topic;

/// Connection state of the status stream task.
///
/// `Idle → Connecting → Streaming → Disconnected → Connecting → ...`;
/// `Cancelled` is terminal for the running task.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamState {
    /// Streaming has not been started.
    Idle,
    Connecting,
    Streaming,
    /// The last attempt failed; `attempt` counts consecutive failures.
    Disconnected { attempt: u32, retry_in: Duration },
    Cancelled,
}

impl StreamState {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Streaming)
    }
}

/// What [`LiveSynchronizer::handle_line`] did with a stream line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// The field mapped to this topic was replaced.
    Applied(Topic),
    /// Blank line or unknown topic.
    Ignored,
    /// The line was not a JSON status record.
    Malformed,
}

/// Pacing for the background tasks, taken from [`BridgeConfig`].
#[derive(Debug, Clone)]
struct LivePacing {
    media_poll_interval: Duration,
    media_poll_retry: Duration,
    peer_refresh_timeout: Duration,
    reconnect: ReconnectConfig,
    log_repeat_every: u32,
}

/// Stream-driven synchronizer for fast-changing presentation state.
///
/// Cheaply cloneable; all clones share one snapshot and one set of tasks.
pub struct LiveSynchronizer<R: RemoteControl> {
    inner: Arc<LiveInner<R>>,
}

impl<R: RemoteControl> Clone for LiveSynchronizer<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct LiveInner<R: RemoteControl> {
    remote: Arc<R>,
    pacing: LivePacing,
    peer: Option<StaticSynchronizer<R>>,
    snapshot: watch::Sender<Arc<LiveSnapshot>>,
    state: watch::Sender<StreamState>,
    bootstrap: OnceCell<()>,
    /// Topics the stream has delivered. The bootstrap leaves these alone.
    streamed: std::sync::Mutex<HashSet<Topic>>,
    /// Set once the media poll has answered; the bootstrap value is older.
    media_polled: AtomicBool,
    cancel: CancellationToken,
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<R: RemoteControl> LiveSynchronizer<R> {
    /// Create a synchronizer with an all-default snapshot.
    ///
    /// `peer` is refreshed whenever the stream (re)connects and marked
    /// unavailable whenever it drops.
    pub fn new(remote: Arc<R>, config: &BridgeConfig, peer: Option<StaticSynchronizer<R>>) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(LiveSnapshot::default()));
        let (state, _) = watch::channel(StreamState::Idle);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(LiveInner {
                remote,
                pacing: LivePacing {
                    media_poll_interval: config.media_poll_interval,
                    media_poll_retry: config.media_poll_retry,
                    peer_refresh_timeout: config.peer_refresh_timeout,
                    reconnect: config.reconnect.clone(),
                    log_repeat_every: config.log_repeat_every,
                },
                peer,
                snapshot,
                state,
                bootstrap: OnceCell::new(),
                streamed: std::sync::Mutex::new(HashSet::new()),
                media_polled: AtomicBool::new(false),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<LiveSnapshot> {
        self.inner.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes. One notification per applied event.
    pub fn subscribe(&self) -> SnapshotStream<LiveSnapshot> {
        SnapshotStream::new(self.inner.snapshot.subscribe())
    }

    pub fn state(&self) -> StreamState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to stream connection state changes.
    pub fn watch_state(&self) -> watch::Receiver<StreamState> {
        self.inner.state.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.state.borrow().is_connected()
    }

    // ── Bootstrap ────────────────────────────────────────────────────

    /// Return the current snapshot, seeding it on the first call.
    ///
    /// The first call fetches every field that has a one-shot endpoint in
    /// parallel. A failed fetch leaves its field at the default; nothing
    /// here fails. Fields the stream or the media poll have already written
    /// keep their newer value. Later calls return immediately.
    pub async fn refresh(&self) -> Arc<LiveSnapshot> {
        self.inner.bootstrap.get_or_init(|| self.bootstrap()).await;
        self.snapshot()
    }

    async fn bootstrap(&self) {
        let remote = &*self.inner.remote;

        let fetches = Topic::iter().filter_map(|topic| {
            let endpoint = topic.bootstrap_endpoint()?;
            Some(async move { (topic, fetch_field(remote, topic.field(), endpoint).await) })
        });
        let (fields, media) = tokio::join!(
            join_all(fetches),
            fetch_field(remote, "active_media_playlist", Endpoint::ActiveMediaPlaylist),
        );

        let mut seeded = 0_usize;
        let mut kept = 0_usize;
        self.inner.snapshot.send_modify(|snap| {
            let streamed = self.lock_streamed();
            let snap = Arc::make_mut(snap);
            for (topic, value) in fields {
                if streamed.contains(&topic) {
                    kept += 1;
                } else if let Some(value) = value {
                    snap.apply(topic, value);
                    seeded += 1;
                }
            }
            if self.inner.media_polled.load(Ordering::Acquire) {
                kept += 1;
            } else if let Some(value) = media {
                snap.active_media_playlist =
                    FromPayload::from_payload("active_media_playlist", value);
                seeded += 1;
            }
        });
        info!(fields = seeded, kept, "live snapshot bootstrapped");
    }

    // ── Event handling ───────────────────────────────────────────────

    /// Apply one line of the status stream.
    pub fn handle_line(&self, line: &str) -> LineOutcome {
        let update = match parse_status_line(line) {
            Ok(Some(update)) => update,
            Ok(None) => return LineOutcome::Ignored,
            Err(e) => {
                debug!(error = %e, "skipping malformed status line");
                return LineOutcome::Malformed;
            }
        };

        let Some(topic) = Topic::from_path(&update.url) else {
            trace!(url = %update.url, "ignoring unknown topic");
            return LineOutcome::Ignored;
        };

        self.inner.snapshot.send_modify(|snap| {
            Arc::make_mut(snap).apply(topic, update.data);
            self.lock_streamed().insert(topic);
        });
        LineOutcome::Applied(topic)
    }

    /// Fetch the active media playlist once. Returns whether it changed.
    ///
    /// Subscribers are notified only on change.
    pub async fn poll_active_media_once(&self) -> Result<bool, CoreError> {
        let value = self
            .inner
            .remote
            .fetch(Endpoint::ActiveMediaPlaylist)
            .await?
            .unwrap_or(Value::Null);
        let next: Map<String, Value> = FromPayload::from_payload("active_media_playlist", value);

        Ok(self.inner.snapshot.send_if_modified(|snap| {
            self.inner.media_polled.store(true, Ordering::Release);
            if snap.active_media_playlist == next {
                return false;
            }
            Arc::make_mut(snap).active_media_playlist = next;
            true
        }))
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the stream and active-media tasks. A no-op while they run.
    pub async fn start_streaming(&self) {
        let mut handles = self.inner.task_handles.lock().await;
        if handles.iter().any(|h| !h.is_finished()) {
            return;
        }
        handles.clear();

        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        handles.push(tokio::spawn(stream_task(self.clone(), child.clone())));
        handles.push(tokio::spawn(media_poll_task(self.clone(), child)));
        debug!("live synchronizer started");
    }

    /// Cancel both tasks and wait for them to exit.
    ///
    /// Idempotent, and safe when streaming was never started.
    pub async fn shutdown(&self) {
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
    }

    // ── Connection ───────────────────────────────────────────────────

    /// Run one connection until it ends. Returns why it ended.
    async fn run_connection(&self, backoff: &mut Backoff) -> ApiError {
        let mut lines = match self
            .inner
            .remote
            .open_status_stream(Topic::subscription())
            .await
        {
            Ok(lines) => lines,
            Err(e) => return e,
        };

        backoff.reset();
        self.inner.state.send_replace(StreamState::Streaming);
        info!("status stream connected");
        self.refresh_peer().await;

        while let Some(line) = lines.next().await {
            match line {
                Ok(line) => {
                    self.handle_line(&line);
                }
                Err(e) => return e,
            }
        }
        ApiError::StreamEnded
    }

    async fn refresh_peer(&self) {
        let Some(peer) = &self.inner.peer else {
            return;
        };
        let limit = self.inner.pacing.peer_refresh_timeout;
        match tokio::time::timeout(limit, peer.refresh()).await {
            Ok(Ok(_)) => debug!("peer refreshed after connect"),
            Ok(Err(e)) => debug!(error = %e, "could not refresh peer after connect"),
            Err(_) => debug!(
                timeout_secs = limit.as_secs(),
                "peer refresh after connect timed out"
            ),
        }
    }

    fn disconnected(&self, message: &str) {
        if let Some(peer) = &self.inner.peer {
            peer.mark_unavailable(message);
        }
    }

    fn lock_streamed(&self) -> MutexGuard<'_, HashSet<Topic>> {
        self.inner
            .streamed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn host_description(&self) -> Option<String> {
        let peer = self.inner.peer.as_ref()?;
        peer.snapshot().host_description().map(str::to_owned)
    }
}

async fn fetch_field<R: RemoteControl>(
    remote: &R,
    field: &'static str,
    endpoint: Endpoint,
) -> Option<Value> {
    match remote.fetch(endpoint).await {
        Ok(value) => Some(value.unwrap_or(Value::Null)),
        Err(e) => {
            warn!(error = %e, field, "bootstrap fetch failed, keeping default");
            None
        }
    }
}

// ── Background tasks ─────────────────────────────────────────────────

async fn stream_task<R: RemoteControl>(sync: LiveSynchronizer<R>, cancel: CancellationToken) {
    let pacing = sync.inner.pacing.clone();
    let mut backoff = Backoff::new(pacing.reconnect);
    let mut throttle = LogThrottle::new(pacing.log_repeat_every);

    loop {
        sync.inner.state.send_replace(StreamState::Connecting);

        let reason = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            reason = sync.run_connection(&mut backoff) => reason,
        };

        let message = reason.to_string();
        let retry_in = backoff.next_delay();
        if throttle.should_log(&message) {
            let hint = version_hint(&message, sync.host_description().as_deref())
                .unwrap_or_default();
            warn!(
                "Stream disconnected: {message}. Reconnecting in {} seconds...{hint}",
                retry_in.as_secs_f64()
            );
        }

        sync.inner.state.send_replace(StreamState::Disconnected {
            attempt: backoff.failures(),
            retry_in,
        });
        sync.disconnected(&message);

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(retry_in) => {}
        }
    }

    sync.inner.state.send_replace(StreamState::Cancelled);
    info!("status stream cancelled");
}

async fn media_poll_task<R: RemoteControl>(sync: LiveSynchronizer<R>, cancel: CancellationToken) {
    let interval = sync.inner.pacing.media_poll_interval;
    let retry = sync.inner.pacing.media_poll_retry;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = sync.poll_active_media_once() => result,
        };

        if let Err(e) = result {
            debug!(error = %e, "active media poll failed");
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(retry) => {}
            }
        }
    }

    debug!("active media poll stopped");
}
