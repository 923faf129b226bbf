//! Dual-coordinator synchronization between ProPresenter and its consumers.
//!
//! This crate keeps an in-memory view of a ProPresenter instance current
//! from two sources with very different pacing:
//!
//! - **[`StaticSynchronizer`]** polls rarely-changing collections (version,
//!   clear groups, macros, timers, video inputs, playlists) on a timer and
//!   caches expensive playlist-detail fetches until explicitly invalidated.
//!
//! - **[`LiveSynchronizer`]** seeds a [`LiveSnapshot`] once, then holds the
//!   `/v1/status/updates` stream open, replacing one field per event. It
//!   reconnects with capped exponential backoff and polls the active media
//!   playlist, which the stream does not cover.
//!
//! - **[`SnapshotStream<T>`]**: subscription handle vended by both
//!   synchronizers, with `current()` / `latest()` / `changed()`.
//!
//! - **[`Controls`]**: snapshot-resolved actions (look selection, messages,
//!   timers), with look selection serialized behind a mutex.
//!
//! - **[`Bridge`]**: facade that wires all of the above to one
//!   [`ProPresenterClient`](stagehand_api::ProPresenterClient) and sequences
//!   startup and shutdown.
//!
//! The synchronizers reach ProPresenter through the [`RemoteControl`] trait.

pub mod backoff;
pub mod bridge;
pub mod config;
pub mod controls;
pub mod error;
pub mod registry;
pub mod remote;
pub mod store;
pub mod stream;
pub mod sync;
pub mod topic;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backoff::{Backoff, LogThrottle, reconnect_delay, version_hint};
pub use bridge::Bridge;
pub use config::{BridgeConfig, ReconnectConfig};
pub use controls::Controls;
pub use error::CoreError;
pub use registry::DeviceRegistry;
pub use remote::RemoteControl;
pub use store::{LiveSnapshot, PlaylistCache, PlaylistKind, StaticSnapshot};
pub use stream::{SnapshotStream, SnapshotWatchStream};
pub use sync::{LineOutcome, LiveSynchronizer, RefreshStatus, StaticSynchronizer, StreamState};
pub use topic::Topic;
