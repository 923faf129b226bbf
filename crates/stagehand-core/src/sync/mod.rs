// ── Synchronizers ──
//
// The poll-based static synchronizer and the stream-based live
// synchronizer. The live side holds the static side as a peer.

mod live_sync;
mod static_sync;

pub use live_sync::{LineOutcome, LiveSynchronizer, StreamState};
pub use static_sync::{RefreshStatus, StaticSynchronizer};
