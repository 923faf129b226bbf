// Static snapshot: rarely-changing collections polled on a timer, plus the
// lazily filled playlist-detail cache that backs them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::store::item_uuid;

/// Result of the last successful static refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StaticSnapshot {
    pub version: Map<String, Value>,
    pub clear_groups: Vec<Value>,
    pub macros: Vec<Value>,
    pub timers: Vec<Value>,
    pub video_inputs: Vec<Value>,
    pub presentation_playlists: Vec<Value>,
    pub presentation_playlist_details: Vec<Value>,
    pub audio_playlists: Vec<Value>,
    pub audio_playlist_details: Vec<Value>,
    pub media_playlists: Vec<Value>,
    pub media_playlist_details: Vec<Value>,
    /// When this snapshot was taken; `None` before the first success.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl StaticSnapshot {
    /// `host_description` as reported by `/version`.
    pub fn host_description(&self) -> Option<&str> {
        self.version.get("host_description").and_then(Value::as_str)
    }

    /// Parsed ProPresenter version (`"Unknown"` when unrecognised).
    pub fn firmware_version(&self) -> String {
        firmware_version(&self.version)
    }

    /// Find a timer by UUID or display name.
    pub fn timer(&self, identifier: &str) -> Option<&Value> {
        super::find_item(&self.timers, identifier)
    }
}

/// Shallow list and resolved details of one playlist category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CachedPlaylists {
    pub playlists: Vec<Value>,
    pub details: Vec<Value>,
}

/// Playlist category with its own cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistKind {
    Presentation,
    Audio,
    Media,
}

/// Cache slots for the three playlist categories.
///
/// A populated slot is reused until [`invalidate`](Self::invalidate) empties
/// it. The generation counter lets a refresh that raced an invalidation
/// drop its result instead of resurrecting stale data.
#[derive(Debug, Default)]
pub struct PlaylistCache {
    presentation: Option<CachedPlaylists>,
    audio: Option<CachedPlaylists>,
    media: Option<CachedPlaylists>,
    generation: u64,
}

impl PlaylistCache {
    pub fn get(&self, kind: PlaylistKind) -> Option<CachedPlaylists> {
        self.slot(kind).clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Store a freshly fetched category, unless an invalidation happened
    /// since `generation` was read. Returns whether the value was kept.
    pub fn store(&mut self, kind: PlaylistKind, generation: u64, value: CachedPlaylists) -> bool {
        if generation != self.generation {
            return false;
        }
        *self.slot_mut(kind) = Some(value);
        true
    }

    /// Empty all three slots.
    pub fn invalidate(&mut self) {
        self.presentation = None;
        self.audio = None;
        self.media = None;
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn is_empty(&self) -> bool {
        self.presentation.is_none() && self.audio.is_none() && self.media.is_none()
    }

    fn slot(&self, kind: PlaylistKind) -> &Option<CachedPlaylists> {
        match kind {
            PlaylistKind::Presentation => &self.presentation,
            PlaylistKind::Audio => &self.audio,
            PlaylistKind::Media => &self.media,
        }
    }

    fn slot_mut(&mut self, kind: PlaylistKind) -> &mut Option<CachedPlaylists> {
        match kind {
            PlaylistKind::Presentation => &mut self.presentation,
            PlaylistKind::Audio => &mut self.audio,
            PlaylistKind::Media => &mut self.media,
        }
    }
}

/// Collect playlist UUIDs from a presentation playlist tree.
///
/// `field_type: "playlist"` entries contribute their `id.uuid`; `"group"`
/// entries are walked through their `children`.
pub fn collect_playlist_uuids(items: &[Value]) -> Vec<String> {
    let mut uuids = Vec::new();
    collect_into(items, &mut uuids);
    uuids
}

fn collect_into(items: &[Value], uuids: &mut Vec<String>) {
    for item in items {
        match item.get("field_type").and_then(Value::as_str) {
            Some("playlist") => {
                if let Some(uuid) = item_uuid(item) {
                    uuids.push(uuid.to_owned());
                }
            }
            Some("group") => {
                if let Some(children) = item.get("children").and_then(Value::as_array) {
                    collect_into(children, uuids);
                }
            }
            _ => {}
        }
    }
}

/// Version string from a `/version` body.
///
/// `"ProPresenter 7.16.2"` becomes `"7.16.2"`; anything else is `"Unknown"`.
pub fn firmware_version(version: &Map<String, Value>) -> String {
    version
        .get("host_description")
        .and_then(Value::as_str)
        .and_then(|desc| desc.strip_prefix("ProPresenter "))
        .map_or_else(|| "Unknown".to_owned(), str::to_owned)
}
