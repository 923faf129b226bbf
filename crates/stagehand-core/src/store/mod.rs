// ── Snapshot storage ──
//
// Typed snapshots owned by the two synchronizers, the payload coercion
// they share, and lookup helpers for items identified by `id.uuid` /
// `id.name`.

pub mod live;
pub mod payload;
pub mod static_state;

use serde_json::Value;

pub use live::LiveSnapshot;
pub use payload::FromPayload;
pub use static_state::{
    CachedPlaylists, PlaylistCache, PlaylistKind, StaticSnapshot, collect_playlist_uuids,
    firmware_version,
};

/// `id.uuid` of a ProPresenter item.
pub fn item_uuid(item: &Value) -> Option<&str> {
    item.get("id")?.get("uuid")?.as_str()
}

/// `id.name` of a ProPresenter item.
pub fn item_name(item: &Value) -> Option<&str> {
    item.get("id")?.get("name")?.as_str()
}

/// Find an item whose UUID or name equals `identifier`. UUID matches win.
pub fn find_item<'a>(items: &'a [Value], identifier: &str) -> Option<&'a Value> {
    items
        .iter()
        .find(|item| item_uuid(item) == Some(identifier))
        .or_else(|| items.iter().find(|item| item_name(item) == Some(identifier)))
}
