// Read endpoints of the ProPresenter network API.
//
// Each variant names exactly one GET path. The synchronizers in
// stagehand-core key their fetches on these values, so the enum is
// hashable and cheap to clone.

use std::fmt;

use strum::{Display, EnumString};

/// Transport layer addressed by `/v1/transport/{layer}/...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TransportLayer {
    Presentation,
    Announcement,
    Audio,
}

/// A read-only ProPresenter API endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    // ── Device ──────────────────────────────────────────────────────
    Version,

    // ── Library content ─────────────────────────────────────────────
    ClearGroups,
    Macros,
    VideoInputs,
    Libraries,
    Library(String),
    Presentation(String),

    // ── Playlists ───────────────────────────────────────────────────
    PresentationPlaylists,
    PresentationPlaylist(String),
    FocusedPresentationPlaylist,
    AudioPlaylists,
    AudioPlaylist(String),
    FocusedAudioPlaylist,
    MediaPlaylists,
    MediaPlaylist(String),
    ActiveMediaPlaylist,

    // ── Presentation state ──────────────────────────────────────────
    ActivePresentation,
    FocusedPresentation,
    PresentationSlideIndex,
    AnnouncementSlideIndex,

    // ── Stage ───────────────────────────────────────────────────────
    StageScreens,
    StageLayouts,
    StageLayoutMap,
    StageMessage,

    // ── Messages / props / looks ────────────────────────────────────
    Messages,
    Message(String),
    Props,
    Looks,
    CurrentLook,

    // ── Status ──────────────────────────────────────────────────────
    StatusLayers,
    AudienceScreensStatus,
    StageScreensStatus,
    CaptureStatus,
    CaptureSettings,

    // ── Timers ──────────────────────────────────────────────────────
    Timers,
    TimersCurrent,

    // ── Transport ───────────────────────────────────────────────────
    TransportState(TransportLayer),
    TransportTime(TransportLayer),
}

impl Endpoint {
    /// Request path, relative to the API base URL.
    pub fn path(&self) -> String {
        match self {
            Self::Version => "/version".into(),
            Self::ClearGroups => "/v1/clear/groups".into(),
            Self::Macros => "/v1/macros".into(),
            Self::VideoInputs => "/v1/video_inputs".into(),
            Self::Libraries => "/v1/libraries".into(),
            Self::Library(id) => format!("/v1/library/{id}"),
            Self::Presentation(uuid) => format!("/v1/presentation/{uuid}"),
            Self::PresentationPlaylists => "/v1/playlists".into(),
            Self::PresentationPlaylist(uuid) => format!("/v1/playlist/{uuid}"),
            Self::FocusedPresentationPlaylist => "/v1/playlist/focused".into(),
            Self::AudioPlaylists => "/v1/audio/playlists".into(),
            Self::AudioPlaylist(uuid) => format!("/v1/audio/playlist/{uuid}"),
            Self::FocusedAudioPlaylist => "/v1/audio/playlist/focused".into(),
            Self::MediaPlaylists => "/v1/media/playlists".into(),
            Self::MediaPlaylist(uuid) => format!("/v1/media/playlist/{uuid}"),
            Self::ActiveMediaPlaylist => "/v1/media/playlist/active".into(),
            Self::ActivePresentation => "/v1/presentation/active".into(),
            Self::FocusedPresentation => "/v1/presentation/focused".into(),
            Self::PresentationSlideIndex => "/v1/presentation/slide_index".into(),
            Self::AnnouncementSlideIndex => "/v1/announcement/slide_index".into(),
            Self::StageScreens => "/v1/stage/screens".into(),
            Self::StageLayouts => "/v1/stage/layouts".into(),
            Self::StageLayoutMap => "/v1/stage/layout_map".into(),
            Self::StageMessage => "/v1/stage/message".into(),
            Self::Messages => "/v1/messages".into(),
            Self::Message(id) => format!("/v1/message/{id}"),
            Self::Props => "/v1/props".into(),
            Self::Looks => "/v1/looks".into(),
            Self::CurrentLook => "/v1/look/current".into(),
            Self::StatusLayers => "/v1/status/layers".into(),
            Self::AudienceScreensStatus => "/v1/status/audience_screens".into(),
            Self::StageScreensStatus => "/v1/status/stage_screens".into(),
            Self::CaptureStatus => "/v1/capture/status".into(),
            Self::CaptureSettings => "/v1/capture/settings".into(),
            Self::Timers => "/v1/timers".into(),
            Self::TimersCurrent => "/v1/timers/current".into(),
            Self::TransportState(layer) => format!("/v1/transport/{layer}/current"),
            Self::TransportTime(layer) => format!("/v1/transport/{layer}/time"),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
