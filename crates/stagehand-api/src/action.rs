// Write / trigger operations of the ProPresenter network API.
//
// Actions are fire-and-forget from the caller's point of view: the
// response body, if any, is discarded. Most triggers are plain GETs;
// only state setters carry a JSON body.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

use crate::endpoint::TransportLayer;

/// Timer operations accepted by `/v1/timer/{id}/{operation}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TimerOperation {
    Start,
    Stop,
    Reset,
}

/// Capture operations accepted by `/v1/capture/{operation}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CaptureOperation {
    Start,
    Stop,
}

/// Output layers that can be cleared with `/v1/clear/layer/{layer}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ClearLayer {
    Audio,
    Props,
    Messages,
    Announcements,
    Slide,
    Media,
    VideoInput,
}

/// One token value sent when triggering a message.
///
/// Serializes as `{"name": "...", "text": {"text": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageToken {
    pub name: String,
    pub text: TokenText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenText {
    pub text: String,
}

impl MessageToken {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: TokenText { text: text.into() },
        }
    }
}

/// A state-changing ProPresenter API call.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Slides ──────────────────────────────────────────────────────
    NextSlide,
    PreviousSlide,
    FocusPresentation(String),
    TriggerFocusedSlide(u32),
    TriggerActiveSlide(u32),
    TriggerActiveAnnouncementSlide(u32),
    TriggerFocusedAnnouncementSlide(u32),
    TriggerLibrarySlide {
        library: String,
        presentation: String,
        index: u32,
    },

    // ── Playlists ───────────────────────────────────────────────────
    FocusPlaylist(String),
    TriggerPlaylistItem { playlist: String, index: u32 },
    TriggerFocusedPlaylistItem(u32),

    // ── Looks / macros / clearing ───────────────────────────────────
    TriggerLook(String),
    TriggerMacro(String),
    TriggerClearGroup(String),
    ClearLayer(ClearLayer),

    // ── Props ───────────────────────────────────────────────────────
    TriggerProp(String),
    ClearProp(String),

    // ── Messages ────────────────────────────────────────────────────
    TriggerMessage {
        id: String,
        tokens: Vec<MessageToken>,
    },
    ClearMessage(String),

    // ── Timers ──────────────────────────────────────────────────────
    Timer {
        id: String,
        operation: TimerOperation,
    },

    // ── Stage ───────────────────────────────────────────────────────
    SetStageMessage(String),
    ClearStageMessage,
    SetStageScreenLayout { screen: String, layout: String },
    SetAudienceScreens(bool),
    SetStageScreens(bool),

    // ── Transport ───────────────────────────────────────────────────
    Play(TransportLayer),
    Pause(TransportLayer),
    Seek { layer: TransportLayer, seconds: f64 },

    // ── Audio / media / video inputs ────────────────────────────────
    TriggerAudioTrack { playlist: String, track: String },
    FocusedAudioNext,
    FocusedAudioPrevious,
    TriggerMediaItem { playlist: String, item: String },
    TriggerVideoInput(String),

    // ── Capture ─────────────────────────────────────────────────────
    Capture(CaptureOperation),
}

impl Action {
    pub fn method(&self) -> Method {
        match self {
            Self::TriggerMessage { .. } => Method::POST,
            Self::SetStageMessage(_)
            | Self::SetAudienceScreens(_)
            | Self::SetStageScreens(_)
            | Self::Seek { .. } => Method::PUT,
            Self::ClearStageMessage => Method::DELETE,
            _ => Method::GET,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::NextSlide => "/v1/trigger/next".into(),
            Self::PreviousSlide => "/v1/trigger/previous".into(),
            Self::FocusPresentation(uuid) => format!("/v1/presentation/{uuid}/focus"),
            Self::TriggerFocusedSlide(i) => format!("/v1/presentation/focused/{i}/trigger"),
            Self::TriggerActiveSlide(i) => format!("/v1/presentation/active/{i}/trigger"),
            Self::TriggerActiveAnnouncementSlide(i) => {
                format!("/v1/announcement/active/{i}/trigger")
            }
            Self::TriggerFocusedAnnouncementSlide(i) => {
                format!("/v1/announcement/focused/{i}/trigger")
            }
            Self::TriggerLibrarySlide {
                library,
                presentation,
                index,
            } => format!("/v1/library/{library}/{presentation}/{index}/trigger"),
            Self::FocusPlaylist(id) => format!("/v1/playlist/{id}/focus"),
            Self::TriggerPlaylistItem { playlist, index } => {
                format!("/v1/playlist/{playlist}/{index}/trigger")
            }
            Self::TriggerFocusedPlaylistItem(i) => format!("/v1/playlist/focused/{i}/trigger"),
            Self::TriggerLook(uuid) => format!("/v1/look/{uuid}/trigger"),
            Self::TriggerMacro(id) => format!("/v1/macro/{id}/trigger"),
            Self::TriggerClearGroup(id) => format!("/v1/clear/group/{id}/trigger"),
            Self::ClearLayer(layer) => format!("/v1/clear/layer/{layer}"),
            Self::TriggerProp(id) => format!("/v1/prop/{id}/trigger"),
            Self::ClearProp(id) => format!("/v1/prop/{id}/clear"),
            Self::TriggerMessage { id, .. } => format!("/v1/message/{id}/trigger"),
            Self::ClearMessage(id) => format!("/v1/message/{id}/clear"),
            Self::Timer { id, operation } => format!("/v1/timer/{id}/{operation}"),
            Self::SetStageMessage(_) | Self::ClearStageMessage => "/v1/stage/message".into(),
            Self::SetStageScreenLayout { screen, layout } => {
                format!("/v1/stage/screen/{screen}/layout/{layout}")
            }
            Self::SetAudienceScreens(_) => "/v1/status/audience_screens".into(),
            Self::SetStageScreens(_) => "/v1/status/stage_screens".into(),
            Self::Play(layer) => format!("/v1/transport/{layer}/play"),
            Self::Pause(layer) => format!("/v1/transport/{layer}/pause"),
            Self::Seek { layer, .. } => format!("/v1/transport/{layer}/time"),
            Self::TriggerAudioTrack { playlist, track } => {
                format!("/v1/trigger/audio/{playlist}/{track}")
            }
            Self::FocusedAudioNext => "/v1/audio/playlist/focused/next/trigger".into(),
            Self::FocusedAudioPrevious => "/v1/audio/playlist/focused/previous/trigger".into(),
            Self::TriggerMediaItem { playlist, item } => {
                format!("/v1/trigger/media/{playlist}/{item}")
            }
            Self::TriggerVideoInput(id) => format!("/v1/video_inputs/{id}/trigger"),
            Self::Capture(operation) => format!("/v1/capture/{operation}"),
        }
    }

    /// JSON body sent with the request, if the action carries one.
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::TriggerMessage { tokens, .. } => serde_json::to_value(tokens).ok(),
            Self::SetStageMessage(text) => Some(Value::String(text.clone())),
            Self::SetAudienceScreens(on) | Self::SetStageScreens(on) => Some(Value::Bool(*on)),
            Self::Seek { seconds, .. } => Some(Value::from(*seconds)),
            _ => None,
        }
    }
}
