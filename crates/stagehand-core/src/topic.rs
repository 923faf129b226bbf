// ── Status-stream topics ──
//
// The closed set of topics the live synchronizer subscribes to. Each
// topic maps to exactly one field of `LiveSnapshot`; the mapping itself
// lives in `LiveSnapshot::apply` as an exhaustive match.

use stagehand_api::{Endpoint, TransportLayer};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// A topic path pushed by `/v1/status/updates`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
pub enum Topic {
    #[strum(to_string = "presentation/current", serialize = "presentation/active")]
    PresentationCurrent,
    #[strum(serialize = "presentation/slide_index")]
    PresentationSlideIndex,
    #[strum(serialize = "announcement/slide_index")]
    AnnouncementSlideIndex,
    #[strum(serialize = "stage/screens")]
    StageScreens,
    #[strum(serialize = "stage/layouts")]
    StageLayouts,
    #[strum(serialize = "stage/layout_map")]
    StageLayoutMap,
    #[strum(serialize = "messages")]
    Messages,
    #[strum(serialize = "props")]
    Props,
    #[strum(serialize = "looks")]
    Looks,
    #[strum(serialize = "look/current")]
    CurrentLook,
    #[strum(serialize = "status/layers")]
    StatusLayers,
    #[strum(serialize = "status/audience_screens")]
    AudienceScreens,
    #[strum(serialize = "status/stage_screens")]
    StageScreensStatus,
    #[strum(serialize = "capture/status")]
    CaptureStatus,
    #[strum(serialize = "timers")]
    Timers,
    #[strum(serialize = "timers/current")]
    TimersCurrent,
    #[strum(serialize = "transport/audio/current")]
    AudioTransport,
    #[strum(serialize = "transport/audio/time")]
    AudioTransportTime,
    #[strum(serialize = "transport/presentation/current")]
    PresentationTransport,
    #[strum(serialize = "transport/presentation/time")]
    PresentationTransportTime,
    #[strum(serialize = "stage/message")]
    StageMessage,
}

impl Topic {
    /// Canonical path sent in the subscription request.
    pub fn path(self) -> &'static str {
        self.into()
    }

    /// Every topic, in subscription order.
    pub fn subscription() -> Vec<&'static str> {
        Self::iter().map(Self::path).collect()
    }

    /// Resolve an incoming `url`; unknown paths yield `None`.
    pub fn from_path(path: &str) -> Option<Self> {
        path.parse().ok()
    }

    /// Name of the `LiveSnapshot` field this topic writes.
    pub fn field(self) -> &'static str {
        match self {
            Self::PresentationCurrent => "active_presentation",
            Self::PresentationSlideIndex => "slide_index",
            Self::AnnouncementSlideIndex => "announcement_slide_index",
            Self::StageScreens => "stage_screens",
            Self::StageLayouts => "stage_layouts",
            Self::StageLayoutMap => "layout_map",
            Self::Messages => "messages",
            Self::Props => "props",
            Self::Looks => "looks",
            Self::CurrentLook => "current_look",
            Self::StatusLayers => "status_layers",
            Self::AudienceScreens => "audience_screens_status",
            Self::StageScreensStatus => "stage_screens_status",
            Self::CaptureStatus => "capture_status",
            Self::Timers => "timers",
            Self::TimersCurrent => "timers_current",
            Self::AudioTransport => "audio_transport_state",
            Self::AudioTransportTime => "audio_transport_time",
            Self::PresentationTransport => "presentation_transport_state",
            Self::PresentationTransportTime => "presentation_transport_time",
            Self::StageMessage => "stage_message",
        }
    }

    /// Endpoint fetched for this topic's field during the bootstrap fan-out.
    ///
    /// Topics without one are only ever populated by the stream.
    pub fn bootstrap_endpoint(self) -> Option<Endpoint> {
        match self {
            Self::PresentationCurrent => Some(Endpoint::ActivePresentation),
            Self::StageScreens => Some(Endpoint::StageScreens),
            Self::StageLayouts => Some(Endpoint::StageLayouts),
            Self::StageLayoutMap => Some(Endpoint::StageLayoutMap),
            Self::Messages => Some(Endpoint::Messages),
            Self::Props => Some(Endpoint::Props),
            Self::Looks => Some(Endpoint::Looks),
            Self::CurrentLook => Some(Endpoint::CurrentLook),
            Self::StatusLayers => Some(Endpoint::StatusLayers),
            Self::AudienceScreens => Some(Endpoint::AudienceScreensStatus),
            Self::StageScreensStatus => Some(Endpoint::StageScreensStatus),
            Self::StageMessage => Some(Endpoint::StageMessage),
            Self::AudioTransport => Some(Endpoint::TransportState(TransportLayer::Audio)),
            Self::PresentationTransport => {
                Some(Endpoint::TransportState(TransportLayer::Presentation))
            }
            Self::PresentationSlideIndex
            | Self::AnnouncementSlideIndex
            | Self::CaptureStatus
            | Self::Timers
            | Self::TimersCurrent
            | Self::AudioTransportTime
            | Self::PresentationTransportTime => None,
        }
    }
}
