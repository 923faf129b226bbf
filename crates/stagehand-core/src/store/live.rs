// Live snapshot: fast-changing presentation state kept current by the
// status stream, the bootstrap fan-out, and the active-media poll.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::store::payload::FromPayload;
use crate::topic::Topic;

/// Last-known value of every streamed field.
///
/// Every field starts at its type default, so readers never need to
/// handle an absent value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LiveSnapshot {
    pub active_presentation: Map<String, Value>,
    pub slide_index: Map<String, Value>,
    pub announcement_slide_index: Map<String, Value>,
    pub stage_screens: Vec<Value>,
    pub stage_layouts: Vec<Value>,
    pub layout_map: Vec<Value>,
    pub messages: Vec<Value>,
    pub props: Vec<Value>,
    pub looks: Vec<Value>,
    pub current_look: Map<String, Value>,
    pub status_layers: Map<String, Value>,
    pub audience_screens_status: bool,
    pub stage_screens_status: bool,
    pub capture_status: Map<String, Value>,
    pub timers: Vec<Value>,
    pub timers_current: Vec<Value>,
    pub audio_transport_state: Map<String, Value>,
    pub audio_transport_time: f64,
    pub presentation_transport_state: Map<String, Value>,
    pub presentation_transport_time: f64,
    pub stage_message: String,
    /// Not streamed; refreshed by the active-media poll.
    pub active_media_playlist: Map<String, Value>,
}

impl LiveSnapshot {
    /// Replace the field mapped to `topic` with `data`.
    pub fn apply(&mut self, topic: Topic, data: Value) {
        let field = topic.field();
        match topic {
            Topic::PresentationCurrent => {
                self.active_presentation = FromPayload::from_payload(field, data);
            }
            Topic::PresentationSlideIndex => {
                self.slide_index = FromPayload::from_payload(field, data);
            }
            Topic::AnnouncementSlideIndex => {
                self.announcement_slide_index = FromPayload::from_payload(field, data);
            }
            Topic::StageScreens => self.stage_screens = FromPayload::from_payload(field, data),
            Topic::StageLayouts => self.stage_layouts = FromPayload::from_payload(field, data),
            Topic::StageLayoutMap => self.layout_map = FromPayload::from_payload(field, data),
            Topic::Messages => self.messages = FromPayload::from_payload(field, data),
            Topic::Props => self.props = FromPayload::from_payload(field, data),
            Topic::Looks => self.looks = FromPayload::from_payload(field, data),
            Topic::CurrentLook => self.current_look = FromPayload::from_payload(field, data),
            Topic::StatusLayers => self.status_layers = FromPayload::from_payload(field, data),
            Topic::AudienceScreens => {
                self.audience_screens_status = FromPayload::from_payload(field, data);
            }
            Topic::StageScreensStatus => {
                self.stage_screens_status = FromPayload::from_payload(field, data);
            }
            Topic::CaptureStatus => self.capture_status = FromPayload::from_payload(field, data),
            Topic::Timers => self.timers = FromPayload::from_payload(field, data),
            Topic::TimersCurrent => self.timers_current = FromPayload::from_payload(field, data),
            Topic::AudioTransport => {
                self.audio_transport_state = FromPayload::from_payload(field, data);
            }
            Topic::AudioTransportTime => {
                self.audio_transport_time = FromPayload::from_payload(field, data);
            }
            Topic::PresentationTransport => {
                self.presentation_transport_state = FromPayload::from_payload(field, data);
            }
            Topic::PresentationTransportTime => {
                self.presentation_transport_time = FromPayload::from_payload(field, data);
            }
            Topic::StageMessage => self.stage_message = FromPayload::from_payload(field, data),
        }
    }

    /// Find a look by its display name.
    pub fn look_by_name(&self, name: &str) -> Option<&Value> {
        self.looks
            .iter()
            .find(|look| super::item_name(look) == Some(name))
    }

    /// Find a message by UUID or display name.
    pub fn message(&self, identifier: &str) -> Option<&Value> {
        super::find_item(&self.messages, identifier)
    }
}
