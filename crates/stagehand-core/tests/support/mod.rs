#![allow(dead_code, clippy::unwrap_used)]
// Scripted in-memory ProPresenter for synchronizer tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{StreamExt, stream};
use serde_json::{Value, json};
use tokio::time::Instant;

use stagehand_api::{Action, Endpoint, Error as ApiError, StatusLines};
use stagehand_core::{BridgeConfig, CoreError, DeviceRegistry, RemoteControl};

/// Canned answer for one endpoint.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    /// Answer with the given HTTP status.
    Status(u16),
}

/// What the next `open_status_stream` call does.
#[derive(Debug, Clone)]
pub enum StreamScript {
    /// Refuse the connection with an HTTP status.
    Refuse(u16),
    /// Deliver these lines, then end the stream.
    Lines(Vec<String>),
    /// Deliver these lines, then stay open.
    LinesThenHold(Vec<String>),
    /// Stay open without sending anything.
    Hold,
}

#[derive(Default)]
pub struct FakeRemote {
    replies: Mutex<HashMap<Endpoint, Reply>>,
    fetches: Mutex<HashMap<Endpoint, usize>>,
    executed: Mutex<Vec<Action>>,
    streams: Mutex<VecDeque<StreamScript>>,
    opens: Mutex<Vec<Instant>>,
}

impl FakeRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, endpoint: Endpoint, reply: Reply) {
        self.replies.lock().unwrap().insert(endpoint, reply);
    }

    pub fn json(&self, endpoint: Endpoint, value: Value) {
        self.reply(endpoint, Reply::Json(value));
    }

    pub fn fail(&self, endpoint: Endpoint) {
        self.reply(endpoint, Reply::Status(500));
    }

    pub fn script_streams(&self, scripts: impl IntoIterator<Item = StreamScript>) {
        self.streams.lock().unwrap().extend(scripts);
    }

    pub fn fetch_count(&self, endpoint: &Endpoint) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(endpoint)
            .copied()
            .unwrap_or(0)
    }

    pub fn executed(&self) -> Vec<Action> {
        self.executed.lock().unwrap().clone()
    }

    pub fn opens(&self) -> Vec<Instant> {
        self.opens.lock().unwrap().clone()
    }

    /// Gaps between consecutive stream opens.
    pub fn open_gaps(&self) -> Vec<Duration> {
        self.opens()
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect()
    }
}

impl RemoteControl for FakeRemote {
    async fn fetch(&self, endpoint: Endpoint) -> Result<Option<Value>, ApiError> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(endpoint.clone())
            .or_default() += 1;

        let reply = self.replies.lock().unwrap().get(&endpoint).cloned();
        match reply {
            None | Some(Reply::Status(404)) => Ok(None),
            Some(Reply::Json(value)) => Ok(Some(value)),
            Some(Reply::Status(status)) => Err(ApiError::Http {
                status,
                path: endpoint.path(),
            }),
        }
    }

    async fn execute(&self, action: Action) -> Result<(), ApiError> {
        self.executed.lock().unwrap().push(action);
        Ok(())
    }

    async fn open_status_stream(&self, _topics: Vec<&'static str>) -> Result<StatusLines, ApiError> {
        self.opens.lock().unwrap().push(Instant::now());
        let script = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(StreamScript::Hold);

        let lines: StatusLines = match script {
            StreamScript::Refuse(status) => {
                return Err(ApiError::Http {
                    status,
                    path: "/v1/status/updates".into(),
                });
            }
            StreamScript::Lines(lines) => Box::pin(stream::iter(lines.into_iter().map(Ok))),
            StreamScript::LinesThenHold(lines) => Box::pin(
                stream::iter(lines.into_iter().map(Ok)).chain(stream::pending()),
            ),
            StreamScript::Hold => Box::pin(stream::pending()),
        };
        Ok(lines)
    }
}

/// Records every version pushed to it.
#[derive(Default)]
pub struct RecordingRegistry {
    pub versions: Mutex<Vec<String>>,
}

impl DeviceRegistry for RecordingRegistry {
    fn update_sw_version(&self, version: &str) -> Result<(), CoreError> {
        self.versions.lock().unwrap().push(version.to_owned());
        Ok(())
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

pub fn config() -> BridgeConfig {
    BridgeConfig::for_host("127.0.0.1", 50001).unwrap()
}

pub fn item(uuid: &str, name: &str) -> Value {
    json!({ "id": { "uuid": uuid, "name": name, "index": 0 } })
}

pub fn version(host_description: &str) -> Value {
    json!({
        "name": "Stage PC",
        "platform": "mac",
        "os_version": "14.4",
        "host_description": host_description,
        "api_version": "v1"
    })
}

/// Script the endpoints a static refresh touches with small fixtures.
pub fn seed_static(remote: &FakeRemote) {
    remote.json(Endpoint::Version, version("ProPresenter 17.1"));
    remote.json(Endpoint::ClearGroups, json!([item("cg-1", "Clear All")]));
    remote.json(Endpoint::Macros, json!([item("m-1", "Walk In")]));
    remote.json(Endpoint::Timers, json!([item("t-1", "Countdown")]));
    remote.json(Endpoint::VideoInputs, json!([item("vi-1", "Camera 1")]));
    remote.json(
        Endpoint::PresentationPlaylists,
        json!([
            { "id": { "uuid": "pl-1", "name": "Sunday" }, "field_type": "playlist" }
        ]),
    );
    remote.json(
        Endpoint::PresentationPlaylist("pl-1".into()),
        json!({ "id": { "uuid": "pl-1", "name": "Sunday" }, "items": [] }),
    );
    remote.json(Endpoint::AudioPlaylists, json!([item("ap-1", "Walk In Music")]));
    remote.json(
        Endpoint::AudioPlaylist("ap-1".into()),
        json!({ "id": { "uuid": "ap-1" }, "items": [] }),
    );
    remote.json(Endpoint::MediaPlaylists, json!([item("mp-1", "Backgrounds")]));
    remote.json(
        Endpoint::MediaPlaylist("mp-1".into()),
        json!({ "id": { "uuid": "mp-1" }, "items": [] }),
    );
}

pub fn status_line(url: &str, data: &Value) -> String {
    json!({ "url": url, "data": data }).to_string()
}

/// Assert two durations agree to the millisecond.
pub fn assert_close(actual: Duration, expected: Duration) {
    let diff = actual.abs_diff(expected);
    assert!(
        diff <= Duration::from_millis(1),
        "expected {expected:?}, got {actual:?}"
    );
}
