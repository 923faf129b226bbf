#![allow(clippy::unwrap_used)]
// Integration tests for `ProPresenterClient` using wiremock.

use std::time::Duration;

use futures_util::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stagehand_api::{
    Action, Endpoint, Error, Payload, ProPresenterClient, TimerOperation, parse_status_line,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ProPresenterClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client =
        ProPresenterClient::with_client(reqwest::Client::new(), base_url, Duration::from_secs(10));
    (server, client)
}

// ── One-shot requests ───────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_json_list() {
    let (server, client) = setup().await;

    let looks = json!([
        { "id": { "uuid": "look-1", "name": "Worship", "index": 0 } },
        { "id": { "uuid": "look-2", "name": "Sermon", "index": 1 } }
    ]);
    Mock::given(method("GET"))
        .and(path("/v1/looks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&looks))
        .mount(&server)
        .await;

    let value = client.fetch(&Endpoint::Looks).await.unwrap();
    assert_eq!(value, Some(looks));
}

#[tokio::test]
async fn test_not_found_is_no_data() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/capture/status"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let value = client.fetch(&Endpoint::CaptureStatus).await.unwrap();
    assert_eq!(value, None);
}

#[tokio::test]
async fn test_empty_body_is_no_data() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/trigger/next"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.execute(&Action::NextSlide).await.unwrap();
}

#[tokio::test]
async fn test_server_error_is_http_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/macros"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.fetch(&Endpoint::Macros).await;
    assert!(
        matches!(result, Err(Error::Http { status: 500, .. })),
        "expected Http error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_invalid_json_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/props"))
        .respond_with(
            // set_body_string would reset the MIME type to text/plain.
            ResponseTemplate::new(200).set_body_raw("{not json", "application/json"),
        )
        .mount(&server)
        .await;

    let result = client.fetch(&Endpoint::Props).await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_version_requires_data() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/version"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client.version().await;
    assert!(
        matches!(result, Err(Error::MissingData { ref path }) if path == "/version"),
        "expected MissingData error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let client = ProPresenterClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9").unwrap(),
        Duration::from_secs(2),
    );

    let result = client.fetch(&Endpoint::Version).await;
    assert!(
        matches!(result, Err(Error::Transport(_) | Error::Timeout { .. })),
        "expected transport error, got: {result:?}"
    );
}

// ── Actions ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_stage_message_put_sends_json_string() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/stage/message"))
        .and(body_json(json!("Five minutes")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .execute(&Action::SetStageMessage("Five minutes".into()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_timer_operation() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/timer/t-1/start"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client
        .execute(&Action::Timer {
            id: "t-1".into(),
            operation: TimerOperation::Start,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_trigger_slide_focuses_then_triggers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/presentation/p-7/focus"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/presentation/focused/4/trigger"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.trigger_slide("p-7", 4).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
    assert_eq!(
        paths,
        vec!["/v1/presentation/p-7/focus", "/v1/presentation/focused/4/trigger"]
    );
}

#[tokio::test]
async fn test_thumbnail_returns_raw_bytes() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/presentation/p-1/thumbnail/3"))
        .and(query_param("quality", "400"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0xFF, 0xD8, 0xFF], "image/jpeg"),
        )
        .mount(&server)
        .await;

    let bytes = client
        .presentation_thumbnail("p-1", 3, 400)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bytes.as_ref(), &[0xFF, 0xD8, 0xFF]);

    let raw = client
        .request(
            reqwest::Method::GET,
            "/v1/presentation/p-1/thumbnail/3?quality=400",
            None,
        )
        .await
        .unwrap();
    assert!(matches!(raw, Some(Payload::Bytes(_))));
}

#[tokio::test]
async fn test_media_thumbnail_returns_raw_bytes() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/media/m-3/thumbnail"))
        .and(query_param("quality", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89, 0x50], "image/jpeg"))
        .mount(&server)
        .await;

    let bytes = client.media_thumbnail("m-3", 200).await.unwrap().unwrap();
    assert_eq!(bytes.as_ref(), &[0x89, 0x50]);

    // A missing media item is no data, not an error.
    assert!(client.media_thumbnail("gone", 200).await.unwrap().is_none());
}

// ── Status stream ───────────────────────────────────────────────────

#[tokio::test]
async fn test_status_stream_posts_topics_and_yields_lines() {
    let (server, client) = setup().await;

    let body = concat!(
        "{\"url\":\"status/layers\",\"data\":{\"audio\":true}}\n",
        "\n",
        "{\"url\":\"timers/current\",\"data\":[]}\n",
    );
    Mock::given(method("POST"))
        .and(path("/v1/status/updates"))
        .and(body_json(json!(["status/layers", "timers/current"])))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body, "application/json"),
        )
        .mount(&server)
        .await;

    let stream = client
        .open_status_stream(&["status/layers", "timers/current"])
        .await
        .unwrap();
    let lines: Vec<String> = stream.map(|line| line.unwrap()).collect().await;

    let updates: Vec<_> = lines
        .iter()
        .filter_map(|line| parse_status_line(line).unwrap())
        .collect();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].url, "status/layers");
    assert_eq!(updates[0].data, json!({ "audio": true }));
    assert_eq!(updates[1].url, "timers/current");
}

#[tokio::test]
async fn test_status_stream_rejected_by_old_server() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/status/updates"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let result = client.open_status_stream(&["looks"]).await;
    match result {
        Err(err) => assert_eq!(err.status(), Some(400)),
        Ok(_) => panic!("expected the stream to be rejected"),
    }
}
