#![allow(clippy::unwrap_used)]
// End-to-end bridge run against a wiremock ProPresenter.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stagehand_core::{Bridge, BridgeConfig};

async fn mock_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn bridge_syncs_from_http_server() {
    let server = MockServer::start().await;

    mock_json(
        &server,
        "/version",
        json!({ "host_description": "ProPresenter 17.1", "api_version": "v1" }),
    )
    .await;
    mock_json(&server, "/v1/macros", json!([{ "id": { "uuid": "m-1", "name": "Walk In" } }])).await;
    mock_json(
        &server,
        "/v1/messages",
        json!([{ "id": { "uuid": "msg-1", "name": "Nursery" } }]),
    )
    .await;

    let lines = format!(
        "{}\n{}\n",
        json!({ "url": "status/layers", "data": { "audio": true } }),
        json!({ "url": "stage/message", "data": "Doors open" }),
    );
    Mock::given(method("POST"))
        .and(path("/v1/status/updates"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string(lines),
        )
        .mount(&server)
        .await;

    let config = BridgeConfig::new(Url::parse(&server.uri()).unwrap());
    let bridge = Bridge::new(config, None).unwrap();
    let mut live = bridge.subscribe_live();

    bridge.connect().await.unwrap();

    assert_eq!(bridge.static_snapshot().firmware_version(), "17.1");
    assert_eq!(bridge.static_snapshot().macros.len(), 1);
    assert_eq!(bridge.live_snapshot().messages.len(), 1);

    let streamed = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = live.changed().await.unwrap();
            if snapshot.stage_message == "Doors open" {
                return snapshot;
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(streamed.status_layers["audio"], true);

    bridge.shutdown().await;
}
