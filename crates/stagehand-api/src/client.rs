// ProPresenter HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, the "404 means no data"
// convention, content-type dispatch, and the status-update stream. Composite
// operations (message tokens, slide triggers, thumbnails) live in
// `operations.rs` as further inherent methods.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::action::Action;
use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::stream::{STATUS_UPDATES_PATH, StatusLines, split_lines};
use crate::transport::TransportConfig;

/// Response body of a successful one-shot request.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Bytes(Bytes),
}

/// Raw HTTP client for the ProPresenter network API.
///
/// Every one-shot request is bounded by the configured request timeout.
/// The status stream is exempt and only bounded by the idle-read timeout
/// baked into the underlying `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ProPresenterClient {
    http: reqwest::Client,
    base_url: Url,
    request_timeout: Duration,
}

impl ProPresenterClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the API root, e.g. `http://192.168.1.20:50001`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            request_timeout: transport.request_timeout,
        })
    }

    /// Create a client for `http://{host}:{port}`.
    pub fn from_host(host: &str, port: u16, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("http://{host}:{port}"))?;
        Self::new(base_url, transport)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, request_timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            request_timeout,
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.request_timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a one-shot request.
    ///
    /// Returns `Ok(None)` for 404 and for empty bodies. JSON content types
    /// decode to [`Payload::Json`]; anything else is handed back raw.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Payload>, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut builder = self
            .http
            .request(method, url)
            .timeout(self.request_timeout);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            debug!(path, "endpoint not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                path: path.to_owned(),
            });
        }

        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let bytes = resp.bytes().await.map_err(|e| self.map_send_error(e))?;
        if bytes.is_empty() {
            return Ok(None);
        }

        if is_json {
            serde_json::from_slice(&bytes)
                .map(|value| Some(Payload::Json(value)))
                .map_err(|e| Error::Deserialization {
                    message: e.to_string(),
                    body: String::from_utf8_lossy(&bytes).chars().take(200).collect(),
                })
        } else {
            Ok(Some(Payload::Bytes(bytes)))
        }
    }

    /// GET a read endpoint and return its JSON body, if any.
    pub async fn fetch(&self, endpoint: &Endpoint) -> Result<Option<Value>, Error> {
        match self.request(Method::GET, &endpoint.path(), None).await? {
            Some(Payload::Json(value)) => Ok(Some(value)),
            Some(Payload::Bytes(_)) => {
                debug!(%endpoint, "ignoring non-JSON response");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// GET a read endpoint that must return data.
    pub async fn fetch_required(&self, endpoint: &Endpoint) -> Result<Value, Error> {
        self.fetch(endpoint).await?.ok_or_else(|| Error::MissingData {
            path: endpoint.path(),
        })
    }

    /// Perform a state-changing action, discarding any response body.
    pub async fn execute(&self, action: &Action) -> Result<(), Error> {
        let body = action.body();
        self.request(action.method(), &action.path(), body.as_ref())
            .await
            .map(drop)
    }

    // ── Status stream ────────────────────────────────────────────────

    /// Open the status-update stream for the given topics.
    ///
    /// Resolves once response headers arrive; the returned line stream then
    /// stays open until the server closes it or the idle-read timeout fires.
    pub async fn open_status_stream(&self, topics: &[&str]) -> Result<StatusLines, Error> {
        let url = self.url(STATUS_UPDATES_PATH)?;
        debug!("POST {url} ({} topics)", topics.len());

        let resp = self
            .http
            .post(url)
            .json(topics)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                path: STATUS_UPDATES_PATH.to_owned(),
            });
        }

        info!("status stream established");
        Ok(Box::pin(split_lines(resp.bytes_stream())))
    }
}
