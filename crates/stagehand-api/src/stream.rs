// Status-update stream framing.
//
// ProPresenter answers `POST /v1/status/updates` with a chunked body that
// never ends on its own. Each line is one JSON record naming the topic
// that changed and its full new value. Chunk boundaries do not line up with
// record boundaries, so bytes are buffered until a newline arrives.

use std::pin::Pin;

use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

/// Path of the chunked status-update endpoint.
pub const STATUS_UPDATES_PATH: &str = "/v1/status/updates";

/// Lines read from an open status stream.
///
/// The stream ends when the server closes the connection; transport errors
/// surface as `Err` items.
pub type StatusLines = Pin<Box<dyn Stream<Item = Result<String, Error>> + Send>>;

/// One pushed state change: `{"url": "<topic>", "data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusUpdate {
    pub url: String,
    #[serde(default)]
    pub data: Value,
}

/// Parse one stream line.
///
/// Blank lines (keep-alives between records) yield `Ok(None)`.
pub fn parse_status_line(line: &str) -> Result<Option<StatusUpdate>, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}

/// Re-frame a chunked byte stream into newline-delimited text lines.
pub(crate) fn split_lines<S>(chunks: S) -> impl Stream<Item = Result<String, Error>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    async_stream::try_stream! {
        let mut buffer: Vec<u8> = Vec::new();
        futures_util::pin_mut!(chunks);

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            buffer.extend_from_slice(&chunk);

            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                yield String::from_utf8_lossy(&line).trim_end().to_owned();
            }
        }

        if !buffer.is_empty() {
            yield String::from_utf8_lossy(&buffer).trim_end().to_owned();
        }
    }
}
