// Composite operations on ProPresenterClient.
//
// Calls that need more than one round trip, or that return something other
// than JSON, are implemented here as inherent methods.

use std::collections::HashMap;

use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::action::{Action, MessageToken};
use crate::client::{Payload, ProPresenterClient};
use crate::endpoint::Endpoint;
use crate::error::Error;

impl ProPresenterClient {
    /// Fetch version information.
    ///
    /// `GET /version` -- an empty answer is an error, since every running
    /// ProPresenter instance reports its version.
    pub async fn version(&self) -> Result<Value, Error> {
        self.fetch_required(&Endpoint::Version).await
    }

    /// Trigger a slide of a specific presentation.
    ///
    /// Focuses the presentation first, then triggers the slide on the
    /// focused presentation.
    pub async fn trigger_slide(&self, presentation_uuid: &str, index: u32) -> Result<(), Error> {
        self.execute(&Action::FocusPresentation(presentation_uuid.to_owned()))
            .await?;
        self.execute(&Action::TriggerFocusedSlide(index)).await
    }

    /// Slide thumbnail as JPEG bytes.
    ///
    /// `GET /v1/presentation/{uuid}/thumbnail/{index}?quality={quality}`
    pub async fn presentation_thumbnail(
        &self,
        presentation_uuid: &str,
        index: u32,
        quality: u32,
    ) -> Result<Option<Bytes>, Error> {
        let path =
            format!("/v1/presentation/{presentation_uuid}/thumbnail/{index}?quality={quality}");
        self.bytes(&path).await
    }

    /// Media item thumbnail as JPEG bytes.
    ///
    /// `GET /v1/media/{uuid}/thumbnail?quality={quality}`
    pub async fn media_thumbnail(&self, media_uuid: &str, quality: u32) -> Result<Option<Bytes>, Error> {
        let path = format!("/v1/media/{media_uuid}/thumbnail?quality={quality}");
        self.bytes(&path).await
    }

    async fn bytes(&self, path: &str) -> Result<Option<Bytes>, Error> {
        match self.request(Method::GET, path, None).await? {
            Some(Payload::Bytes(bytes)) => Ok(Some(bytes)),
            Some(Payload::Json(_)) => {
                debug!(path, "expected image data, got JSON");
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

/// Build the token list for a message trigger from its stored detail.
///
/// Tokens named in `overrides` take the given text; every other token keeps
/// the text stored in ProPresenter.
pub fn message_tokens(detail: &Value, overrides: &HashMap<String, String>) -> Vec<MessageToken> {
    let Some(tokens) = detail.get("tokens").and_then(Value::as_array) else {
        return Vec::new();
    };

    tokens
        .iter()
        .filter_map(|token| {
            let name = token.get("name").and_then(Value::as_str)?;
            let text = overrides.get(name).cloned().unwrap_or_else(|| {
                token
                    .get("text")
                    .and_then(|t| t.get("text"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned()
            });
            Some(MessageToken::new(name, text))
        })
        .collect()
}
