// ── Controls ──
//
// One-shot actions that resolve their target from a synchronizer snapshot
// before calling ProPresenter. A target that can't be resolved is logged
// and reported as `Ok(false)`; only transport failures are errors.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use stagehand_api::{Action, Endpoint, TimerOperation, message_tokens};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::error::CoreError;
use crate::remote::RemoteControl;
use crate::store::item_uuid;
use crate::sync::{LiveSynchronizer, StaticSynchronizer};

/// Snapshot-resolved actions for one ProPresenter instance.
pub struct Controls<R: RemoteControl> {
    remote: Arc<R>,
    live: LiveSynchronizer<R>,
    static_sync: StaticSynchronizer<R>,
    /// Serializes the read-resolve-trigger sequence of look selection.
    look_lock: Mutex<()>,
}

impl<R: RemoteControl> Controls<R> {
    pub fn new(
        remote: Arc<R>,
        live: LiveSynchronizer<R>,
        static_sync: StaticSynchronizer<R>,
    ) -> Self {
        Self {
            remote,
            live,
            static_sync,
            look_lock: Mutex::new(()),
        }
    }

    // ── Looks ────────────────────────────────────────────────────────

    /// Make the look named `name` the current look.
    ///
    /// Concurrent selections run one after another.
    pub async fn select_look(&self, name: &str) -> Result<bool, CoreError> {
        let _guard = self.look_lock.lock().await;

        let snapshot = self.live.snapshot();
        let Some(uuid) = snapshot.look_by_name(name).and_then(item_uuid) else {
            error!(look = name, "look not found");
            return Ok(false);
        };

        self.remote.execute(Action::TriggerLook(uuid.to_owned())).await?;
        info!(look = name, "look selected");
        Ok(true)
    }

    // ── Messages ─────────────────────────────────────────────────────

    /// Show a message by UUID or name, filling its tokens.
    ///
    /// Tokens named in `overrides` take the given text; the rest keep the
    /// text stored in ProPresenter.
    pub async fn show_message(
        &self,
        identifier: &str,
        overrides: &HashMap<String, String>,
    ) -> Result<bool, CoreError> {
        let Some(uuid) = self.message_uuid(identifier) else {
            return Ok(false);
        };

        let tokens = match self.remote.fetch(Endpoint::Message(uuid.clone())).await? {
            Some(detail) => message_tokens(&detail, overrides),
            None => {
                error!(message = identifier, "failed to retrieve message detail");
                Vec::new()
            }
        };

        debug!(message = identifier, tokens = tokens.len(), "triggering message");
        self.remote
            .execute(Action::TriggerMessage { id: uuid, tokens })
            .await?;
        Ok(true)
    }

    /// Hide a message by UUID or name.
    pub async fn clear_message(&self, identifier: &str) -> Result<bool, CoreError> {
        let Some(uuid) = self.message_uuid(identifier) else {
            return Ok(false);
        };
        self.remote.execute(Action::ClearMessage(uuid)).await?;
        Ok(true)
    }

    fn message_uuid(&self, identifier: &str) -> Option<String> {
        let snapshot = self.live.snapshot();
        let uuid = snapshot.message(identifier).and_then(item_uuid);
        if uuid.is_none() {
            error!(message = identifier, "message not found");
        }
        uuid.map(str::to_owned)
    }

    // ── Timers ───────────────────────────────────────────────────────

    /// Start, stop or reset a timer by UUID or name.
    pub async fn timer(
        &self,
        identifier: &str,
        operation: TimerOperation,
    ) -> Result<bool, CoreError> {
        let snapshot = self.static_sync.snapshot();
        let Some(uuid) = snapshot.timer(identifier).and_then(item_uuid) else {
            error!(timer = identifier, "timer not found");
            return Ok(false);
        };

        self.remote
            .execute(Action::Timer {
                id: uuid.to_owned(),
                operation,
            })
            .await?;
        Ok(true)
    }

    // ── Slides ───────────────────────────────────────────────────────

    pub async fn next_slide(&self) -> Result<(), CoreError> {
        Ok(self.remote.execute(Action::NextSlide).await?)
    }

    pub async fn previous_slide(&self) -> Result<(), CoreError> {
        Ok(self.remote.execute(Action::PreviousSlide).await?)
    }

    // ── Cache ────────────────────────────────────────────────────────

    /// Drop cached playlist details and refetch them now.
    pub async fn refresh_presentation_cache(&self) {
        self.static_sync.invalidate_playlist_cache();
        self.static_sync.request_refresh().await;
    }

    /// Run an arbitrary action.
    pub async fn execute(&self, action: Action) -> Result<(), CoreError> {
        Ok(self.remote.execute(action).await?)
    }

    /// Run a one-shot read.
    pub async fn fetch(&self, endpoint: Endpoint) -> Result<Option<Value>, CoreError> {
        Ok(self.remote.fetch(endpoint).await?)
    }
}
