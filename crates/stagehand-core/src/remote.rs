// ── Remote control seam ──
//
// The synchronizers talk to ProPresenter only through this trait, so they
// can be driven by the real HTTP client or by a scripted stand-in.

use std::future::Future;

use serde_json::Value;
use stagehand_api::{Action, Endpoint, Error as ApiError, ProPresenterClient, StatusLines};

/// The subset of the ProPresenter API the synchronizers depend on.
pub trait RemoteControl: Send + Sync + 'static {
    /// GET a read endpoint. `Ok(None)` means "no data" (404 or empty body).
    fn fetch(
        &self,
        endpoint: Endpoint,
    ) -> impl Future<Output = Result<Option<Value>, ApiError>> + Send;

    /// Perform a state-changing action.
    fn execute(&self, action: Action) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Open the status-update stream for `topics`.
    fn open_status_stream(
        &self,
        topics: Vec<&'static str>,
    ) -> impl Future<Output = Result<StatusLines, ApiError>> + Send;
}

impl RemoteControl for ProPresenterClient {
    async fn fetch(&self, endpoint: Endpoint) -> Result<Option<Value>, ApiError> {
        ProPresenterClient::fetch(self, &endpoint).await
    }

    async fn execute(&self, action: Action) -> Result<(), ApiError> {
        ProPresenterClient::execute(self, &action).await
    }

    async fn open_status_stream(&self, topics: Vec<&'static str>) -> Result<StatusLines, ApiError> {
        ProPresenterClient::open_status_stream(self, &topics).await
    }
}
