// stagehand-api: Async Rust client for the ProPresenter Remote Control API

pub mod action;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod operations;
pub mod stream;
pub mod transport;

pub use action::{Action, CaptureOperation, ClearLayer, MessageToken, TimerOperation};
pub use client::{Payload, ProPresenterClient};
pub use endpoint::{Endpoint, TransportLayer};
pub use error::Error;
pub use operations::message_tokens;
pub use stream::{STATUS_UPDATES_PATH, StatusLines, StatusUpdate, parse_status_line};
pub use transport::{DEFAULT_PORT, TransportConfig};
