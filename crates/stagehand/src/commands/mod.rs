//! Command handlers, one module per command group.

pub mod control;
pub mod status;
pub mod watch;

use stagehand_core::Bridge;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a command that needs a bridge to its handler.
pub async fn dispatch(cmd: Command, bridge: &Bridge, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(bridge, global).await,
        Command::Watch(args) => watch::handle(&args, bridge, global).await,
        Command::Look(args) => control::look(&args, bridge).await,
        Command::Message(args) => control::message(&args, bridge).await,
        Command::MessageClear(args) => control::message_clear(&args, bridge).await,
        Command::Timer(args) => control::timer(&args, bridge).await,
        Command::Next => control::next(bridge).await,
        Command::Previous => control::previous(bridge).await,
        Command::RefreshCache => control::refresh_cache(bridge).await,
        Command::Completions(_) => Ok(()),
    }
}
