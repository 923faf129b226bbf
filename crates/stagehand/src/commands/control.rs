//! One-shot action commands: looks, messages, timers, slides, cache.

use std::collections::HashMap;

use stagehand_core::{Bridge, RefreshStatus};

use crate::cli::{LookArgs, MessageArgs, MessageClearArgs, TimerArgs};
use crate::error::CliError;

fn not_found(resource_type: &str, identifier: &str) -> CliError {
    CliError::NotFound {
        resource_type: resource_type.into(),
        identifier: identifier.into(),
    }
}

pub async fn look(args: &LookArgs, bridge: &Bridge) -> Result<(), CliError> {
    bridge.live().refresh().await;
    if !bridge.controls().select_look(&args.name).await? {
        return Err(not_found("look", &args.name));
    }
    eprintln!("Selected look '{}'", args.name);
    Ok(())
}

pub async fn message(args: &MessageArgs, bridge: &Bridge) -> Result<(), CliError> {
    bridge.live().refresh().await;
    let overrides: HashMap<String, String> = args.tokens.iter().cloned().collect();
    if !bridge
        .controls()
        .show_message(&args.message, &overrides)
        .await?
    {
        return Err(not_found("message", &args.message));
    }
    eprintln!("Showing message '{}'", args.message);
    Ok(())
}

pub async fn message_clear(args: &MessageClearArgs, bridge: &Bridge) -> Result<(), CliError> {
    bridge.live().refresh().await;
    if !bridge.controls().clear_message(&args.message).await? {
        return Err(not_found("message", &args.message));
    }
    eprintln!("Cleared message '{}'", args.message);
    Ok(())
}

pub async fn timer(args: &TimerArgs, bridge: &Bridge) -> Result<(), CliError> {
    bridge.static_sync().refresh().await?;
    if !bridge
        .controls()
        .timer(&args.timer, args.operation.into())
        .await?
    {
        return Err(not_found("timer", &args.timer));
    }
    Ok(())
}

pub async fn next(bridge: &Bridge) -> Result<(), CliError> {
    Ok(bridge.controls().next_slide().await?)
}

pub async fn previous(bridge: &Bridge) -> Result<(), CliError> {
    Ok(bridge.controls().previous_slide().await?)
}

pub async fn refresh_cache(bridge: &Bridge) -> Result<(), CliError> {
    bridge.controls().refresh_presentation_cache().await;
    match bridge.static_sync().status() {
        RefreshStatus::Failed { reason } => Err(CliError::Unavailable { reason }),
        RefreshStatus::Pending | RefreshStatus::Ready { .. } => {
            let snapshot = bridge.static_snapshot();
            eprintln!(
                "Playlist cache refreshed: {} presentation, {} audio, {} media playlists",
                snapshot.presentation_playlist_details.len(),
                snapshot.audio_playlist_details.len(),
                snapshot.media_playlist_details.len(),
            );
            Ok(())
        }
    }
}
