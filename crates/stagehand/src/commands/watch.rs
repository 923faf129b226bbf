//! `stagehand watch`: connect, then print every live change until Ctrl-C.

use serde_json::Value;
use stagehand_core::{Bridge, StreamState, Topic};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: &WatchArgs, bridge: &Bridge, global: &GlobalOpts) -> Result<(), CliError> {
    let fields = selected_fields(&args.topic)?;
    let color = output::should_color(global.color);

    let mut updates = bridge.subscribe_live();
    let mut state = bridge.live().watch_state();
    bridge.connect().await?;

    let mut previous = serde_json::to_value(updates.latest().as_ref())?;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = state.borrow_and_update().clone();
                eprintln!("{}", describe_state(&current));
            }
            snapshot = updates.changed() => {
                let Some(snapshot) = snapshot else { break };
                let next = serde_json::to_value(snapshot.as_ref())?;
                for (field, value) in changed_fields(&previous, &next) {
                    if fields.is_empty() || fields.iter().any(|f| *f == field) {
                        let line = output::render_update(global.output, color, &field, value)?;
                        output::print_output(&line);
                    }
                }
                previous = next;
            }
        }
    }

    bridge.shutdown().await;
    Ok(())
}

/// Map `--topic` paths to snapshot field names.
fn selected_fields(topics: &[String]) -> Result<Vec<&'static str>, CliError> {
    topics
        .iter()
        .map(|path| {
            Topic::from_path(path)
                .map(Topic::field)
                .ok_or_else(|| CliError::Validation {
                    field: "topic".into(),
                    reason: format!("unknown topic '{path}'"),
                })
        })
        .collect()
}

/// Top-level keys whose values differ between two serialized snapshots.
fn changed_fields<'a>(previous: &Value, next: &'a Value) -> Vec<(String, &'a Value)> {
    let Some(next) = next.as_object() else {
        return Vec::new();
    };
    next.iter()
        .filter(|(key, value)| previous.get(key.as_str()) != Some(*value))
        .map(|(key, value)| (key.clone(), value))
        .collect()
}

fn describe_state(state: &StreamState) -> String {
    match state {
        StreamState::Idle => "stream idle".into(),
        StreamState::Connecting => "connecting...".into(),
        StreamState::Streaming => "streaming".into(),
        StreamState::Disconnected { attempt, retry_in } => format!(
            "disconnected (attempt {attempt}), retrying in {:.1}s",
            retry_in.as_secs_f64()
        ),
        StreamState::Cancelled => "stream closed".into(),
    }
}
