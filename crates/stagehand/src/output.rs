//! Output formatting: human summary or JSON.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;

use stagehand_core::{LiveSnapshot, StaticSnapshot};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

fn label(text: &str, color: bool) -> String {
    if color {
        text.cyan().bold().to_string()
    } else {
        text.to_owned()
    }
}

// ── Renderers ────────────────────────────────────────────────────────

/// Serialize `data` as JSON in the chosen shape.
pub fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(rendered)
}

#[derive(Serialize)]
struct StatusReport<'a> {
    #[serde(rename = "static")]
    static_snapshot: &'a StaticSnapshot,
    live: &'a LiveSnapshot,
}

/// Render both snapshots.
pub fn render_status(
    format: OutputFormat,
    color: bool,
    static_snapshot: &StaticSnapshot,
    live: &LiveSnapshot,
) -> Result<String, CliError> {
    let report = StatusReport {
        static_snapshot,
        live,
    };
    match format {
        OutputFormat::Json => render_json(&report, false),
        OutputFormat::JsonCompact => render_json(&report, true),
        OutputFormat::Pretty => Ok(status_summary(color, static_snapshot, live)),
    }
}

fn status_summary(color: bool, static_snapshot: &StaticSnapshot, live: &LiveSnapshot) -> String {
    let presentation = live
        .active_presentation
        .get("presentation")
        .and_then(|p| p.get("id"))
        .and_then(|id| id.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("-");
    let look = live
        .current_look
        .get("id")
        .and_then(|id| id.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("-");
    let on_off = |on: bool| if on { "on" } else { "off" };

    let rows = [
        ("Version", static_snapshot.firmware_version()),
        (
            "Host",
            static_snapshot.host_description().unwrap_or("-").to_owned(),
        ),
        ("Presentation", presentation.to_owned()),
        ("Look", look.to_owned()),
        ("Audience screens", on_off(live.audience_screens_status).to_owned()),
        ("Stage screens", on_off(live.stage_screens_status).to_owned()),
        ("Stage message", live.stage_message.clone()),
        ("Messages", live.messages.len().to_string()),
        ("Looks", live.looks.len().to_string()),
        ("Macros", static_snapshot.macros.len().to_string()),
        ("Timers", static_snapshot.timers.len().to_string()),
        (
            "Playlists",
            static_snapshot.presentation_playlist_details.len().to_string(),
        ),
    ];

    rows.iter()
        .map(|(name, value)| format!("{:<18} {value}", label(name, color)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per changed field of a live update.
pub fn render_update(
    format: OutputFormat,
    color: bool,
    field: &str,
    value: &Value,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Pretty => Ok(format!("{} {value}", label(field, color))),
        OutputFormat::Json | OutputFormat::JsonCompact => {
            render_json(&serde_json::json!({ "field": field, "value": value }), true)
        }
    }
}

/// Print the rendered output to stdout.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}
