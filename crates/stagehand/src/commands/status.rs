//! `stagehand status`: one refresh of both synchronizers, printed once.

use stagehand_core::Bridge;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(bridge: &Bridge, global: &GlobalOpts) -> Result<(), CliError> {
    let static_snapshot = bridge.static_sync().refresh().await?;
    let live = bridge.live().refresh().await;

    let rendered = output::render_status(
        global.output,
        output::should_color(global.color),
        &static_snapshot,
        &live,
    )?;
    output::print_output(&rendered);
    Ok(())
}
