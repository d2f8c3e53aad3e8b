//! Version command

use anyhow::Result;

use crate::app::OutputMode;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Run the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(ctx: &OutputContext, mode: OutputMode) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let renderer = match mode {
        OutputMode::Human => Renderer::Human(HumanRenderer::new(ctx)),
        OutputMode::Json => Renderer::Json(JsonRenderer),
    };
    renderer.render_version(version)
}
