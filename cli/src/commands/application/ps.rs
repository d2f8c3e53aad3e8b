//! `ai-services application ps [name]`

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::query;

/// Arguments for the ps command.
#[derive(Args)]
pub struct PsArgs {
    /// Show the pods of this application only
    pub name: Option<String>,
}

/// Run the ps command.
///
/// # Errors
///
/// Returns `ApplicationError` if the runtime cannot be reached or the named
/// application does not exist.
pub async fn run(app: &AppContext, args: &PsArgs) -> Result<ExitCode> {
    match &args.name {
        Some(name) => {
            let view = query::get_application(&app.runtime, name).await?;
            app.renderer().render_application(&view)?;
        }
        None => {
            let apps = query::list_applications(&app.runtime).await?;
            app.renderer().render_applications(&apps)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
