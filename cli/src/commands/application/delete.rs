//! `ai-services application delete <name>`

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::app::AppContext;
use crate::application::services::reconciler::ReconcileSettings;
use crate::domain::validate_app_name;
use crate::output::TerminalReporter;

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    /// Application name
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Run the delete command.
///
/// # Errors
///
/// Returns `ApplicationError` for an invalid, missing or busy application,
/// or `PartialDelete` when some pods could not be removed.
pub async fn run(
    app: &AppContext,
    args: &DeleteArgs,
    cancel: &CancellationToken,
) -> Result<ExitCode> {
    validate_app_name(&args.name)?;

    if !args.yes && !app.non_interactive {
        anyhow::ensure!(
            app.output.is_tty && !app.is_json(),
            "refusing to delete '{}' without confirmation; pass --yes",
            args.name
        );
        let prompt = format!("Delete application '{}' and all of its pods?", args.name);
        if !app.confirm(&prompt, false)? {
            app.output.info("Aborted.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let reporter = TerminalReporter::new(&app.output);
    let deleted = app
        .reconciler(&reporter, ReconcileSettings::from_config(&app.config))
        .delete(&args.name, cancel)
        .await?;
    drop(reporter);

    app.renderer().render_delete(&args.name, deleted)?;
    Ok(ExitCode::SUCCESS)
}
