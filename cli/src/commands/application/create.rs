//! `ai-services application create <name> --template-name <kind>`

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::app::AppContext;
use crate::application::services::reconciler::{CreateOutcome, ReconcileSettings};
use crate::output::TerminalReporter;

/// Exit code for an operation interrupted by Ctrl-C.
pub const EXIT_CANCELLED: u8 = 130;

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Application name (lowercase letters, digits and '-')
    pub name: String,

    /// Application template to deploy, e.g. RAG
    #[arg(short = 't', long = "template-name")]
    pub template_name: String,

    /// Return once every pod is submitted, without waiting for readiness
    #[arg(long)]
    pub no_wait: bool,

    /// Readiness timeout in seconds (defaults to `readiness.timeout_secs`)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Run the create command.
///
/// # Errors
///
/// Returns `ApplicationError` for validation failures, an existing or busy
/// application, template problems, and partial creation.
pub async fn run(app: &AppContext, args: &CreateArgs, cancel: &CancellationToken) -> Result<ExitCode> {
    let mut settings = ReconcileSettings::from_config(&app.config);
    settings.wait = !args.no_wait;
    if let Some(secs) = args.timeout {
        settings.ready_timeout = std::time::Duration::from_secs(secs);
    }

    app.output.info(&format!(
        "Creating application '{}' from template '{}'",
        args.name, args.template_name
    ));
    let reporter = TerminalReporter::new(&app.output);
    let outcome = app
        .reconciler(&reporter, settings)
        .create(&args.name, &args.template_name, cancel)
        .await?;
    drop(reporter);

    app.renderer().render_create(&args.name, &outcome)?;
    Ok(match outcome {
        CreateOutcome::Cancelled { .. } => ExitCode::from(EXIT_CANCELLED),
        CreateOutcome::Ready { .. }
        | CreateOutcome::TimedOut { .. }
        | CreateOutcome::Submitted { .. } => ExitCode::SUCCESS,
    })
}
