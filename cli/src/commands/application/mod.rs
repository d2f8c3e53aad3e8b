//! `ai-services application`: deploy and monitor applications.

pub mod create;
pub mod delete;
pub mod ps;
pub mod templates;

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;
use tokio_util::sync::CancellationToken;

use crate::app::AppContext;

/// Application subcommands.
#[derive(Subcommand)]
pub enum ApplicationCommand {
    /// List application templates
    Templates,
    /// Deploy an application from a template
    Create(create::CreateArgs),
    /// Show applications and their pods
    Ps(ps::PsArgs),
    /// Delete an application and all of its pods
    Delete(delete::DeleteArgs),
}

/// Run an application subcommand.
///
/// # Errors
///
/// Propagates the subcommand's error.
pub async fn run(
    app: &AppContext,
    cmd: ApplicationCommand,
    cancel: &CancellationToken,
) -> Result<ExitCode> {
    match cmd {
        ApplicationCommand::Templates => templates::run(app),
        ApplicationCommand::Create(args) => create::run(app, &args, cancel).await,
        ApplicationCommand::Ps(args) => ps::run(app, &args).await,
        ApplicationCommand::Delete(args) => delete::run(app, &args, cancel).await,
    }
}
