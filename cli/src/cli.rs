//! CLI argument parsing with clap derive

use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags, OutputMode};
use crate::commands;
use crate::output::OutputContext;

/// How long a command may keep running after Ctrl-C before it is abandoned.
pub const INTERRUPT_GRACE: Duration = Duration::from_secs(2);

/// Deploy and monitor AI application pods
#[derive(Parser)]
#[command(
    name = "ai-services",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Increase diagnostic logging on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Read application templates from this directory instead of the built-in set
    #[arg(long, global = true, value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deploy and monitor applications
    #[command(subcommand, visible_alias = "app")]
    Application(commands::application::ApplicationCommand),

    /// List images known to the container runtime
    Images,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self, cancel: &CancellationToken) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            templates_dir,
            command,
        } = self;

        // Version needs no configuration; a broken config file must not hide it.
        if let Command::Version = command {
            let mode = if json { OutputMode::Json } else { OutputMode::Human };
            commands::version::run(&OutputContext::new(no_color, quiet), mode)?;
            return Ok(ExitCode::SUCCESS);
        }

        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags {
                yes: false,
                templates_dir,
            },
        })?;

        match command {
            Command::Application(cmd) => commands::application::run(&app, cmd, cancel).await,
            Command::Images => commands::images::run(&app, cancel).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => {
                commands::version::run(&app.output, app.mode)?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Drive `work` until it completes, or until `grace` has passed since
/// `cancel` fired.
///
/// Returns `None` when the work was abandoned. Dropping it drops any runtime
/// call in flight, and the runner kills the child process.
pub async fn until_interrupted<F: Future>(
    work: F,
    cancel: &CancellationToken,
    grace: Duration,
) -> Option<F::Output> {
    tokio::pin!(work);
    tokio::select! {
        out = &mut work => return Some(out),
        () = cancel.cancelled() => {}
    }
    tracing::debug!(grace_ms = u64::try_from(grace.as_millis()).unwrap_or(u64::MAX), "waiting for command to wind down");
    tokio::time::timeout(grace, work).await.ok()
}
