//! ai-services CLI - Deploy and monitor AI application pods

use std::process::ExitCode;

use ai_services::cli::{Cli, INTERRUPT_GRACE, until_interrupted};
use ai_services::commands::application::create::EXIT_CANCELLED;
use ai_services::domain::{ApplicationError, ConfigError};
use ai_services::infra::logging;
use ai_services::output::json;
use clap::Parser;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let json_errors = cli.json;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    match until_interrupted(cli.run(&cancel), &cancel, INTERRUPT_GRACE).await {
        Some(Ok(code)) => code,
        Some(Err(e)) => {
            report_error(&e, json_errors);
            if cancel.is_cancelled() {
                ExitCode::from(EXIT_CANCELLED)
            } else {
                ExitCode::FAILURE
            }
        }
        None => {
            tracing::warn!("command did not stop within the grace period, abandoning it");
            report_interrupted(json_errors);
            ExitCode::from(EXIT_CANCELLED)
        }
    }
}

fn report_error(e: &anyhow::Error, json_errors: bool) {
    if json_errors {
        let code = match (e.downcast_ref::<ApplicationError>(), e.downcast_ref::<ConfigError>()) {
            (Some(app_err), _) => app_err.code(),
            (None, Some(_)) => "INVALID_CONFIG",
            (None, None) => "ERROR",
        };
        match json::format_error(&format!("{e:#}"), code) {
            Ok(text) => println!("{text}"),
            Err(_) => eprintln!("Error: {e:#}"),
        }
    } else {
        eprintln!("Error: {e:#}");
    }
}

fn report_interrupted(json_errors: bool) {
    let message = "Interrupted. Pods already submitted are left running; check with: ai-services application ps";
    match json_errors.then(|| json::format_error(message, "INTERRUPTED")) {
        Some(Ok(text)) => println!("{text}"),
        _ => eprintln!("Error: {message}"),
    }
}
