//! `ai-services images`: list images known to the container runtime.

use std::process::ExitCode;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::app::AppContext;
use crate::application::ports::PodRuntime;
use crate::application::services::retry::with_retry;
use crate::domain::ApplicationError;

/// Run the images command.
///
/// # Errors
///
/// Returns `ApplicationError::Runtime` if the runtime cannot be reached.
pub async fn run(app: &AppContext, cancel: &CancellationToken) -> Result<ExitCode> {
    let images = with_retry(&app.config.retry, "list images", cancel, || {
        app.runtime.list_images()
    })
    .await
    .map_err(ApplicationError::from)?;
    app.renderer().render_images(&images)?;
    Ok(ExitCode::SUCCESS)
}
