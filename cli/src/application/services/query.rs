//! Query service: read-only views of applications, aggregated from pods.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::collections::BTreeMap;

use crate::application::ports::PodRuntime;
use crate::domain::{
    AppSummary, ApplicationError, ApplicationView, LabelFilters, app_filter, summarize,
    validate_app_name,
};

/// Every application with at least one labelled pod.
///
/// # Errors
///
/// Returns `ApplicationError::Runtime` if the runtime cannot list pods.
pub async fn list_applications(
    runtime: &impl PodRuntime,
) -> Result<BTreeMap<String, AppSummary>, ApplicationError> {
    let pods = runtime.list_pods(&LabelFilters::new()).await?;
    Ok(summarize(&pods))
}

/// Detailed view of application `name`.
///
/// # Errors
///
/// Returns `InvalidName` for a malformed name, `NotFound` if no pod carries
/// the label, or `Runtime` if the runtime cannot list pods.
pub async fn get_application(
    runtime: &impl PodRuntime,
    name: &str,
) -> Result<ApplicationView, ApplicationError> {
    validate_app_name(name)?;
    let pods = runtime.list_pods(&app_filter(name)).await?;
    if pods.is_empty() {
        return Err(ApplicationError::NotFound(name.to_string()));
    }
    Ok(ApplicationView::from_pods(name, pods))
}
