//! Application instances: names, labels, and views derived from pods.
//!
//! An application has no stored representation. Everything here is computed
//! from the pods that carry its `app` label.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::domain::error::ApplicationError;
use crate::domain::pod::{PodPhase, PodRecord};

/// Label linking a pod to its application. Exact-match, case-sensitive.
pub const APP_LABEL: &str = "app";

/// Label recording which application template produced a pod.
pub const KIND_LABEL: &str = "ai-services.io/template";

pub static APP_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern; cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("valid regex")
});

/// Returns `true` if `name` is a valid application name.
pub fn is_valid_app_name(name: &str) -> bool {
    APP_NAME_RE.is_match(name)
}

/// Validate an application name before any catalog or runtime call.
///
/// # Errors
///
/// Returns `ApplicationError::InvalidName` if the name does not match
/// `^[a-z0-9][a-z0-9-]*$`.
pub fn validate_app_name(name: &str) -> Result<(), ApplicationError> {
    if is_valid_app_name(name) {
        Ok(())
    } else {
        Err(ApplicationError::InvalidName(name.to_string()))
    }
}

/// Per-application aggregate shown by `ps`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppSummary {
    pub pod_count: usize,
    pub phases: BTreeMap<PodPhase, usize>,
}

impl AppSummary {
    fn add(&mut self, phase: PodPhase) {
        self.pod_count += 1;
        *self.phases.entry(phase).or_default() += 1;
    }
}

/// Group pods by their `app` label. Pods without the label are excluded.
#[must_use]
pub fn summarize(pods: &[PodRecord]) -> BTreeMap<String, AppSummary> {
    let mut apps: BTreeMap<String, AppSummary> = BTreeMap::new();
    for pod in pods {
        if let Some(name) = pod.app_name() {
            apps.entry(name.to_string()).or_default().add(pod.phase);
        }
    }
    apps
}

/// Detailed view of one application instance.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub name: String,
    /// Template kind recorded on the pods, if present.
    pub kind: Option<String>,
    /// Creation time of the oldest pod.
    pub created: Option<DateTime<Utc>>,
    pub summary: AppSummary,
    pub pods: Vec<PodRecord>,
}

impl ApplicationView {
    /// Build the view from the pods of one application, ordered by name.
    #[must_use]
    pub fn from_pods(name: &str, mut pods: Vec<PodRecord>) -> Self {
        pods.sort_by(|a, b| a.name.cmp(&b.name));
        let kind = pods.iter().find_map(|p| p.labels.get(KIND_LABEL).cloned());
        let created = pods.iter().filter_map(|p| p.created).min();
        let mut summary = AppSummary::default();
        for pod in &pods {
            summary.add(pod.phase);
        }
        Self {
            name: name.to_string(),
            kind,
            created,
            summary,
            pods,
        }
    }
}
