//! Pod records as reported by the container runtime.
//!
//! Pure types only. The runtime owns these records; the CLI reads them
//! through the `PodRuntime` port and never persists them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::application::APP_LABEL;

/// Conjunction of label key to allowed values. Values within one key are
/// alternatives; every key must match.
pub type LabelFilters = BTreeMap<String, Vec<String>>;

/// Lifecycle phase of a pod, normalised across runtimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PodPhase {
    Pending,
    Running,
    Ready,
    Failed,
    Terminating,
    Unknown,
}

impl std::fmt::Display for PodPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Ready => "Ready",
            Self::Failed => "Failed",
            Self::Terminating => "Terminating",
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// A single pod as listed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodRecord {
    pub id: String,
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub phase: PodPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl PodRecord {
    /// The owning application, read from the `app` label.
    #[must_use]
    pub fn app_name(&self) -> Option<&str> {
        self.labels.get(APP_LABEL).map(String::as_str)
    }

    /// Returns `true` if the pod's labels satisfy every filter key.
    #[must_use]
    pub fn matches(&self, filters: &LabelFilters) -> bool {
        filters.iter().all(|(key, allowed)| {
            self.labels
                .get(key)
                .is_some_and(|value| allowed.iter().any(|a| a == value))
        })
    }
}

/// Filter selecting the pods of one application.
#[must_use]
pub fn app_filter(name: &str) -> LabelFilters {
    BTreeMap::from([(APP_LABEL.to_string(), vec![name.to_string()])])
}

/// Number of pods in the `Ready` phase.
#[must_use]
pub fn count_ready(pods: &[PodRecord]) -> usize {
    pods.iter().filter(|p| p.phase == PodPhase::Ready).count()
}
