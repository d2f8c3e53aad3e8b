//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Runtime errors ────────────────────────────────────────────────────────────

/// Failures reported by a container runtime adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuntimeError {
    /// Transport failure, spawn failure, or per-call timeout. Retryable.
    #[error("container runtime unavailable: {0}")]
    Unavailable(String),

    /// The runtime refused the manifest. Not retryable.
    #[error("manifest rejected by runtime: {0}")]
    ManifestRejected(String),

    /// The pod no longer exists. Callers deleting pods treat this as success.
    #[error("pod '{0}' not found")]
    PodNotFound(String),

    /// A pod with the manifest's name already exists. Not retryable.
    #[error("pod already exists: {0}")]
    AlreadyExists(String),
}

impl RuntimeError {
    /// Returns `true` when the call may succeed if repeated.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

// ── Catalog errors ────────────────────────────────────────────────────────────

/// Errors raised while enumerating or loading application templates.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("template catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown application template '{kind}'. Available templates: {available}")]
    UnknownKind { kind: String, available: String },

    #[error("failed to parse template {file}: {cause}")]
    TemplateParse { file: String, cause: String },
}

/// A template could not be rendered into a manifest.
#[derive(Debug, Error)]
#[error("failed to render template '{template_id}': {cause}")]
pub struct RenderError {
    pub template_id: String,
    pub cause: String,
}

// ── Application errors ────────────────────────────────────────────────────────

/// One pod that could not be removed during a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodFailure {
    pub pod_id: String,
    pub cause: RuntimeError,
}

/// Errors surfaced by the application lifecycle operations.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Invalid application name '{0}': must match ^[a-z0-9][a-z0-9-]*$")]
    InvalidName(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(
        "Partially created application '{name}': {submitted} of {total} manifests submitted before '{template}' failed: {cause}\n\nRemove the submitted pods with: ai-services application delete {name}"
    )]
    PartialCreate {
        name: String,
        submitted: usize,
        total: usize,
        template: String,
        cause: RuntimeError,
    },

    #[error("Application '{0}' not found.")]
    NotFound(String),

    #[error("Application '{name}' already exists ({pods} pods). Delete it first: ai-services application delete {name}")]
    AlreadyExists { name: String, pods: usize },

    #[error("Another create or delete for application '{0}' is in progress.")]
    OperationInProgress(String),

    /// Ctrl-C stopped a create or delete part way. Nothing is rolled back.
    #[error(
        "Interrupted after {done} of {total} {step} for application '{name}'. Nothing was rolled back; inspect it with: ai-services application ps {name}"
    )]
    Interrupted {
        name: String,
        step: &'static str,
        done: usize,
        total: usize,
    },

    #[error("Partially deleted application: {deleted} pods removed, {} failed:\n{}", .failed.len(), format_failures(.failed))]
    PartialDelete {
        deleted: usize,
        failed: Vec<PodFailure>,
    },
}

impl ApplicationError {
    /// Stable machine-readable code used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "INVALID_NAME",
            Self::Catalog(CatalogError::Unavailable(_)) => "CATALOG_UNAVAILABLE",
            Self::Catalog(CatalogError::UnknownKind { .. }) => "UNKNOWN_APPLICATION_KIND",
            Self::Catalog(CatalogError::TemplateParse { .. }) => "TEMPLATE_PARSE_ERROR",
            Self::Render(_) => "RENDER_ERROR",
            Self::Runtime(RuntimeError::Unavailable(_)) => "RUNTIME_UNAVAILABLE",
            Self::Runtime(RuntimeError::ManifestRejected(_)) => "MANIFEST_REJECTED",
            Self::Runtime(RuntimeError::PodNotFound(_)) => "POD_NOT_FOUND",
            Self::Runtime(RuntimeError::AlreadyExists(_)) => "POD_EXISTS",
            Self::PartialCreate { .. } => "PARTIAL_CREATE",
            Self::NotFound(_) => "APPLICATION_NOT_FOUND",
            Self::AlreadyExists { .. } => "APPLICATION_EXISTS",
            Self::OperationInProgress(_) => "OPERATION_IN_PROGRESS",
            Self::Interrupted { .. } => "INTERRUPTED",
            Self::PartialDelete { .. } => "PARTIAL_DELETE",
        }
    }
}

fn format_failures(failed: &[PodFailure]) -> String {
    failed
        .iter()
        .map(|f| format!("  {}: {}", f.pod_id, f.cause))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}
