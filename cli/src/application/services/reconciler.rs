//! Application reconciler: create and delete of labelled pod sets.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//!
//! Create runs `Requested → ValidatingTemplate → Rendering → Submitting(i/N)
//! → AwaitingReady` and ends `Ready`, `TimedOut`, `Cancelled`, or failed.
//! Every manifest is rendered before the first submission, so a render
//! failure never leaves pods behind. A failed submission is reported as
//! `PartialCreate` and the pods already submitted are left running.
//!
//! Cancellation is honoured between runtime calls and during backoff and
//! readiness sleeps. A call already in flight is allowed to finish so the
//! reported counts stay exact.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use rand::Rng as _;
use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{ContentProvider, PodRuntime, ProgressReporter};
use crate::application::services::catalog::TemplateCatalog;
use crate::application::services::locks::NameLocks;
use crate::application::services::renderer::{RenderParams, Renderer};
use crate::application::services::retry::with_retry;
use crate::domain::{
    AppConfig, ApplicationError, PodFailure, RenderedManifest, RetryConfig, RuntimeError,
    app_filter, count_ready, validate_app_name,
};

/// Fraction of the poll interval added as random jitter, in percent.
const POLL_JITTER_PERCENT: u64 = 20;

/// Timing knobs for create and delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileSettings {
    pub ready_timeout: Duration,
    pub poll_interval: Duration,
    pub retry: RetryConfig,
    /// When `false`, create returns as soon as every manifest is submitted.
    pub wait: bool,
}

impl ReconcileSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            ready_timeout: config.readiness.timeout(),
            poll_interval: config.readiness.poll_interval(),
            retry: config.retry.clone(),
            wait: true,
        }
    }
}

/// Terminal state of a create that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CreateOutcome {
    /// Every pod reported ready.
    Ready { pods: usize },
    /// Readiness was not observed in time. The pods may still converge.
    TimedOut { ready: usize, total: usize },
    /// The readiness wait was interrupted. Submitted pods are left running.
    Cancelled { ready: usize, total: usize },
    /// All manifests were submitted and readiness was not awaited.
    Submitted { pods: usize },
}

/// Drives application instances through create and delete against the runtime.
pub struct Reconciler<'a, R, C, P> {
    runtime: &'a R,
    catalog: &'a TemplateCatalog<C>,
    renderer: &'a Renderer,
    locks: &'a NameLocks,
    reporter: &'a P,
    settings: ReconcileSettings,
}

impl<'a, R, C, P> Reconciler<'a, R, C, P>
where
    R: PodRuntime,
    C: ContentProvider,
    P: ProgressReporter,
{
    pub fn new(
        runtime: &'a R,
        catalog: &'a TemplateCatalog<C>,
        renderer: &'a Renderer,
        locks: &'a NameLocks,
        reporter: &'a P,
        settings: ReconcileSettings,
    ) -> Self {
        Self {
            runtime,
            catalog,
            renderer,
            locks,
            reporter,
            settings,
        }
    }

    /// Create application `name` from the templates of `kind`.
    ///
    /// # Errors
    ///
    /// - `InvalidName` before any catalog or runtime call.
    /// - `OperationInProgress` if another create/delete holds the name.
    /// - `AlreadyExists` if pods labelled with the name already exist.
    /// - `UnknownApplicationKind`, `TemplateParseError`, `RenderError` before
    ///   any runtime mutation.
    /// - `PartialCreate` if a submission fails irrecoverably.
    /// - `Interrupted` if `cancel` fires before every manifest is submitted.
    pub async fn create(
        &self,
        name: &str,
        kind: &str,
        cancel: &CancellationToken,
    ) -> Result<CreateOutcome, ApplicationError> {
        validate_app_name(name)?;
        let _guard = self.locks.try_acquire(name)?;

        let filter = app_filter(name);
        let existing = with_retry(&self.settings.retry, "list pods", cancel, || {
            self.runtime.list_pods(&filter)
        })
        .await?;
        if !existing.is_empty() {
            return Err(ApplicationError::AlreadyExists {
                name: name.to_string(),
                pods: existing.len(),
            });
        }

        let manifests = self.render_all(name, kind)?;
        let total_pods: usize = manifests.iter().map(|m| m.pods).sum();

        self.submit_all(name, &manifests, cancel).await?;
        self.reporter.success(&format!(
            "submitted {} manifests for application '{name}'",
            manifests.len()
        ));

        if !self.settings.wait {
            return Ok(CreateOutcome::Submitted { pods: total_pods });
        }
        let outcome = self.await_ready(name, total_pods, cancel).await;
        tracing::info!(app = name, ?outcome, "create finished");
        Ok(outcome)
    }

    /// Delete every pod labelled `app=<name>`.
    ///
    /// Returns the number of pods removed. Pods that vanish mid-delete count
    /// as removed.
    ///
    /// # Errors
    ///
    /// - `InvalidName`, `OperationInProgress` as for create.
    /// - `NotFound` if no pod carries the label.
    /// - `PartialDelete` listing every pod that could not be removed.
    /// - `Interrupted` if `cancel` fires before every pod was attempted.
    pub async fn delete(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<usize, ApplicationError> {
        validate_app_name(name)?;
        let _guard = self.locks.try_acquire(name)?;

        let filter = app_filter(name);
        let pods = with_retry(&self.settings.retry, "list pods", cancel, || {
            self.runtime.list_pods(&filter)
        })
        .await?;
        if pods.is_empty() {
            return Err(ApplicationError::NotFound(name.to_string()));
        }

        let mut deleted = 0;
        let mut failed = Vec::new();
        for pod in &pods {
            if cancel.is_cancelled() {
                tracing::warn!(app = name, deleted, total = pods.len(), "delete interrupted");
                return Err(ApplicationError::Interrupted {
                    name: name.to_string(),
                    step: "pods removed",
                    done: deleted,
                    total: pods.len(),
                });
            }
            self.reporter.step(&format!("removing pod {}...", pod.name));
            let result = with_retry(&self.settings.retry, "delete pod", cancel, || {
                self.runtime.delete_pod(&pod.id, true)
            })
            .await;
            match result {
                Ok(()) | Err(RuntimeError::PodNotFound(_)) => {
                    tracing::info!(app = name, pod = %pod.id, "pod removed");
                    deleted += 1;
                }
                Err(cause) => {
                    tracing::warn!(app = name, pod = %pod.id, error = %cause, "pod removal failed");
                    self.reporter
                        .warn(&format!("failed to remove pod {}: {cause}", pod.name));
                    failed.push(PodFailure {
                        pod_id: pod.id.clone(),
                        cause,
                    });
                }
            }
        }

        if failed.is_empty() {
            Ok(deleted)
        } else {
            Err(ApplicationError::PartialDelete { deleted, failed })
        }
    }

    fn render_all(&self, name: &str, kind: &str) -> Result<Vec<RenderedManifest>, ApplicationError> {
        let templates = self.catalog.load_templates(kind)?;
        let params = RenderParams {
            app_name: name,
            app_kind: kind,
        };
        let manifests = templates
            .iter()
            .map(|t| self.renderer.render(t, &params))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(app = name, kind, count = manifests.len(), "rendered manifests");
        Ok(manifests)
    }

    async fn submit_all(
        &self,
        name: &str,
        manifests: &[RenderedManifest],
        cancel: &CancellationToken,
    ) -> Result<(), ApplicationError> {
        let total = manifests.len();
        for (i, manifest) in manifests.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(self.interrupted_submission(name, i, total));
            }
            self.reporter.step(&format!(
                "creating {} ({}/{total})...",
                manifest.template_id,
                i + 1
            ));
            tracing::info!(app = name, template = %manifest.template_id, index = i + 1, total, "submitting manifest");
            let attempts = AtomicU32::new(0);
            let submitted = with_retry(&self.settings.retry, "create pod", cancel, || {
                let is_retry = attempts.fetch_add(1, Ordering::Relaxed) > 0;
                async move {
                    match self.runtime.create_pod(&manifest.body).await {
                        // A timed-out earlier attempt may still have created the pod.
                        Err(RuntimeError::AlreadyExists(pod)) if is_retry => {
                            tracing::info!(app = name, pod = %pod, "pod created by an earlier attempt");
                            Ok(())
                        }
                        other => other,
                    }
                }
            })
            .await;
            if let Err(cause) = submitted {
                if cause.is_retryable() && cancel.is_cancelled() {
                    return Err(self.interrupted_submission(name, i, total));
                }
                tracing::error!(app = name, template = %manifest.template_id, error = %cause, "submission failed");
                return Err(ApplicationError::PartialCreate {
                    name: name.to_string(),
                    submitted: i,
                    total,
                    template: manifest.template_id.clone(),
                    cause,
                });
            }
        }
        Ok(())
    }

    fn interrupted_submission(&self, name: &str, submitted: usize, total: usize) -> ApplicationError {
        tracing::warn!(app = name, submitted, total, "create interrupted during submission");
        self.reporter
            .warn(&format!("interrupted; {submitted} of {total} manifests submitted and left running"));
        ApplicationError::Interrupted {
            name: name.to_string(),
            step: "manifests submitted",
            done: submitted,
            total,
        }
    }

    async fn await_ready(&self, name: &str, total: usize, cancel: &CancellationToken) -> CreateOutcome {
        let deadline = Instant::now() + self.settings.ready_timeout;
        let filter = app_filter(name);
        let mut last_ready: Option<usize> = None;

        self.reporter
            .step(&format!("waiting for {total} pods to become ready..."));
        loop {
            let ready = if cancel.is_cancelled() {
                last_ready.unwrap_or(0)
            } else {
                match self.runtime.list_pods(&filter).await {
                    Ok(pods) => count_ready(&pods),
                    Err(err) => {
                        tracing::warn!(app = name, error = %err, "readiness poll failed");
                        last_ready.unwrap_or(0)
                    }
                }
            };
            if last_ready != Some(ready) {
                self.reporter.progress(&format!("{ready}/{total} pods ready"));
                last_ready = Some(ready);
            }

            if ready >= total {
                self.reporter
                    .success(&format!("application '{name}' is ready ({total} pods)"));
                return CreateOutcome::Ready { pods: total };
            }
            if cancel.is_cancelled() {
                self.reporter.warn("readiness wait cancelled; pods left running");
                return CreateOutcome::Cancelled { ready, total };
            }
            let now = Instant::now();
            if now >= deadline {
                self.reporter.warn(&format!(
                    "only {ready}/{total} pods ready after {}s; check again with: ai-services application ps {name}",
                    self.settings.ready_timeout.as_secs()
                ));
                return CreateOutcome::TimedOut { ready, total };
            }

            let pause = jittered(self.settings.poll_interval).min(deadline - now);
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    self.reporter.warn("readiness wait cancelled; pods left running");
                    return CreateOutcome::Cancelled { ready, total };
                }
                () = tokio::time::sleep(pause) => {}
            }
        }
    }
}

fn jittered(interval: Duration) -> Duration {
    let max_jitter = u64::try_from(interval.as_millis())
        .unwrap_or(u64::MAX)
        .saturating_mul(POLL_JITTER_PERCENT)
        / 100;
    interval + Duration::from_millis(rand::thread_rng().gen_range(0..=max_jitter))
}
