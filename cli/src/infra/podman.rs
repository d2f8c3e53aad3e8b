//! Infrastructure implementation of the `PodRuntime` port for podman.
//!
//! `PodmanRuntime<R>` routes every call through a `CommandRunner`:
//!
//! | operation     | podman invocation                                  |
//! |---------------|----------------------------------------------------|
//! | `create_pod`  | `podman kube play -` with the manifest on stdin    |
//! | `list_pods`   | `podman pod ps --format json [--filter label=k=v]` |
//! | `delete_pod`  | `podman pod rm [--force] <id>`                     |
//! | `list_images` | `podman images --format json`                      |

use std::collections::BTreeMap;
use std::process::Output;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::application::ports::{CommandRunner, PodRuntime};
use crate::domain::{LabelFilters, PodPhase, PodRecord, RuntimeError};
use crate::infra::command_runner::TokioCommandRunner;

/// Stderr fragments that mean podman itself could not be reached.
const UNAVAILABLE_MARKERS: &[&str] = &[
    "cannot connect to podman",
    "unable to connect to podman",
    "connection refused",
    "podman.sock",
    "i/o timeout",
    "timed out",
];

/// Podman adapter, generic over `R: CommandRunner` so that tests can inject
/// a mock runner without spawning real processes.
pub struct PodmanRuntime<R: CommandRunner> {
    runner: R,
    binary: String,
}

impl<R: CommandRunner> PodmanRuntime<R> {
    pub fn new(runner: R, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Output, RuntimeError> {
        self.runner
            .run(&self.binary, args)
            .await
            .map_err(|e| RuntimeError::Unavailable(format!("{e:#}")))
    }
}

impl PodmanRuntime<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn with_timeout(binary: &str, timeout: std::time::Duration) -> Self {
        Self::new(TokioCommandRunner::new(timeout), binary)
    }
}

impl<R: CommandRunner> PodRuntime for PodmanRuntime<R> {
    async fn create_pod(&self, manifest: &[u8]) -> Result<(), RuntimeError> {
        let output = self
            .runner
            .run_with_stdin(&self.binary, &["kube", "play", "-"], manifest)
            .await
            .map_err(|e| RuntimeError::Unavailable(format!("{e:#}")))?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = stderr_text(&output);
        if is_unavailable(&stderr) {
            Err(RuntimeError::Unavailable(stderr))
        } else if is_already_exists(&stderr) {
            Err(RuntimeError::AlreadyExists(stderr))
        } else {
            Err(RuntimeError::ManifestRejected(stderr))
        }
    }

    async fn list_pods(&self, filters: &LabelFilters) -> Result<Vec<PodRecord>, RuntimeError> {
        let label_args: Vec<String> = filters
            .iter()
            .filter_map(|(key, values)| match values.as_slice() {
                [value] => Some(format!("label={key}={value}")),
                _ => None,
            })
            .collect();
        let mut args = vec!["pod", "ps", "--format", "json"];
        for arg in &label_args {
            args.push("--filter");
            args.push(arg);
        }

        let output = self.run(&args).await?;
        if !output.status.success() {
            return Err(RuntimeError::Unavailable(stderr_text(&output)));
        }
        let pods = parse_pod_list(&output.stdout)?;
        // podman only narrows single-value keys; apply the full filter here.
        Ok(pods.into_iter().filter(|p| p.matches(filters)).collect())
    }

    async fn delete_pod(&self, id: &str, force: bool) -> Result<(), RuntimeError> {
        let mut args = vec!["pod", "rm"];
        if force {
            args.push("--force");
        }
        args.push(id);

        let output = self.run(&args).await?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = stderr_text(&output);
        if stderr.to_lowercase().contains("no such pod") {
            Err(RuntimeError::PodNotFound(id.to_string()))
        } else {
            Err(RuntimeError::Unavailable(stderr))
        }
    }

    async fn list_images(&self) -> Result<Vec<String>, RuntimeError> {
        let output = self.run(&["images", "--format", "json"]).await?;
        if !output.status.success() {
            return Err(RuntimeError::Unavailable(stderr_text(&output)));
        }
        parse_image_list(&output.stdout)
    }
}

// ── podman JSON ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PodmanPod {
    id: String,
    name: String,
    status: String,
    #[serde(default)]
    created: Option<String>,
    #[serde(default)]
    labels: Option<BTreeMap<String, String>>,
    #[serde(default)]
    containers: Vec<PodmanContainer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PodmanContainer {
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PodmanImage {
    id: String,
    #[serde(default)]
    names: Option<Vec<String>>,
}

fn parse_pod_list(stdout: &[u8]) -> Result<Vec<PodRecord>, RuntimeError> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let pods: Vec<PodmanPod> = serde_json::from_slice(stdout)
        .map_err(|e| RuntimeError::Unavailable(format!("unexpected podman pod ps output: {e}")))?;
    Ok(pods.into_iter().map(into_record).collect())
}

fn into_record(pod: PodmanPod) -> PodRecord {
    let phase = pod_phase(&pod.status, &pod.containers);
    PodRecord {
        created: pod.created.as_deref().and_then(parse_created),
        id: pod.id,
        name: pod.name,
        labels: pod.labels.unwrap_or_default(),
        phase,
    }
}

/// Map podman's pod status to a phase. A running pod is `Ready` only once
/// every one of its containers is running.
fn pod_phase(status: &str, containers: &[PodmanContainer]) -> PodPhase {
    match status.to_ascii_lowercase().as_str() {
        "running" if containers.iter().all(|c| c.status.eq_ignore_ascii_case("running")) => {
            PodPhase::Ready
        }
        "running" | "degraded" => PodPhase::Running,
        "created" | "initialized" | "paused" => PodPhase::Pending,
        "exited" | "stopped" | "error" | "dead" => PodPhase::Failed,
        "stopping" | "removing" => PodPhase::Terminating,
        _ => PodPhase::Unknown,
    }
}

fn parse_created(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn parse_image_list(stdout: &[u8]) -> Result<Vec<String>, RuntimeError> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let images: Vec<PodmanImage> = serde_json::from_slice(stdout)
        .map_err(|e| RuntimeError::Unavailable(format!("unexpected podman images output: {e}")))?;
    let mut names: Vec<String> = images
        .into_iter()
        .flat_map(|image| match image.names {
            Some(names) if !names.is_empty() => names,
            _ => vec![image.id],
        })
        .collect();
    names.sort();
    names.dedup();
    Ok(names)
}

fn stderr_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        format!("podman exited with {}", output.status)
    } else {
        stderr
    }
}

fn is_unavailable(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    UNAVAILABLE_MARKERS.iter().any(|m| lower.contains(m))
}

fn is_already_exists(stderr: &str) -> bool {
    stderr.to_lowercase().contains("already exists")
}
