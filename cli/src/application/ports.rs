//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`: never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{AppConfig, LabelFilters, PodRecord, RuntimeError};

// ── Container Runtime Port ────────────────────────────────────────────────────

/// The whole surface the CLI consumes from a container runtime.
///
/// Implementations are stateless from the caller's perspective; connection
/// handling is internal to the adapter. Every call may block on process or
/// network I/O and must surface per-call timeouts as
/// [`RuntimeError::Unavailable`].
#[allow(async_fn_in_trait)]
pub trait PodRuntime {
    /// Submit one rendered manifest.
    async fn create_pod(&self, manifest: &[u8]) -> Result<(), RuntimeError>;
    /// List pods whose labels satisfy `filters`. An empty filter lists all pods.
    async fn list_pods(&self, filters: &LabelFilters) -> Result<Vec<PodRecord>, RuntimeError>;
    /// Remove a pod by id.
    async fn delete_pod(&self, id: &str, force: bool) -> Result<(), RuntimeError>;
    /// List image references known to the runtime.
    async fn list_images(&self) -> Result<Vec<String>, RuntimeError>;
}

// ── Template Source Port ──────────────────────────────────────────────────────

/// Read-only hierarchical file namespace holding application templates.
///
/// Paths use `/` separators and are relative to the source root, e.g.
/// `applications/RAG/vllm-server.yaml.tmpl`.
pub trait ContentProvider {
    /// List every file path under `prefix`, recursively.
    fn list(&self, prefix: &str) -> Result<Vec<String>>;
    /// Read a file as UTF-8 text.
    fn read(&self, path: &str) -> Result<String>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Update a long-running wait in place (spinner text on a TTY).
    fn progress(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file exists.
    fn load(&self) -> Result<AppConfig>;
    /// Persist the configuration.
    fn save(&self, config: &AppConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
