//! JSON output helpers.
//!
//! `JsonRenderer` writes one pretty-printed document per command to stdout.
//! `format_error` is used by every `--json` code path when a command fails.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::services::reconciler::CreateOutcome;
use crate::domain::{AppConfig, AppSummary, ApplicationView};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails (should not happen in
/// practice: `serde_json` only fails on non-finite floats and maps with
/// non-string keys, neither of which appear here).
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Machine-readable renderer for `--json`.
pub struct JsonRenderer;

#[allow(clippy::unused_self)]
impl JsonRenderer {
    fn emit(value: &impl Serialize) -> Result<()> {
        let text = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
        println!("{text}");
        Ok(())
    }

    pub(crate) fn render_templates(&self, kinds: &BTreeMap<String, Vec<String>>) -> Result<()> {
        Self::emit(&serde_json::json!({ "applications": kinds }))
    }

    pub(crate) fn render_applications(&self, apps: &BTreeMap<String, AppSummary>) -> Result<()> {
        Self::emit(&serde_json::json!({ "applications": apps }))
    }

    pub(crate) fn render_application(&self, view: &ApplicationView) -> Result<()> {
        Self::emit(view)
    }

    pub(crate) fn render_create(&self, name: &str, outcome: &CreateOutcome) -> Result<()> {
        Self::emit(&serde_json::json!({ "application": name, "outcome": outcome }))
    }

    pub(crate) fn render_delete(&self, name: &str, pods: usize) -> Result<()> {
        Self::emit(&serde_json::json!({ "application": name, "deleted_pods": pods }))
    }

    pub(crate) fn render_images(&self, images: &[String]) -> Result<()> {
        Self::emit(&serde_json::json!({ "images": images }))
    }

    pub(crate) fn render_config(&self, config: &AppConfig, path: &Path) -> Result<()> {
        Self::emit(&serde_json::json!({ "path": path, "config": config }))
    }

    pub(crate) fn render_version(&self, version: &str) -> Result<()> {
        Self::emit(&serde_json::json!({ "version": version }))
    }
}
