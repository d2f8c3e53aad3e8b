//! Human-readable terminal renderer.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize as _;

use crate::application::services::reconciler::CreateOutcome;
use crate::domain::{AppConfig, AppSummary, ApplicationView, PodPhase};
use crate::infra::config::CONFIG_PATH_ENV;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("ai-services {version}");
    }

    /// Render the template catalog, one block per application kind.
    pub fn render_templates(&self, kinds: &BTreeMap<String, Vec<String>>) {
        if kinds.is_empty() {
            if !self.ctx.quiet {
                println!("No application templates available.");
            }
            return;
        }
        println!("Available application templates:\n");
        for (kind, templates) in kinds {
            println!("  {}", kind.style(self.ctx.styles.bold));
            for id in templates {
                println!("    - {id}");
            }
        }
        if !self.ctx.quiet {
            println!("\nCreate one: ai-services application create <name> --template-name <kind>");
        }
    }

    /// Render the application table shown by `ps`.
    pub fn render_applications(&self, apps: &BTreeMap<String, AppSummary>) {
        if apps.is_empty() {
            if !self.ctx.quiet {
                println!("No applications found.");
            }
            return;
        }
        let width = name_width(apps.keys().map(String::as_str), "APPLICATION");
        println!(
            "{}",
            format!("{:<width$}  {:<4}  STATUS", "APPLICATION", "PODS").style(self.ctx.styles.dim)
        );
        for (name, summary) in apps {
            println!(
                "{name:<width$}  {:<4}  {}",
                summary.pod_count,
                format_phases(&summary.phases)
            );
        }
    }

    /// Render one application and its pods.
    pub fn render_application(&self, view: &ApplicationView) {
        self.ctx.header(&format!("Application {}", view.name));
        self.ctx
            .kv("Template:", view.kind.as_deref().unwrap_or("(unknown)"));
        self.ctx.kv(
            "Created: ",
            &view
                .created
                .map_or_else(|| "(unknown)".to_string(), format_created),
        );
        self.ctx.kv("Pods:    ", &format_phases(&view.summary.phases));
        println!();

        let width = name_width(view.pods.iter().map(|p| p.name.as_str()), "POD");
        println!(
            "{}",
            format!("  {:<width$}  {:<12}  {:<12}  CREATED", "POD", "ID", "STATUS")
                .style(self.ctx.styles.dim)
        );
        for pod in &view.pods {
            let status = format!("{:<12}", pod.phase.to_string());
            println!(
                "  {:<width$}  {:<12}  {}  {}",
                pod.name,
                short_id(&pod.id),
                status.style(self.ctx.styles.phase(pod.phase)),
                pod.created.map_or_else(|| "-".to_string(), format_created),
            );
        }
    }

    /// Render the outcome of a create.
    pub fn render_create(&self, name: &str, outcome: &CreateOutcome) {
        match outcome {
            CreateOutcome::Ready { .. } => {
                self.ctx.info(&format!("Inspect it: ai-services application ps {name}"));
            }
            CreateOutcome::Submitted { pods } => {
                self.ctx.success(&format!(
                    "Application '{name}' submitted ({pods} pods); not waiting for readiness"
                ));
                self.ctx.info(&format!("Check progress: ai-services application ps {name}"));
            }
            CreateOutcome::TimedOut { .. } | CreateOutcome::Cancelled { .. } => {}
        }
    }

    /// Render the outcome of a delete.
    pub fn render_delete(&self, name: &str, pods: usize) {
        self.ctx.success(&format!(
            "Application '{name}' deleted ({pods} {})",
            if pods == 1 { "pod" } else { "pods" }
        ));
    }

    /// Confirm a changed setting.
    pub fn render_config_set(&self, key: &str, value: &str) {
        self.ctx.success(&format!("Set {key} = {value}"));
    }

    /// Render runtime image references, one per line.
    pub fn render_images(&self, images: &[String]) {
        if images.is_empty() {
            if !self.ctx.quiet {
                println!("No images found.");
            }
            return;
        }
        for image in images {
            println!("{image}");
        }
    }

    /// Render the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized.
    pub fn render_config(&self, config: &AppConfig, path: &Path) -> Result<()> {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!("  {:<32} {}", "runtime.binary:", config.runtime.binary);
        println!(
            "  {:<32} {}",
            "runtime.call_timeout_secs:", config.runtime.call_timeout_secs
        );
        println!(
            "  {:<32} {}",
            "readiness.timeout_secs:", config.readiness.timeout_secs
        );
        println!(
            "  {:<32} {}",
            "readiness.poll_interval_secs:", config.readiness.poll_interval_secs
        );
        println!("  {:<32} {}", "retry.max_attempts:", config.retry.max_attempts);
        println!("  {:<32} {}", "retry.base_delay_ms:", config.retry.base_delay_ms);
        println!("  {:<32} {}", "retry.max_delay_ms:", config.retry.max_delay_ms);
        println!(
            "  {:<32} {}",
            "templates.dir:",
            config
                .templates
                .dir
                .as_ref()
                .map_or_else(|| "(embedded)".to_string(), |d| d.display().to_string())
        );
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in [CONFIG_PATH_ENV, "RUST_LOG", "NO_COLOR"] {
            println!(
                "    {:<20} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
        Ok(())
    }
}

/// `"2 Ready, 1 Pending"`; phases in declaration order.
#[must_use]
pub fn format_phases(phases: &BTreeMap<PodPhase, usize>) -> String {
    if phases.is_empty() {
        return "-".to_string();
    }
    phases
        .iter()
        .map(|(phase, n)| format!("{n} {phase}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Runtime ids are 64 hex chars; show the first 12 like `podman pod ps`.
#[must_use]
pub fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}

#[must_use]
pub fn format_created(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn name_width<'n>(names: impl Iterator<Item = &'n str>, header: &str) -> usize {
    names.map(str::len).chain([header.len()]).max().unwrap_or(0)
}
