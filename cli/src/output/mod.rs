//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use console::Term;
use owo_colors::OwoColorize as _;

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

use crate::application::services::reconciler::CreateOutcome;
use crate::domain::{AppConfig, AppSummary, ApplicationView};

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Mode-dispatching renderer returned by `AppContext::renderer`.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// Render application kinds and their template ids.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_templates(&self, kinds: &BTreeMap<String, Vec<String>>) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_templates(kinds);
                Ok(())
            }
            Self::Json(r) => r.render_templates(kinds),
        }
    }

    /// Render the per-application summary table.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_applications(&self, apps: &BTreeMap<String, AppSummary>) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_applications(apps);
                Ok(())
            }
            Self::Json(r) => r.render_applications(apps),
        }
    }

    /// Render one application with its pods.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_application(&self, view: &ApplicationView) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_application(view);
                Ok(())
            }
            Self::Json(r) => r.render_application(view),
        }
    }

    /// Render the result of a create that did not fail.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_create(&self, name: &str, outcome: &CreateOutcome) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_create(name, outcome);
                Ok(())
            }
            Self::Json(r) => r.render_create(name, outcome),
        }
    }

    /// Render the result of a successful delete.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_delete(&self, name: &str, pods: usize) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_delete(name, pods);
                Ok(())
            }
            Self::Json(r) => r.render_delete(name, pods),
        }
    }

    /// Render runtime image references.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_images(&self, images: &[String]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_images(images);
                Ok(())
            }
            Self::Json(r) => r.render_images(images),
        }
    }

    /// Render the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(&self, config: &AppConfig, path: &Path) -> Result<()> {
        match self {
            Self::Human(r) => r.render_config(config, path),
            Self::Json(r) => r.render_config(config, path),
        }
    }

    /// Render the result of `config set`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config_set(
        &self,
        key: &str,
        value: &str,
        config: &AppConfig,
        path: &Path,
    ) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_config_set(key, value);
                Ok(())
            }
            Self::Json(r) => r.render_config(config, path),
        }
    }

    /// Render the CLI version.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_version(version);
                Ok(())
            }
            Self::Json(r) => r.render_version(version),
        }
    }
}
