//! Application context: unified state passed to every command handler.
//!
//! `AppContext` owns the loaded configuration and the adapters built from it.
//! Adding a new cross-cutting concern requires only one field change here;
//! zero command signatures change.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::application::services::catalog::TemplateCatalog;
use crate::application::services::locks::NameLocks;
use crate::application::services::reconciler::{ReconcileSettings, Reconciler};
use crate::application::services::renderer;
use crate::domain::AppConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::content::TemplateSource;
use crate::infra::podman::PodmanRuntime;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `AI_SERVICES_YES` env vars).
    pub yes: bool,
    /// Template directory overriding `templates.dir` and the embedded set.
    pub templates_dir: Option<PathBuf>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Effective configuration.
    pub config: AppConfig,
    /// Where the configuration was loaded from.
    pub config_store: YamlConfigStore,
    /// Container runtime adapter.
    pub runtime: PodmanRuntime<TokioCommandRunner>,
    /// Application templates.
    pub catalog: TemplateCatalog<TemplateSource>,
    /// Template renderer.
    pub templates: renderer::Renderer,
    /// Per-name operation locks for this process.
    pub locks: NameLocks,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or
    /// `AI_SERVICES_YES` environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("AI_SERVICES_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let config_store = YamlConfigStore;
        let config = config_store.load()?;
        let templates_dir = flags
            .behaviour
            .templates_dir
            .as_deref()
            .or(config.templates.dir.as_deref());
        let catalog = TemplateCatalog::new(TemplateSource::from_dir(templates_dir));
        let runtime =
            PodmanRuntime::with_timeout(&config.runtime.binary, config.runtime.call_timeout());

        Ok(Self {
            // Progress lines would corrupt a JSON document on stdout.
            output: OutputContext::new(
                flags.output.no_color,
                flags.output.quiet || flags.output.json,
            ),
            mode,
            config,
            config_store,
            runtime,
            catalog,
            templates: renderer::Renderer::new(),
            locks: NameLocks::new(),
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Build a reconciler over this context's adapters.
    #[must_use]
    pub fn reconciler<'a>(
        &'a self,
        reporter: &'a TerminalReporter<'a>,
        settings: ReconcileSettings,
    ) -> Reconciler<'a, PodmanRuntime<TokioCommandRunner>, TemplateSource, TerminalReporter<'a>>
    {
        Reconciler::new(
            &self.runtime,
            &self.catalog,
            &self.templates,
            &self.locks,
            reporter,
            settings,
        )
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `AI_SERVICES_YES`
    /// env), returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
