//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod application;
pub mod config;
pub mod error;
pub mod pod;
pub mod template;

pub use application::{
    APP_LABEL, AppSummary, ApplicationView, KIND_LABEL, summarize, validate_app_name,
};
pub use config::{AppConfig, RetryConfig, set_config_value, validate_config_key};
pub use error::{ApplicationError, CatalogError, ConfigError, PodFailure, RenderError, RuntimeError};
pub use pod::{LabelFilters, PodPhase, PodRecord, app_filter, count_ready};
pub use template::{RenderedManifest, Template, label_manifest};
