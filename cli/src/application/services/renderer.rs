//! Renderer: binds application parameters into template bodies.

use handlebars::Handlebars;
use serde::Serialize;

use crate::domain::{RenderError, RenderedManifest, Template, label_manifest};

/// Parameters available to every template.
#[derive(Debug, Clone, Serialize)]
pub struct RenderParams<'a> {
    #[serde(rename = "AppName")]
    pub app_name: &'a str,
    #[serde(rename = "AppKind")]
    pub app_kind: &'a str,
}

/// Strict handlebars renderer producing labelled pod manifests.
///
/// Unresolved placeholders are errors, and output is not HTML-escaped.
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }

    /// Render `template` with `params` and stamp the `app` label on every pod.
    ///
    /// Pure: the same template and parameters always give the same bytes.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` on template syntax errors, unresolved
    /// placeholders, or output that is not a YAML pod manifest.
    pub fn render(
        &self,
        template: &Template,
        params: &RenderParams<'_>,
    ) -> Result<RenderedManifest, RenderError> {
        let err = |cause: String| RenderError {
            template_id: template.id.clone(),
            cause,
        };
        let text = self
            .registry
            .render_template(&template.body, params)
            .map_err(|e| err(e.to_string()))?;
        let (labelled, pods) =
            label_manifest(&text, params.app_name, params.app_kind).map_err(err)?;
        Ok(RenderedManifest {
            template_id: template.id.clone(),
            body: labelled.into_bytes(),
            pods,
        })
    }
}
