//! Template catalog: discovers application kinds and loads their templates.
//!
//! Templates live at `applications/<kind>/<template-id>.tmpl` in a
//! [`ContentProvider`]. Anything deeper, shallower, or without the `.tmpl`
//! suffix is ignored.

use std::collections::BTreeSet;

use crate::application::ports::ContentProvider;
use crate::domain::{CatalogError, Template};

pub const APPLICATIONS_ROOT: &str = "applications";
pub const TEMPLATE_SUFFIX: &str = ".tmpl";

/// Enumerates and loads application templates from a content provider.
pub struct TemplateCatalog<C> {
    source: C,
}

/// A template file located in the catalog, not yet read.
#[derive(Clone)]
struct Entry {
    kind: String,
    file: String,
    path: String,
}

impl<C: ContentProvider> TemplateCatalog<C> {
    pub fn new(source: C) -> Self {
        Self { source }
    }

    /// All application kinds that have at least one template.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if the source cannot be listed.
    pub fn list_application_kinds(&self) -> Result<BTreeSet<String>, CatalogError> {
        Ok(self.entries()?.into_iter().map(|e| e.kind).collect())
    }

    /// Template ids of `kind`, in load order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownKind` if the kind has no templates.
    pub fn list_templates(&self, kind: &str) -> Result<Vec<String>, CatalogError> {
        Ok(self
            .entries_of(kind)?
            .into_iter()
            .map(|e| template_id(&e.file))
            .collect())
    }

    /// Load and compile every template of `kind`, ordered by path.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownKind` if the kind is not in the catalog,
    /// or `CatalogError::TemplateParse` naming the file if a body cannot be
    /// read or does not compile.
    pub fn load_templates(&self, kind: &str) -> Result<Vec<Template>, CatalogError> {
        let entries = self.entries_of(kind)?;
        let mut templates = Vec::with_capacity(entries.len());
        for entry in entries {
            let parse_err = |cause: String| CatalogError::TemplateParse {
                file: entry.path.clone(),
                cause,
            };
            let body = self
                .source
                .read(&entry.path)
                .map_err(|e| parse_err(format!("{e:#}")))?;
            handlebars::Template::compile(&body).map_err(|e| parse_err(e.to_string()))?;
            tracing::debug!(kind, path = %entry.path, "loaded template");
            templates.push(Template {
                id: template_id(&entry.file),
                kind: entry.kind,
                path: entry.path,
                body,
            });
        }
        Ok(templates)
    }

    fn entries_of(&self, kind: &str) -> Result<Vec<Entry>, CatalogError> {
        let entries = self.entries()?;
        let matching: Vec<Entry> = entries.iter().filter(|e| e.kind == kind).cloned().collect();
        if matching.is_empty() {
            let available: BTreeSet<&str> = entries.iter().map(|e| e.kind.as_str()).collect();
            return Err(CatalogError::UnknownKind {
                kind: kind.to_string(),
                available: available.into_iter().collect::<Vec<_>>().join(", "),
            });
        }
        Ok(matching)
    }

    /// Every template file in the source, sorted by path.
    fn entries(&self) -> Result<Vec<Entry>, CatalogError> {
        let mut paths = self
            .source
            .list(APPLICATIONS_ROOT)
            .map_err(|e| CatalogError::Unavailable(format!("{e:#}")))?;
        paths.sort();
        paths.dedup();
        Ok(paths.iter().filter_map(|p| parse_entry(p)).collect())
    }
}

fn parse_entry(path: &str) -> Option<Entry> {
    let rest = path.strip_prefix(APPLICATIONS_ROOT)?.strip_prefix('/')?;
    let (kind, file) = rest.split_once('/')?;
    if kind.is_empty() || file.contains('/') || file.len() <= TEMPLATE_SUFFIX.len() {
        return None;
    }
    file.ends_with(TEMPLATE_SUFFIX).then(|| Entry {
        kind: kind.to_string(),
        file: file.to_string(),
        path: path.to_string(),
    })
}

fn template_id(file: &str) -> String {
    file.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(file).to_string()
}
