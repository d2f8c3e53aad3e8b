//! Template content providers.
//!
//! - [`EmbeddedContent`]: templates compiled into the binary from `cli/assets/`.
//! - [`DirContent`]: templates read from a directory on disk.
//! - [`TemplateSource`]: the runtime choice between the two.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use include_dir::{Dir, include_dir};

use crate::application::ports::ContentProvider;

/// Application templates compiled in at build time.
static EMBEDDED_TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Templates embedded in the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedContent;

impl ContentProvider for EmbeddedContent {
    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let dir = EMBEDDED_TEMPLATES
            .get_dir(prefix)
            .ok_or_else(|| anyhow::anyhow!("embedded templates have no '{prefix}' directory"))?;
        let mut paths = Vec::new();
        collect_embedded(dir, &mut paths);
        Ok(paths)
    }

    fn read(&self, path: &str) -> Result<String> {
        EMBEDDED_TEMPLATES
            .get_file(path)
            .and_then(|f| f.contents_utf8())
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("embedded template not found: {path}"))
    }
}

fn collect_embedded(dir: &Dir<'_>, out: &mut Vec<String>) {
    for file in dir.files() {
        out.push(slash_path(file.path()));
    }
    for sub in dir.dirs() {
        collect_embedded(sub, out);
    }
}

/// Templates read from a directory containing `applications/<kind>/*.tmpl`.
#[derive(Debug, Clone)]
pub struct DirContent {
    root: PathBuf,
}

impl DirContent {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentProvider for DirContent {
    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let base = self.root.join(prefix);
        anyhow::ensure!(base.is_dir(), "template directory not found: {}", base.display());
        let mut paths = Vec::new();
        for entry in walkdir::WalkDir::new(&base).follow_links(true) {
            let entry = entry.with_context(|| format!("walking {}", base.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .with_context(|| format!("{} escapes template root", entry.path().display()))?;
            paths.push(slash_path(relative));
        }
        Ok(paths)
    }

    fn read(&self, path: &str) -> Result<String> {
        let full = self.root.join(path);
        std::fs::read_to_string(&full).with_context(|| format!("reading {}", full.display()))
    }
}

/// The template source selected from configuration.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Embedded(EmbeddedContent),
    Directory(DirContent),
}

impl TemplateSource {
    /// Read templates from `dir` when given, otherwise from the binary.
    #[must_use]
    pub fn from_dir(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::Directory(DirContent::new(dir)),
            None => Self::Embedded(EmbeddedContent),
        }
    }
}

impl ContentProvider for TemplateSource {
    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        match self {
            Self::Embedded(c) => c.list(prefix),
            Self::Directory(c) => c.list(prefix),
        }
    }

    fn read(&self, path: &str) -> Result<String> {
        match self {
            Self::Embedded(c) => c.read(path),
            Self::Directory(c) => c.read(path),
        }
    }
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
