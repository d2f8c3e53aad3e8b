//! Templates and rendered manifests.
//!
//! Pure functions only: no I/O, no async.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::domain::application::{APP_LABEL, KIND_LABEL};

/// One pod definition belonging to an application kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// File name without the `.tmpl` suffix, e.g. `vllm-server.yaml`.
    pub id: String,
    /// Application kind (the directory the template lives in).
    pub kind: String,
    /// Path within the template source, e.g. `applications/RAG/vllm-server.yaml.tmpl`.
    pub path: String,
    pub body: String,
}

/// A template with its placeholders substituted, ready for the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedManifest {
    pub template_id: String,
    pub body: Vec<u8>,
    /// Number of pods the manifest defines.
    pub pods: usize,
}

/// Stamp the application labels onto every pod defined in a YAML manifest.
///
/// Handles multi-document YAML. `Pod` documents get the labels on
/// `metadata.labels`; `Deployment` documents on `spec.template.metadata.labels`.
/// Other documents pass through unchanged. Returns the re-serialised manifest
/// and the number of pods it defines.
///
/// # Errors
///
/// Returns a description of the problem if the text is not YAML, a document
/// is not a mapping, or no document defines a pod.
pub fn label_manifest(rendered: &str, app: &str, kind: &str) -> Result<(String, usize), String> {
    let mut out = String::new();
    let mut pods = 0;

    for document in serde_yaml::Deserializer::from_str(rendered) {
        let mut value = Value::deserialize(document).map_err(|e| format!("invalid YAML: {e}"))?;
        if value.is_null() {
            continue;
        }
        let doc = value
            .as_mapping_mut()
            .ok_or_else(|| "manifest document is not a mapping".to_string())?;

        let doc_kind = doc.get("kind").and_then(Value::as_str).map(str::to_owned);
        match doc_kind.as_deref() {
            Some("Pod") => {
                stamp_labels(doc, app, kind)?;
                pods += 1;
            }
            Some("Deployment") => {
                let template = child_mapping(doc, "spec")
                    .and_then(|spec| child_mapping(spec, "template"))
                    .ok_or_else(|| "Deployment has no spec.template".to_string())?;
                stamp_labels(template, app, kind)?;
                pods += 1;
            }
            _ => {}
        }

        out.push_str("---\n");
        out.push_str(&serde_yaml::to_string(&value).map_err(|e| e.to_string())?);
    }

    if pods == 0 {
        return Err("manifest defines no Pod".to_string());
    }
    Ok((out, pods))
}

fn child_mapping<'a>(map: &'a mut Mapping, key: &str) -> Option<&'a mut Mapping> {
    map.get_mut(key).and_then(Value::as_mapping_mut)
}

fn ensure_mapping<'a>(map: &'a mut Mapping, key: &str) -> Result<&'a mut Mapping, String> {
    if map.get(key).is_none_or(Value::is_null) {
        map.insert(Value::from(key), Value::Mapping(Mapping::new()));
    }
    child_mapping(map, key).ok_or_else(|| format!("'{key}' is not a mapping"))
}

fn stamp_labels(object: &mut Mapping, app: &str, kind: &str) -> Result<(), String> {
    let metadata = ensure_mapping(object, "metadata")?;
    let labels = ensure_mapping(metadata, "labels")?;
    labels.insert(Value::from(APP_LABEL), Value::from(app));
    labels.insert(Value::from(KIND_LABEL), Value::from(kind));
    Ok(())
}
