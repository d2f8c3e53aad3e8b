//! Shared fakes: an in-memory pod runtime, an in-memory template source and
//! a reporter that records what it was told.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ai_services::application::ports::{ContentProvider, PodRuntime, ProgressReporter};
use ai_services::application::services::catalog::TemplateCatalog;
use ai_services::application::services::locks::NameLocks;
use ai_services::application::services::reconciler::{ReconcileSettings, Reconciler};
use ai_services::application::services::renderer::Renderer;
use ai_services::domain::{LabelFilters, PodPhase, PodRecord, RetryConfig, RuntimeError};
use anyhow::Result;
use serde::Deserialize as _;
use serde_yaml::Value;
use tokio_util::sync::CancellationToken;

// ── Fake runtime ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct RuntimeState {
    pods: Vec<PodRecord>,
    next_id: usize,
    /// 1-based create call that fails, and how.
    fail_create_at: Option<(usize, RuntimeError)>,
    /// Number of leading create calls that fail with `Unavailable`.
    transient_create_failures: usize,
    /// Number of leading creates that take effect but report `Unavailable`.
    lost_create_responses: usize,
    /// Cancelled once this many pods have been created.
    cancel_after_creates: Option<(usize, CancellationToken)>,
    /// Pod ids whose deletion fails with the given error.
    fail_delete: HashMap<String, RuntimeError>,
    /// Pods become ready once this many list calls have been made.
    ready_after_lists: Option<usize>,
    /// List calls beyond this many fail with `Unavailable`.
    lists_fail_after: Option<usize>,
}

/// In-memory `PodRuntime` that understands just enough of a pod manifest to
/// record its name and labels.
///
/// Every call yields to the scheduler first so that concurrent operations
/// interleave the way they would against a real runtime.
pub struct FakeRuntime {
    state: Mutex<RuntimeState>,
    initial_phase: PodPhase,
    pub create_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl Default for FakeRuntime {
    fn default() -> Self {
        Self::with_phase(PodPhase::Ready)
    }
}

impl FakeRuntime {
    /// Runtime whose new pods start in `phase`.
    pub fn with_phase(phase: PodPhase) -> Self {
        Self {
            state: Mutex::new(RuntimeState::default()),
            initial_phase: phase,
            create_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_create_at(self, call: usize, err: RuntimeError) -> Self {
        self.state.lock().unwrap().fail_create_at = Some((call, err));
        self
    }

    pub fn transient_create_failures(self, count: usize) -> Self {
        self.state.lock().unwrap().transient_create_failures = count;
        self
    }

    pub fn lost_create_responses(self, count: usize) -> Self {
        self.state.lock().unwrap().lost_create_responses = count;
        self
    }

    pub fn cancel_after_creates(self, creates: usize, token: CancellationToken) -> Self {
        self.state.lock().unwrap().cancel_after_creates = Some((creates, token));
        self
    }

    pub fn ready_after_lists(self, lists: usize) -> Self {
        self.state.lock().unwrap().ready_after_lists = Some(lists);
        self
    }

    pub fn fail_delete(&self, pod_id: &str, err: RuntimeError) {
        self.state
            .lock()
            .unwrap()
            .fail_delete
            .insert(pod_id.to_string(), err);
    }

    pub fn lists_fail_after(self, lists: usize) -> Self {
        self.state.lock().unwrap().lists_fail_after = Some(lists);
        self
    }

    pub fn insert_pod(&self, pod: PodRecord) {
        self.state.lock().unwrap().pods.push(pod);
    }

    pub fn pods(&self) -> Vec<PodRecord> {
        self.state.lock().unwrap().pods.clone()
    }

    pub fn pods_of(&self, app: &str) -> Vec<PodRecord> {
        self.pods()
            .into_iter()
            .filter(|p| p.app_name() == Some(app))
            .collect()
    }

    pub fn calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
            + self.list_calls.load(Ordering::SeqCst)
            + self.delete_calls.load(Ordering::SeqCst)
    }
}

impl PodRuntime for FakeRuntime {
    async fn create_pod(&self, manifest: &[u8]) -> Result<(), RuntimeError> {
        tokio::task::yield_now().await;
        let call = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.lock().unwrap();

        if state.transient_create_failures > 0 {
            state.transient_create_failures -= 1;
            return Err(RuntimeError::Unavailable("connection refused".into()));
        }
        if let Some((at, err)) = &state.fail_create_at {
            if *at == call {
                return Err(err.clone());
            }
        }

        let text = std::str::from_utf8(manifest)
            .map_err(|e| RuntimeError::ManifestRejected(e.to_string()))?;
        for (name, labels) in parse_pods(text)? {
            if state.pods.iter().any(|p| p.name == name) {
                return Err(RuntimeError::AlreadyExists(format!(
                    "pod {name} already exists"
                )));
            }
            state.next_id += 1;
            let id = format!("{:064x}", state.next_id);
            state.pods.push(PodRecord {
                id,
                name,
                labels,
                phase: self.initial_phase,
                created: None,
            });
        }
        if let Some((after, token)) = &state.cancel_after_creates {
            if state.next_id >= *after {
                token.cancel();
            }
        }
        if state.lost_create_responses > 0 {
            state.lost_create_responses -= 1;
            return Err(RuntimeError::Unavailable("i/o timeout".into()));
        }
        Ok(())
    }

    async fn list_pods(&self, filters: &LabelFilters) -> Result<Vec<PodRecord>, RuntimeError> {
        tokio::task::yield_now().await;
        let calls = self.list_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.lock().unwrap();
        if state.lists_fail_after.is_some_and(|n| calls > n) {
            return Err(RuntimeError::Unavailable("podman socket gone".into()));
        }
        if state.ready_after_lists.is_some_and(|n| calls >= n) {
            for pod in &mut state.pods {
                pod.phase = PodPhase::Ready;
            }
        }
        Ok(state
            .pods
            .iter()
            .filter(|p| p.matches(filters))
            .cloned()
            .collect())
    }

    async fn delete_pod(&self, id: &str, _force: bool) -> Result<(), RuntimeError> {
        tokio::task::yield_now().await;
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.fail_delete.get(id) {
            return Err(err.clone());
        }
        let before = state.pods.len();
        state.pods.retain(|p| p.id != id);
        if state.pods.len() == before {
            return Err(RuntimeError::PodNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list_images(&self) -> Result<Vec<String>, RuntimeError> {
        Ok(vec!["quay.io/ai-services/rag-chat-bot:latest".into()])
    }
}

type PodSpec = (String, BTreeMap<String, String>);

fn parse_pods(text: &str) -> Result<Vec<PodSpec>, RuntimeError> {
    let rejected = |msg: &str| RuntimeError::ManifestRejected(msg.to_string());
    let mut pods = Vec::new();
    for doc in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(doc).map_err(|e| rejected(&e.to_string()))?;
        let metadata = match value["kind"].as_str() {
            Some("Pod") => &value["metadata"],
            Some("Deployment") => &value["spec"]["template"]["metadata"],
            _ => continue,
        };
        let name = metadata["name"]
            .as_str()
            .or_else(|| value["metadata"]["name"].as_str())
            .ok_or_else(|| rejected("pod without a name"))?
            .to_string();
        let labels = metadata["labels"]
            .as_mapping()
            .map(|m| {
                m.iter()
                    .filter_map(|(k, v)| Some((k.as_str()?.to_string(), v.as_str()?.to_string())))
                    .collect()
            })
            .unwrap_or_default();
        pods.push((name, labels));
    }
    Ok(pods)
}

/// A labelled pod for seeding the fake runtime directly.
pub fn pod(id: &str, name: &str, app: Option<&str>, phase: PodPhase) -> PodRecord {
    PodRecord {
        id: id.to_string(),
        name: name.to_string(),
        labels: app
            .map(|a| BTreeMap::from([("app".to_string(), a.to_string())]))
            .unwrap_or_default(),
        phase,
        created: None,
    }
}

// ── Fake template source ──────────────────────────────────────────────────────

/// In-memory `ContentProvider` that counts how often it is touched.
#[derive(Clone, Default)]
pub struct MemoryContent {
    files: BTreeMap<String, String>,
    pub calls: Arc<AtomicUsize>,
}

impl MemoryContent {
    pub fn with(mut self, path: &str, body: &str) -> Self {
        self.files.insert(path.to_string(), body.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ContentProvider for MemoryContent {
    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let dir = format!("{prefix}/");
        Ok(self
            .files
            .keys()
            .filter(|k| k.starts_with(&dir))
            .cloned()
            .collect())
    }

    fn read(&self, path: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such file: {path}"))
    }
}

pub fn pod_template(component: &str) -> String {
    format!(
        "apiVersion: v1\nkind: Pod\nmetadata:\n  name: \"{{{{AppName}}}}-{component}\"\nspec:\n  containers:\n    - name: {component}\n      image: example.com/{component}:1\n"
    )
}

/// Three single-pod templates under kind `Demo`.
pub fn demo_content() -> MemoryContent {
    MemoryContent::default()
        .with("applications/Demo/a-db.yaml.tmpl", &pod_template("db"))
        .with("applications/Demo/b-api.yaml.tmpl", &pod_template("api"))
        .with("applications/Demo/c-web.yaml.tmpl", &pod_template("web"))
}

// ── Recording reporter ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.events().iter().any(|e| e.contains(needle))
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.lock().unwrap().push(format!("step: {message}"));
    }
    fn progress(&self, message: &str) {
        self.events.lock().unwrap().push(format!("progress: {message}"));
    }
    fn success(&self, message: &str) {
        self.events.lock().unwrap().push(format!("success: {message}"));
    }
    fn warn(&self, message: &str) {
        self.events.lock().unwrap().push(format!("warn: {message}"));
    }
}

// ── Fixture ───────────────────────────────────────────────────────────────────

pub fn fast_settings() -> ReconcileSettings {
    ReconcileSettings {
        ready_timeout: Duration::from_secs(30),
        poll_interval: Duration::from_secs(1),
        retry: RetryConfig {
            max_attempts: 3,
            base_delay_ms: 10,
            max_delay_ms: 100,
        },
        wait: true,
    }
}

/// Everything a `Reconciler` borrows, owned in one place.
pub struct Fixture<C: ContentProvider = MemoryContent> {
    pub runtime: FakeRuntime,
    pub catalog: TemplateCatalog<C>,
    pub renderer: Renderer,
    pub locks: NameLocks,
    pub reporter: RecordingReporter,
    pub settings: ReconcileSettings,
}

impl<C: ContentProvider> Fixture<C> {
    pub fn new(runtime: FakeRuntime, content: C) -> Self {
        Self {
            runtime,
            catalog: TemplateCatalog::new(content),
            renderer: Renderer::new(),
            locks: NameLocks::new(),
            reporter: RecordingReporter::default(),
            settings: fast_settings(),
        }
    }

    pub fn reconciler(&self) -> Reconciler<'_, FakeRuntime, C, RecordingReporter> {
        Reconciler::new(
            &self.runtime,
            &self.catalog,
            &self.renderer,
            &self.locks,
            &self.reporter,
            self.settings.clone(),
        )
    }
}
