//! `PodmanRuntime` command construction and error classification, driven
//! through a scripted `CommandRunner`.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::process::{ExitStatus, Output};
use std::sync::Mutex;
use std::time::Duration;

use ai_services::application::ports::{CommandRunner, PodRuntime};
use ai_services::domain::{LabelFilters, PodPhase, RuntimeError, app_filter};
use ai_services::infra::podman::PodmanRuntime;
use anyhow::Result;

#[cfg(unix)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

fn err_output(stderr: &[u8]) -> Output {
    Output {
        status: exit_status(125),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation {
    program: String,
    args: Vec<String>,
    stdin: Option<Vec<u8>>,
}

/// Replays canned results in order and records every invocation.
#[derive(Default)]
struct ScriptedRunner {
    replies: Mutex<VecDeque<Result<Output>>>,
    seen: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    fn replying(replies: Vec<Result<Output>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn next(&self, program: &str, args: &[&str], stdin: Option<&[u8]>) -> Result<Output> {
        self.seen.lock().unwrap().push(Invocation {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            stdin: stdin.map(<[u8]>::to_vec),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("unexpected call: {program} {args:?}")))
    }
}

impl CommandRunner for &ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.next(program, args, None)
    }
    async fn run_with_timeout(&self, program: &str, args: &[&str], _: Duration) -> Result<Output> {
        self.next(program, args, None)
    }
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output> {
        self.next(program, args, Some(stdin))
    }
}

fn args_of(runner: &ScriptedRunner, call: usize) -> Vec<String> {
    runner.seen.lock().unwrap()[call].args.clone()
}

#[tokio::test]
async fn test_create_pipes_manifest_to_kube_play() {
    let runner = ScriptedRunner::replying(vec![Ok(ok_output(b"Pod:\nabc\n"))]);
    let podman = PodmanRuntime::new(&runner, "/usr/bin/podman");

    podman.create_pod(b"kind: Pod\n").await.unwrap();

    let seen = runner.seen.lock().unwrap();
    assert_eq!(seen[0].program, "/usr/bin/podman");
    assert_eq!(seen[0].args, ["kube", "play", "-"]);
    assert_eq!(seen[0].stdin.as_deref(), Some(&b"kind: Pod\n"[..]));
}

#[tokio::test]
async fn test_create_rejection_is_terminal() {
    let runner = ScriptedRunner::replying(vec![Ok(err_output(
        b"Error: hostPath /var/lib/ai-services/models: no such file or directory",
    ))]);
    let podman = PodmanRuntime::new(&runner, "podman");

    let err = podman.create_pod(b"kind: Pod\n").await.unwrap_err();

    assert!(matches!(err, RuntimeError::ManifestRejected(ref m) if m.contains("hostPath")));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_create_existing_pod_is_reported_as_such() {
    let runner = ScriptedRunner::replying(vec![Ok(err_output(
        b"Error: pod it-desk-chat-bot already exists",
    ))]);
    let podman = PodmanRuntime::new(&runner, "podman");

    let err = podman.create_pod(b"kind: Pod\n").await.unwrap_err();

    assert!(matches!(err, RuntimeError::AlreadyExists(ref m) if m.contains("it-desk-chat-bot")));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_create_connection_failure_is_retryable() {
    let runner = ScriptedRunner::replying(vec![Ok(err_output(
        b"Error: unable to connect to Podman socket: dial unix /run/podman/podman.sock: connect: connection refused",
    ))]);
    let podman = PodmanRuntime::new(&runner, "podman");

    let err = podman.create_pod(b"kind: Pod\n").await.unwrap_err();

    assert!(matches!(err, RuntimeError::Unavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_spawn_failure_is_unavailable() {
    let runner = ScriptedRunner::replying(vec![Err(anyhow::anyhow!(
        "failed to spawn podman: No such file or directory"
    ))]);
    let podman = PodmanRuntime::new(&runner, "podman");

    let err = podman.list_images().await.unwrap_err();
    assert!(matches!(err, RuntimeError::Unavailable(ref m) if m.contains("failed to spawn")));
}

#[tokio::test]
async fn test_list_passes_single_value_filters_to_podman() {
    let runner = ScriptedRunner::replying(vec![Ok(ok_output(b"[]"))]);
    let podman = PodmanRuntime::new(&runner, "podman");

    let pods = podman.list_pods(&app_filter("it-desk")).await.unwrap();

    assert!(pods.is_empty());
    assert_eq!(
        args_of(&runner, 0),
        ["pod", "ps", "--format", "json", "--filter", "label=app=it-desk"]
    );
}

#[tokio::test]
async fn test_list_applies_multi_value_filters_client_side() {
    let json = br#"[
      {"Id": "1", "Name": "a-web", "Status": "Running", "Labels": {"app": "a"}, "Containers": []},
      {"Id": "2", "Name": "b-web", "Status": "Created", "Labels": {"app": "b"}},
      {"Id": "3", "Name": "c-web", "Status": "Running", "Labels": {"app": "c"}}
    ]"#;
    let runner = ScriptedRunner::replying(vec![Ok(ok_output(json))]);
    let podman = PodmanRuntime::new(&runner, "podman");
    let filters = LabelFilters::from([("app".to_string(), vec!["a".to_string(), "b".to_string()])]);

    let pods = podman.list_pods(&filters).await.unwrap();

    assert_eq!(args_of(&runner, 0), ["pod", "ps", "--format", "json"]);
    let names: Vec<_> = pods.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["a-web", "b-web"]);
    assert_eq!(pods[0].phase, PodPhase::Ready);
    assert_eq!(pods[1].phase, PodPhase::Pending);
}

#[tokio::test]
async fn test_list_failure_is_unavailable() {
    let runner = ScriptedRunner::replying(vec![Ok(err_output(b"Error: database is locked"))]);
    let podman = PodmanRuntime::new(&runner, "podman");

    let err = podman.list_pods(&LabelFilters::new()).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Unavailable(_)));
}

#[tokio::test]
async fn test_delete_forces_removal_by_id() {
    let runner = ScriptedRunner::replying(vec![Ok(ok_output(b"abc\n"))]);
    let podman = PodmanRuntime::new(&runner, "podman");

    podman.delete_pod("abc", true).await.unwrap();

    assert_eq!(args_of(&runner, 0), ["pod", "rm", "--force", "abc"]);
}

#[tokio::test]
async fn test_delete_of_missing_pod_is_pod_not_found() {
    let runner = ScriptedRunner::replying(vec![Ok(err_output(
        b"Error: no pod with name or ID abc found: no such pod",
    ))]);
    let podman = PodmanRuntime::new(&runner, "podman");

    let err = podman.delete_pod("abc", false).await.unwrap_err();

    assert_eq!(err, RuntimeError::PodNotFound("abc".into()));
    assert_eq!(args_of(&runner, 0), ["pod", "rm", "abc"]);
}

#[tokio::test]
async fn test_images_are_listed_by_name() {
    let json = br#"[{"Id": "f1", "Names": ["quay.io/ai-services/vllm-spyre:latest"]}]"#;
    let runner = ScriptedRunner::replying(vec![Ok(ok_output(json))]);
    let podman = PodmanRuntime::new(&runner, "podman");

    let images = podman.list_images().await.unwrap();

    assert_eq!(images, ["quay.io/ai-services/vllm-spyre:latest"]);
    assert_eq!(args_of(&runner, 0), ["images", "--format", "json"]);
}
