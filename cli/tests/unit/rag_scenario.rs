//! End-to-end flow with the built-in RAG templates.

#![allow(clippy::unwrap_used)]

use ai_services::application::services::query;
use ai_services::application::services::reconciler::CreateOutcome;
use ai_services::domain::{KIND_LABEL, PodPhase};
use ai_services::infra::content::EmbeddedContent;
use tokio_util::sync::CancellationToken;

use crate::helpers::{FakeRuntime, Fixture};

#[tokio::test(start_paused = true)]
async fn test_rag_it_desk_lifecycle() {
    let fx = Fixture::new(FakeRuntime::default(), EmbeddedContent);

    let outcome = fx
        .reconciler()
        .create("it-desk", "RAG", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outcome, CreateOutcome::Ready { pods: 3 });

    let apps = query::list_applications(&fx.runtime).await.unwrap();
    assert_eq!(apps["it-desk"].pod_count, 3);
    assert_eq!(apps["it-desk"].phases[&PodPhase::Ready], 3);

    let view = query::get_application(&fx.runtime, "it-desk").await.unwrap();
    let names: Vec<_> = view.pods.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        ["it-desk-chat-bot", "it-desk-opensearch", "it-desk-vllm-server"]
    );
    assert!(
        view.pods
            .iter()
            .all(|p| p.labels.get(KIND_LABEL).map(String::as_str) == Some("RAG"))
    );

    let removed = fx
        .reconciler()
        .delete("it-desk", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(removed, 3);
    assert!(query::list_applications(&fx.runtime).await.unwrap().is_empty());
}
