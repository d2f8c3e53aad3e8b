//! Read-only application views.

#![allow(clippy::unwrap_used)]

use ai_services::application::services::query;
use ai_services::domain::{ApplicationError, PodPhase, RuntimeError};

use crate::helpers::{FakeRuntime, pod};

fn seeded() -> FakeRuntime {
    let runtime = FakeRuntime::default();
    runtime.insert_pod(pod("1", "shop-db", Some("shop"), PodPhase::Ready));
    runtime.insert_pod(pod("2", "shop-web", Some("shop"), PodPhase::Pending));
    runtime.insert_pod(pod("3", "shop-api", Some("shop"), PodPhase::Ready));
    runtime.insert_pod(pod("4", "blog-web", Some("blog"), PodPhase::Failed));
    runtime.insert_pod(pod("5", "manual", None, PodPhase::Running));
    runtime
}

#[tokio::test]
async fn test_list_groups_pods_by_application() {
    let apps = query::list_applications(&seeded()).await.unwrap();

    assert_eq!(apps.keys().collect::<Vec<_>>(), ["blog", "shop"]);
    let shop = &apps["shop"];
    assert_eq!(shop.pod_count, 3);
    assert_eq!(shop.phases[&PodPhase::Ready], 2);
    assert_eq!(shop.phases[&PodPhase::Pending], 1);
    assert_eq!(apps["blog"].phases[&PodPhase::Failed], 1);
}

#[tokio::test]
async fn test_list_on_empty_runtime_is_empty() {
    let apps = query::list_applications(&FakeRuntime::default())
        .await
        .unwrap();
    assert!(apps.is_empty());
}

#[tokio::test]
async fn test_get_returns_pods_sorted_by_name() {
    let view = query::get_application(&seeded(), "shop").await.unwrap();

    let names: Vec<_> = view.pods.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["shop-api", "shop-db", "shop-web"]);
    assert_eq!(view.summary.pod_count, 3);
}

#[tokio::test]
async fn test_get_unknown_application_is_not_found() {
    let err = query::get_application(&seeded(), "wiki").await.unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[tokio::test]
async fn test_get_rejects_invalid_name() {
    let runtime = seeded();
    let err = query::get_application(&runtime, "Shop").await.unwrap_err();
    assert!(matches!(err, ApplicationError::InvalidName(_)));
    assert_eq!(runtime.calls(), 0);
}

#[tokio::test]
async fn test_runtime_outage_surfaces_as_runtime_error() {
    let runtime = FakeRuntime::default().lists_fail_after(0);
    let err = query::list_applications(&runtime).await.unwrap_err();
    assert!(matches!(err, ApplicationError::Runtime(RuntimeError::Unavailable(_))));
    assert_eq!(err.code(), "RUNTIME_UNAVAILABLE");
}
