//! Unit tests for the ai-services CLI
//!
//! These tests drive the application services against in-memory fakes and
//! run fast without a container runtime.

mod helpers;
mod podman_adapter;
mod query_service;
mod rag_scenario;
