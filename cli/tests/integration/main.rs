//! Integration tests for the ai-services CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them needs a running container runtime.
