//! Integration tests entrypoint for stackwatch

#[path = "integration/pass_flow_test.rs"]
mod pass_flow_test;

#[path = "integration/alert_batching_test.rs"]
mod alert_batching_test;
