//! Shared fixtures for integration tests across the workspace: a
//! temp-directory tree builder, a deterministic byte generator, and a
//! loopback session harness.

mod bytes;
mod harness;
mod tree;

pub use bytes::deterministic_bytes;
pub use harness::{run_loopback_transfer, LoopbackOutcome};
pub use tree::TreeBuilder;
