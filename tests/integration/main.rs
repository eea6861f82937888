//! Integration Tests
//!
//! End-to-end runs of the tagging engine over address documents and
//! signature tables on disk.

#[path = "../common/mod.rs"]
mod common;

mod tagging_pipeline;
