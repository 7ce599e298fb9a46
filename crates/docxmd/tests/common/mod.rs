//! Shared test utilities for docxmd integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs over a temporary batch directory
//! - Builders for configurations and Markdown documents

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
