//! Shared test utilities for matchdesk integration tests.
//!
//! This module provides:
//! - `TestHarness` for an isolated database and preference file
//! - Builders for founders and properties

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
