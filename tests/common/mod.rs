//! Common test utilities and helpers
//!
//! This module provides shared utilities for the integration suite:
//! - A scriptable transport double with a submission log
//! - Wiring helpers that assemble a full pipeline around it

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fakes;
pub mod fixtures;

// Re-export commonly used utilities
pub use fakes::*;
pub use fixtures::*;
