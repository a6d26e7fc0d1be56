//! Common Test Utilities
//!
//! Shared sample payloads and helpers for draining reader streams.

pub mod fixtures;

pub use fixtures::*;
