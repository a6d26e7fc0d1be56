//! Domain records and process-wide plumbing.

pub mod logging;
pub mod models;
