//! Shared utilities for the EMBER workspace.

pub mod logging;

pub use logging::init_tracing;
