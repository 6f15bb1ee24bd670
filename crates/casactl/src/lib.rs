//! Casa Control - CLI client for the casa household backend.
//!
//! Exposed as a library so the integration tests can drive the API
//! client against a stub backend.

pub mod client;
pub mod commands;
pub mod logging;
