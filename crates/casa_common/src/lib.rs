//! Casa Common - shared types and rules for the casa client
//!
//! Everything the backend and the CLI agree on lives here: the wire
//! schemas, the presentation-layer validation rules, the bill ledger
//! reduction, and the local config/session files.

pub mod balance;
pub mod config;
pub mod session;
pub mod types;
pub mod ui;
pub mod validation;

pub use balance::*;
pub use types::*;
pub use validation::ValidationError;
