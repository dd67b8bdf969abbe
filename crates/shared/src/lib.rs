//! # Roster Shared
//!
//! Common types used across all Roster crates: agent definitions, bodies,
//! tools, diagnostics and configuration.

pub mod agent;
pub mod body;
pub mod config;
pub mod error;
pub mod tool;

// Re-exports
pub use agent::*;
pub use body::*;
pub use config::*;
pub use error::*;
pub use tool::*;
