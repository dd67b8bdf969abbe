//! # Roster Registry
//!
//! In-memory collection of agent definitions keyed by name.
//!
//! ## Components
//!
//! - `Registry` - Loading, lookup and cross-reference checks
//! - `LoadReport` - Loaded names and diagnostics from a load
//! - `Manifest` - JSON snapshot of a registry

pub mod manifest;
pub mod registry;
pub mod report;

pub use manifest::Manifest;
pub use registry::Registry;
pub use report::LoadReport;
