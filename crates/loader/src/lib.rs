//! # Roster Loader
//!
//! Turns agent documents (YAML header + Markdown body) into
//! [`shared::AgentDefinition`]s.
//!
//! ## Components
//!
//! - `frontmatter` - Split header from body
//! - `metadata` - Decode header fields
//! - `segment` - Split the body into sections
//! - `document` - Parse and load whole documents
//! - `discovery` - Find documents on disk

pub mod discovery;
pub mod document;
pub mod frontmatter;
pub mod metadata;
pub mod segment;

pub use discovery::discover;
pub use document::{load_document, parse_document, ParsedDocument};
pub use metadata::{decode, DecodedHeader, Metadata};
pub use segment::segment;
