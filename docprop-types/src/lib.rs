//! Core type definitions for docprop.
//!
//! This crate defines the small, schema-agnostic types the property engine
//! builds on:
//! - Document handles (UUID v7), used for non-owning back-references
//! - Timestamp parsing: the fixed-format fast path, a generic parser, and
//!   the document timestamp formatter
//!
//! Everything schema-related (descriptors, casting, change tracking) lives in
//! `docprop-model`.

mod ids;
mod timestamp;

pub use ids::DocumentId;
pub use timestamp::{DOCUMENT_TIME_FORMAT, format_timestamp, parse_timestamp, parse_timestamp_fast};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
