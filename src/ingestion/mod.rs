//! Input adapters.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]), which auto-detects the
//! format by file extension (or you can override it via [`IngestOptions`]).
//!
//! Adapters never fail on a single bad record: each source row becomes either a
//! [`crate::types::MovieRecord`] or a [`crate::types::RejectedRow`]. Only an unreadable source
//! is an [`crate::IngestionError`].
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]

pub mod csv;
pub mod json;
pub mod unified;

pub use self::csv::ColumnMapping;
pub use unified::{ingest_from_path, IngestOptions, InputFormat};
