//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_from_path`]. If [`IngestOptions::format`] is `None`, the
//! format is inferred from the file extension.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::SourceRow;

use super::csv::ColumnMapping;
use super::{csv, json};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated values.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
}

impl InputFormat {
    /// Parse an input format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Options controlling unified ingestion behavior.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<InputFormat>,
    /// CSV column names. Ignored for JSON.
    pub columns: ColumnMapping,
}

/// Read all rows from `path`.
///
/// ```no_run
/// use movie_refinery::ingestion::{ingest_from_path, IngestOptions};
///
/// # fn main() -> Result<(), movie_refinery::IngestionError> {
/// let rows = ingest_from_path("movies.csv", &IngestOptions::default())?;
/// println!("rows={}", rows.len());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestOptions) -> IngestionResult<Vec<SourceRow>> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    match fmt {
        InputFormat::Csv => csv::ingest_csv_from_path(path, &options.columns),
        InputFormat::Json => json::ingest_json_from_path(path),
    }
}

fn infer_format_from_path(path: &Path) -> IngestionResult<InputFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    InputFormat::from_extension(ext).ok_or_else(|| IngestionError::SchemaMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}
