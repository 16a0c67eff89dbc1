use std::path::PathBuf;

use thiserror::Error;

use crate::types::Severity;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for whole-pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type returned when an input source cannot be opened or iterated.
///
/// Problems confined to a single record never surface here; they become
/// [`crate::types::Diagnostic`]s instead.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error that is not confined to one record.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The JSON document itself could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input does not have the expected shape (missing required columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },
}

/// Error type for a full pipeline run: ingestion, output, configuration and execution.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reading the input failed.
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    /// Writing the refined output failed.
    #[error("failed to write output '{}': {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing records or reading the reference document failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The supplied configuration is unusable.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The worker pool for parallel execution could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl PipelineError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Why the cast/writer split of a record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// One of the two lists is missing or empty.
    #[error("missing or empty field '{field}'")]
    MissingField { field: &'static str },

    /// The two lists do not line up positionally.
    #[error("cast/writer count mismatch: {cast} cast name(s) vs {writers} writer name(s)")]
    CountMismatch { cast: usize, writers: usize },
}

/// Row-level failure taxonomy.
///
/// Every variant is confined to the row that produced it: the row processor turns it into a
/// skipped outcome and the batch carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// A required field (score, cast list, writer list, id) is absent or empty.
    #[error("missing or empty field '{field}'")]
    MissingField { field: String },

    /// Cast and writer lists have different lengths.
    #[error("cast/writer count mismatch: {cast} cast name(s) vs {writers} writer name(s)")]
    CountMismatch { cast: usize, writers: usize },

    /// A field is present but cannot be interpreted.
    #[error("malformed value in field '{field}': {message} (raw='{raw}')")]
    MalformedValue {
        field: String,
        raw: String,
        message: String,
    },

    /// Any other structural anomaly met while reading or processing the row.
    #[error("unexpected failure: {message}")]
    UnexpectedFailure { message: String },
}

impl RowError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }

    pub fn malformed(field: impl Into<String>, raw: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedValue {
            field: field.into(),
            raw: raw.into(),
            message: message.into(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedFailure {
            message: message.into(),
        }
    }

    /// Validation problems are warnings; structural anomalies are errors.
    pub fn severity(&self) -> Severity {
        match self {
            Self::MissingField { .. } | Self::CountMismatch { .. } | Self::MalformedValue { .. } => {
                Severity::Warning
            }
            Self::UnexpectedFailure { .. } => Severity::Error,
        }
    }
}

impl From<SplitError> for RowError {
    fn from(err: SplitError) -> Self {
        match err {
            SplitError::MissingField { field } => Self::missing(field),
            SplitError::CountMismatch { cast, writers } => Self::CountMismatch { cast, writers },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RowError, SplitError};
    use crate::types::Severity;

    #[test]
    fn validation_failures_are_warnings() {
        assert_eq!(RowError::missing("score_a").severity(), Severity::Warning);
        assert_eq!(
            RowError::CountMismatch { cast: 2, writers: 1 }.severity(),
            Severity::Warning
        );
        assert_eq!(
            RowError::malformed("score_b", "abc", "expected number").severity(),
            Severity::Warning
        );
    }

    #[test]
    fn structural_failures_are_errors() {
        assert_eq!(
            RowError::unexpected("row is not a json object").severity(),
            Severity::Error
        );
    }

    #[test]
    fn split_errors_convert_without_losing_counts() {
        let err: RowError = SplitError::CountMismatch { cast: 3, writers: 2 }.into();
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains('2'));

        let err: RowError = SplitError::MissingField { field: "writer" }.into();
        assert_eq!(err, RowError::missing("writer"));
    }
}
