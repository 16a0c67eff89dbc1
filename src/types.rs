//! Core data model types.
//!
//! A [`MovieRecord`] is what the input adapters produce and what the row processor accepts
//! (enriched with a [`Category`]). Row-level problems are described by [`Diagnostic`]s, and a
//! whole batch is summarized by [`ProcessingResult`].

use std::fmt;

use serde::Serialize;

use crate::error::RowError;

/// A single loosely typed scalar value.
///
/// Scores are kept in this form until the row processor interprets them, so that a missing or
/// non-numeric score becomes a row diagnostic instead of an ingestion failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render the value the way it appeared in the source, for diagnostics.
    pub fn raw(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Int64(v) => v.to_string(),
            Self::Float64(v) => v.to_string(),
            Self::Bool(v) => v.to_string(),
            Self::Utf8(s) => s.clone(),
        }
    }
}

/// Movie identifier as supplied by the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Build a textual id; blank text is not a resolvable id.
    pub fn from_text(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::Text(trimmed.to_owned()))
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Derived reception label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "Above Average")]
    AboveAverage,
    #[serde(rename = "Below Average")]
    BelowAverage,
    #[serde(rename = "Average")]
    Average,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::AboveAverage, Self::BelowAverage, Self::Average];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AboveAverage => "Above Average",
            Self::BelowAverage => "Below Average",
            Self::Average => "Average",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pair of scores and the category derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reception {
    pub score_a: Value,
    pub score_b: Value,
    /// Derived; anything supplied by the source is overwritten.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Other reception fields, kept as supplied.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Reception {
    pub fn new(score_a: Value, score_b: Value) -> Self {
        Self {
            score_a,
            score_b,
            category: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// One movie row.
///
/// Fields other than the id, reception and cast/writer lists are carried in `extra` and
/// serialized unchanged alongside the known fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MovieRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reception: Option<Reception>,
    #[serde(rename = "cast", skip_serializing_if = "Option::is_none")]
    pub cast_names: Option<Vec<String>>,
    #[serde(rename = "writer", skip_serializing_if = "Option::is_none")]
    pub writer_names: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MovieRecord {
    /// Returns the category, if the record has been classified.
    pub fn category(&self) -> Option<Category> {
        self.reception.as_ref().and_then(|r| r.category)
    }
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// The row failed validation.
    Warning,
    /// The row hit an unexpected structural failure.
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured record of a skipped row.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Zero-based position of the row in the input, stamped by the batch driver.
    pub position: Option<usize>,
    pub row_id: Option<RecordId>,
    pub severity: Severity,
    pub reason: RowError,
    pub message: String,
}

impl Diagnostic {
    /// Build a diagnostic for a row; the message always names the id or says it is unknown.
    pub fn for_row(row_id: Option<RecordId>, reason: RowError) -> Self {
        let who = match &row_id {
            Some(id) => format!("movie id {id}"),
            None => "movie with unknown id".to_string(),
        };
        Self {
            position: None,
            severity: reason.severity(),
            message: format!("skipping {who}: {reason}"),
            row_id,
            reason,
        }
    }

    pub fn at_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(f, "[{}] row {}: {}", self.severity, pos, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// A row the input adapter could not shape into a [`MovieRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    pub id: Option<RecordId>,
    pub reason: RowError,
}

impl RejectedRow {
    pub fn new(id: Option<RecordId>, reason: RowError) -> Self {
        Self { id, reason }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::for_row(self.id, self.reason)
    }
}

/// What an input adapter yields per source row.
pub type SourceRow = Result<MovieRecord, RejectedRow>;

/// Per-row result of processing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Accepted(MovieRecord),
    Skipped(Diagnostic),
}

/// Result of a batch run: surviving records and diagnostics, both in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessingResult {
    pub accepted: Vec<MovieRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ProcessingResult {
    /// Number of input rows represented by this result.
    pub fn total(&self) -> usize {
        self.accepted.len() + self.diagnostics.len()
    }

    pub fn summary(&self) -> BatchSummary {
        let errors = self
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        BatchSummary {
            total: self.total(),
            accepted: self.accepted.len(),
            skipped: self.diagnostics.len(),
            warnings: self.diagnostics.len() - errors,
            errors,
        }
    }
}

/// Accepted vs skipped counts for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub accepted: usize,
    pub skipped: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {} row(s): {} accepted, {} skipped ({} warning(s), {} error(s))",
            self.total, self.accepted, self.skipped, self.warnings, self.errors
        )
    }
}
