//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult, RowError};
use crate::types::{MovieRecord, Reception, RecordId, RejectedRow, SourceRow, Value};

/// Names of the CSV columns that feed the known [`MovieRecord`] fields.
///
/// Every other column is passed through as a string field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Movie id column. Optional in the file: when absent every id is unknown.
    pub id: String,
    pub score_a: String,
    /// `None` when `score_b` is derived rather than read (see
    /// [`crate::processing::BaselinePolicy`]).
    pub score_b: Option<String>,
    pub cast: String,
    pub writer: String,
    /// Separator between names inside the cast and writer cells.
    pub list_delimiter: char,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            score_a: "score_a".to_string(),
            score_b: Some("score_b".to_string()),
            cast: "cast".to_string(),
            writer: "writer".to_string(),
            list_delimiter: ',',
        }
    }
}

/// Ingest a CSV file into adapter rows.
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain the score, cast and writer columns (order can differ).
/// - Blank score cells are missing; non-numeric ones are kept as text so the row processor can
///   report them.
/// - A record with the wrong field count becomes a rejected row that keeps its id when the id
///   cell is present. Other undecodable records are rejected too; I/O failures abort ingestion.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, columns: &ColumnMapping) -> IngestionResult<Vec<SourceRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, columns)
}

/// Ingest CSV data from an existing CSV reader.
///
/// Build the reader with `flexible(true)` so short or long records still report their id;
/// a strict reader fails them before the id cell can be read.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    columns: &ColumnMapping,
) -> IngestionResult<Vec<SourceRow>> {
    let headers = rdr.headers()?.clone();
    let find = |name: &str| headers.iter().position(|h| h.trim() == name);
    let require = |name: &str| {
        find(name).ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!(
                "missing required column '{name}'. headers={:?}",
                headers.iter().collect::<Vec<_>>()
            ),
        })
    };

    let id_idx = find(&columns.id);
    let score_a_idx = require(&columns.score_a)?;
    let score_b_idx = match &columns.score_b {
        Some(name) => Some(require(name)?),
        None => None,
    };
    let cast_idx = require(&columns.cast)?;
    let writer_idx = require(&columns.writer)?;

    let known = [Some(score_a_idx), score_b_idx, Some(cast_idx), Some(writer_idx), id_idx];
    let extra_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| !known.contains(&Some(*idx)))
        .map(|(idx, name)| (idx, name.trim().to_owned()))
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                rows.push(Err(RejectedRow::new(
                    None,
                    RowError::unexpected(format!("unreadable csv record at line {line}: {e}")),
                )));
                continue;
            }
        };

        let cell = |idx: usize| record.get(idx).unwrap_or("");
        let id = id_idx.and_then(|idx| RecordId::from_text(cell(idx)));

        if record.len() != headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            rows.push(Err(RejectedRow::new(
                id,
                RowError::unexpected(format!(
                    "csv record at line {line} has {} field(s), expected {}",
                    record.len(),
                    headers.len()
                )),
            )));
            continue;
        }

        let mut extra = serde_json::Map::new();
        for (idx, name) in &extra_cols {
            extra.insert(name.clone(), serde_json::Value::String(cell(*idx).to_owned()));
        }

        let score_b = match score_b_idx {
            Some(idx) => parse_score(cell(idx)),
            None => Value::Null,
        };

        rows.push(Ok(MovieRecord {
            id,
            reception: Some(Reception::new(parse_score(cell(score_a_idx)), score_b)),
            cast_names: Some(split_names(cell(cast_idx), columns.list_delimiter)),
            writer_names: Some(split_names(cell(writer_idx), columns.list_delimiter)),
            extra,
        }));
    }

    Ok(rows)
}

fn parse_score(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match trimmed.parse::<f64>() {
        Ok(v) => Value::Float64(v),
        Err(_) => Value::Utf8(trimmed.to_owned()),
    }
}

/// Split a delimited name list. A blank cell is an empty list; blank entries keep their slot.
fn split_names(raw: &str, delimiter: char) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(delimiter).map(|s| s.trim().to_owned()).collect()
}
