//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A single JSON object (one record)
//! - A JSON array of objects: `[{"id":1, ...}, {"id":2, ...}]`
//! - Newline-delimited JSON (NDJSON): `{"id":1, ...}\n{"id":2, ...}\n`
//!
//! Each object uses the same layout [`MovieRecord`] serializes to: `id`, a `reception` object
//! with `score_a`/`score_b`, `cast` and `writer` string arrays, and any other keys, which pass
//! through unchanged. Refined output can therefore be ingested again.

use std::fs;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult, RowError};
use crate::types::{MovieRecord, Reception, RecordId, RejectedRow, SourceRow, Value};

const KNOWN_KEYS: [&str; 4] = ["id", "reception", "cast", "writer"];
const RECEPTION_KEYS: [&str; 3] = ["score_a", "score_b", "category"];

/// Ingest a JSON file into adapter rows.
pub fn ingest_json_from_path(path: impl AsRef<Path>) -> IngestionResult<Vec<SourceRow>> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text)
}

/// Ingest JSON from an in-memory string.
pub fn ingest_json_from_str(input: &str) -> IngestionResult<Vec<SourceRow>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // A whole document wins; NDJSON is only tried when the input does not parse as one.
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Array(items)) => return Ok(items.iter().map(convert_row).collect()),
        Ok(v @ serde_json::Value::Object(_)) => return Ok(vec![convert_row(&v)]),
        Ok(_) => {
            return Err(IngestionError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            });
        }
        Err(e) if trimmed.starts_with('[') => return Err(e.into()),
        Err(_) => {}
    }

    let mut rows = Vec::new();
    for (i, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<serde_json::Value>(line) {
            Ok(v) => rows.push(convert_row(&v)),
            Err(e) => rows.push(Err(RejectedRow::new(
                None,
                RowError::unexpected(format!("invalid ndjson at line {}: {}", i + 1, e)),
            ))),
        }
    }
    Ok(rows)
}

/// Shape one JSON value into a record, or reject it.
fn convert_row(v: &serde_json::Value) -> SourceRow {
    let obj = v
        .as_object()
        .ok_or_else(|| RejectedRow::new(None, RowError::unexpected("row is not a json object")))?;

    let id = obj.get("id").and_then(record_id);
    let reject = |reason: RowError| RejectedRow::new(id.clone(), reason);

    let reception = match obj.get("reception") {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::Object(r)) => {
            let mut reception = Reception::new(
                r.get("score_a").map(scalar).unwrap_or(Value::Null),
                r.get("score_b").map(scalar).unwrap_or(Value::Null),
            );
            reception.extra = r
                .iter()
                .filter(|(k, _)| !RECEPTION_KEYS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            Some(reception)
        }
        Some(_) => {
            return Err(reject(RowError::unexpected("field 'reception' is not an object")));
        }
    };

    let cast_names = name_list(obj.get("cast"), "cast").map_err(reject)?;
    let writer_names = name_list(obj.get("writer"), "writer").map_err(reject)?;

    let extra = obj
        .iter()
        .filter(|(k, _)| !KNOWN_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(MovieRecord {
        id,
        reception,
        cast_names,
        writer_names,
        extra,
    })
}

fn record_id(v: &serde_json::Value) -> Option<RecordId> {
    match v {
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Some(RecordId::Int(i)),
            None => Some(RecordId::Text(n.to_string())),
        },
        serde_json::Value::String(s) => RecordId::from_text(s),
        _ => None,
    }
}

fn scalar(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => n.as_f64().map(Value::Float64).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        other => Value::Utf8(other.to_string()),
    }
}

fn name_list(v: Option<&serde_json::Value>, field: &str) -> Result<Option<Vec<String>>, RowError> {
    let items = match v {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::Array(items)) => items,
        Some(other) => {
            return Err(RowError::malformed(field, other.to_string(), "expected an array of strings"));
        }
    };
    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_owned).ok_or_else(|| {
                RowError::malformed(field, item.to_string(), "expected an array of strings")
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::{convert_row, ingest_json_from_str, record_id, scalar};
    use crate::error::{IngestionError, RowError};
    use crate::types::{RecordId, Value};

    #[test]
    fn ids_resolve_from_numbers_and_text() {
        assert_eq!(record_id(&serde_json::json!(7)), Some(RecordId::Int(7)));
        assert_eq!(
            record_id(&serde_json::json!("tt01")),
            Some(RecordId::Text("tt01".to_string()))
        );
        assert_eq!(record_id(&serde_json::json!("")), None);
        assert_eq!(record_id(&serde_json::json!(true)), None);
    }

    #[test]
    fn scalars_keep_their_kind() {
        assert_eq!(scalar(&serde_json::json!(3)), Value::Int64(3));
        assert_eq!(scalar(&serde_json::json!(3.5)), Value::Float64(3.5));
        assert_eq!(scalar(&serde_json::json!("x")), Value::Utf8("x".to_string()));
        assert_eq!(scalar(&serde_json::json!(null)), Value::Null);
    }

    #[test]
    fn supplied_category_is_dropped() {
        let row = convert_row(&serde_json::json!({
            "id": 1,
            "reception": {"score_a": 1, "score_b": 2, "category": "Above Average"},
        }))
        .unwrap();
        assert_eq!(row.category(), None);
        assert!(row.reception.unwrap().extra.is_empty());
    }

    #[test]
    fn other_reception_fields_are_kept() {
        let row = convert_row(&serde_json::json!({
            "id": 1,
            "reception": {"score_a": 5, "score_b": 3, "rating_difference": 2.0, "source": "imdb"},
        }))
        .unwrap();
        let extra = row.reception.unwrap().extra;
        assert_eq!(extra.get("rating_difference"), Some(&serde_json::json!(2.0)));
        assert_eq!(extra.get("source"), Some(&serde_json::json!("imdb")));
        assert_eq!(extra.len(), 2);
    }

    #[test]
    fn pretty_printed_single_object_is_one_record() {
        let input = "{\n  \"id\": 1,\n  \"reception\": {\"score_a\": 5, \"score_b\": 3},\n  \"cast\": [\"A\"],\n  \"writer\": [\"X\"]\n}\n";
        let rows = ingest_json_from_str(input).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].as_ref().unwrap().id, Some(RecordId::Int(1)));
    }

    #[test]
    fn single_line_ndjson_is_one_record() {
        let rows = ingest_json_from_str("{\"id\": 2}\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_ok());
    }

    #[test]
    fn top_level_scalar_is_a_schema_mismatch() {
        assert!(matches!(
            ingest_json_from_str("42"),
            Err(IngestionError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn non_string_cast_entry_is_rejected_with_id() {
        let err = convert_row(&serde_json::json!({
            "id": 5,
            "reception": {"score_a": 1, "score_b": 2},
            "cast": ["A", 3],
            "writer": ["X", "Y"],
        }))
        .unwrap_err();
        assert_eq!(err.id, Some(RecordId::Int(5)));
        assert!(matches!(err.reason, RowError::MalformedValue { ref field, .. } if field == "cast"));
    }
}
