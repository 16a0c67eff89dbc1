//! Per-row validation and enrichment.

use crate::error::RowError;
use crate::types::{Diagnostic, MovieRecord, Outcome, Value};

use super::classify::{classify, classify_difference, round_to};
use super::split::validate_split;

/// Rules applied to every row on top of the score and split checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRules {
    /// Skip rows whose movie id cannot be resolved.
    pub require_id: bool,
    /// Round `score_a - score_b` to this many decimals before classifying, and record it as
    /// `reception.rating_difference`. `None` classifies the raw difference.
    pub difference_precision: Option<u32>,
}

impl Default for RowRules {
    fn default() -> Self {
        Self {
            require_id: true,
            difference_precision: None,
        }
    }
}

/// Process one record with the default [`RowRules`].
pub fn process_row(record: &MovieRecord) -> Outcome {
    process_row_with(record, &RowRules::default())
}

/// Process one record.
///
/// Checks run in order and the first failure skips the row:
///
/// 1. the reception structure and both scores are present, numeric and finite
/// 2. the cast/writer split is valid (see [`validate_split`])
/// 3. the movie id is resolvable, when [`RowRules::require_id`] is set
///
/// An accepted row is a copy of the input with `reception.category` set; the input is never
/// modified.
pub fn process_row_with(record: &MovieRecord, rules: &RowRules) -> Outcome {
    match enrich(record, rules) {
        Ok(accepted) => Outcome::Accepted(accepted),
        Err(reason) => Outcome::Skipped(Diagnostic::for_row(record.id.clone(), reason)),
    }
}

fn enrich(record: &MovieRecord, rules: &RowRules) -> Result<MovieRecord, RowError> {
    let reception = record
        .reception
        .as_ref()
        .ok_or_else(|| RowError::missing("reception"))?;
    let score_a = score(&reception.score_a, "score_a")?;
    let score_b = score(&reception.score_b, "score_b")?;

    let cast = record.cast_names.as_deref().unwrap_or(&[]);
    let writers = record.writer_names.as_deref().unwrap_or(&[]);
    validate_split(cast, writers)?;

    if rules.require_id && record.id.is_none() {
        return Err(RowError::missing("id"));
    }

    let mut out = record.clone();
    if let Some(r) = out.reception.as_mut() {
        match rules.difference_precision {
            Some(precision) => {
                let diff = round_to(score_a - score_b, precision);
                r.category = Some(classify_difference(diff));
                r.extra
                    .insert("rating_difference".to_string(), serde_json::Value::from(diff));
            }
            None => r.category = Some(classify(score_a, score_b)),
        }
    }
    Ok(out)
}

/// Interpret a score value. Numeric text is accepted; non-finite numbers are not.
pub(crate) fn score(value: &Value, field: &str) -> Result<f64, RowError> {
    let n = match value {
        Value::Null => return Err(RowError::missing(field)),
        Value::Int64(v) => *v as f64,
        Value::Float64(v) => *v,
        Value::Utf8(s) if s.trim().is_empty() => return Err(RowError::missing(field)),
        Value::Utf8(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| RowError::malformed(field, s.as_str(), e.to_string()))?,
        Value::Bool(_) => return Err(RowError::malformed(field, value.raw(), "expected number")),
    };
    if !n.is_finite() {
        return Err(RowError::malformed(field, value.raw(), "score must be finite"));
    }
    Ok(n)
}
