//! Baseline (`score_b`) derivation.
//!
//! Sources often carry only a movie's own rating. The comparison score can then be derived
//! as the mean rating of the movie's group (typically its release year), rounded to a fixed
//! number of decimals.

use std::collections::HashMap;

use crate::types::{MovieRecord, SourceRow, Value};

use super::classify::round_to;
use super::row::{score, RowRules};

/// Where a record's `score_b` comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BaselinePolicy {
    /// `score_b` is supplied by the source as-is.
    #[default]
    Column,
    /// Missing `score_b` values are filled with the rounded mean `score_a` of the record's group.
    GroupMean {
        /// Pass-through field holding the group key (e.g. `year`).
        group_by: String,
        /// Decimal places kept after rounding the mean.
        precision: u32,
    },
}

impl BaselinePolicy {
    /// Row rules to run with this policy: a derived baseline also rounds the score difference
    /// to the same precision before classifying, unless `rules` already asks for a precision.
    pub fn row_rules(&self, rules: RowRules) -> RowRules {
        match self {
            Self::Column => rules,
            Self::GroupMean { precision, .. } => RowRules {
                difference_precision: rules.difference_precision.or(Some(*precision)),
                ..rules
            },
        }
    }
}

/// Apply `policy` to a batch of adapter rows, returning the rows in the same order.
///
/// Only records with a reception structure and a missing `score_b` are changed: the rounded
/// mean becomes `score_b` and is also recorded as `reception.<group_by>_average_rating`.
/// Records whose group has no usable `score_a` keep a missing `score_b`.
pub fn apply_baseline(rows: Vec<SourceRow>, policy: &BaselinePolicy) -> Vec<SourceRow> {
    match policy {
        BaselinePolicy::Column => rows,
        BaselinePolicy::GroupMean { group_by, precision } => {
            let means = group_means(rows.iter().filter_map(|r| r.as_ref().ok()), group_by);
            rows.into_iter()
                .map(|row| row.map(|rec| fill_score_b(rec, group_by, &means, *precision)))
                .collect()
        }
    }
}

/// Mean of finite `score_a` values per group key.
pub fn group_means<'a, I>(records: I, group_by: &str) -> HashMap<String, f64>
where
    I: IntoIterator<Item = &'a MovieRecord>,
{
    let mut acc: HashMap<String, (f64, usize)> = HashMap::new();
    for rec in records {
        let Some(key) = group_key(rec, group_by) else {
            continue;
        };
        let Some(a) = rec.reception.as_ref().and_then(|r| score(&r.score_a, "score_a").ok()) else {
            continue;
        };
        let slot = acc.entry(key).or_insert((0.0, 0));
        slot.0 += a;
        slot.1 += 1;
    }
    acc.into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

fn fill_score_b(
    mut rec: MovieRecord,
    group_by: &str,
    means: &HashMap<String, f64>,
    precision: u32,
) -> MovieRecord {
    let mean = group_key(&rec, group_by).and_then(|k| means.get(&k).copied());
    if let (Some(mean), Some(reception)) = (mean, rec.reception.as_mut()) {
        if reception.score_b.is_null() {
            let mean = round_to(mean, precision);
            reception.score_b = Value::Float64(mean);
            reception
                .extra
                .insert(format!("{group_by}_average_rating"), serde_json::Value::from(mean));
        }
    }
    rec
}

fn group_key(rec: &MovieRecord, group_by: &str) -> Option<String> {
    match rec.extra.get(group_by)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
