//! Reference comparison.
//!
//! After a run, the refined records can be checked against an expected output document (a
//! JSON array of records). Records are paired by `id`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::error::{IngestionError, PipelineResult};
use crate::types::MovieRecord;

/// How the refined records compare to the expected ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceReport {
    /// The two documents are identical, record for record and in order.
    pub exact: bool,
    /// Ids present on both sides with identical records.
    pub matched: usize,
    /// Ids present on both sides whose records differ.
    pub mismatched: Vec<String>,
    /// Ids expected but not produced.
    pub missing: Vec<String>,
    /// Ids produced but not expected.
    pub unexpected: Vec<String>,
}

impl ReferenceReport {
    pub fn is_exact_match(&self) -> bool {
        self.exact
    }
}

/// Load the expected document at `reference_path` and compare it with `generated`.
pub fn compare_with_reference(
    generated: &[MovieRecord],
    reference_path: impl AsRef<Path>,
) -> PipelineResult<ReferenceReport> {
    let text = fs::read_to_string(reference_path).map_err(IngestionError::from)?;
    let expected: serde_json::Value = serde_json::from_str(&text)?;
    let serde_json::Value::Array(expected) = expected else {
        return Err(IngestionError::SchemaMismatch {
            message: "reference must be a json array of records".to_string(),
        }
        .into());
    };
    compare_records(generated, &expected)
}

/// Compare `generated` with already-parsed expected records.
pub fn compare_records(
    generated: &[MovieRecord],
    expected: &[serde_json::Value],
) -> PipelineResult<ReferenceReport> {
    let generated = generated
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;

    let produced = index_by_id(&generated);
    let wanted = index_by_id(expected);

    let mut report = ReferenceReport {
        exact: generated.as_slice() == expected,
        ..Default::default()
    };
    for (id, want) in &wanted {
        match produced.get(id) {
            Some(got) if got == want => report.matched += 1,
            Some(_) => report.mismatched.push(id.clone()),
            None => report.missing.push(id.clone()),
        }
    }
    report.unexpected = produced
        .keys()
        .filter(|id| !wanted.contains_key(*id))
        .cloned()
        .collect();
    Ok(report)
}

/// Index records by their id; records without an id are keyed by position.
fn index_by_id(records: &[serde_json::Value]) -> BTreeMap<String, &serde_json::Value> {
    let mut seen = BTreeSet::new();
    let mut out = BTreeMap::new();
    for (pos, rec) in records.iter().enumerate() {
        let key = match rec.get("id") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => format!("#{pos}"),
        };
        // Duplicate ids are kept apart so none is silently dropped.
        let key = if seen.insert(key.clone()) {
            key
        } else {
            format!("{key}#{pos}")
        };
        seen.insert(key.clone());
        out.insert(key, rec);
    }
    out
}
