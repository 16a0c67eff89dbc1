//! Sequential batch driver.

use crate::types::{MovieRecord, Outcome, ProcessingResult, SourceRow};

use super::row::{process_row_with, RowRules};

/// Run every record through the row processor with the default [`RowRules`].
pub fn run<I>(records: I) -> ProcessingResult
where
    I: IntoIterator<Item = MovieRecord>,
{
    run_rows(records.into_iter().map(Ok), &RowRules::default())
}

/// Run adapter output through the row processor.
///
/// Rows the adapter already rejected become diagnostics directly. Every input row yields
/// exactly one accepted record or one diagnostic, in input order, and each diagnostic is
/// stamped with its row's zero-based position.
pub fn run_rows<I>(rows: I, rules: &RowRules) -> ProcessingResult
where
    I: IntoIterator<Item = SourceRow>,
{
    let mut result = ProcessingResult::default();
    for (position, row) in rows.into_iter().enumerate() {
        result.record(position, outcome_for(&row, rules));
    }
    result
}

/// Outcome for one adapter row.
pub(crate) fn outcome_for(row: &SourceRow, rules: &RowRules) -> Outcome {
    match row {
        Ok(record) => process_row_with(record, rules),
        Err(rejected) => Outcome::Skipped(rejected.clone().into_diagnostic()),
    }
}

impl ProcessingResult {
    /// Append the outcome of the row at `position`.
    pub(crate) fn record(&mut self, position: usize, outcome: Outcome) {
        match outcome {
            Outcome::Accepted(record) => self.accepted.push(record),
            Outcome::Skipped(diag) => self.diagnostics.push(diag.at_position(position)),
        }
    }

    /// Append a result covering the rows that follow this one.
    pub(crate) fn append(&mut self, mut later: ProcessingResult) {
        self.accepted.append(&mut later.accepted);
        self.diagnostics.append(&mut later.diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::{run, run_rows};
    use crate::error::RowError;
    use crate::processing::RowRules;
    use crate::types::{Category, MovieRecord, Reception, RecordId, RejectedRow, Severity, Value};

    fn names(items: &[&str]) -> Option<Vec<String>> {
        Some(items.iter().map(|s| s.to_string()).collect())
    }

    fn movie(id: i64, a: f64, b: f64, cast: &[&str], writers: &[&str]) -> MovieRecord {
        MovieRecord {
            id: Some(RecordId::Int(id)),
            reception: Some(Reception::new(Value::Float64(a), Value::Float64(b))),
            cast_names: names(cast),
            writer_names: names(writers),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn end_to_end_scenario() {
        let input = vec![
            movie(1, 5.0, 3.0, &["A", "B"], &["X", "Y"]),
            movie(2, 2.0, 2.2, &["A"], &[]),
        ];
        let result = run(input);

        assert_eq!(result.accepted.len(), 1);
        assert_eq!(result.accepted[0].id, Some(RecordId::Int(1)));
        assert_eq!(result.accepted[0].category(), Some(Category::AboveAverage));

        assert_eq!(result.diagnostics.len(), 1);
        let d = &result.diagnostics[0];
        assert_eq!(d.row_id, Some(RecordId::Int(2)));
        assert_eq!(d.position, Some(1));
        assert_eq!(d.severity, Severity::Warning);
        assert!(d.message.contains("missing") || d.message.contains("empty"));
        assert!(d.message.contains("writer"));
    }

    #[test]
    fn every_row_is_accounted_for_in_order() {
        let input: Vec<MovieRecord> = (0..25)
            .map(|i| {
                if i % 3 == 0 {
                    movie(i, 1.0, 1.0, &["A", "B"], &["X"])
                } else {
                    movie(i, i as f64, 1.0, &["A"], &["X"])
                }
            })
            .collect();
        let n = input.len();
        let result = run(input);

        assert_eq!(result.accepted.len() + result.diagnostics.len(), n);
        assert_eq!(result.total(), n);

        let accepted_ids: Vec<_> = result.accepted.iter().map(|r| r.id.clone()).collect();
        let mut sorted = accepted_ids.clone();
        sorted.sort();
        assert_eq!(accepted_ids, sorted);

        let positions: Vec<_> = result.diagnostics.iter().filter_map(|d| d.position).collect();
        assert_eq!(positions, (0..25).step_by(3).collect::<Vec<_>>());
    }

    #[test]
    fn duplicates_are_not_collapsed() {
        let m = movie(1, 3.0, 3.0, &["A"], &["X"]);
        let result = run(vec![m.clone(), m]);
        assert_eq!(result.accepted.len(), 2);
    }

    #[test]
    fn rejected_rows_become_error_diagnostics() {
        let rows = vec![
            Ok(movie(1, 3.0, 1.0, &["A"], &["X"])),
            Err(RejectedRow::new(None, RowError::unexpected("row is not a json object"))),
            Ok(movie(3, 1.0, 3.0, &["A"], &["X"])),
        ];
        let result = run_rows(rows, &RowRules::default());

        assert_eq!(result.accepted.len(), 2);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].severity, Severity::Error);
        assert_eq!(result.diagnostics[0].position, Some(1));
        assert!(result.diagnostics[0].message.contains("unknown id"));

        let summary = result.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 0);
    }

    #[test]
    fn empty_batch_is_empty_result() {
        let result = run(Vec::new());
        assert_eq!(result.total(), 0);
        assert!(result.summary().to_string().contains("processed 0 row(s)"));
    }
}
