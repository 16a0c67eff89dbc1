//! Per-row validation and enrichment.
//!
//! The processing layer turns adapter output into a [`crate::types::ProcessingResult`]:
//!
//! - [`classify()`]: derive a [`crate::types::Category`] from two scores
//! - [`validate_split()`]: check that the cast and writer lists line up
//! - [`process_row()`]: validate and enrich one record, or skip it with a diagnostic
//! - [`run()`] / [`run_rows()`]: drive a whole batch in input order
//! - [`apply_baseline()`]: derive missing comparison scores from group means
//!
//! Nothing here logs. Diagnostics are returned as values and the caller forwards them to a
//! sink (see [`crate::observability`]).
//!
//! ## Example
//!
//! ```rust
//! use movie_refinery::processing::run;
//! use movie_refinery::types::{Category, MovieRecord, Reception, RecordId, Value};
//!
//! let movie = MovieRecord {
//!     id: Some(RecordId::Int(1)),
//!     reception: Some(Reception::new(Value::Float64(5.0), Value::Float64(3.0))),
//!     cast_names: Some(vec!["A".to_string(), "B".to_string()]),
//!     writer_names: Some(vec!["X".to_string(), "Y".to_string()]),
//!     ..Default::default()
//! };
//!
//! let result = run(vec![movie]);
//! assert_eq!(result.accepted[0].category(), Some(Category::AboveAverage));
//! assert!(result.diagnostics.is_empty());
//! ```

pub mod baseline;
pub mod batch;
pub mod classify;
pub mod row;
pub mod split;

pub use baseline::{apply_baseline, group_means, BaselinePolicy};
pub use batch::{run, run_rows};
pub use classify::{classify, CATEGORY_THRESHOLD};
pub use row::{process_row, process_row_with, RowRules};
pub use split::validate_split;
