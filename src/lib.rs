//! `movie-refinery` validates movie records, repairs or skips each one, and enriches the
//! survivors with a derived reception [`types::Category`].
//!
//! The heart of the crate is the per-row pipeline in [`processing`]:
//!
//! - [`processing::classify`]: `score_a - score_b` above 0.5 is "Above Average", below -0.5 is
//!   "Below Average", anything else is "Average"
//! - [`processing::validate_split`]: cast and writer lists must both be non-empty and the same
//!   length
//! - [`processing::process_row`]: one record in, one [`types::Outcome`] out, either an enriched
//!   copy or a [`types::Diagnostic`]
//! - [`processing::run`]: a whole batch, in order, with exactly one outcome per input row
//!
//! A bad row never stops a batch. The core never logs either: diagnostics are values that the
//! caller forwards to a [`observability::DiagnosticSink`].
//!
//! ## Quick example
//!
//! ```rust
//! use movie_refinery::processing::run;
//! use movie_refinery::types::{Category, MovieRecord, Reception, RecordId, Severity, Value};
//!
//! fn names(xs: &[&str]) -> Option<Vec<String>> {
//!     Some(xs.iter().map(|s| s.to_string()).collect())
//! }
//!
//! let input = vec![
//!     MovieRecord {
//!         id: Some(RecordId::Int(1)),
//!         reception: Some(Reception::new(Value::Float64(5.0), Value::Float64(3.0))),
//!         cast_names: names(&["A", "B"]),
//!         writer_names: names(&["X", "Y"]),
//!         ..Default::default()
//!     },
//!     MovieRecord {
//!         id: Some(RecordId::Int(2)),
//!         reception: Some(Reception::new(Value::Float64(2.0), Value::Float64(2.2))),
//!         cast_names: names(&["A"]),
//!         writer_names: Some(Vec::new()),
//!         ..Default::default()
//!     },
//! ];
//!
//! let result = run(input);
//! assert_eq!(result.accepted.len(), 1);
//! assert_eq!(result.accepted[0].category(), Some(Category::AboveAverage));
//! assert_eq!(result.diagnostics[0].severity, Severity::Warning);
//! assert!(result.diagnostics[0].message.contains("writer"));
//! ```
//!
//! ## Files in, files out
//!
//! ```no_run
//! use movie_refinery::config::PipelineConfig;
//! use movie_refinery::observability::TracingSink;
//! use movie_refinery::pipeline::run_pipeline;
//!
//! # fn main() -> Result<(), movie_refinery::PipelineError> {
//! let config = PipelineConfig::new("movies.csv", "output_refined.json");
//! let report = run_pipeline(&config, &TracingSink)?;
//! println!("{}", report.summary);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: records, diagnostics and batch results
//! - [`processing`]: classifier, split validator, row processor, batch driver, baselines
//! - [`ingestion`]: CSV and JSON input adapters
//! - [`enrichment`]: writer registry and extra-genre lookups for accepted records
//! - [`output`]: JSON writer and reference comparison
//! - [`observability`]: diagnostic sinks (`tracing`, audit file, fan-out)
//! - [`execution`]: order-preserving parallel batch engine
//! - [`config`] / [`pipeline`] / [`cli`]: run configuration and entry points
//! - [`error`]: error types

pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod execution;
pub mod ingestion;
pub mod observability;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod types;

pub use error::{IngestionError, IngestionResult, PipelineError, PipelineResult, RowError, SplitError};
