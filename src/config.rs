//! Run configuration.
//!
//! Every path the pipeline touches comes in through [`PipelineConfig`]; nothing in the
//! processing core knows where its input came from or where its output goes.

use std::path::PathBuf;

use crate::error::{PipelineError, PipelineResult};
use crate::execution::ExecutionOptions;
use crate::ingestion::{ColumnMapping, InputFormat};
use crate::processing::{BaselinePolicy, RowRules};
use crate::types::Severity;

/// Everything needed for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Movie records to refine.
    pub input: PathBuf,
    /// Where the refined JSON array is written.
    pub output: PathBuf,
    /// Optional expected output to compare against after writing.
    pub reference: Option<PathBuf>,
    /// If `None`, inferred from the input's extension.
    pub format: Option<InputFormat>,
    pub columns: ColumnMapping,
    pub baseline: BaselinePolicy,
    pub rules: RowRules,
    /// `Some` selects the parallel engine; `None` runs sequentially.
    pub execution: Option<ExecutionOptions>,
    /// Optional JSON list of known writers; accepted records get their writers flagged.
    pub writer_registry: Option<PathBuf>,
    /// Optional JSON records with `id` and `extra_genres`; attached to accepted records.
    pub extra_genres: Option<PathBuf>,
    /// Optional append-only audit file for diagnostics.
    pub audit_log: Option<PathBuf>,
    /// Diagnostics at or above this severity are raised as alerts.
    pub alert_at_or_above: Option<Severity>,
}

impl PipelineConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            ..Default::default()
        }
    }

    /// Reject configurations that cannot run.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.input.as_os_str().is_empty() {
            return Err(PipelineError::configuration("input path is empty"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(PipelineError::configuration("output path is empty"));
        }
        if self.input == self.output {
            return Err(PipelineError::configuration(format!(
                "output path would overwrite the input ({})",
                self.input.display()
            )));
        }
        if let BaselinePolicy::GroupMean { group_by, .. } = &self.baseline {
            if group_by.trim().is_empty() {
                return Err(PipelineError::configuration("baseline group field is empty"));
            }
        }
        if let Some(exec) = &self.execution {
            if exec.chunk_size == 0 {
                return Err(PipelineError::configuration("chunk_size must be > 0"));
            }
        }
        for lookup in [&self.writer_registry, &self.extra_genres].into_iter().flatten() {
            if *lookup == self.output {
                return Err(PipelineError::configuration(format!(
                    "output path would overwrite a lookup file ({})",
                    lookup.display()
                )));
            }
        }
        Ok(())
    }
}
