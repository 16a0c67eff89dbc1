//! Batch entry point: ingest, refine, report, annotate, write.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::enrichment::Enrichment;
use crate::error::PipelineResult;
use crate::execution::{ExecutionEngine, TracingExecutionObserver};
use crate::ingestion::{ingest_from_path, IngestOptions};
use crate::observability::{CompositeSink, DiagnosticSink, FileSink, TracingSink};
use crate::output::{compare_with_reference, write_json_to_path, ReferenceReport};
use crate::processing::{apply_baseline, run_rows};
use crate::types::{BatchSummary, ProcessingResult};

/// What a pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub summary: BatchSummary,
    pub result: ProcessingResult,
    /// Present when a reference document was configured.
    pub reference: Option<ReferenceReport>,
}

/// The sink a command-line run reports to: `tracing`, plus the audit file if configured.
pub fn default_sink(config: &PipelineConfig) -> CompositeSink {
    let tracing_sink: Arc<dyn DiagnosticSink> = Arc::new(TracingSink);
    let mut sink = CompositeSink::new(vec![tracing_sink]);
    if let Some(path) = &config.audit_log {
        sink.push(Arc::new(FileSink::new(path)));
    }
    sink
}

/// Run one batch as described by `config`, forwarding diagnostics to `sink`.
///
/// Only unreadable input or lookup files, an unwritable output, an unusable reference document
/// or a bad configuration fail the run; row problems end up in the report.
pub fn run_pipeline(config: &PipelineConfig, sink: &dyn DiagnosticSink) -> PipelineResult<PipelineReport> {
    config.validate()?;

    let options = IngestOptions {
        format: config.format,
        columns: config.columns.clone(),
    };
    let enrichment = Enrichment::load(config.writer_registry.as_deref(), config.extra_genres.as_deref())?;
    let rows = ingest_from_path(&config.input, &options)?;
    debug!(rows = rows.len(), input = %config.input.display(), "ingested input");

    let rows = apply_baseline(rows, &config.baseline);
    let rules = config.baseline.row_rules(config.rules);

    let mut result = match &config.execution {
        Some(opts) => {
            let engine = ExecutionEngine::new(opts.clone())?.with_observer(Arc::new(TracingExecutionObserver));
            debug!(threads = engine.threads(), chunk_size = opts.chunk_size, "processing in parallel");
            engine.process_parallel(&rows, &rules)
        }
        None => run_rows(rows, &rules),
    };

    result.report_to(sink, config.alert_at_or_above);

    if !enrichment.is_empty() {
        enrichment.apply(&mut result.accepted);
        debug!(records = result.accepted.len(), "applied writer/genre lookups");
    }

    write_json_to_path(&config.output, &result.accepted)?;
    info!(
        records = result.accepted.len(),
        output = %config.output.display(),
        "output written"
    );

    let reference = match &config.reference {
        Some(path) => Some(compare_with_reference(&result.accepted, path)?),
        None => None,
    };

    Ok(PipelineReport {
        summary: result.summary(),
        result,
        reference,
    })
}
