//! Diagnostic sinks.
//!
//! The processing core returns diagnostics as values; a [`DiagnosticSink`] is how the
//! surrounding program hands them to a log backend. [`ProcessingResult::report_to`] forwards
//! every diagnostic in input order and then the batch summary.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::{BatchSummary, Diagnostic, ProcessingResult, Severity};

/// Receiver for row diagnostics and batch summaries.
///
/// Implementors can record metrics, write logs, or trigger alerts.
pub trait DiagnosticSink: Send + Sync {
    /// Called once per skipped row.
    fn on_diagnostic(&self, _diagnostic: &Diagnostic) {}

    /// Called instead of [`Self::on_diagnostic`] when a diagnostic meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_diagnostic`].
    fn on_alert(&self, diagnostic: &Diagnostic) {
        self.on_diagnostic(diagnostic)
    }

    /// Called once per batch, after all diagnostics.
    fn on_summary(&self, _summary: &BatchSummary) {}
}

impl ProcessingResult {
    /// Forward every diagnostic, then the summary, to `sink`.
    ///
    /// Diagnostics at or above `alert_at_or_above` go to [`DiagnosticSink::on_alert`].
    pub fn report_to(&self, sink: &dyn DiagnosticSink, alert_at_or_above: Option<Severity>) {
        for d in &self.diagnostics {
            match alert_at_or_above {
                Some(threshold) if d.severity >= threshold => sink.on_alert(d),
                _ => sink.on_diagnostic(d),
            }
        }
        sink.on_summary(&self.summary());
    }
}

/// A sink that fans out callbacks to a list of sinks.
#[derive(Default)]
pub struct CompositeSink {
    sinks: Vec<Arc<dyn DiagnosticSink>>,
}

impl CompositeSink {
    pub fn new(sinks: Vec<Arc<dyn DiagnosticSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn DiagnosticSink>) {
        self.sinks.push(sink);
    }
}

impl fmt::Debug for CompositeSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeSink")
            .field("sinks_len", &self.sinks.len())
            .finish()
    }
}

impl DiagnosticSink for CompositeSink {
    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        for s in &self.sinks {
            s.on_diagnostic(diagnostic);
        }
    }

    fn on_alert(&self, diagnostic: &Diagnostic) {
        for s in &self.sinks {
            s.on_alert(diagnostic);
        }
    }

    fn on_summary(&self, summary: &BatchSummary) {
        for s in &self.sinks {
            s.on_summary(summary);
        }
    }
}

/// Forwards diagnostics to `tracing`: warnings at WARN, errors at ERROR, summaries at INFO.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn on_diagnostic(&self, d: &Diagnostic) {
        let movie_id = id_label(d);
        match d.severity {
            Severity::Warning => tracing::warn!(row = ?d.position, %movie_id, "{}", d.message),
            Severity::Error => tracing::error!(row = ?d.position, %movie_id, "{}", d.message),
        }
    }

    fn on_alert(&self, d: &Diagnostic) {
        let movie_id = id_label(d);
        tracing::error!(row = ?d.position, %movie_id, severity = %d.severity, "ALERT {}", d.message);
    }

    fn on_summary(&self, summary: &BatchSummary) {
        tracing::info!(
            total = summary.total,
            accepted = summary.accepted,
            skipped = summary.skipped,
            "{summary}"
        );
    }
}

/// Appends diagnostics to a local audit file, one line per event.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSink {
    /// Create a file sink that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl DiagnosticSink for FileSink {
    fn on_diagnostic(&self, d: &Diagnostic) {
        self.append_line(&format!(
            "{} {} row={} id={} {}",
            unix_ts(),
            d.severity,
            position_label(d),
            id_label(d),
            d.message
        ));
    }

    fn on_alert(&self, d: &Diagnostic) {
        self.append_line(&format!(
            "{} ALERT {} row={} id={} {}",
            unix_ts(),
            d.severity,
            position_label(d),
            id_label(d),
            d.message
        ));
    }

    fn on_summary(&self, summary: &BatchSummary) {
        self.append_line(&format!("{} summary {}", unix_ts(), summary));
    }
}

fn id_label(d: &Diagnostic) -> String {
    d.row_id
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "unknown".to_string())
}

fn position_label(d: &Diagnostic) -> String {
    d.position
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{CompositeSink, DiagnosticSink, FileSink};
    use crate::error::RowError;
    use crate::types::{BatchSummary, Diagnostic, ProcessingResult, RecordId, Severity};

    #[derive(Default)]
    struct RecordingSink {
        seen: Mutex<Vec<String>>,
        alerts: Mutex<Vec<Severity>>,
        summaries: Mutex<Vec<BatchSummary>>,
    }

    impl DiagnosticSink for RecordingSink {
        fn on_diagnostic(&self, d: &Diagnostic) {
            self.seen.lock().unwrap().push(d.message.clone());
        }

        fn on_alert(&self, d: &Diagnostic) {
            self.alerts.lock().unwrap().push(d.severity);
        }

        fn on_summary(&self, summary: &BatchSummary) {
            self.summaries.lock().unwrap().push(*summary);
        }
    }

    fn result_with_two_diagnostics() -> ProcessingResult {
        ProcessingResult {
            accepted: Vec::new(),
            diagnostics: vec![
                Diagnostic::for_row(Some(RecordId::Int(1)), RowError::missing("writer")).at_position(0),
                Diagnostic::for_row(None, RowError::unexpected("row is not a json object")).at_position(1),
            ],
        }
    }

    #[test]
    fn report_forwards_in_order_then_summary() {
        let sink = RecordingSink::default();
        result_with_two_diagnostics().report_to(&sink, None);

        let seen = sink.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].contains("movie id 1"));
        assert!(seen[1].contains("unknown id"));
        assert!(sink.alerts.lock().unwrap().is_empty());

        let summaries = sink.summaries.lock().unwrap().clone();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].skipped, 2);
        assert_eq!(summaries[0].errors, 1);
    }

    #[test]
    fn alert_threshold_routes_errors_to_on_alert() {
        let sink = RecordingSink::default();
        result_with_two_diagnostics().report_to(&sink, Some(Severity::Error));

        assert_eq!(sink.seen.lock().unwrap().len(), 1);
        assert_eq!(sink.alerts.lock().unwrap().clone(), vec![Severity::Error]);
    }

    #[test]
    fn composite_fans_out() {
        let a = Arc::new(RecordingSink::default());
        let b = Arc::new(RecordingSink::default());
        let composite = CompositeSink::new(vec![
            a.clone() as Arc<dyn DiagnosticSink>,
            b.clone() as Arc<dyn DiagnosticSink>,
        ]);
        result_with_two_diagnostics().report_to(&composite, None);

        assert_eq!(a.seen.lock().unwrap().len(), 2);
        assert_eq!(b.seen.lock().unwrap().len(), 2);
        assert_eq!(b.summaries.lock().unwrap().len(), 1);
    }

    #[test]
    fn file_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        let sink = FileSink::new(&path);
        result_with_two_diagnostics().report_to(&sink, Some(Severity::Error));

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("warning row=0 id=1"));
        assert!(lines[1].contains("ALERT error row=1 id=unknown"));
        assert!(lines[2].contains("summary processed 2 row(s)"));
    }
}
