//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::PipelineConfig;
use crate::execution::ExecutionOptions;
use crate::ingestion::{ColumnMapping, InputFormat};
use crate::processing::{BaselinePolicy, RowRules};
use crate::types::Severity;

/// Validate movie records and enrich them with a reception category.
///
/// Rows that fail validation are skipped and reported; they never stop the run.
#[derive(Debug, Clone, Parser)]
#[command(name = "movie-refinery", version, about)]
pub struct Args {
    /// Input file (.csv, .json or .ndjson)
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: PathBuf,

    /// Output file for the refined JSON array
    #[arg(short = 'o', long = "output", value_name = "PATH", default_value = "output_refined.json")]
    pub output: PathBuf,

    /// Expected output to compare the refined records against
    #[arg(long = "reference", value_name = "PATH")]
    pub reference: Option<PathBuf>,

    /// Input format (inferred from the extension if omitted)
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,

    /// CSV column holding the movie id
    #[arg(long = "id-column", default_value = "id")]
    pub id_column: String,

    /// CSV column holding the movie's own score
    #[arg(long = "score-a-column", default_value = "score_a")]
    pub score_a_column: String,

    /// CSV column holding the comparison score (ignored with --baseline-group)
    #[arg(long = "score-b-column", default_value = "score_b")]
    pub score_b_column: String,

    /// CSV column holding the delimited cast names
    #[arg(long = "cast-column", default_value = "cast")]
    pub cast_column: String,

    /// CSV column holding the delimited writer names
    #[arg(long = "writer-column", default_value = "writer")]
    pub writer_column: String,

    /// Separator between names inside cast and writer cells
    #[arg(long = "list-delimiter", default_value_t = ',')]
    pub list_delimiter: char,

    /// Derive the comparison score as the mean score of movies sharing this field (e.g. year)
    #[arg(long = "baseline-group", value_name = "FIELD")]
    pub baseline_group: Option<String>,

    /// Decimal places kept when rounding a derived comparison score
    #[arg(long = "baseline-precision", default_value_t = 2)]
    pub baseline_precision: u32,

    /// Accept rows whose movie id is missing
    #[arg(long = "allow-missing-id")]
    pub allow_missing_id: bool,

    /// Process rows on a worker pool
    #[arg(long = "parallel")]
    pub parallel: bool,

    /// Worker threads for --parallel (defaults to available parallelism)
    #[arg(long = "threads", requires = "parallel")]
    pub threads: Option<usize>,

    /// Rows per chunk for --parallel
    #[arg(long = "chunk-size", default_value_t = 4_096, requires = "parallel")]
    pub chunk_size: usize,

    /// JSON list of known writers; accepted records get a `writers` list with a `valid` flag
    #[arg(long = "writer-registry", value_name = "PATH")]
    pub writer_registry: Option<PathBuf>,

    /// JSON records with `id` and `extra_genres` to attach to accepted records
    #[arg(long = "extra-genres", value_name = "PATH")]
    pub extra_genres: Option<PathBuf>,

    /// Append every diagnostic to this file
    #[arg(long = "audit-log", value_name = "PATH")]
    pub audit_log: Option<PathBuf>,

    /// Raise error-severity diagnostics as alerts
    #[arg(long = "alert-on-errors")]
    pub alert_on_errors: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

/// Input format flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for InputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => InputFormat::Csv,
            FormatArg::Json => InputFormat::Json,
        }
    }
}

impl Args {
    /// Log level for the `movie_refinery` target.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    pub fn to_config(&self) -> PipelineConfig {
        let baseline = match &self.baseline_group {
            Some(group_by) => BaselinePolicy::GroupMean {
                group_by: group_by.clone(),
                precision: self.baseline_precision,
            },
            None => BaselinePolicy::Column,
        };
        let score_b = match baseline {
            BaselinePolicy::Column => Some(self.score_b_column.clone()),
            BaselinePolicy::GroupMean { .. } => None,
        };

        let execution = self.parallel.then(|| ExecutionOptions {
            num_threads: self.threads,
            chunk_size: self.chunk_size,
        });

        PipelineConfig {
            input: self.input.clone(),
            output: self.output.clone(),
            reference: self.reference.clone(),
            format: self.format.map(InputFormat::from),
            columns: ColumnMapping {
                id: self.id_column.clone(),
                score_a: self.score_a_column.clone(),
                score_b,
                cast: self.cast_column.clone(),
                writer: self.writer_column.clone(),
                list_delimiter: self.list_delimiter,
            },
            baseline,
            rules: RowRules {
                require_id: !self.allow_missing_id,
                ..RowRules::default()
            },
            execution,
            writer_registry: self.writer_registry.clone(),
            extra_genres: self.extra_genres.clone(),
            audit_log: self.audit_log.clone(),
            alert_at_or_above: self.alert_on_errors.then_some(Severity::Error),
        }
    }
}
