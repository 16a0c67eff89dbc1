use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use movie_refinery::cli::Args;
use movie_refinery::pipeline::{default_sink, run_pipeline};
use tracing::{info, warn};

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(&args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.to_config();
    let sink = default_sink(&config);

    let report = run_pipeline(&config, &sink)
        .with_context(|| format!("failed to refine '{}'", config.input.display()))?;

    if let Some(reference) = &report.reference {
        if reference.is_exact_match() {
            info!("output matches the reference data");
        } else {
            warn!(
                matched = reference.matched,
                mismatched = reference.mismatched.len(),
                missing = reference.missing.len(),
                unexpected = reference.unexpected.len(),
                "output does not match the reference data"
            );
        }
    }
    Ok(())
}

/// Install a stderr `tracing` subscriber; `RUST_LOG` overrides the flag-derived level.
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("movie_refinery={}", args.log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
