// Main CLI entrypoint
// (c) 2024 Ross Younger

use std::process::ExitCode;

use super::args::CliArgs;
use super::styles::ERROR;

use crate::{batch::process_profiles, source::ResolvedSource, util::setup_tracing};
use clap::Parser;
use indicatif::MultiProgress;

/// Main CLI entrypoint
///
/// Returns the process exit code: success only if every profile was
/// processed. Failures have already been reported via the log by the time
/// this returns.
pub fn cli() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();
    let progress = MultiProgress::new(); // This writes to stderr
    let trace_level = if args.debug {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "info"
    };
    setup_tracing(trace_level, Some(&progress), &args.log_file)
        .inspect_err(|e| anstream::eprintln!("{ERROR}Failed to set up logging{ERROR:#}: {e}"))?;

    let result = ResolvedSource::new(&args.source).and_then(|source| {
        process_profiles(source.path(), &args.dest, args.min_tls, args.pia, &progress)
    });
    progress.clear()?;
    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!("Failed processing {}: {e:#}", args.source);
            Ok(ExitCode::FAILURE)
        }
    }
}
