//! Tracing helpers
// (c) 2024 Ross Younger

use std::{
    fs::File,
    io::Write,
    sync::{Arc, Mutex},
};

use anyhow::Context;
use indicatif::MultiProgress;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

const STANDARD_ENV_VAR: &str = "RUST_LOG";
const LOG_FILE_DETAIL_ENV_VAR: &str = "RUST_LOG_FILE_DETAIL";

/// Builds a log filter from the first of `keys` that is set in the
/// environment, falling back to our own events at `trace_level`.
///
/// The returned bool is whether an environment variable was used. Callers
/// show log targets in that case, as the filter may span other crates.
fn filter_from_env(trace_level: &str, keys: &[&str]) -> anyhow::Result<(EnvFilter, bool)> {
    for key in keys {
        match EnvFilter::try_from_env(key) {
            Ok(filter) => return Ok((filter, true)),
            Err(e) => {
                // Set but invalid is a hard error; unset means try the next
                anyhow::ensure!(
                    std::env::var(key).is_err(),
                    "{key} (set in environment) was invalid: {e}"
                );
            }
        }
    }
    Ok((
        EnvFilter::new(format!("paranoid_openvpn={trace_level}")),
        false,
    ))
}

/// Set up rust tracing, to console (via an optional `MultiProgress`) and optionally to file.
///
/// By default we log only our own events, at a given trace level.
/// This can be overridden by setting `RUST_LOG`. The log file gets the same
/// filter, unless `RUST_LOG_FILE_DETAIL` is set (same semantics).
///
/// **CAUTION:** If this function fails, tracing won't be set up; callers must take extra care to report the error.
pub fn setup(
    trace_level: &str,
    display: Option<&MultiProgress>,
    filename: &Option<String>,
) -> anyhow::Result<()> {
    let mut layers = Vec::new();

    /////// Console output, via the MultiProgress if there is one

    let (filter, used_env) = filter_from_env(trace_level, &[STANDARD_ENV_VAR])?;
    let format = fmt::layer().compact().with_target(used_env);
    let layer = match display {
        None => format
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed(),
        Some(mp) => format
            .with_writer(ProgressWriter::wrap(mp))
            .with_filter(filter)
            .boxed(),
    };
    layers.push(layer);

    //////// File output

    if let Some(filename) = filename {
        let out_file = Arc::new(File::create(filename).context("Failed to open log file")?);
        let (filter, used_env) =
            filter_from_env(trace_level, &[LOG_FILE_DETAIL_ENV_VAR, STANDARD_ENV_VAR])?;
        let layer = fmt::layer()
            .with_writer(out_file)
            .with_target(used_env)
            .compact()
            .with_ansi(false)
            .with_filter(filter)
            .boxed();
        layers.push(layer);
    }

    ////////

    tracing_subscriber::registry().with(layers).init();

    Ok(())
}

/// A wrapper type so tracing can output in a way that doesn't mess up `MultiProgress`
struct ProgressWriter {
    display: MultiProgress,
}

impl ProgressWriter {
    fn wrap(display: &MultiProgress) -> Mutex<Self> {
        Mutex::new(Self {
            display: display.clone(),
        })
    }
}

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = std::str::from_utf8(buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        if self.display.is_hidden() {
            eprintln!("{msg}");
        } else {
            self.display.println(msg)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::filter_from_env;

    #[test]
    fn falls_back_to_our_own_events() {
        let (filter, used_env) =
            filter_from_env("debug", &["PARANOID_OPENVPN_TEST_UNSET_VAR"]).unwrap();
        assert!(!used_env);
        assert_eq!(filter.to_string(), "paranoid_openvpn=debug");
    }
}
