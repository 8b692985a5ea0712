// (c) 2024 Ross Younger
//! # Batch driver
//!
//! Processes a single profile, or a whole directory tree of them, into a
//! destination. In tree mode, anything that isn't a profile is copied
//! through byte for byte so the output remains a drop-in replacement for
//! the input.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use anyhow::{ensure, Context as _, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::harden::{harden_profile, process_pia, CipherStrength, TlsVersion};
use crate::profile::Profile;

/// Filename extension (without the dot) that marks a file as an OpenVPN
/// profile in directory mode.
pub const PROFILE_EXTENSION: &str = "ovpn";

const PROGRESS_STYLE: &str = "{msg:.dim} {wide_bar:.cyan} {pos}/{len}";

/// Hardens a single profile file into `dest`.
///
/// Emits a warning (non-fatal) if the profile's own cipher was weak;
/// hardening the TLS control channel can't fix a weak data channel.
pub fn process_profile(source: &Path, dest: &Path, min_tls: TlsVersion, pia: bool) -> Result<()> {
    debug!("processing {}", source.display());
    let mut profile =
        Profile::load(source).with_context(|| format!("loading {}", source.display()))?;
    let strength = harden_profile(&mut profile, min_tls)?;
    if pia {
        process_pia(&mut profile)
            .with_context(|| format!("applying PIA tweaks to {}", source.display()))?;
    }
    profile
        .save(dest)
        .with_context(|| format!("writing {}", dest.display()))?;
    if strength == CipherStrength::Weak {
        warn!("{} has WEAK cipher strength!", dest.display());
    }
    Ok(())
}

/// Processes a source file or directory tree into `dest`.
///
/// A single file is hardened to `dest`, creating parent directories as
/// needed. A directory is walked recursively: `.ovpn` files are hardened,
/// everything else is copied byte for byte, and the relative structure is
/// preserved. The first failure aborts the batch.
pub fn process_profiles(
    source: &Path,
    dest: &Path,
    min_tls: TlsVersion,
    pia: bool,
    display: &MultiProgress,
) -> Result<()> {
    if source.is_file() {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        return process_profile(source, dest, min_tls, pia);
    }

    // Writing output underneath the source tree would hand it straight
    // back to the directory walk.
    ensure!(
        !dest.starts_with(source),
        "destination must not be inside the source directory"
    );

    let mut files = Vec::new();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    debug!("{} files to process", files.len());

    let bar = display.add(
        ProgressBar::new(files.len().try_into()?)
            .with_style(ProgressStyle::with_template(PROGRESS_STYLE)?),
    );
    for file in files {
        let relative = file.strip_prefix(source)?;
        let target = dest.join(relative);
        bar.set_message(relative.display().to_string());
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        if file.extension() == Some(OsStr::new(PROFILE_EXTENSION)) {
            process_profile(&file, &target, min_tls, pia)?;
        } else {
            let _ =
                fs::copy(&file, &target).with_context(|| format!("copying {}", file.display()))?;
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(())
}

///////////////////////////////////////////////////////////////////////////////////////
