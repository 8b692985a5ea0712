// (c) 2024 Ross Younger
//! # Source resolution
//!
//! The profiles to harden may be given as a local file, a local directory,
//! a zip archive, or an HTTP(S) URL to either of the file forms. This
//! module reduces all of those to a local path, downloading and unpacking
//! into temporary locations as needed.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

/// A local filesystem path to process, however the user specified it.
///
/// Holds whatever temporary file or directory backs the path, so the path
/// stays valid exactly as long as this struct lives.
#[derive(Debug)]
pub struct ResolvedSource {
    path: PathBuf,
    _download: Option<NamedTempFile>,
    _extracted: Option<TempDir>,
}

impl ResolvedSource {
    /// Resolves a source argument to a local file or directory.
    ///
    /// `source` may be a local path, or an `http://` or `https://` URL to
    /// download (anything else with a scheme is rejected). Either way, if
    /// the result is a zip archive its contents are unpacked and processed
    /// in place of the archive itself.
    pub fn new(source: &str) -> Result<Self> {
        let mut download = None;
        let path = match url_scheme(source) {
            Some("http" | "https") => {
                debug!("source looks like a URL, downloading");
                let file = download_to_temp(source)?;
                let path = file.path().to_path_buf();
                download = Some(file);
                path
            }
            Some(scheme) => {
                bail!("{scheme}:// is not supported; only HTTP(S) sources can be downloaded")
            }
            None => PathBuf::from(source),
        };

        let extracted = if path.is_file() {
            try_extract_zip(&path)?
        } else if path.is_dir() {
            None
        } else {
            bail!("{source}: path does not exist");
        };
        let path = extracted
            .as_ref()
            .map_or(path, |dir| dir.path().to_path_buf());
        Ok(Self {
            path,
            _download: download,
            _extracted: extracted,
        })
    }

    /// The local file or directory to process.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The leading scheme of a URL-shaped source string, if it has one.
fn url_scheme(source: &str) -> Option<&str> {
    let (scheme, _) = source.split_once("://")?;
    (!scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphanumeric())).then_some(scheme)
}

fn download_to_temp(url: &str) -> Result<NamedTempFile> {
    if url.starts_with("http://") {
        warn!("downloading OpenVPN profiles over an insecure connection");
    }
    let mut response = reqwest::blocking::get(url)
        .and_then(reqwest::blocking::Response::error_for_status)
        .with_context(|| format!("downloading {url}"))?;
    let mut file = NamedTempFile::new()?;
    let bytes = io::copy(&mut response, file.as_file_mut())
        .with_context(|| format!("saving {url} to a temporary file"))?;
    debug!("downloaded {bytes} bytes to {}", file.path().display());
    Ok(file)
}

/// Unpacks a zip archive to a temporary directory.
///
/// Returns `None` if the file isn't a zip archive at all; that's not an
/// error, we assume it's a bare profile.
fn try_extract_zip(path: &Path) -> Result<Option<TempDir>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut archive = match ZipArchive::new(file) {
        Ok(archive) => archive,
        Err(ZipError::InvalidArchive(_)) => return Ok(None),
        Err(e) => return Err(e).context("reading zip archive"),
    };
    let dir = tempfile::tempdir()?;
    archive
        .extract(dir.path())
        .with_context(|| format!("extracting {}", path.display()))?;
    debug!(
        "zip contents extracted temporarily to {}",
        dir.path().display()
    );
    Ok(Some(dir))
}

///////////////////////////////////////////////////////////////////////////////////////
