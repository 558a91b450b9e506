// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Gather PDF attachment candidates from uploads, ZIP archives, or a folder.
//!
//! Collection never fails as a whole: corrupt archives and unreadable files
//! become [`Warning`]s and the remaining inputs are still processed.

use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::models::transport::DEFAULT_SIZE_LIMIT;
use crate::models::{PdfItem, Upload, Warning, is_pdf, is_zip};

/// Where the PDFs of a run come from. Exactly one mode is active per run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputSource {
    /// Named blobs picked by the operator; ZIPs are expanded.
    Uploads(Vec<Upload>),
    /// Immediate (non-recursive) PDF entries of a local folder.
    Directory(PathBuf),
}

impl Default for InputSource {
    fn default() -> Self {
        InputSource::Uploads(Vec::new())
    }
}

impl InputSource {
    /// True when the operator has not selected anything yet.
    pub fn is_empty(&self) -> bool {
        match self {
            InputSource::Uploads(uploads) => uploads.is_empty(),
            InputSource::Directory(path) => path.as_os_str().is_empty(),
        }
    }
}

/// PDFs found in a source together with the non-fatal problems met on the way.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collected {
    pub items: Vec<PdfItem>,
    pub warnings: Vec<Warning>,
}

/// Collect every PDF from `source`, preserving source order and archive entry order.
///
/// Filenames are not deduplicated. The result depends only on the input, so
/// collecting the same source twice yields the same items.
pub fn collect(source: &InputSource) -> Collected {
    let mut out = Collected::default();
    match source {
        InputSource::Uploads(uploads) => {
            for upload in uploads {
                collect_upload(upload, &mut out);
            }
        }
        InputSource::Directory(dir) => collect_directory(dir, &mut out),
    }
    debug!(
        items = out.items.len(),
        warnings = out.warnings.len(),
        "collection finished"
    );
    out
}

/// Read picked files from disk into uploads. Unreadable picks become warnings.
pub fn read_uploads(paths: &[PathBuf]) -> (Vec<Upload>, Vec<Warning>) {
    let mut uploads = Vec::with_capacity(paths.len());
    let mut warnings = Vec::new();
    for path in paths {
        match read_file(path) {
            Ok(data) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                uploads.push(Upload::new(name, data));
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable pick");
                warnings.push(Warning::UnreadableFile {
                    path: path.clone(),
                    reason: format!("{err:#}"),
                });
            }
        }
    }
    (uploads, warnings)
}

fn collect_upload(upload: &Upload, out: &mut Collected) {
    if is_pdf(&upload.name) {
        if let Some(item) = PdfItem::new(upload.name.clone(), upload.data.clone()) {
            out.items.push(item);
        }
    } else if is_zip(&upload.name) {
        collect_zip(&upload.name, &upload.data, out);
    } else {
        debug!(name = %upload.name, "ignoring upload that is neither PDF nor ZIP");
    }
}

/// Expand one ZIP, keeping only the base name of each PDF entry.
fn collect_zip(archive_name: &str, bytes: &[u8], out: &mut Collected) {
    let mut archive = match ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => archive,
        Err(err) => {
            warn!(archive = %archive_name, error = %err, "invalid ZIP upload");
            out.warnings.push(Warning::InvalidArchive {
                archive: archive_name.to_string(),
                reason: err.to_string(),
            });
            return;
        }
    };

    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(archive = %archive_name, index, error = %err, "unreadable ZIP entry");
                out.warnings.push(Warning::InvalidArchive {
                    archive: archive_name.to_string(),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        if entry.is_dir() {
            continue;
        }
        let entry_name = entry.name().to_string();
        let Some(base) = base_name(&entry_name) else {
            continue;
        };
        if !is_pdf(base) {
            continue;
        }

        // The declared size comes from the archive itself and may be bogus.
        let mut data = Vec::with_capacity(entry.size().min(DEFAULT_SIZE_LIMIT) as usize);
        if let Err(err) = entry.read_to_end(&mut data) {
            warn!(archive = %archive_name, entry = %entry_name, error = %err, "failed to decompress ZIP entry");
            out.warnings.push(Warning::InvalidArchive {
                archive: format!("{archive_name}/{entry_name}"),
                reason: err.to_string(),
            });
            continue;
        }
        if let Some(item) = PdfItem::new(base, data) {
            out.items.push(item);
        }
    }
}

/// Scan the immediate entries of `dir` in filename order.
fn collect_directory(dir: &Path, out: &mut Collected) {
    let mut paths = match list_directory(dir) {
        Ok(paths) => paths,
        Err(err) => {
            warn!(dir = %dir.display(), error = %err, "cannot list folder");
            out.warnings.push(Warning::UnreadableFile {
                path: dir.to_path_buf(),
                reason: format!("{err:#}"),
            });
            return;
        }
    };
    paths.sort();

    for path in paths {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !is_pdf(name) || is_directory(&path) {
            continue;
        }
        match read_file(&path) {
            Ok(data) => {
                if let Some(item) = PdfItem::new(name, data) {
                    out.items.push(item);
                }
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable PDF");
                out.warnings.push(Warning::UnreadableFile {
                    path: path.clone(),
                    reason: format!("{err:#}"),
                });
            }
        }
    }
}

fn list_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to list folder {:?}", dir))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list folder {:?}", dir))?;
        paths.push(entry.path());
    }
    Ok(paths)
}

/// Entries that cannot be stat'ed are not directories; reading them reports why.
fn is_directory(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_dir())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {:?}", path))
}

/// Last path component of an archive entry name; ZIPs may use either separator.
fn base_name(entry_name: &str) -> Option<&str> {
    entry_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
}
