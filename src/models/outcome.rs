// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Per-file outcomes and non-fatal warnings produced during a run.

use std::fmt;
use std::path::PathBuf;

/// Result of handling one PDF.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendStatus {
    DryRun,
    Sent,
    Failed { reason: String },
}

impl SendStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, SendStatus::Failed { .. })
    }
}

/// Outcome record shown to the operator, one per collected PDF.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendResult {
    pub file: String,
    pub subject: String,
    pub status: SendStatus,
}

impl SendResult {
    pub fn new(file: impl Into<String>, subject: impl Into<String>, status: SendStatus) -> Self {
        Self {
            file: file.into(),
            subject: subject.into(),
            status,
        }
    }
}

/// Advisory problems that never abort a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    /// A ZIP (or one of its entries) could not be read.
    InvalidArchive { archive: String, reason: String },
    /// A local file or folder could not be read.
    UnreadableFile { path: PathBuf, reason: String },
    /// Attachment above the provider's approximate size ceiling.
    Oversized { file: String, size: u64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::InvalidArchive { archive, reason } => {
                write!(f, "'{archive}' is not a valid ZIP file: {reason}")
            }
            Warning::UnreadableFile { path, reason } => {
                write!(f, "Could not read '{}': {reason}", path.display())
            }
            Warning::Oversized { file, size } => write!(
                f,
                "'{file}' is {} and may be rejected by the mail provider. Consider compressing or splitting it.",
                crate::utils::format_bytes(*size)
            ),
        }
    }
}
