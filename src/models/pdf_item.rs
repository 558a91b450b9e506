// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! PDF attachment candidates and the raw uploads they are collected from.

/// One attachment candidate: the original filename plus its raw bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdfItem {
    name: String,
    data: Vec<u8>,
}

impl PdfItem {
    /// Build an item, rejecting names that do not carry a `.pdf` extension.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Option<Self> {
        let name = name.into();
        is_pdf(&name).then_some(Self { name, data })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Attachment size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// A named blob as the operator selected it; may be a PDF or a ZIP container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub data: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Return true when the name ends in `.pdf`, ignoring case.
pub fn is_pdf(name: &str) -> bool {
    has_extension(name, "pdf")
}

/// Return true when the name ends in `.zip`, ignoring case.
pub fn is_zip(name: &str) -> bool {
    has_extension(name, "zip")
}

/// Suffix test on the raw name, so a bare `.pdf` counts as a PDF too.
fn has_extension(name: &str, extension: &str) -> bool {
    name.len()
        .checked_sub(extension.len() + 1)
        .and_then(|start| name.get(start..))
        .and_then(|tail| tail.strip_prefix('.'))
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
