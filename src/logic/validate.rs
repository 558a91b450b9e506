// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Pre-flight checks run before any network action.

use email_address::EmailAddress;

use crate::logic::collect::InputSource;
use crate::models::{PdfItem, TransportConfig};

/// Everything needed to decide whether a run may start.
pub struct RunRequest<'a> {
    pub source: &'a InputSource,
    pub items: &'a [PdfItem],
    pub config: &'a TransportConfig,
    pub dry_run: bool,
}

/// Collect every operator-facing problem; an empty list means the run may proceed.
pub fn validate(request: &RunRequest<'_>) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let config = request.config;

    if request.source.is_empty() {
        errors.push("Please select at least one PDF, ZIP, or folder.".to_string());
    } else if request.items.is_empty() {
        errors.push("No PDFs detected in your selection.".to_string());
    }

    check_address(&mut errors, "sender email", &config.sender_email);
    check_address(&mut errors, "recipient", &config.recipient);

    if !request.dry_run {
        if config.password.is_empty() {
            errors.push("Enter the SMTP password or enable Dry run.".to_string());
        }
        if config.host.trim().is_empty() {
            errors.push("Enter the SMTP server host.".to_string());
        }
        if config.port == 0 {
            errors.push("Enter a valid SMTP port.".to_string());
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_address(errors: &mut Vec<String>, label: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(format!("Please enter the {label} address."));
    } else if EmailAddress::parse_with_options(value, Default::default()).is_err() {
        errors.push(format!("The {label} address '{value}' is not valid."));
    }
}
