// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Turn send outcomes into operator-facing rows, counts, and a text table.

use crate::models::{SendResult, SendStatus};

/// One display row; order matches the input results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub file: String,
    pub subject: String,
    pub status: String,
}

/// Totals per status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
    pub dry_run: usize,
}

impl SendStatus {
    /// Human-readable status label.
    pub fn label(&self) -> String {
        match self {
            SendStatus::DryRun => "Dry run (not sent)".to_string(),
            SendStatus::Sent => "Sent".to_string(),
            SendStatus::Failed { reason } => format!("Failed: {reason}"),
        }
    }
}

pub fn rows(results: &[SendResult]) -> Vec<ReportRow> {
    results
        .iter()
        .map(|r| ReportRow {
            file: r.file.clone(),
            subject: r.subject.clone(),
            status: r.status.label(),
        })
        .collect()
}

pub fn summarize(results: &[SendResult]) -> Summary {
    let mut summary = Summary {
        total: results.len(),
        ..Default::default()
    };
    for result in results {
        match result.status {
            SendStatus::DryRun => summary.dry_run += 1,
            SendStatus::Sent => summary.sent += 1,
            SendStatus::Failed { .. } => summary.failed += 1,
        }
    }
    summary
}

impl Summary {
    /// One-line status text, e.g. `Done. 3 sent, 1 failed.`
    pub fn headline(&self) -> String {
        if self.dry_run > 0 {
            format!("Dry run finished. {} email(s) previewed.", self.dry_run)
        } else if self.failed > 0 {
            format!("Done. {} sent, {} failed.", self.sent, self.failed)
        } else {
            format!("Done. {} sent.", self.sent)
        }
    }
}

/// Plain-text table with padded columns, one line per result.
pub fn render_table(results: &[SendResult]) -> String {
    const HEADERS: [&str; 3] = ["File", "Subject", "Status"];

    let rows = rows(results);
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        widths[0] = widths[0].max(row.file.chars().count());
        widths[1] = widths[1].max(row.subject.chars().count());
    }

    let mut out = String::new();
    push_line(&mut out, &widths, HEADERS[0], HEADERS[1], HEADERS[2]);
    out.push_str(&format!(
        "{}  {}  {}\n",
        "-".repeat(widths[0]),
        "-".repeat(widths[1]),
        "-".repeat(widths[2].max(6))
    ));
    for row in &rows {
        push_line(&mut out, &widths, &row.file, &row.subject, &row.status);
    }
    out
}

fn push_line(out: &mut String, widths: &[usize; 3], file: &str, subject: &str, status: &str) {
    out.push_str(&format!(
        "{:<w0$}  {:<w1$}  {}\n",
        file,
        subject,
        status,
        w0 = widths[0],
        w1 = widths[1]
    ));
}
