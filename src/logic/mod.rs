// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Mailing core: collect PDFs, compose messages, dispatch them, and report.
//! Nothing in here depends on the UI.

pub mod collect;
pub mod compose;
pub mod dispatch;
pub mod report;
pub mod validate;
