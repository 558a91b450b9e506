// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Error types for the mailing core.
//!
//! Only failures that stop a whole run are errors here. Per-file problems are
//! captured as [`crate::models::Warning`] or [`crate::models::SendStatus::Failed`].

use thiserror::Error;

/// Fatal problems while opening the single transport session of a run.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("could not connect to {host}:{port}: {reason}")]
    Connect {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("TLS upgrade with {host} failed: {reason}")]
    Tls { host: String, reason: String },

    #[error("authentication as {user} failed: {reason}")]
    Auth { user: String, reason: String },
}

/// Problems turning one PDF into a MIME message.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("invalid email address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Build(String),
}
