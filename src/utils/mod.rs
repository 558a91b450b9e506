// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by UI and business logic.

pub mod format;
pub mod mime;

/// Human-readable byte sizes with binary units.
pub use format::format_bytes;
/// Guess a MIME type from a filename.
pub use mime::guess_mime;
