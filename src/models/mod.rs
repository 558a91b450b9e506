// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: pure data types shared between the mailing core and the UI shell.

pub mod outcome;
pub mod pdf_item;
pub mod transport;

pub use outcome::{SendResult, SendStatus, Warning};
pub use pdf_item::{PdfItem, Upload, is_pdf, is_zip};
pub use transport::{DispatchOptions, TransportConfig};
