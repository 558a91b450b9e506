// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Transport settings and dispatch knobs supplied once per run.

use std::time::Duration;

/// Connection timeout used when opening the SMTP session.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);
/// Pause between two consecutive sends to stay clear of provider rate limits.
pub const DEFAULT_PACING: Duration = Duration::from_millis(300);
/// Approximate attachment ceiling of common providers (Gmail caps whole messages at 25 MB).
pub const DEFAULT_SIZE_LIMIT: u64 = 24 * 1024 * 1024;

/// SMTP endpoint, credentials, and addressing for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub host: String,
    pub port: u16,
    pub use_tls: bool,
    pub sender_name: String,
    pub sender_email: String,
    pub password: String,
    pub recipient: String,
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".into(),
            port: 587,
            use_tls: true,
            sender_name: String::new(),
            sender_email: String::new(),
            password: String::new(),
            recipient: String::new(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

// Keep the password out of logs and panic messages.
impl std::fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_tls", &self.use_tls)
            .field("sender_name", &self.sender_name)
            .field("sender_email", &self.sender_email)
            .field("password", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Per-run dispatch behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchOptions {
    pub dry_run: bool,
    pub pacing: Duration,
    pub size_limit: u64,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            pacing: DEFAULT_PACING,
            size_limit: DEFAULT_SIZE_LIMIT,
        }
    }
}
