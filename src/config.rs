// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Startup settings: built-in defaults, `PDF_MAILER_*` environment overrides,
//! and an optional JSON secrets file that prefills the SMTP password.
//!
//! Settings only seed the form; every value stays editable before a run.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::models::transport::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_PACING, DEFAULT_SIZE_LIMIT};
use crate::models::{DispatchOptions, TransportConfig};

/// Environment variable naming the secrets file.
pub const SECRETS_ENV: &str = "PDF_MAILER_SECRETS";
/// Secrets file used when [`SECRETS_ENV`] is unset.
pub const DEFAULT_SECRETS_FILE: &str = "secrets.json";

/// Values used to prefill the mailing form.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub sender_name: String,
    pub sender_email: String,
    pub password: String,
    pub recipient: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub use_tls: bool,
    pub dry_run: bool,
    pub pacing: Duration,
    pub connect_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sender_name: String::new(),
            sender_email: String::new(),
            password: String::new(),
            recipient: String::new(),
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            use_tls: true,
            dry_run: false,
            pacing: DEFAULT_PACING,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("sender_name", &self.sender_name)
            .field("sender_email", &self.sender_email)
            .field("password_set", &!self.password.is_empty())
            .field("recipient", &self.recipient)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("use_tls", &self.use_tls)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Shape of the optional secrets file, e.g. `{"APP_PASSWORD": "abcd efgh ijkl mnop"}`.
#[derive(Debug, Default, Deserialize)]
pub struct Secrets {
    #[serde(rename = "APP_PASSWORD", alias = "app_password", default)]
    pub app_password: String,
}

impl Settings {
    /// Defaults, then the secrets file, then the process environment.
    pub fn load() -> Self {
        let path = std::env::var_os(SECRETS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SECRETS_FILE));
        let mut settings = Self::default();
        settings.apply_secrets(&path);
        settings.apply_overrides(|key| std::env::var(key).ok());
        debug!(?settings, "settings loaded");
        settings
    }

    /// Prefill the password from a secrets file; missing or malformed files are ignored.
    pub fn apply_secrets(&mut self, path: &Path) {
        if !path.exists() {
            debug!(path = %path.display(), "no secrets file");
            return;
        }
        match read_secrets(path) {
            Ok(secrets) if !secrets.app_password.is_empty() => {
                self.password = secrets.app_password;
            }
            Ok(_) => debug!(path = %path.display(), "secrets file has no password"),
            Err(err) => debug!(error = %format!("{err:#}"), "ignoring unreadable secrets file"),
        }
    }

    /// Apply `PDF_MAILER_*` overrides from `lookup`. Unparsable values keep the current setting.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("PDF_MAILER_SENDER_NAME") {
            self.sender_name = v;
        }
        if let Some(v) = lookup("PDF_MAILER_SENDER_EMAIL") {
            self.sender_email = v;
        }
        if let Some(v) = lookup("PDF_MAILER_RECIPIENT") {
            self.recipient = v;
        }
        if let Some(v) = lookup("PDF_MAILER_SMTP_HOST") {
            self.smtp_host = v;
        }
        if let Some(port) = lookup("PDF_MAILER_SMTP_PORT").and_then(|v| v.trim().parse().ok()) {
            self.smtp_port = port;
        }
        if let Some(tls) = lookup("PDF_MAILER_USE_TLS").and_then(|v| parse_bool(&v)) {
            self.use_tls = tls;
        }
        if let Some(v) = lookup("PDF_MAILER_APP_PASSWORD").filter(|v| !v.is_empty()) {
            self.password = v;
        }
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            host: self.smtp_host.trim().to_string(),
            port: self.smtp_port,
            use_tls: self.use_tls,
            sender_name: self.sender_name.trim().to_string(),
            sender_email: self.sender_email.trim().to_string(),
            password: self.password.clone(),
            recipient: self.recipient.trim().to_string(),
            connect_timeout: self.connect_timeout,
        }
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            dry_run: self.dry_run,
            pacing: self.pacing,
            size_limit: DEFAULT_SIZE_LIMIT,
        }
    }
}

/// Read and parse a JSON secrets file.
pub fn read_secrets(path: &Path) -> Result<Secrets> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read secrets file {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse secrets file {:?}", path))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use tempfile::TempDir;

    use super::{Settings, read_secrets};

    #[test]
    fn defaults_target_gmail_submission_port() {
        let settings = Settings::default();

        assert_eq!(settings.smtp_host, "smtp.gmail.com");
        assert_eq!(settings.smtp_port, 587);
        assert!(settings.use_tls);
        assert!(!settings.dry_run);
    }

    #[test]
    fn overrides_replace_parsable_values_only() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PDF_MAILER_SENDER_NAME", "Office"),
            ("PDF_MAILER_SMTP_HOST", "mail.example.com"),
            ("PDF_MAILER_SMTP_PORT", "not-a-port"),
            ("PDF_MAILER_USE_TLS", "off"),
            ("PDF_MAILER_RECIPIENT", "books@example.org"),
        ]);
        let mut settings = Settings::default();

        settings.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.sender_name, "Office");
        assert_eq!(settings.smtp_host, "mail.example.com");
        assert_eq!(settings.smtp_port, 587);
        assert!(!settings.use_tls);
        assert_eq!(settings.recipient, "books@example.org");
    }

    #[test]
    fn secrets_file_prefills_password() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("secrets.json");
        fs::write(&path, r#"{"APP_PASSWORD": "abcd efgh"}"#).unwrap();
        let mut settings = Settings::default();

        settings.apply_secrets(&path);

        assert_eq!(settings.password, "abcd efgh");
    }

    #[test]
    fn secrets_file_accepts_lowercase_key() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("secrets.json");
        fs::write(&path, r#"{"app_password": "xyz"}"#).unwrap();

        assert_eq!(read_secrets(&path).unwrap().app_password, "xyz");
    }

    // A broken secrets file must not prevent startup.
    #[test]
    fn malformed_or_missing_secrets_are_ignored() {
        let tmp = TempDir::new().unwrap();
        let broken = tmp.path().join("broken.json");
        fs::write(&broken, "{not json").unwrap();
        let mut settings = Settings::default();

        settings.apply_secrets(&broken);
        settings.apply_secrets(&tmp.path().join("absent.json"));

        assert!(settings.password.is_empty());
        assert!(read_secrets(&broken).is_err());
    }

    // Environment password wins over the secrets file.
    #[test]
    fn env_password_overrides_secrets() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("secrets.json");
        fs::write(&path, r#"{"APP_PASSWORD": "from-file"}"#).unwrap();
        let mut settings = Settings::default();

        settings.apply_secrets(&path);
        settings.apply_overrides(|key| {
            (key == "PDF_MAILER_APP_PASSWORD").then(|| "from-env".to_string())
        });

        assert_eq!(settings.password, "from-env");
    }

    #[test]
    fn transport_config_trims_text_fields() {
        let settings = Settings {
            sender_email: "  office@example.com ".into(),
            recipient: " books@example.org".into(),
            password: " keep spaces ".into(),
            ..Default::default()
        };

        let config = settings.transport_config();

        assert_eq!(config.sender_email, "office@example.com");
        assert_eq!(config.recipient, "books@example.org");
        assert_eq!(config.password, " keep spaces ");
    }
}
