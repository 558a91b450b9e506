// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Send one message per PDF over a single transport session.
//!
//! Responsibilities:
//! - Open exactly one session per run (connect, optional STARTTLS, login).
//! - Send items strictly in order, pausing between attempts.
//! - Record per-item failures instead of aborting the run.
//! - Close the session on every exit path.

use std::thread;

use anyhow::Context;
use lettre::Message;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{SmtpConnection, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use tracing::{debug, info, warn};

use crate::error::DispatchError;
use crate::logic::compose::{compose_message, subject_of};
use crate::models::{DispatchOptions, PdfItem, SendResult, SendStatus, TransportConfig, Warning};

/// Opens authenticated sessions. Implemented by SMTP and by test doubles.
pub trait MailTransport {
    type Session: MailSession;

    /// Connect, upgrade to TLS when configured, and authenticate.
    fn open(&self, config: &TransportConfig) -> Result<Self::Session, DispatchError>;
}

/// One open, authenticated connection.
pub trait MailSession {
    fn send(&mut self, message: &Message) -> anyhow::Result<()>;
    fn close(&mut self) -> anyhow::Result<()>;
}

/// SMTP transport backed by a single lettre connection.
#[derive(Clone, Copy, Debug, Default)]
pub struct SmtpMailer;

/// Live SMTP connection for the duration of one run.
pub struct SmtpSession {
    connection: SmtpConnection,
}

impl MailTransport for SmtpMailer {
    type Session = SmtpSession;

    fn open(&self, config: &TransportConfig) -> Result<SmtpSession, DispatchError> {
        let hello = ClientId::default();
        let mut connection = SmtpConnection::connect(
            (config.host.as_str(), config.port),
            Some(config.connect_timeout),
            &hello,
            None,
            None,
        )
        .map_err(|err| DispatchError::Connect {
            host: config.host.clone(),
            port: config.port,
            reason: err.to_string(),
        })?;

        if config.use_tls {
            let upgraded = TlsParameters::new(config.host.clone())
                .and_then(|params| connection.starttls(&params, &hello));
            if let Err(err) = upgraded {
                connection.abort();
                return Err(DispatchError::Tls {
                    host: config.host.clone(),
                    reason: err.to_string(),
                });
            }
        }

        let credentials = Credentials::new(config.sender_email.clone(), config.password.clone());
        if let Err(err) = connection.auth(&[Mechanism::Plain, Mechanism::Login], &credentials) {
            connection.abort();
            return Err(DispatchError::Auth {
                user: config.sender_email.clone(),
                reason: err.to_string(),
            });
        }

        Ok(SmtpSession { connection })
    }
}

impl MailSession for SmtpSession {
    fn send(&mut self, message: &Message) -> anyhow::Result<()> {
        self.connection
            .send(message.envelope(), &message.formatted())
            .context("SMTP server rejected the message")?;
        Ok(())
    }

    fn close(&mut self) -> anyhow::Result<()> {
        self.connection.quit().context("QUIT failed")?;
        Ok(())
    }
}

/// Closes the wrapped session when dropped. Close failures are only logged.
struct SessionGuard<S: MailSession> {
    session: S,
}

impl<S: MailSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        match self.session.close() {
            Ok(()) => debug!("mail session closed"),
            Err(err) => debug!(error = %format!("{err:#}"), "ignoring error while closing mail session"),
        }
    }
}

/// Attachments larger than `limit` bytes.
pub fn oversized(items: &[PdfItem], limit: u64) -> Vec<Warning> {
    items
        .iter()
        .filter(|item| item.size() > limit)
        .map(|item| Warning::Oversized {
            file: item.name().to_string(),
            size: item.size(),
        })
        .collect()
}

/// Send every item and return one result per item, in input order.
///
/// In dry-run mode no session is opened. Otherwise a failure to connect,
/// upgrade, or log in aborts the run before any item is attempted; failures
/// of individual sends are recorded as [`SendStatus::Failed`].
pub fn dispatch<T: MailTransport>(
    transport: &T,
    config: &TransportConfig,
    items: &[PdfItem],
    options: &DispatchOptions,
) -> Result<Vec<SendResult>, DispatchError> {
    for warning in oversized(items, options.size_limit) {
        warn!("{warning}");
    }

    if options.dry_run {
        info!(count = items.len(), "dry run, nothing will be sent");
        return Ok(items
            .iter()
            .map(|item| SendResult::new(item.name(), subject_of(item.name()), SendStatus::DryRun))
            .collect());
    }

    info!(
        host = %config.host,
        port = config.port,
        tls = config.use_tls,
        count = items.len(),
        "opening mail session"
    );
    let mut guard = SessionGuard {
        session: transport.open(config)?,
    };

    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if index > 0 && !options.pacing.is_zero() {
            thread::sleep(options.pacing);
        }

        let subject = subject_of(item.name());
        let status = match send_one(&mut guard.session, config, item) {
            Ok(()) => {
                info!(index = index + 1, file = %item.name(), "sent");
                SendStatus::Sent
            }
            Err(reason) => {
                warn!(index = index + 1, file = %item.name(), %reason, "send failed");
                SendStatus::Failed { reason }
            }
        };
        results.push(SendResult::new(item.name(), subject, status));
    }

    Ok(results)
}

fn send_one<S: MailSession>(
    session: &mut S,
    config: &TransportConfig,
    item: &PdfItem,
) -> Result<(), String> {
    let message = compose_message(config, item).map_err(|err| err.to_string())?;
    session.send(&message).map_err(|err| format!("{err:#}"))
}
