// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Derive subject, body, and the MIME message for one PDF.

use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};

use crate::error::ComposeError;
use crate::models::{PdfItem, TransportConfig};
use crate::utils::guess_mime;

/// Subject line: the filename without its trailing `.pdf` (any case).
pub fn subject_of(filename: &str) -> String {
    let len = filename.len();
    if len >= 4
        && filename.is_char_boundary(len - 4)
        && filename[len - 4..].eq_ignore_ascii_case(".pdf")
    {
        filename[..len - 4].to_string()
    } else {
        filename.to_string()
    }
}

/// Plain-text body. The sign-off name is left out when `sender_name` is blank.
pub fn body_of(filename: &str, sender_name: &str) -> String {
    let base = subject_of(filename);
    let sender_name = sender_name.trim();
    if sender_name.is_empty() {
        format!("Hi,\n\nPlease find attached: {base}.\n\nBest regards,")
    } else {
        format!("Hi,\n\nPlease find attached: {base}.\n\nBest regards,\n{sender_name}")
    }
}

/// Parse an address with an optional display name into a mailbox.
pub fn mailbox(name: &str, address: &str) -> Result<Mailbox, ComposeError> {
    let parsed = address
        .trim()
        .parse()
        .map_err(|err: lettre::address::AddressError| ComposeError::InvalidAddress {
            address: address.to_string(),
            reason: err.to_string(),
        })?;
    let name = name.trim();
    Ok(Mailbox::new(
        (!name.is_empty()).then(|| name.to_string()),
        parsed,
    ))
}

/// Build the message for `item`: plain-text body plus the PDF as an attachment.
pub fn compose_message(config: &TransportConfig, item: &PdfItem) -> Result<Message, ComposeError> {
    let from = mailbox(&config.sender_name, &config.sender_email)?;
    let to = mailbox("", &config.recipient)?;

    let content_type = ContentType::parse(&guess_mime(item.name()))
        .map_err(|err| ComposeError::Build(err.to_string()))?;
    let attachment =
        Attachment::new(item.name().to_string()).body(item.data().to_vec(), content_type);

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject_of(item.name()))
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(body_of(item.name(), &config.sender_name)))
                .singlepart(attachment),
        )
        .map_err(|err| ComposeError::Build(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{body_of, compose_message, mailbox, subject_of};
    use crate::error::ComposeError;
    use crate::models::{PdfItem, TransportConfig};

    fn config() -> TransportConfig {
        TransportConfig {
            sender_name: "Limo Office".into(),
            sender_email: "office@example.com".into(),
            recipient: "books@example.org".into(),
            ..Default::default()
        }
    }

    #[test]
    fn subject_strips_pdf_suffix_in_any_case() {
        assert_eq!(subject_of("invoice-042.pdf"), "invoice-042");
        assert_eq!(subject_of("SCAN.PDF"), "SCAN");
        assert_eq!(subject_of("mixed.PdF"), "mixed");
        assert_eq!(subject_of(".pdf"), "");
    }

    // Only one suffix is removed and other names pass through untouched.
    #[test]
    fn subject_keeps_other_names_verbatim() {
        assert_eq!(subject_of("double.pdf.pdf"), "double.pdf");
        assert_eq!(subject_of("notes.txt"), "notes.txt");
        assert_eq!(subject_of("pdf"), "pdf");
        assert_eq!(subject_of("Ångström.pdf"), "Ångström");
        assert_eq!(subject_of("ab€"), "ab€");
    }

    #[test]
    fn body_includes_base_name_and_sender() {
        assert_eq!(
            body_of("receipt.pdf", "Limo Office"),
            "Hi,\n\nPlease find attached: receipt.\n\nBest regards,\nLimo Office"
        );
    }

    #[test]
    fn body_omits_blank_sender_name() {
        assert_eq!(
            body_of("receipt.PDF", "   "),
            "Hi,\n\nPlease find attached: receipt.\n\nBest regards,"
        );
    }

    #[test]
    fn compose_message_sets_headers_and_attachment() {
        let item = PdfItem::new("march invoice.pdf", b"%PDF-1.4 test".to_vec()).unwrap();

        let message = compose_message(&config(), &item).expect("message built");
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();

        assert!(raw.contains("Limo Office"));
        assert!(raw.contains("<office@example.com>"));
        assert!(raw.contains("books@example.org"));
        assert!(raw.contains("Subject: march invoice"));
        assert!(raw.contains("application/pdf"));
        assert!(raw.contains("attachment"));
        assert_eq!(
            message.envelope().to()[0].to_string(),
            "books@example.org"
        );
    }

    #[test]
    fn compose_message_rejects_bad_recipient() {
        let item = PdfItem::new("a.pdf", vec![1]).unwrap();
        let config = TransportConfig {
            recipient: "not an address".into(),
            ..config()
        };

        let err = compose_message(&config, &item).unwrap_err();

        assert!(matches!(err, ComposeError::InvalidAddress { .. }));
    }

    #[test]
    fn mailbox_without_name_has_no_display_name() {
        let mb = mailbox("", " someone@example.com ").unwrap();
        assert!(mb.name.is_none());
        assert_eq!(mb.email.to_string(), "someone@example.com");
    }
}
