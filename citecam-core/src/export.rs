//! Export the citation list as a digest or a mail draft

use crate::types::{Citation, Notice};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subject line of exported citation mail
pub const MAIL_SUBJECT: &str = "CiteCam citation delivered!";

/// Digest layout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Citations each followed by `</br>`, suitable for an HTML mail body
    #[default]
    Html,

    /// One citation per line
    Text,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(ExportFormat::Html),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Html => f.write_str("html"),
            ExportFormat::Text => f.write_str("text"),
        }
    }
}

/// Render every citation into a single document
pub fn render_digest(citations: &[Citation], format: ExportFormat) -> String {
    match format {
        ExportFormat::Html => citations
            .iter()
            .map(|c| format!("{}</br>", c.display_text()))
            .collect(),
        ExportFormat::Text => citations
            .iter()
            .map(|c| format!("{}\n", c.display_text()))
            .collect(),
    }
}

/// A ready-to-send mail handed to the mail collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MailDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub html: bool,
}

impl MailDraft {
    /// Build the "export all" mail; without a recipient there is nothing to send
    pub fn for_citations(
        recipient: Option<&str>,
        citations: &[Citation],
        format: ExportFormat,
    ) -> Result<Self, Notice> {
        let to = recipient
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(Notice::email_unavailable)?;

        Ok(Self {
            to: to.to_string(),
            subject: MAIL_SUBJECT.to_string(),
            body: render_digest(citations, format),
            html: format == ExportFormat::Html,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NoticeKind;

    fn citations() -> Vec<Citation> {
        vec![
            Citation::new("Public, J.Q., (2001). Systems Design. Acme Press.", None).unwrap(),
            Citation::new("Plato, . The Republic. .", None).unwrap(),
        ]
    }

    #[test]
    fn test_html_digest() {
        insta::assert_snapshot!(
            render_digest(&citations(), ExportFormat::Html),
            @"Public, J.Q., (2001). Systems Design. Acme Press.</br>Plato, . The Republic. .</br>"
        );
    }

    #[test]
    fn test_text_digest() {
        assert_eq!(
            render_digest(&citations(), ExportFormat::Text),
            "Public, J.Q., (2001). Systems Design. Acme Press.\nPlato, . The Republic. .\n"
        );
        assert_eq!(render_digest(&[], ExportFormat::Text), "");
    }

    #[test]
    fn test_mail_draft() {
        let draft =
            MailDraft::for_citations(Some("me@example.com"), &citations(), ExportFormat::Html)
                .unwrap();
        assert_eq!(draft.to, "me@example.com");
        assert_eq!(draft.subject, MAIL_SUBJECT);
        assert!(draft.html);
        assert!(draft.body.ends_with("</br>"));
    }

    #[test]
    fn test_mail_without_recipient() {
        let notice = MailDraft::for_citations(None, &citations(), ExportFormat::Html).unwrap_err();
        assert_eq!(notice.kind, NoticeKind::EmailUnavailable);
        assert!(MailDraft::for_citations(Some("  "), &[], ExportFormat::Text).is_err());
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("HTML".parse::<ExportFormat>(), Ok(ExportFormat::Html));
        assert_eq!("txt".parse::<ExportFormat>(), Ok(ExportFormat::Text));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
