//! Notification events and the emails built from them

use watchtower_core::constants::{NOTIFICATION_TITLE, SENDER_LOCAL_PART, SENDER_NAME};

use crate::error::{NotifyError, Result};

/// A log entry that asked for a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    /// Timestamp already rendered with the configured time format
    pub timestamp: String,
    pub message: String,
    /// Host the application is serving, used for sender and subject
    pub server_host: String,
}

impl NotificationEvent {
    pub fn new(
        timestamp: impl Into<String>,
        message: impl Into<String>,
        server_host: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            message: message.into(),
            server_host: server_host.into(),
        }
    }

    /// `watchtower@<host>`
    pub fn sender_address(&self) -> String {
        format!("{}@{}", SENDER_LOCAL_PART, self.server_host)
    }

    pub fn subject(&self) -> String {
        format!("{}: {}", NOTIFICATION_TITLE, self.server_host)
    }

    /// Rich body: heading with the host, then time and message
    pub fn html_body(&self) -> String {
        format!(
            "<h3>{}: {}</h3><b>Time:</b> {}<br /><br /><b>Message:</b> {}",
            NOTIFICATION_TITLE,
            escape_html(&self.server_host),
            escape_html(&self.timestamp),
            escape_html(&self.message)
        )
    }

    /// Plain-text fallback, identical to the log line without its terminator
    pub fn text_body(&self) -> String {
        format!("{} - {}", self.timestamp, self.message)
    }

    /// Build the email for a recipient list
    ///
    /// Returns `Ok(None)` when there is nobody to send to.
    pub fn to_email(&self, recipients: &[String]) -> Result<Option<Email>> {
        let Some((to, cc)) = split_recipients(recipients) else {
            return Ok(None);
        };

        let email = Email {
            from: Mailbox {
                address: self.sender_address(),
                name: Some(SENDER_NAME.to_string()),
            },
            reply_to: self.sender_address(),
            to: to.to_string(),
            cc: cc.to_vec(),
            subject: self.subject(),
            html_body: self.html_body(),
            text_body: self.text_body(),
        };
        email.check_headers()?;
        Ok(Some(email))
    }
}

/// Fan a recipient list out into one primary address and the copied rest
///
/// List order decides who is primary.
pub fn split_recipients(recipients: &[String]) -> Option<(&str, &[String])> {
    recipients
        .split_first()
        .map(|(first, rest)| (first.as_str(), rest))
}

/// An address with an optional display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub address: String,
    pub name: Option<String>,
}

impl std::fmt::Display for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.address),
            None => f.write_str(&self.address),
        }
    }
}

/// A fully composed notification email, handed to a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: Mailbox,
    pub reply_to: String,
    pub to: String,
    pub cc: Vec<String>,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

impl Email {
    /// Reject header values that could smuggle extra headers
    fn check_headers(&self) -> Result<()> {
        let headers = [
            self.from.address.as_str(),
            self.reply_to.as_str(),
            self.to.as_str(),
            self.subject.as_str(),
        ];
        for value in headers.into_iter().chain(self.cc.iter().map(String::as_str)) {
            if value.chars().any(|c| c.is_control()) {
                return Err(NotifyError::InvalidHeader(value.to_string()));
            }
        }
        Ok(())
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
