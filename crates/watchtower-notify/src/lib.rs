//! WatchTower Notification System
//!
//! Builds alert emails for log entries that request a notification and hands
//! them to a [`MailTransport`]:
//! - sendmail (local MTA)
//! - any host-provided transport implementing the trait

mod error;
mod event;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
mod sendmail;

pub use error::{NotifyError, Result};
pub use event::{split_recipients, Email, Mailbox, NotificationEvent};
pub use sendmail::SendmailTransport;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Trait for mail delivery backends
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver a composed email
    async fn send(&self, email: &Email) -> Result<()>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Outcome of a notification request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the transport
    Sent { to: String, cc: Vec<String> },
    /// Recipient list was empty; nothing was sent
    NoRecipients,
}

/// Composes notification emails and dispatches them through a transport
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Send one notification
    ///
    /// The first recipient is addressed directly and the rest are copied.
    pub async fn notify(
        &self,
        event: &NotificationEvent,
        recipients: &[String],
    ) -> Result<Delivery> {
        let Some(email) = event.to_email(recipients)? else {
            debug!("No notify recipients configured, skipping notification");
            return Ok(Delivery::NoRecipients);
        };

        self.transport.send(&email).await?;

        info!(
            "Sent notification via {} to {} (+{} cc)",
            self.transport.name(),
            email.to,
            email.cc.len()
        );
        Ok(Delivery::Sent {
            to: email.to,
            cc: email.cc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    fn event() -> NotificationEvent {
        NotificationEvent::new("2024-01-01 00:00:00", "critical", "example.com")
    }

    #[tokio::test]
    async fn test_notify_fans_out_to_and_cc() {
        let transport = MockTransport::new();
        let notifier = Notifier::new(Arc::new(transport.clone()));

        let recipients = vec!["a@x.com".to_string(), "b@x.com".to_string()];
        let delivery = notifier.notify(&event(), &recipients).await.unwrap();

        assert_eq!(
            delivery,
            Delivery::Sent {
                to: "a@x.com".to_string(),
                cc: vec!["b@x.com".to_string()],
            }
        );
        let sent = transport.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
        assert_eq!(sent[0].cc, vec!["b@x.com"]);
        assert_eq!(sent[0].text_body, "2024-01-01 00:00:00 - critical");
    }

    #[tokio::test]
    async fn test_notify_without_recipients_is_noop() {
        let transport = MockTransport::new();
        let notifier = Notifier::new(Arc::new(transport.clone()));

        let delivery = notifier.notify(&event(), &[]).await.unwrap();

        assert_eq!(delivery, Delivery::NoRecipients);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_notify_surfaces_transport_failure() {
        let notifier = Notifier::new(Arc::new(MockTransport::failing()));
        let result = notifier
            .notify(&event(), &["a@x.com".to_string()])
            .await;
        assert!(matches!(result, Err(NotifyError::TransportError(_))));
    }

    #[test]
    fn test_transport_name() {
        let notifier = Notifier::new(Arc::new(MockTransport::new()));
        assert_eq!(notifier.transport_name(), "mock");
    }
}
