//! Mock implementations for testing

use crate::error::{NotifyError, Result};
use crate::event::Email;
use crate::MailTransport;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A mock transport that records every email it is asked to send
#[derive(Default, Clone)]
pub struct MockTransport {
    /// Emails that have been sent
    sent: Arc<Mutex<Vec<Email>>>,
    /// Number of send calls, including failed ones
    call_count: Arc<AtomicUsize>,
    /// Whether to simulate failures
    should_fail: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock transport that always fails
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    /// Get the number of times send was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get all successfully sent emails
    pub async fn sent(&self) -> Vec<Email> {
        self.sent.lock().await.clone()
    }

    /// Check if an email whose text body contains `needle` was sent
    pub async fn was_sent(&self, needle: &str) -> bool {
        self.sent
            .lock()
            .await
            .iter()
            .any(|e| e.text_body.contains(needle))
    }
}

#[async_trait]
impl MailTransport for MockTransport {
    async fn send(&self, email: &Email) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.should_fail {
            return Err(NotifyError::transport("Mock failure"));
        }

        self.sent.lock().await.push(email.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NotificationEvent;

    fn email(message: &str) -> Email {
        NotificationEvent::new("t", message, "host")
            .to_email(&["a@x.com".to_string()])
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_mock_transport_records_emails() {
        let transport = MockTransport::new();
        transport.send(&email("first")).await.unwrap();
        transport.send(&email("second")).await.unwrap();

        assert_eq!(transport.call_count(), 2);
        assert_eq!(transport.sent().await.len(), 2);
        assert!(transport.was_sent("second").await);
    }

    #[tokio::test]
    async fn test_mock_transport_clones_share_state() {
        let transport = MockTransport::new();
        let handle = transport.clone();
        transport.send(&email("shared")).await.unwrap();

        assert_eq!(handle.call_count(), 1);
        assert!(handle.was_sent("shared").await);
    }

    #[tokio::test]
    async fn test_mock_transport_fails_when_configured() {
        let transport = MockTransport::failing();
        let result = transport.send(&email("x")).await;
        assert!(result.is_err());
        assert_eq!(transport.call_count(), 1);
        assert!(transport.sent().await.is_empty());
    }
}
