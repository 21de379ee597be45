//! sendmail transport
//!
//! Renders a `multipart/alternative` message and pipes it to the local MTA.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::error::{NotifyError, Result};
use crate::event::Email;
use crate::MailTransport;

/// Well-known locations tried when sendmail is not on PATH
const FALLBACK_PATHS: &[&str] = &["/usr/sbin/sendmail", "/usr/lib/sendmail"];

/// Delivers mail by invoking `sendmail -t -oi`
pub struct SendmailTransport {
    program: PathBuf,
    args: Vec<String>,
}

impl SendmailTransport {
    /// Create a transport for a specific sendmail binary
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: vec!["-t".to_string(), "-oi".to_string()],
        }
    }

    /// Create with a custom command line (anything that reads a message on stdin)
    pub fn with_command(program: PathBuf, args: Vec<String>) -> Self {
        Self { program, args }
    }

    /// Use the configured binary, or find one on PATH
    ///
    /// Falls back to a bare `sendmail` so a missing MTA surfaces as a send
    /// failure rather than blocking startup.
    pub fn locate(configured: Option<PathBuf>) -> Self {
        if let Some(program) = configured {
            return Self::new(program);
        }

        if let Ok(path) = which::which("sendmail") {
            debug!("Found sendmail at {}", path.display());
            return Self::new(path);
        }

        let program = FALLBACK_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
            .unwrap_or_else(|| PathBuf::from("sendmail"));
        Self::new(program)
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    /// Render the full RFC 5322 message with a text and an HTML part
    pub fn render(email: &Email, boundary: &str) -> String {
        let mut headers = vec![
            format!("From: {}", email.from),
            format!("Reply-To: {}", email.reply_to),
            format!("To: {}", email.to),
        ];
        if !email.cc.is_empty() {
            headers.push(format!("Cc: {}", email.cc.join(", ")));
        }
        headers.push(format!("Subject: {}", email.subject));
        headers.push(format!("Date: {}", chrono::Local::now().to_rfc2822()));
        headers.push("MIME-Version: 1.0".to_string());
        headers.push(format!(
            "Content-Type: multipart/alternative; boundary=\"{}\"",
            boundary
        ));

        format!(
            "{headers}\n\n\
             --{b}\n\
             Content-Type: text/plain; charset=UTF-8\n\
             Content-Transfer-Encoding: 8bit\n\n\
             {text}\n\
             --{b}\n\
             Content-Type: text/html; charset=UTF-8\n\
             Content-Transfer-Encoding: 8bit\n\n\
             {html}\n\
             --{b}--\n",
            headers = headers.join("\n"),
            b = boundary,
            text = email.text_body,
            html = email.html_body,
        )
    }
}

#[async_trait]
impl MailTransport for SendmailTransport {
    async fn send(&self, email: &Email) -> Result<()> {
        let boundary = format!("watchtower-{}", uuid::Uuid::new_v4().simple());
        let message = Self::render(email, &boundary);

        debug!(
            "Piping notification for {} (+{} cc) to {}",
            email.to,
            email.cc.len(),
            self.program.display()
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(message.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if output.status.success() {
            info!("Notification mail handed to {}", self.program.display());
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("{} failed: {}", self.program.display(), stderr);
            Err(NotifyError::SendmailFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr,
            })
        }
    }

    fn name(&self) -> &'static str {
        "sendmail"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NotificationEvent;
    use tempfile::TempDir;

    fn email() -> Email {
        NotificationEvent::new("2024-01-01 00:00:00", "disk full", "example.com")
            .to_email(&["a@x.com".to_string(), "b@x.com".to_string(), "c@x.com".to_string()])
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_render_headers_and_parts() {
        let message = SendmailTransport::render(&email(), "BOUNDARY");

        assert!(message.starts_with("From: WatchTower Logger <watchtower@example.com>\n"));
        assert!(message.contains("\nReply-To: watchtower@example.com\n"));
        assert!(message.contains("\nTo: a@x.com\n"));
        assert!(message.contains("\nCc: b@x.com, c@x.com\n"));
        assert!(message.contains("\nSubject: WatchTower Notification: example.com\n"));
        assert!(message.contains("boundary=\"BOUNDARY\""));
        assert!(message.contains("\n\n2024-01-01 00:00:00 - disk full\n--BOUNDARY\n"));
        assert!(message.contains("<b>Message:</b> disk full\n--BOUNDARY--\n"));
        assert!(!message.contains("Bcc:"));
    }

    #[test]
    fn test_render_without_cc() {
        let email = NotificationEvent::new("t", "m", "h")
            .to_email(&["only@x.com".to_string()])
            .unwrap()
            .unwrap();
        let message = SendmailTransport::render(&email, "B");
        assert!(!message.contains("Cc:"));
    }

    #[test]
    fn test_locate_prefers_configured_binary() {
        let transport = SendmailTransport::locate(Some(PathBuf::from("/opt/mta/sendmail")));
        assert_eq!(transport.program(), std::path::Path::new("/opt/mta/sendmail"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_send_pipes_message() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("message.eml");
        let transport = SendmailTransport::with_command(
            PathBuf::from("/bin/sh"),
            vec!["-c".to_string(), format!("cat > '{}'", out.display())],
        );

        transport.send(&email()).await.unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.contains("To: a@x.com"));
        assert!(written.contains("Content-Type: text/html; charset=UTF-8"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_send_reports_failure() {
        let transport = SendmailTransport::with_command(
            PathBuf::from("/bin/sh"),
            vec!["-c".to_string(), "cat > /dev/null; echo refused >&2; exit 3".to_string()],
        );

        let err = transport.send(&email()).await.unwrap_err();

        match err {
            NotifyError::SendmailFailed { stderr, .. } => assert_eq!(stderr, "refused"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_send_missing_binary() {
        let transport = SendmailTransport::new(PathBuf::from("/nonexistent/sendmail"));
        let result = transport.send(&email()).await;
        assert!(matches!(result, Err(NotifyError::IoError(_))));
    }
}
