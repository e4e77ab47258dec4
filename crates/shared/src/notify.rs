//! Notification boundary for noteworthy ledger events.
//!
//! Two events leave the core: an entry recorded with a back-dated
//! effective date, and an entry hard-deleted. Delivery is best-effort and
//! asynchronous to the commit — a failed notification is logged and
//! swallowed, never rolled into the originating business operation.
//!
//! Uses `lettre` for SMTP transport.

use chrono::{DateTime, NaiveDate, Utc};
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::NotifyConfig;

/// Notification errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Failed to build the mail message.
    #[error("Failed to build notification: {0}")]
    BuildError(String),
    /// Failed to send the mail.
    #[error("Failed to send notification: {0}")]
    SendError(String),
    /// Invalid mail address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// The event payload shared by both notification kinds.
#[derive(Debug, Clone)]
pub struct EntryEvent {
    /// Human-readable entry sequence number.
    pub seq_no: i64,
    /// Entry amount.
    pub amount: Decimal,
    /// Entry description, if any.
    pub description: Option<String>,
    /// Business date of the movement.
    pub effective_date: NaiveDate,
    /// System time the entry was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Display name of the acting user.
    pub actor_name: String,
    /// Email of the acting user.
    pub actor_email: String,
}

/// Outbound notification contract.
///
/// Repositories hold this as a trait object so tests can observe events
/// without an SMTP server.
#[async_trait::async_trait]
pub trait EntryNotifier: Send + Sync {
    /// An entry was recorded with an effective date before today.
    async fn entry_back_dated(&self, event: &EntryEvent) -> Result<(), NotifyError>;

    /// An entry was hard-deleted.
    async fn entry_deleted(&self, event: &EntryEvent) -> Result<(), NotifyError>;
}

/// SMTP implementation of [`EntryNotifier`].
#[derive(Clone)]
pub struct MailNotifier {
    config: NotifyConfig,
}

impl MailNotifier {
    /// Creates a new mail notifier.
    #[must_use]
    pub const fn new(config: NotifyConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| NotifyError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build()
            .pipe(Ok)
    }

    /// Sends one plain-text mail to every configured recipient.
    async fn send_to_all(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);
        let transport = self.create_transport()?;

        for recipient in &self.config.recipients {
            let email = Message::builder()
                .from(
                    from.parse()
                        .map_err(|e| NotifyError::InvalidAddress(format!("{e}")))?,
                )
                .to(recipient
                    .parse()
                    .map_err(|e| NotifyError::InvalidAddress(format!("{e}")))?)
                .subject(subject)
                .header(ContentType::TEXT_PLAIN)
                .body(body.to_string())
                .map_err(|e| NotifyError::BuildError(e.to_string()))?;

            transport
                .send(email)
                .await
                .map_err(|e| NotifyError::SendError(e.to_string()))?;
        }

        Ok(())
    }

    fn event_body(event: &EntryEvent, headline: &str) -> String {
        format!(
            r"{headline}

Entry #{seq_no}
Amount:         {amount}
Effective date: {effective_date}
Recorded at:    {recorded_at}
Description:    {description}
Recorded by:    {actor_name} <{actor_email}>",
            seq_no = event.seq_no,
            amount = event.amount,
            effective_date = event.effective_date,
            recorded_at = event.recorded_at,
            description = event.description.as_deref().unwrap_or("-"),
            actor_name = event.actor_name,
            actor_email = event.actor_email,
        )
    }
}

#[async_trait::async_trait]
impl EntryNotifier for MailNotifier {
    async fn entry_back_dated(&self, event: &EntryEvent) -> Result<(), NotifyError> {
        let subject = format!("Back-dated ledger entry #{}", event.seq_no);
        let body = Self::event_body(event, "A ledger entry was recorded with a past effective date.");
        self.send_to_all(&subject, &body).await
    }

    async fn entry_deleted(&self, event: &EntryEvent) -> Result<(), NotifyError> {
        let subject = format!("Ledger entry #{} deleted", event.seq_no);
        let body = Self::event_body(event, "A ledger entry was permanently deleted.");
        self.send_to_all(&subject, &body).await
    }
}

/// Pipe trait for fluent API.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}
