use crate::utils::error::Result;
use crate::{Alert, Mailer};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// STARTTLS submission to a fixed relay. Each send opens a fresh session and
/// tears it down afterwards; alerts are rare enough that pooling buys nothing.
pub struct SmtpMailer {
    relay_host: String,
    sender: String,
    credentials: SmtpCredentials,
}

impl SmtpMailer {
    pub fn new(
        relay_host: impl Into<String>,
        sender: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            relay_host: relay_host.into(),
            sender: sender.into(),
            credentials: SmtpCredentials::new(user.into(), password.into()),
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, recipient: &str, alert: &Alert) -> Result<()> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.relay_host)?
            .credentials(self.credentials.clone())
            .build();

        let message = Message::builder()
            .from(self.sender.parse()?)
            .to(recipient.parse()?)
            .subject(alert.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(alert.body.clone())?;

        transport.send(message).await?;
        tracing::info!("Mail was successfully sent to {}", recipient);
        Ok(())
    }
}
