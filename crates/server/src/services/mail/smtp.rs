//! SMTP delivery via lettre.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use secrecy::ExposeSecret;

use wednfest_core::Email;

use super::{DeliveryError, EmailContent, NotificationSender};
use crate::config::MailConfig;

/// Sends mail through an authenticated SMTP relay over implicit TLS.
#[derive(Clone)]
pub struct SmtpSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpSender {
    /// Create a sender from configuration.
    ///
    /// The relay connection is opened lazily on first send.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Smtp` if the relay cannot be configured and
    /// `DeliveryError::InvalidAddress` if the username is not a mailbox.
    pub fn new(config: &MailConfig) -> Result<Self, DeliveryError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        let from = config
            .username
            .parse()
            .map_err(|_| DeliveryError::InvalidAddress(config.username.clone()))?;

        Ok(Self { mailer, from })
    }
}

#[async_trait]
impl NotificationSender for SmtpSender {
    #[tracing::instrument(skip(self, content), fields(to = %to, subject = %content.subject))]
    async fn send(&self, to: &Email, content: &EmailContent) -> Result<(), DeliveryError> {
        let recipient: Mailbox = to
            .as_str()
            .parse()
            .map_err(|_| DeliveryError::InvalidAddress(to.to_string()))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(content.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(content.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(content.html.clone()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!("Email sent successfully");
        Ok(())
    }
}
