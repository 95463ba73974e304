//! Outbound email notifications.
//!
//! The auth flows only need to hand a rendered message to someone who will
//! deliver it. [`NotificationSender`] is that seam: production uses
//! [`SmtpSender`], tests substitute a recorder.

mod smtp;
pub mod templates;

pub use smtp::SmtpSender;
pub use templates::EmailContent;

use async_trait::async_trait;
use lettre::transport::smtp::Error as SmtpError;
use thiserror::Error;

use wednfest_core::Email;

/// Errors that can occur when delivering a notification.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// The sender refused the message for another reason.
    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// Delivers a rendered email to a single recipient.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Send `content` to `to`.
    async fn send(&self, to: &Email, content: &EmailContent) -> Result<(), DeliveryError>;
}
