//! Integration tests for wedNfest auth.
//!
//! The tests drive the real router and auth service against the in-memory
//! credential store, with outgoing mail captured by [`RecordingSender`]. No
//! database or SMTP relay is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p wednfest-integration-tests
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::Router;
use secrecy::SecretString;
use tokio::sync::Mutex;
use url::Url;

use wednfest_core::Email;
use wednfest_server::config::{AuthConfig, MailConfig};
use wednfest_server::db::InMemoryCredentialStore;
use wednfest_server::routes;
use wednfest_server::services::mail::{DeliveryError, EmailContent, NotificationSender};
use wednfest_server::state::AppState;

/// Frontend URL used in emailed links.
pub const FRONTEND_URL: &str = "https://wednfest.test";

/// A delivered message as seen by the recorder.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: Email,
    pub content: EmailContent,
}

/// Notification sender that keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<SentEmail>>,
    fail: AtomicBool,
}

impl RecordingSender {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following send fail (or succeed again).
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// All messages sent so far.
    pub async fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().await.clone()
    }

    /// Token carried by the link in the most recent message.
    pub async fn last_token(&self) -> Option<String> {
        let sent = self.sent.lock().await;
        let last = sent.last()?;
        token_in(&last.content.text)
    }
}

/// Extract the token from the link line of a plain-text email body.
#[must_use]
pub fn token_in(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| line.starts_with(FRONTEND_URL))
        .and_then(|line| line.rsplit_once('/'))
        .map(|(_, token)| token.to_owned())
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, to: &Email, content: &EmailContent) -> Result<(), DeliveryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeliveryError::Rejected("recording sender is failing".to_string()));
        }
        self.sent.lock().await.push(SentEmail {
            to: to.clone(),
            content: content.clone(),
        });
        Ok(())
    }
}

/// Configuration pointing at nothing real.
///
/// # Panics
///
/// Never in practice; the literals below are valid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn test_config() -> AuthConfig {
    AuthConfig {
        database_url: SecretString::from("postgres://localhost/wednfest_test"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        frontend_url: Url::parse(FRONTEND_URL).unwrap(),
        access_secret: SecretString::from("kX9#mP2$vL7@nQ4&wR8*zT1!yU6^bN3%"),
        mail: MailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 465,
            username: "noreply@wednfest.test".to_string(),
            password: SecretString::from("unused"),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Everything a test needs to poke at.
pub struct TestContext {
    pub state: AppState,
    pub store: Arc<InMemoryCredentialStore>,
    pub outbox: Arc<RecordingSender>,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryCredentialStore::new());
        let outbox = Arc::new(RecordingSender::new());
        let state = AppState::new(test_config(), store.clone(), outbox.clone());
        Self {
            state,
            store,
            outbox,
        }
    }

    /// Router over this context's state.
    #[must_use]
    pub fn app(&self) -> Router {
        routes::router(self.state.clone())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
