//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AuthConfig;
use crate::db::CredentialStore;
use crate::services::auth::{AuthService, TokenService};
use crate::services::mail::NotificationSender;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and is never mutated after
/// startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AuthConfig,
    store: Arc<dyn CredentialStore>,
    auth: AuthService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Service configuration
    /// * `store` - Credential store (`PostgreSQL` or in-memory)
    /// * `notifier` - Email delivery
    #[must_use]
    pub fn new(
        config: AuthConfig,
        store: Arc<dyn CredentialStore>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        let tokens = TokenService::new(&config.access_secret);
        let auth = AuthService::new(
            Arc::clone(&store),
            notifier,
            tokens,
            config.frontend_url.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                auth,
            }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.inner.config
    }

    /// Get a reference to the credential store.
    #[must_use]
    pub fn store(&self) -> &dyn CredentialStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }
}
