//! Authentication service.
//!
//! Owns the account lifecycle: signup and vendor registration, email
//! verification, login, and the forgot/reset password hand-off. Every flow
//! is expressed against the [`CredentialStore`] and [`NotificationSender`]
//! traits so the same code runs over `PostgreSQL` and SMTP in production and
//! over in-memory fakes in tests.
//!
//! All tokens carry the account email as their only claim and expire after
//! [`TOKEN_TTL`]. Nothing is persisted about issued tokens, so a verification
//! or reset link keeps working until it expires.

mod error;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use token::{TOKEN_TTL, TokenError, TokenService};

use std::sync::Arc;

use tracing::instrument;
use url::Url;

use wednfest_core::Email;

use crate::db::{CredentialStore, RepositoryError};
use crate::models::{Account, NewAccount, NewUser, NewVendor, Profile, UserProfile};
use crate::services::mail::{NotificationSender, templates};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Access token for the session gate.
    pub token: String,
    /// The authenticated account.
    pub account: Account,
}

/// Authentication service.
///
/// Cheap to clone; the store and sender are shared.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    notifier: Arc<dyn NotificationSender>,
    tokens: TokenService,
    frontend_url: Url,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(
        store: Arc<dyn CredentialStore>,
        notifier: Arc<dyn NotificationSender>,
        tokens: TokenService,
        frontend_url: Url,
    ) -> Self {
        Self {
            store,
            notifier,
            tokens,
            frontend_url,
        }
    }

    /// The token service used for every issued token.
    #[must_use]
    pub const fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a customer and send the verification email.
    ///
    /// If delivery fails the account is kept; the caller can retry with
    /// [`Self::resend_verification`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccountExists` if the email is already registered,
    /// `AuthError::DuplicateEmail` if a concurrent signup won the insert, and
    /// `AuthError::DeliveryFailed` if the verification email cannot be sent.
    #[instrument(skip_all, fields(email = %new_user.email))]
    pub async fn signup(&self, new_user: NewUser) -> Result<Account, AuthError> {
        self.ensure_email_available(&new_user.email).await?;

        let password_hash = hash_password(&new_user.password)?;
        let account = self
            .create_account(NewAccount {
                email: new_user.email,
                password_hash: Some(password_hash),
                profile: Profile::User(UserProfile {
                    first_name: normalize_name(&new_user.first_name),
                    last_name: normalize_name(&new_user.last_name),
                    role: wednfest_core::Role::default(),
                }),
            })
            .await?;

        tracing::info!(account_id = %account.id, "User account created");

        self.send_verification(&account.email).await?;
        Ok(account)
    }

    /// Register a vendor.
    ///
    /// Vendors start without a password and receive one through the reset
    /// flow. No email is sent.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccountExists` or `AuthError::DuplicateEmail` if
    /// the email is already registered in either account space.
    #[instrument(skip_all, fields(email = %new_vendor.email))]
    pub async fn register_vendor(&self, new_vendor: NewVendor) -> Result<Account, AuthError> {
        self.ensure_email_available(&new_vendor.email).await?;

        let mut profile = new_vendor.profile;
        profile.first_name = normalize_name(&profile.first_name);
        profile.last_name = normalize_name(&profile.last_name);
        profile.business_name = profile.business_name.trim().to_owned();

        let account = self
            .create_account(NewAccount {
                email: new_vendor.email,
                password_hash: None,
                profile: Profile::Vendor(profile),
            })
            .await?;

        tracing::info!(account_id = %account.id, "Vendor account created");
        Ok(account)
    }

    // =========================================================================
    // Email Verification
    // =========================================================================

    /// Send a fresh verification email to an unverified account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound` for an unknown email,
    /// `AuthError::AlreadyVerified` if there is nothing to verify, and
    /// `AuthError::DeliveryFailed` if sending fails.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn resend_verification(&self, email: &Email) -> Result<(), AuthError> {
        let account = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::NotFound)?;

        if account.verified {
            return Err(AuthError::AlreadyVerified);
        }

        self.send_verification(&account.email).await
    }

    /// Mark the account named by a verification token as verified.
    ///
    /// Verifying an already verified account succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenInvalid` or `AuthError::TokenExpired` for a
    /// bad token and `AuthError::NotFound` if the account no longer exists.
    #[instrument(skip_all)]
    pub async fn verify_email(&self, token: &str) -> Result<Email, AuthError> {
        let email = self.email_from_token(token)?;
        self.store
            .mark_verified(&email)
            .await
            .map_err(not_found_as_auth)?;

        tracing::info!(email = %email, "Email verified");
        Ok(email)
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Check a password and issue an access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown, the
    /// account has no password yet, or the password does not match.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<LoginOutcome, AuthError> {
        let account = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let matches = account
            .password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(password, hash));
        if !matches {
            tracing::debug!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(account.email.as_str())?;
        tracing::info!(account_id = %account.id, kind = %account.kind(), "Login succeeded");

        Ok(LoginOutcome { token, account })
    }

    // =========================================================================
    // Password Reset
    // =========================================================================

    /// Email a password reset link.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound` for an unknown email and
    /// `AuthError::DeliveryFailed` if sending fails.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn forgot_password(&self, email: &Email) -> Result<(), AuthError> {
        let account = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::NotFound)?;

        let token = self.tokens.issue(account.email.as_str())?;
        let content = templates::reset_password_email(&self.frontend_url, &token)?;
        self.notifier.send(&account.email, &content).await?;

        tracing::info!("Password reset email sent");
        Ok(())
    }

    /// Exchange a reset link token for a fresh token bound to the same email.
    ///
    /// This is the landing step of the reset link: the frontend swaps the
    /// emailed token for one with a full validity window before showing the
    /// new-password form.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenInvalid` or `AuthError::TokenExpired`.
    #[instrument(skip_all)]
    pub fn verify_reset_token(&self, token: &str) -> Result<String, AuthError> {
        let claim = self.tokens.verify(token)?;
        Ok(self.tokens.issue(&claim)?)
    }

    /// Replace the password of the account named by a reset token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if no token was given, token errors
    /// for a bad token, `AuthError::InvalidInput` for an empty password, and
    /// `AuthError::NotFound` if the account no longer exists.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        token: Option<&str>,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Unauthorized)?;
        let email = self.email_from_token(token)?;

        let password_hash = hash_password(new_password)?;
        self.store
            .update_password(&email, &password_hash)
            .await
            .map_err(not_found_as_auth)?;

        tracing::info!(email = %email, "Password reset");
        Ok(())
    }

    // =========================================================================
    // Session Gate
    // =========================================================================

    /// Resolve a presented access token to the email it was issued for.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for a missing, malformed, or expired
    /// token.
    pub fn authenticate(&self, token: Option<&str>) -> Result<Email, AuthError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Unauthorized)?;
        self.email_from_token(token)
            .map_err(|_| AuthError::Unauthorized)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn ensure_email_available(&self, email: &Email) -> Result<(), AuthError> {
        if self.store.find_by_email(email).await?.is_some() {
            return Err(AuthError::AccountExists);
        }
        Ok(())
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, AuthError> {
        self.store.create(account).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::DuplicateEmail,
            other => AuthError::Repository(other),
        })
    }

    async fn send_verification(&self, email: &Email) -> Result<(), AuthError> {
        let token = self.tokens.issue(email.as_str())?;
        let content = templates::verification_email(&self.frontend_url, &token)?;
        self.notifier.send(email, &content).await?;

        tracing::info!(email = %email, "Verification email sent");
        Ok(())
    }

    fn email_from_token(&self, token: &str) -> Result<Email, AuthError> {
        let claim = self.tokens.verify(token)?;
        Email::parse(&claim).map_err(|_| AuthError::TokenInvalid)
    }
}

fn not_found_as_auth(err: RepositoryError) -> AuthError {
    match err {
        RepositoryError::NotFound => AuthError::NotFound,
        other => AuthError::Repository(other),
    }
}

/// Names are stored trimmed and lowercased.
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
