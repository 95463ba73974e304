//! Authentication route handlers.
//!
//! JSON endpoints for signup, vendor registration, email verification, login,
//! and the forgot/reset password flow. Request bodies are validated here and
//! handed to [`AuthService`](crate::services::auth::AuthService) as domain
//! types.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use wednfest_core::{BusinessCategory, Email, IndianState, Phone};

use super::ApiJson;
use crate::error::Result;
use crate::middleware::session_cookie;
use crate::models::{AccountView, NewUser, NewVendor, VendorProfile};
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Form Types
// =============================================================================

/// Customer signup body.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupUserForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Vendor registration body.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupVendorForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub business_name: String,
    pub business_category: String,
    pub phone: String,
    pub state: String,
}

/// Login body.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Body carrying only an email (forgot password, resend verification).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmailForm {
    pub email: String,
}

/// New password body.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct ResetPasswordForm {
    pub password: String,
}

fn invalid(message: &str) -> AuthError {
    AuthError::InvalidInput(message.to_owned())
}

fn required(value: &str, message: &str) -> std::result::Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(invalid(message));
    }
    Ok(())
}

fn validate_password(password: &str) -> std::result::Result<(), AuthError> {
    if password.trim().is_empty() || password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(invalid(&format!(
            "Password minimum length should be {MIN_PASSWORD_LENGTH}"
        )));
    }
    Ok(())
}

impl SignupUserForm {
    /// Validate field formats.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInput` naming the first bad field.
    pub fn validate(self) -> std::result::Result<NewUser, AuthError> {
        let email = Email::parse(&self.email).map_err(|_| invalid("Invalid email entered"))?;
        validate_password(&self.password)?;
        required(&self.first_name, "First Name is required")?;
        required(&self.last_name, "Last Name is required")?;

        Ok(NewUser {
            email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
        })
    }
}

impl SignupVendorForm {
    /// Validate field formats.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInput` naming the first bad field.
    pub fn validate(self) -> std::result::Result<NewVendor, AuthError> {
        let email = Email::parse(&self.email).map_err(|_| invalid("Invalid email entered"))?;
        required(&self.first_name, "First Name is required")?;
        required(&self.last_name, "Last Name is required")?;
        required(&self.business_name, "Business Name is required")?;
        required(&self.business_category, "Business Category is required")?;
        let business_category = self
            .business_category
            .parse::<BusinessCategory>()
            .map_err(|_| invalid("Invalid Business Category"))?;
        let phone = Phone::parse(&self.phone).map_err(|_| invalid("Invalid Phone number"))?;
        required(&self.state, "State is required")?;
        let state = self
            .state
            .parse::<IndianState>()
            .map_err(|_| invalid("Invalid State"))?;

        Ok(NewVendor {
            email,
            profile: VendorProfile {
                first_name: self.first_name,
                last_name: self.last_name,
                business_name: self.business_name,
                business_category,
                phone,
                state,
            },
        })
    }
}

impl LoginForm {
    /// Check that both fields are present.
    ///
    /// An email that does not parse cannot match any account, so it is
    /// reported as bad credentials rather than bad input.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInput` for a missing field and
    /// `AuthError::InvalidCredentials` for an unparseable email.
    pub fn validate(&self) -> std::result::Result<Email, AuthError> {
        required(&self.email, "Email is required")?;
        if self.password.is_empty() {
            return Err(invalid("Password is required"));
        }
        Email::parse(&self.email).map_err(|_| AuthError::InvalidCredentials)
    }
}

impl EmailForm {
    /// Parse the email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInput` if it is missing or malformed.
    pub fn validate(&self) -> std::result::Result<Email, AuthError> {
        required(&self.email, "Email is required")?;
        Email::parse(&self.email).map_err(|_| invalid("Email is invalid"))
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Success body with only a message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Success body carrying an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: AccountView,
}

/// Success body carrying an access token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub message: &'static str,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AccountView>,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/v1/signup/user
pub async fn signup_user(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<SignupUserForm>,
) -> Result<impl IntoResponse> {
    let new_user = form.validate()?;
    let account = state.auth().signup(new_user).await?;

    Ok((
        StatusCode::CREATED,
        Json(AccountResponse {
            success: true,
            message: "Signup successful. Verification email has been sent, Please verify your email.",
            data: account.view(),
        }),
    ))
}

/// POST /api/v1/signup/vendor
pub async fn signup_vendor(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<SignupVendorForm>,
) -> Result<impl IntoResponse> {
    let new_vendor = form.validate()?;
    let account = state.auth().register_vendor(new_vendor).await?;

    Ok((
        StatusCode::CREATED,
        Json(AccountResponse {
            success: true,
            message: "Thank you for Registering, We will connect soon with you with further steps",
            data: account.view(),
        }),
    ))
}

/// POST /api/v1/login
///
/// Returns the access token in the body and in the `token` cookie.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<LoginForm>,
) -> Result<impl IntoResponse> {
    let email = form.validate()?;
    let outcome = state.auth().login(&email, &form.password).await?;
    let cookie = session_cookie(outcome.token.clone(), state.config().secure_cookies());

    Ok((
        [(SET_COOKIE, cookie.to_string())],
        Json(TokenResponse {
            success: true,
            message: "LogIn successful",
            token: outcome.token,
            data: Some(outcome.account.view()),
        }),
    ))
}

/// POST /api/v1/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<EmailForm>,
) -> Result<Json<MessageResponse>> {
    let email = form.validate()?;
    state.auth().forgot_password(&email).await?;

    Ok(Json(MessageResponse::new(format!(
        "Reset password mail has been sent to {email}, will get expire after 15 mins"
    ))))
}

/// GET /api/v1/reset-password/{token}
///
/// Landing step of the reset link: swaps the emailed token for a fresh one
/// and sets it as the `token` cookie.
pub async fn verify_reset_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse> {
    let fresh = state.auth().verify_reset_token(&token)?;
    let cookie = session_cookie(fresh.clone(), state.config().secure_cookies());

    Ok((
        [(SET_COOKIE, cookie.to_string())],
        Json(TokenResponse {
            success: true,
            message: "Email verified successfully",
            token: fresh,
            data: None,
        }),
    ))
}

/// POST /api/v1/reset-password/{token}
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    ApiJson(form): ApiJson<ResetPasswordForm>,
) -> Result<Json<MessageResponse>> {
    // A bad link is reported before a bad password.
    state.auth().tokens().verify(&token).map_err(AuthError::from)?;
    validate_password(&form.password)?;
    state
        .auth()
        .reset_password(Some(&token), &form.password)
        .await?;

    Ok(Json(MessageResponse::new("Password update successful")))
}

/// GET /api/v1/verify-email/{token}
pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.auth().verify_email(&token).await?;

    Ok(Json(MessageResponse::new(
        "Email verified successfully. You can log in now.",
    )))
}

/// POST /api/v1/resend-email-verification
pub async fn resend_verification(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<EmailForm>,
) -> Result<Json<MessageResponse>> {
    let email = form.validate()?;
    state.auth().resend_verification(&email).await?;

    Ok(Json(MessageResponse::new(
        "Verification email has been sent, Please verify your email.",
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user_form() -> SignupUserForm {
        SignupUserForm {
            email: "Alice@X.com".to_owned(),
            password: "Passw0rd!".to_owned(),
            first_name: "Alice".to_owned(),
            last_name: "Liddell".to_owned(),
        }
    }

    fn vendor_form() -> SignupVendorForm {
        SignupVendorForm {
            email: "meera@x.com".to_owned(),
            first_name: "Meera".to_owned(),
            last_name: "Rao".to_owned(),
            business_name: "Rao Studios".to_owned(),
            business_category: "Hair & Makeup".to_owned(),
            phone: "+919876543210".to_owned(),
            state: "Tamil Nadu".to_owned(),
        }
    }

    fn message(err: AuthError) -> String {
        match err {
            AuthError::InvalidInput(msg) => msg,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_signup_form_valid() {
        let user = user_form().validate().unwrap();
        assert_eq!(user.email.as_str(), "alice@x.com");
    }

    #[test]
    fn test_signup_form_rejects_bad_fields() {
        let mut form = user_form();
        form.email = "not-an-email".to_owned();
        assert_eq!(message(form.validate().err().unwrap()), "Invalid email entered");

        let mut form = user_form();
        form.password = "short".to_owned();
        assert_eq!(
            message(form.validate().err().unwrap()),
            "Password minimum length should be 8"
        );

        let mut form = user_form();
        form.password = "        ".to_owned();
        assert!(form.validate().is_err());

        let mut form = user_form();
        form.first_name = "  ".to_owned();
        assert_eq!(message(form.validate().err().unwrap()), "First Name is required");

        let mut form = user_form();
        form.last_name = String::new();
        assert_eq!(message(form.validate().err().unwrap()), "Last Name is required");
    }

    #[test]
    fn test_signup_form_missing_fields_deserialize_to_validation_errors() {
        let form: SignupUserForm = serde_json::from_str(r#"{"email": "a@x.com"}"#).unwrap();
        assert!(matches!(form.validate(), Err(AuthError::InvalidInput(_))));
    }

    #[test]
    fn test_vendor_form_valid() {
        let vendor = vendor_form().validate().unwrap();
        assert_eq!(
            vendor.profile.business_category,
            BusinessCategory::HairAndMakeup
        );
        assert_eq!(vendor.profile.state, IndianState::TamilNadu);
    }

    #[test]
    fn test_vendor_form_rejects_bad_fields() {
        let mut form = vendor_form();
        form.phone = "12345".to_owned();
        assert_eq!(message(form.validate().unwrap_err()), "Invalid Phone number");

        let mut form = vendor_form();
        form.business_category = "florists".to_owned();
        assert_eq!(
            message(form.validate().unwrap_err()),
            "Invalid Business Category"
        );

        let mut form = vendor_form();
        form.state = "atlantis".to_owned();
        assert_eq!(message(form.validate().unwrap_err()), "Invalid State");

        let mut form = vendor_form();
        form.business_name = " ".to_owned();
        assert_eq!(
            message(form.validate().unwrap_err()),
            "Business Name is required"
        );
    }

    #[test]
    fn test_login_form() {
        let form = LoginForm {
            email: String::new(),
            password: "x".to_owned(),
        };
        assert_eq!(message(form.validate().unwrap_err()), "Email is required");

        let form = LoginForm {
            email: "a@x.com".to_owned(),
            password: String::new(),
        };
        assert_eq!(message(form.validate().unwrap_err()), "Password is required");

        let form = LoginForm {
            email: "garbage".to_owned(),
            password: "x".to_owned(),
        };
        assert!(matches!(
            form.validate(),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_email_form() {
        let form = EmailForm {
            email: "bad".to_owned(),
        };
        assert_eq!(message(form.validate().unwrap_err()), "Email is invalid");
    }
}
