//! Rendered bodies for the verification and password reset emails.

use askama::Template;
use url::Url;

use super::DeliveryError;

#[derive(Template)]
#[template(path = "email/verify_email.html")]
struct VerifyEmailHtml<'a> {
    link: &'a str,
}

#[derive(Template)]
#[template(path = "email/verify_email.txt")]
struct VerifyEmailText<'a> {
    link: &'a str,
}

#[derive(Template)]
#[template(path = "email/reset_password.html")]
struct ResetPasswordHtml<'a> {
    link: &'a str,
}

#[derive(Template)]
#[template(path = "email/reset_password.txt")]
struct ResetPasswordText<'a> {
    link: &'a str,
}

/// Subject and bodies of an outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Subject line of the verification email.
pub const VERIFY_EMAIL_SUBJECT: &str = "Email verification request";

/// Subject line of the password reset email.
pub const RESET_PASSWORD_SUBJECT: &str = "Password Reset Request";

/// Build `{frontend}/{route}/{token}` without doubling slashes.
fn frontend_link(frontend_url: &Url, route: &str, token: &str) -> String {
    format!(
        "{}/{route}/{token}",
        frontend_url.as_str().trim_end_matches('/')
    )
}

/// Link a user follows to verify their email.
#[must_use]
pub fn verify_email_link(frontend_url: &Url, token: &str) -> String {
    frontend_link(frontend_url, "verify-email", token)
}

/// Link a user follows to reset their password.
#[must_use]
pub fn reset_password_link(frontend_url: &Url, token: &str) -> String {
    frontend_link(frontend_url, "reset-password", token)
}

/// Render the verification email.
///
/// # Errors
///
/// Returns `DeliveryError::Template` if rendering fails.
pub fn verification_email(frontend_url: &Url, token: &str) -> Result<EmailContent, DeliveryError> {
    let link = verify_email_link(frontend_url, token);
    Ok(EmailContent {
        subject: VERIFY_EMAIL_SUBJECT.to_owned(),
        html: VerifyEmailHtml { link: &link }.render()?,
        text: VerifyEmailText { link: &link }.render()?,
    })
}

/// Render the password reset email.
///
/// # Errors
///
/// Returns `DeliveryError::Template` if rendering fails.
pub fn reset_password_email(
    frontend_url: &Url,
    token: &str,
) -> Result<EmailContent, DeliveryError> {
    let link = reset_password_link(frontend_url, token);
    Ok(EmailContent {
        subject: RESET_PASSWORD_SUBJECT.to_owned(),
        html: ResetPasswordHtml { link: &link }.render()?,
        text: ResetPasswordText { link: &link }.render()?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJwYXlsb2FkIjoiYSJ9.c2ln";

    #[test]
    fn test_links_do_not_double_slash() {
        let with_slash = Url::parse("https://wednfest.in/").unwrap();
        let with_path = Url::parse("https://wednfest.in/app").unwrap();

        assert_eq!(
            verify_email_link(&with_slash, "t"),
            "https://wednfest.in/verify-email/t"
        );
        assert_eq!(
            reset_password_link(&with_path, "t"),
            "https://wednfest.in/app/reset-password/t"
        );
    }

    #[test]
    fn test_verification_email_contains_link() {
        let frontend = Url::parse("https://wednfest.in").unwrap();
        let content = verification_email(&frontend, TOKEN).unwrap();

        assert_eq!(content.subject, "Email verification request");
        assert!(content.html.contains("Welcome to wedNfest!"));
        let link = format!("https://wednfest.in/verify-email/{TOKEN}");
        assert!(content.html.contains(&link));
        assert!(content.text.contains(&link));
    }

    #[test]
    fn test_reset_email_contains_link_and_ignore_note() {
        let frontend = Url::parse("https://wednfest.in").unwrap();
        let content = reset_password_email(&frontend, TOKEN).unwrap();

        assert_eq!(content.subject, "Password Reset Request");
        assert!(
            content
                .html
                .contains(&format!("https://wednfest.in/reset-password/{TOKEN}"))
        );
        assert!(content.html.contains("If you did not request this"));
    }
}
