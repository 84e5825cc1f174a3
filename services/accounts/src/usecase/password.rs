use chrono::Duration;

use crate::domain::repository::{
    MailPort, OutgoingMail, PasswordPort, TokenRepository, UserRepository,
};
use crate::domain::types::{RESET_TOKEN_TTL_DAYS, TokenKind};
use crate::domain::validation::{ValidationError, validate_password};
use crate::error::AccountsServiceError;
use crate::usecase::token::issue_token;

pub const RESET_MAIL_SUBJECT: &str = "Forgot Password Link";

/// `<frontend>/resetPassword?id=<user_id>&token=<token>`.
pub fn reset_link(frontend_url: &str, user_id: i32, token: &str) -> String {
    format!(
        "{}/resetPassword?id={user_id}&token={token}",
        frontend_url.trim_end_matches('/')
    )
}

/// HTML body with a button linking to `url` and a plain copy of the URL.
pub fn render_mail(content: &str, url: &str, button_text: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="text-align: center; font-family: Verdana, serif; color: #000;">
  <div style="max-width: 600px; margin: 10px; background-color: #fafafa; padding: 25px; border-radius: 20px;">
    <p style="text-align: left;">{content}</p>
    <a href="{url}" target="_blank">
      <button style="background-color: #444394; border: 0; width: 200px; height: 30px; border-radius: 6px; color: #fff;">{button_text}</button>
    </a>
    <p style="text-align: left;">If you are unable to click the above button, copy paste the below URL into your address bar</p>
    <a href="{url}" target="_blank">
      <p style="margin: 0px; text-align: left; font-size: 10px; text-decoration: none;">{url}</p>
    </a>
  </div>
</body>
</html>"#
    )
}

// ── ForgotPassword ───────────────────────────────────────────────────────────

pub struct ForgotPasswordInput {
    pub email: Option<String>,
}

pub struct ForgotPasswordUseCase<U, T, M>
where
    U: UserRepository,
    T: TokenRepository,
    M: MailPort,
{
    pub users: U,
    pub tokens: T,
    pub mailer: M,
    pub frontend_url: String,
}

impl<U, T, M> ForgotPasswordUseCase<U, T, M>
where
    U: UserRepository,
    T: TokenRepository,
    M: MailPort,
{
    /// Succeeds for unknown emails too, so callers cannot discover which accounts exist.
    pub async fn execute(&self, input: ForgotPasswordInput) -> Result<(), AccountsServiceError> {
        let email = match input.email.as_deref().map(str::trim) {
            Some(e) if !e.is_empty() => e,
            _ => return Err(ValidationError::Missing("email").into()),
        };

        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::info!("password reset requested for unknown email");
            return Ok(());
        };

        let token = issue_token(
            &self.tokens,
            &user,
            TokenKind::PasswordReset,
            Duration::days(RESET_TOKEN_TTL_DAYS),
        )
        .await?;

        let html = render_mail(
            "We have received a request to reset your password. \
             Please reset your password using the link below.",
            &reset_link(&self.frontend_url, user.id, &token.token),
            "Reset Password",
        );
        self.mailer
            .send(&OutgoingMail {
                to: user.email.clone(),
                subject: RESET_MAIL_SUBJECT.to_owned(),
                html,
            })
            .await?;
        tracing::info!(user_id = user.id, "password reset mail sent");
        Ok(())
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

pub struct ResetPasswordInput {
    pub user_id: i32,
    pub token: String,
    pub password: Option<String>,
}

pub struct ResetPasswordUseCase<T: TokenRepository, P: PasswordPort> {
    pub tokens: T,
    pub passwords: P,
}

impl<T: TokenRepository, P: PasswordPort> ResetPasswordUseCase<T, P> {
    /// Only the user's newest reset token is considered. Expiry is checked
    /// before the string comparison.
    pub async fn execute(&self, input: ResetPasswordInput) -> Result<(), AccountsServiceError> {
        let password = validate_password(input.password.as_deref())?;

        let token = self
            .tokens
            .find_latest(input.user_id, TokenKind::PasswordReset)
            .await?
            .ok_or(AccountsServiceError::InvalidResetToken)?;

        if token.is_expired() {
            return Err(AccountsServiceError::ResetTokenExpired);
        }
        if token.is_used || token.token != input.token {
            return Err(AccountsServiceError::InvalidResetToken);
        }

        let password_hash = self.passwords.hash(&password).await?;
        self.tokens
            .consume_reset(token.id, input.user_id, &password_hash)
            .await?;
        tracing::info!(user_id = input.user_id, "password reset");
        Ok(())
    }
}
