use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha512};
use uuid::Uuid;

use crate::domain::repository::{PasswordPort, TokenRepository, UserRepository};
use crate::domain::types::{NewToken, SESSION_TOKEN_TTL_DAYS, Token, TokenKind, User};
use crate::domain::validation::validate_login;
use crate::error::AccountsServiceError;

/// `hex(sha512(user_id ‖ password_hash ‖ created_at ‖ random salt))`.
pub fn generate_token(user: &User, created_at: DateTime<Utc>) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let mut hasher = Sha512::new();
    hasher.update(user.id.to_string().as_bytes());
    hasher.update(user.password.as_bytes());
    hasher.update(created_at.to_rfc3339().as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate and persist a token of `kind` for `user`, valid for `ttl`.
pub async fn issue_token<T: TokenRepository>(
    tokens: &T,
    user: &User,
    kind: TokenKind,
    ttl: Duration,
) -> Result<Token, AccountsServiceError> {
    let created_at = Utc::now();
    tokens
        .create(&NewToken {
            token: generate_token(user, created_at),
            kind,
            created_at,
            expires_at: created_at + ttl,
            user_id: user.id,
        })
        .await
}

// ── Login ────────────────────────────────────────────────────────────────────

/// Raw login fields; either may be missing from the request.
#[derive(Default)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct LoginUseCase<U: UserRepository, T: TokenRepository, P: PasswordPort> {
    pub users: U,
    pub tokens: T,
    pub passwords: P,
}

impl<U: UserRepository, T: TokenRepository, P: PasswordPort> LoginUseCase<U, T, P> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AccountsServiceError> {
        let creds = validate_login(input.email.as_deref(), input.password.as_deref())?;

        // Unknown email and wrong password are indistinguishable to the caller.
        let user = self
            .users
            .find_by_email(&creds.email)
            .await?
            .ok_or(AccountsServiceError::InvalidCredentials)?;

        if !self.passwords.verify(&creds.password, &user.password).await? {
            return Err(AccountsServiceError::InvalidCredentials);
        }

        let token = issue_token(
            &self.tokens,
            &user,
            TokenKind::Session,
            Duration::days(SESSION_TOKEN_TTL_DAYS),
        )
        .await?;
        tracing::info!(user_id = user.id, "session issued");

        Ok(LoginOutput {
            user,
            token: token.token,
            expires_at: token.expires_at,
        })
    }
}

// ── Bearer resolution ────────────────────────────────────────────────────────

pub struct ResolveUserUseCase<T: TokenRepository, U: UserRepository> {
    pub tokens: T,
    pub users: U,
}

impl<T: TokenRepository, U: UserRepository> ResolveUserUseCase<T, U> {
    /// Resolve a bearer token to its owner. Every miss is `InvalidToken`.
    pub async fn execute(&self, bearer: &str) -> Result<User, AccountsServiceError> {
        let token = self
            .tokens
            .find_valid_session(bearer)
            .await?
            .filter(|t| t.kind == TokenKind::Session && t.is_valid())
            .ok_or(AccountsServiceError::InvalidToken)?;

        self.users
            .find_by_id(token.user_id)
            .await?
            .ok_or(AccountsServiceError::InvalidToken)
    }
}
