#![allow(async_fn_in_trait)]

use crate::domain::types::{
    Character, NewCharacter, NewToken, NewUser, Token, TokenKind, User,
};
use crate::error::AccountsServiceError;

/// Repository for accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AccountsServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountsServiceError>;
    async fn find_by_username(&self, username: &str)
    -> Result<Option<User>, AccountsServiceError>;

    /// Insert a user. A store-level unique violation maps to
    /// `EmailTaken` / `UsernameTaken`.
    async fn create(&self, user: &NewUser) -> Result<User, AccountsServiceError>;
}

/// Repository for session and password-reset tokens.
pub trait TokenRepository: Send + Sync {
    async fn create(&self, token: &NewToken) -> Result<Token, AccountsServiceError>;

    /// Find an unused, unexpired session token by its literal string.
    async fn find_valid_session(&self, token: &str)
    -> Result<Option<Token>, AccountsServiceError>;

    /// Newest token of `kind` for the user, whatever its state.
    async fn find_latest(
        &self,
        user_id: i32,
        kind: TokenKind,
    ) -> Result<Option<Token>, AccountsServiceError>;

    /// Mark a reset token used and store the new password hash in one
    /// transaction. The token is only claimed while it is still unused and
    /// unexpired; otherwise `InvalidResetToken` is returned. `UserNotFound`
    /// is returned when the user row is gone. Either error changes nothing.
    async fn consume_reset(
        &self,
        token_id: i32,
        user_id: i32,
        password_hash: &str,
    ) -> Result<(), AccountsServiceError>;
}

/// Repository for game characters.
pub trait CharacterRepository: Send + Sync {
    async fn find_active(&self, user_id: i32) -> Result<Option<Character>, AccountsServiceError>;

    /// Insert an active character. Losing the one-active-per-user race maps to
    /// `CharacterAlreadyExists` carrying the winner's summary.
    async fn create(&self, character: &NewCharacter)
    -> Result<Character, AccountsServiceError>;
}

/// Port for one-way password hashing.
pub trait PasswordPort: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, AccountsServiceError>;
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AccountsServiceError>;
}

/// Outbound transactional email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Port for dispatching transactional email.
pub trait MailPort: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AccountsServiceError>;
}
