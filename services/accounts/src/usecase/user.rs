use crate::domain::repository::{PasswordPort, UserRepository};
use crate::domain::types::{NewUser, User};
use crate::domain::validation::validate_registration;
use crate::error::AccountsServiceError;

// ── Register ─────────────────────────────────────────────────────────────────

/// Raw registration fields; any of them may be missing from the request.
#[derive(Default)]
pub struct RegisterInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct RegisterUseCase<U: UserRepository, P: PasswordPort> {
    pub users: U,
    pub passwords: P,
}

impl<U: UserRepository, P: PasswordPort> RegisterUseCase<U, P> {
    pub async fn execute(&self, input: RegisterInput) -> Result<User, AccountsServiceError> {
        let reg = validate_registration(
            input.username.as_deref(),
            input.email.as_deref(),
            input.password.as_deref(),
        )?;

        if self.users.find_by_email(&reg.email).await?.is_some() {
            return Err(AccountsServiceError::EmailTaken);
        }
        if self.users.find_by_username(&reg.username).await?.is_some() {
            return Err(AccountsServiceError::UsernameTaken);
        }

        let password_hash = self.passwords.hash(&reg.password).await?;
        let user = self
            .users
            .create(&NewUser {
                username: reg.username,
                email: reg.email,
                password_hash,
            })
            .await?;
        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }
}
