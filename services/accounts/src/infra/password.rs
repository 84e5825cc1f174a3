use std::sync::Arc;

use anyhow::{Context as _, anyhow};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use tokio::task;

use crate::domain::repository::PasswordPort;
use crate::error::AccountsServiceError;

const MIN_SALT_LEN: usize = 8;
const MAX_SALT_LEN: usize = 48;

/// Argon2id hashing with the deployment-wide salt from configuration.
///
/// Hashes are PHC strings, so verification reads parameters and salt back out
/// of the stored hash rather than from `self`.
#[derive(Clone)]
pub struct Argon2Password {
    salt: Arc<str>,
}

impl Argon2Password {
    pub fn new(salt: &str) -> anyhow::Result<Self> {
        let len = salt.len();
        if !(MIN_SALT_LEN..=MAX_SALT_LEN).contains(&len) {
            return Err(anyhow!(
                "password salt must be {MIN_SALT_LEN}..={MAX_SALT_LEN} bytes, got {len}"
            ));
        }
        Ok(Self { salt: salt.into() })
    }
}

fn hash_password(password: &str, salt: &str) -> anyhow::Result<String> {
    let salt = SaltString::encode_b64(salt.as_bytes())
        .map_err(|e| anyhow!("invalid password salt: {e}"))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow!("invalid password hash format: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

impl PasswordPort for Argon2Password {
    async fn hash(&self, password: &str) -> Result<String, AccountsServiceError> {
        let password = password.to_owned();
        let salt = Arc::clone(&self.salt);
        let hash = task::spawn_blocking(move || hash_password(&password, &salt))
            .await
            .context("password hashing task panicked")??;
        Ok(hash)
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AccountsServiceError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let ok = task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .context("password verification task panicked")??;
        Ok(ok)
    }
}
