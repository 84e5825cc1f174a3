use sea_orm::DatabaseConnection;

use crate::infra::db::{DbCharacterRepository, DbTokenRepository, DbUserRepository};
use crate::infra::mail::HttpMailer;
use crate::infra::password::Argon2Password;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: HttpMailer,
    pub passwords: Argon2Password,
    pub frontend_url: String,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn token_repo(&self) -> DbTokenRepository {
        DbTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn character_repo(&self) -> DbCharacterRepository {
        DbCharacterRepository {
            db: self.db.clone(),
        }
    }
}
