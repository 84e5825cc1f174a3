use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionError, TransactionTrait, sea_query::Expr,
};

use errant_accounts_schema::{characters, tokens, users};

use crate::domain::repository::{CharacterRepository, TokenRepository, UserRepository};
use crate::domain::types::{
    Character, NewCharacter, NewToken, NewUser, STARTING_EXPERIENCE, STARTING_GOLD,
    STARTING_LEVEL, Token, TokenKind, User,
};
use crate::error::AccountsServiceError;

/// Message of a unique-constraint violation, if that is what `err` is.
/// Postgres includes the violated index name in it.
fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => Some(message),
        _ => None,
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AccountsServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountsServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, AccountsServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &NewUser) -> Result<User, AccountsServiceError> {
        let inserted = users::ActiveModel {
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password: Set(user.password_hash.clone()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;

        match inserted {
            Ok(model) => Ok(user_from_model(model)),
            Err(err) => match unique_violation(&err) {
                Some(message) if message.contains("email") => {
                    Err(AccountsServiceError::EmailTaken)
                }
                Some(_) => Err(AccountsServiceError::UsernameTaken),
                None => Err(anyhow::Error::new(err).context("create user").into()),
            },
        }
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password: model.password,
    }
}

// ── Token repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTokenRepository {
    pub db: DatabaseConnection,
}

impl TokenRepository for DbTokenRepository {
    async fn create(&self, token: &NewToken) -> Result<Token, AccountsServiceError> {
        let model = tokens::ActiveModel {
            token: Set(token.token.clone()),
            kind: Set(token.kind.as_str().to_owned()),
            created_at: Set(token.created_at),
            expires_at: Set(token.expires_at),
            user_id: Set(token.user_id),
            is_used: Set(false),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create token")?;
        token_from_model(model)
    }

    async fn find_valid_session(
        &self,
        token: &str,
    ) -> Result<Option<Token>, AccountsServiceError> {
        let model = tokens::Entity::find()
            .filter(tokens::Column::Token.eq(token))
            .filter(tokens::Column::Kind.eq(TokenKind::Session.as_str()))
            .filter(tokens::Column::IsUsed.eq(false))
            .filter(tokens::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await
            .context("find valid session token")?;
        model.map(token_from_model).transpose()
    }

    async fn find_latest(
        &self,
        user_id: i32,
        kind: TokenKind,
    ) -> Result<Option<Token>, AccountsServiceError> {
        let model = tokens::Entity::find()
            .filter(tokens::Column::UserId.eq(user_id))
            .filter(tokens::Column::Kind.eq(kind.as_str()))
            .order_by_desc(tokens::Column::CreatedAt)
            .order_by_desc(tokens::Column::Id)
            .one(&self.db)
            .await
            .context("find latest token")?;
        model.map(token_from_model).transpose()
    }

    async fn consume_reset(
        &self,
        token_id: i32,
        user_id: i32,
        password_hash: &str,
    ) -> Result<(), AccountsServiceError> {
        let password_hash = password_hash.to_owned();
        self.db
            .transaction::<_, (), AccountsServiceError>(move |txn| {
                Box::pin(async move {
                    // Claiming the token is the race point: of two concurrent
                    // resets only one sees the row still unused.
                    let claimed = tokens::Entity::update_many()
                        .col_expr(tokens::Column::IsUsed, Expr::value(true))
                        .filter(tokens::Column::Id.eq(token_id))
                        .filter(tokens::Column::IsUsed.eq(false))
                        .filter(tokens::Column::ExpiresAt.gt(Utc::now()))
                        .exec(txn)
                        .await
                        .context("claim reset token")?;
                    if claimed.rows_affected != 1 {
                        return Err(AccountsServiceError::InvalidResetToken);
                    }
                    let updated = users::Entity::update_many()
                        .col_expr(users::Column::Password, Expr::value(password_hash))
                        .filter(users::Column::Id.eq(user_id))
                        .exec(txn)
                        .await
                        .context("update user password")?;
                    if updated.rows_affected == 0 {
                        return Err(AccountsServiceError::UserNotFound);
                    }
                    Ok(())
                })
            })
            .await
            .map_err(|err| match err {
                TransactionError::Connection(db) => anyhow::Error::new(db)
                    .context("reset password transaction")
                    .into(),
                TransactionError::Transaction(inner) => inner,
            })
    }
}

fn token_from_model(model: tokens::Model) -> Result<Token, AccountsServiceError> {
    let kind = model
        .kind
        .parse::<TokenKind>()
        .map_err(anyhow::Error::msg)?;
    Ok(Token {
        id: model.id,
        token: model.token,
        kind,
        created_at: model.created_at,
        expires_at: model.expires_at,
        user_id: model.user_id,
        is_used: model.is_used,
    })
}

// ── Character repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCharacterRepository {
    pub db: DatabaseConnection,
}

impl CharacterRepository for DbCharacterRepository {
    async fn find_active(&self, user_id: i32) -> Result<Option<Character>, AccountsServiceError> {
        let model = characters::Entity::find()
            .filter(characters::Column::UserId.eq(user_id))
            .filter(characters::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .context("find active character")?;
        model.map(character_from_model).transpose()
    }

    async fn create(&self, character: &NewCharacter) -> Result<Character, AccountsServiceError> {
        let now = Utc::now();
        let inserted = characters::ActiveModel {
            user_id: Set(character.user_id),
            name: Set(character.name.clone()),
            faction: Set(character.faction.as_str().to_owned()),
            race: Set(character.race.as_str().to_owned()),
            character_class: Set(character.character_class.as_str().to_owned()),
            level: Set(STARTING_LEVEL),
            experience: Set(STARTING_EXPERIENCE),
            gold: Set(STARTING_GOLD),
            created_at: Set(now),
            updated_at: Set(now),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&self.db)
        .await;

        match inserted {
            Ok(model) => character_from_model(model),
            Err(err) if unique_violation(&err).is_some() => {
                // A concurrent request created the active character first.
                let existing = self
                    .find_active(character.user_id)
                    .await?
                    .context("active character vanished after unique violation")?;
                Err(AccountsServiceError::CharacterAlreadyExists(
                    existing.summary(),
                ))
            }
            Err(err) => Err(anyhow::Error::new(err).context("create character").into()),
        }
    }
}

fn character_from_model(model: characters::Model) -> Result<Character, AccountsServiceError> {
    Ok(Character {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        faction: model.faction.parse().map_err(anyhow::Error::msg)?,
        race: model.race.parse().map_err(anyhow::Error::msg)?,
        character_class: model.character_class.parse().map_err(anyhow::Error::msg)?,
        level: model.level,
        experience: model.experience,
        gold: model.gold,
        created_at: model.created_at,
        updated_at: model.updated_at,
        is_active: model.is_active,
    })
}
