use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Character, CharacterClass, Faction, Race, User};
use crate::error::AccountsServiceError;
use crate::handlers::bearer::BearerToken;
use crate::state::AppState;
use crate::usecase::character::{
    CreateCharacterInput, CreateCharacterUseCase, GetCharacterUseCase,
};
use crate::usecase::token::ResolveUserUseCase;

async fn current_user(
    state: &AppState,
    bearer: &BearerToken,
) -> Result<User, AccountsServiceError> {
    ResolveUserUseCase {
        tokens: state.token_repo(),
        users: state.user_repo(),
    }
    .execute(&bearer.0)
    .await
}

#[derive(Serialize)]
pub struct CharacterResponse {
    pub id: i32,
    pub name: String,
    pub faction: Faction,
    pub race: Race,
    pub character_class: CharacterClass,
    pub level: i32,
    pub experience: i32,
    pub gold: i32,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "created_at_opt"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

fn created_at_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match dt {
        Some(dt) => errant_core::serde::to_rfc3339_ms(dt, s),
        None => s.serialize_none(),
    }
}

impl CharacterResponse {
    fn new(character: Character, with_created_at: bool) -> Self {
        Self {
            id: character.id,
            name: character.name,
            faction: character.faction,
            race: character.race,
            character_class: character.character_class,
            level: character.level,
            experience: character.experience,
            gold: character.gold,
            created_at: with_created_at.then_some(character.created_at),
        }
    }
}

// ── POST /api/character ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCharacterRequest {
    pub name: Option<String>,
    pub faction: Option<String>,
    pub race: Option<String>,
    pub character_class: Option<String>,
}

#[derive(Serialize)]
pub struct CreateCharacterResponse {
    pub success: bool,
    pub message: String,
    pub character: CharacterResponse,
}

pub async fn create_character(
    State(state): State<AppState>,
    bearer: BearerToken,
    Json(body): Json<CreateCharacterRequest>,
) -> Result<impl IntoResponse, AccountsServiceError> {
    let user = current_user(&state, &bearer).await?;

    let usecase = CreateCharacterUseCase {
        characters: state.character_repo(),
    };
    let character = usecase
        .execute(
            &user,
            CreateCharacterInput {
                name: body.name,
                faction: body.faction,
                race: body.race,
                character_class: body.character_class,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCharacterResponse {
            success: true,
            message: format!("Welcome, {}! Your legend begins...", character.name),
            character: CharacterResponse::new(character, false),
        }),
    ))
}

// ── GET /api/character ───────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct GetCharacterResponse {
    pub success: bool,
    pub character: CharacterResponse,
}

pub async fn get_character(
    State(state): State<AppState>,
    bearer: BearerToken,
) -> Result<impl IntoResponse, AccountsServiceError> {
    let user = current_user(&state, &bearer).await?;

    let usecase = GetCharacterUseCase {
        characters: state.character_repo(),
    };
    let character = usecase.execute(&user).await?;

    Ok(Json(GetCharacterResponse {
        success: true,
        character: CharacterResponse::new(character, true),
    }))
}
