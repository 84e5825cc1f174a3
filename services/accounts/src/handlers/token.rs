use axum::{Json, extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AccountsServiceError;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::token::{LoginInput, LoginUseCase};

// ── POST /api/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
    pub token: String,
    #[serde(serialize_with = "errant_core::serde::to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AccountsServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        tokens: state.token_repo(),
        passwords: state.passwords.clone(),
    };
    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        message: "You are now logged in!",
        token: out.token,
        expires_at: out.expires_at,
        user: UserResponse::from(&out.user),
    }))
}
