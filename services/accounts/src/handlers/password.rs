use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;
use crate::error::AccountsServiceError;
use crate::state::AppState;
use crate::usecase::password::{
    ForgotPasswordInput, ForgotPasswordUseCase, ResetPasswordInput, ResetPasswordUseCase,
};

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

// ── POST /api/forgotPassword ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AccountsServiceError> {
    let usecase = ForgotPasswordUseCase {
        users: state.user_repo(),
        tokens: state.token_repo(),
        mailer: state.mailer.clone(),
        frontend_url: state.frontend_url.clone(),
    };
    usecase
        .execute(ForgotPasswordInput { email: body.email })
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            success: true,
            message: "If an account exists for that email, a reset link has been sent.",
        }),
    ))
}

// ── POST /api/resetPassword ──────────────────────────────────────────────────

/// Reset links carry the user id as a query parameter, so clients send it
/// back either as a JSON number or as the string they read from the URL.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl UserId {
    fn parse(&self) -> Option<i32> {
        match self {
            Self::Number(n) => i32::try_from(*n).ok(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub id: Option<UserId>,
    pub token: Option<String>,
    pub password: Option<String>,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AccountsServiceError> {
    let mut errors = Vec::new();
    let user_id = match &body.id {
        None => {
            errors.push(ValidationError::Missing("id"));
            None
        }
        Some(UserId::Text(s)) if s.trim().is_empty() => {
            errors.push(ValidationError::Missing("id"));
            None
        }
        Some(id) => {
            let parsed = id.parse();
            if parsed.is_none() {
                errors.push(ValidationError::NotANumber("id"));
            }
            parsed
        }
    };
    if body.token.as_deref().is_none_or(|t| t.trim().is_empty()) {
        errors.push(ValidationError::Missing("token"));
    }
    let (Some(user_id), Some(token), true) = (user_id, body.token, errors.is_empty()) else {
        return Err(errors.into());
    };

    let usecase = ResetPasswordUseCase {
        tokens: state.token_repo(),
        passwords: state.passwords.clone(),
    };
    usecase
        .execute(ResetPasswordInput {
            user_id,
            token,
            password: body.password,
        })
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Your password has been reset. You can now log in.",
    }))
}
