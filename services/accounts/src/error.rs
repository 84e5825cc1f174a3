use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::types::CharacterSummary;
use crate::domain::validation::{FieldError, ValidationError};

/// Accounts service error variants.
#[derive(Debug, thiserror::Error)]
pub enum AccountsServiceError {
    #[error("{}", join_messages(.0))]
    Validation(Vec<ValidationError>),
    #[error("email is already registered")]
    EmailTaken,
    #[error("username is already taken")]
    UsernameTaken,
    #[error("invalid login credentials")]
    InvalidCredentials,
    #[error("invalid or expired authentication token")]
    InvalidToken,
    #[error("password reset link has expired")]
    ResetTokenExpired,
    #[error("password reset link is invalid")]
    InvalidResetToken,
    #[error("user not found")]
    UserNotFound,
    #[error("no active character found")]
    CharacterNotFound,
    #[error("you already have an active character; only one character per account is allowed")]
    CharacterAlreadyExists(CharacterSummary),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<ValidationError> for AccountsServiceError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(vec![e])
    }
}

impl From<Vec<ValidationError>> for AccountsServiceError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

impl AccountsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::ResetTokenExpired => "RESET_TOKEN_EXPIRED",
            Self::InvalidResetToken => "INVALID_RESET_TOKEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::CharacterNotFound => "CHARACTER_NOT_FOUND",
            Self::CharacterAlreadyExists(_) => "CHARACTER_ALREADY_EXISTS",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::ResetTokenExpired | Self::InvalidResetToken => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::UserNotFound | Self::CharacterNotFound => StatusCode::NOT_FOUND,
            Self::EmailTaken | Self::UsernameTaken | Self::CharacterAlreadyExists(_) => {
                StatusCode::CONFLICT
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AccountsServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are expected client outcomes and TraceLayer already records them.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "success": false,
            "kind": self.kind(),
            "message": self.to_string(),
        });
        match &self {
            Self::Validation(errors) => {
                let errors: Vec<FieldError> = errors.iter().map(FieldError::from).collect();
                body["errors"] = serde_json::json!(errors);
            }
            Self::CharacterAlreadyExists(summary) => {
                body["character"] = serde_json::json!(summary);
            }
            _ => {}
        }
        (status, axum::Json(body)).into_response()
    }
}
