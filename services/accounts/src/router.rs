use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use errant_core::health::healthz;
use errant_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    character::{create_character, get_character},
    health::readyz,
    password::{forgot_password, reset_password},
    token::login,
    user::register,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Accounts
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        // Password reset
        .route("/api/forgotPassword", post(forgot_password))
        .route("/api/resetPassword", post(reset_password))
        // Character
        .route("/api/character", post(create_character).get(get_character))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
