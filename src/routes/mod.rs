mod chat;
mod health;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::response::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/chat/:user_id", post(chat::advance))
        .route("/api/chat/:user_id/start", post(chat::start))
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    AppError::not_found("Endpoint not found").into_response()
}
