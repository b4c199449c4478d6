use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::conversation::RenderDirective;
use crate::db::UserId;
use crate::response::{AppError, SuccessResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    input: String,
}

pub async fn advance(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<RenderDirective>>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::validation(rejection.body_text()))?;

    let directive = state
        .conversation()
        .advance(user_id, &request.input)
        .await
        .map_err(|err| AppError::internal(err.to_string()))?;

    Ok(Json(SuccessResponse::new(directive)))
}

pub async fn start(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Json<SuccessResponse<RenderDirective>> {
    Json(SuccessResponse::new(state.conversation().start(user_id).await))
}
