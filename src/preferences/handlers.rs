use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{AddPreferenceRequest, UpdatePreferenceRequest},
    repo::Preference,
    services,
};
use crate::{
    auth::{dto::MessageResponse, middleware::SessionUser},
    error::AppError,
    extract::ApiJson,
    state::AppState,
};

/// Routes that must be mounted behind `require_session`.
pub fn preference_routes() -> Router<AppState> {
    Router::new()
        .route("/preferences", get(list_preferences).post(add_preference))
        .route(
            "/preferences/:id",
            put(update_preference).delete(delete_preference),
        )
}

/// Ids that don't parse can't exist, so they get the same 404 as unknown ones.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("City not found"))
}

#[instrument(skip(state))]
pub async fn list_preferences(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> Result<Json<Vec<Preference>>, AppError> {
    Ok(Json(services::list_all(&state, user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn add_preference(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    ApiJson(payload): ApiJson<AddPreferenceRequest>,
) -> Result<(StatusCode, Json<Preference>), AppError> {
    let created = services::add(&state, user_id, &payload.city).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, payload))]
pub async fn update_preference(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdatePreferenceRequest>,
) -> Result<Json<Preference>, AppError> {
    let updated = services::update(&state, user_id, parse_id(&id)?, &payload.new_city).await?;
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_preference(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    services::delete(&state, user_id, parse_id(&id)?).await?;
    Ok(Json(MessageResponse {
        message: "City has been deleted",
    }))
}
