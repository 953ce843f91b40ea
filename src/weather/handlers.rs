use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;
use tracing::instrument;

use super::dto::WeatherParams;
use crate::{
    auth::middleware::SessionUser, error::AppError, extract::ApiQuery, state::AppState,
};

/// Routes that must be mounted behind `require_session`.
pub fn weather_routes() -> Router<AppState> {
    Router::new().route("/weather", get(current_weather))
}

#[instrument(skip(state, params))]
pub async fn current_weather(
    State(state): State<AppState>,
    SessionUser(_user_id): SessionUser,
    ApiQuery(params): ApiQuery<WeatherParams>,
) -> Result<Json<Value>, AppError> {
    let query = params.into_query()?;
    let data = state.weather.current(&query).await?;
    Ok(Json(data))
}
