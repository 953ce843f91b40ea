use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tower_cookies::Cookies;
use tracing::{info, instrument};

use super::{
    cookie::{removal_cookie, session_cookie},
    dto::{LoginRequest, MessageResponse, RegisterRequest},
    jwt::JwtKeys,
    services::{self, Session},
};
use crate::{error::AppError, extract::ApiJson, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

fn set_session(state: &AppState, cookies: &Cookies, session: Session) {
    let ttl = JwtKeys::from_ref(state).ttl();
    let secure = state.config.environment.is_production();
    cookies.add(session_cookie(session.token, ttl, secure));
}

#[instrument(skip(state, cookies, payload))]
pub async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let session = services::register(&state, payload).await?;
    set_session(&state, &cookies, session);
    Ok((StatusCode::CREATED, Json(MessageResponse { message: "Registered" })))
}

#[instrument(skip(state, cookies, payload))]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let session = services::login(&state, payload).await?;
    set_session(&state, &cookies, session);
    Ok(Json(MessageResponse { message: "Logged in" }))
}

/// Drops the client's copy only; the token itself stays valid until it expires.
/// The expired cookie is sent whether or not the request carried one.
#[instrument(skip(state, cookies))]
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Json<MessageResponse> {
    cookies.add(removal_cookie(state.config.environment.is_production()));
    info!("session cookie cleared");
    Json(MessageResponse { message: "Logged out" })
}
