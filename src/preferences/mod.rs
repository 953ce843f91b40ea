use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

/// Owner-scoped favorite cities. Mount behind the session gate.
pub fn router() -> Router<AppState> {
    handlers::preference_routes()
}
