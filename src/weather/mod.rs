use crate::state::AppState;
use axum::Router;

pub mod client;
mod dto;
pub mod handlers;

pub use dto::WeatherQuery;

pub fn router() -> Router<AppState> {
    handlers::weather_routes()
}
