use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::WeatherQuery;
use crate::{config::WeatherConfig, error::AppError};

pub const GENERIC_FAILURE: &str = "Failed to fetch weather data";

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {message}")]
    Status { status: u16, message: String },
    /// No usable answer: connect failure, timeout, or an unreadable body.
    #[error("provider unreachable: {0}")]
    Transport(String),
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { status, message } => AppError::Upstream {
                status: StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message,
            },
            UpstreamError::Transport(detail) => {
                error!(%detail, "weather provider unreachable");
                AppError::Upstream {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: GENERIC_FAILURE.to_string(),
                }
            }
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, query: &WeatherQuery) -> Result<Value, UpstreamError>;
}

/// OpenWeather "current weather" endpoint.
pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl OpenWeatherClient {
    pub fn new(cfg: &WeatherConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build weather http client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
            api_key: cfg.api_key.clone(),
            units: cfg.units.clone(),
        })
    }

    fn query_pairs(&self, query: &WeatherQuery) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("appid", self.api_key.clone()), ("units", self.units.clone())];
        match query {
            WeatherQuery::City(city) => pairs.push(("q", city.clone())),
            WeatherQuery::Coordinates { lat, lon } => {
                pairs.push(("lat", lat.to_string()));
                pairs.push(("lon", lon.to_string()));
            }
        }
        pairs
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, query: &WeatherQuery) -> Result<Value, UpstreamError> {
        let resp = self
            .http
            .get(&self.base_url)
            .query(&self.query_pairs(query))
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        if status.is_success() {
            debug!(%status, "weather provider answered");
            return resp
                .json::<Value>()
                .await
                .map_err(|e| UpstreamError::Transport(e.without_url().to_string()));
        }

        // OpenWeather errors look like {"cod":"404","message":"city not found"}.
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(GENERIC_FAILURE)
            .to_string();
        warn!(%status, %message, "weather provider error");
        Err(UpstreamError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenWeatherClient {
        OpenWeatherClient::new(&WeatherConfig {
            api_key: "k3y".into(),
            base_url: "http://127.0.0.1:9/weather".into(),
            units: "metric".into(),
            timeout_secs: 1,
        })
        .expect("client")
    }

    #[test]
    fn city_query_pairs() {
        let pairs = client().query_pairs(&WeatherQuery::City("Amman".into()));
        assert_eq!(
            pairs,
            vec![
                ("appid", "k3y".to_string()),
                ("units", "metric".to_string()),
                ("q", "Amman".to_string()),
            ]
        );
    }

    #[test]
    fn coordinate_query_pairs() {
        let pairs = client().query_pairs(&WeatherQuery::Coordinates { lat: 31.9552, lon: 35.945 });
        assert!(pairs.contains(&("lat", "31.9552".to_string())));
        assert!(pairs.contains(&("lon", "35.945".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "q"));
    }

    #[test]
    fn provider_errors_map_to_app_errors() {
        let relayed = AppError::from(UpstreamError::Status {
            status: 401,
            message: "Invalid API key".into(),
        });
        assert!(matches!(
            relayed,
            AppError::Upstream { status: StatusCode::UNAUTHORIZED, ref message } if message == "Invalid API key"
        ));

        let odd = AppError::from(UpstreamError::Status { status: 302, message: "moved".into() });
        assert!(matches!(odd, AppError::Upstream { status: StatusCode::INTERNAL_SERVER_ERROR, .. }));

        let down = AppError::from(UpstreamError::Transport("timed out".into()));
        assert!(matches!(
            down,
            AppError::Upstream { ref message, .. } if message == GENERIC_FAILURE
        ));
    }

    #[tokio::test]
    async fn unreachable_provider_is_transport_error() {
        let err = client()
            .current(&WeatherQuery::City("Amman".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(_)));
        assert!(!err.to_string().contains("k3y"));
    }
}
