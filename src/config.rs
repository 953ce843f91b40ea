use std::net::SocketAddr;

use anyhow::{bail, Context};
use axum::http::HeaderValue;

/// Secrets that have shipped as source defaults somewhere and must never sign tokens.
const PLACEHOLDER_SECRETS: &[&str] = &["secret", "changeme", "your_jwt_secret_key", "rgergergerge"];

const MIN_PRODUCTION_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_days: i64,
}

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
    pub units: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt: JwtConfig,
    pub weather: WeatherConfig,
    pub listen_addr: SocketAddr,
    pub cors_origin: HeaderValue,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            match get(key) {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => bail!("{key} must be set"),
            }
        };
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let environment = match get("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("development") | Some("dev") | None => Environment::Development,
            Some(other) => bail!("APP_ENV has unknown value {other:?}"),
        };

        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: or_default("JWT_ISSUER", "skycast"),
            audience: or_default("JWT_AUDIENCE", "skycast-users"),
            ttl_days: parse_or(&get, "JWT_TTL_DAYS", 30)?,
        };
        check_secret(&jwt.secret, environment)?;
        if jwt.ttl_days <= 0 {
            bail!("JWT_TTL_DAYS must be positive");
        }

        let weather = WeatherConfig {
            api_key: required("OPENWEATHER_API_KEY")?,
            base_url: or_default(
                "OPENWEATHER_BASE_URL",
                "https://api.openweathermap.org/data/2.5/weather",
            ),
            units: or_default("OPENWEATHER_UNITS", "metric"),
            timeout_secs: parse_or(&get, "OPENWEATHER_TIMEOUT_SECS", 10)?,
        };

        let listen_addr: SocketAddr = format!(
            "{}:{}",
            or_default("APP_HOST", "0.0.0.0"),
            or_default("APP_PORT", "8080")
        )
        .parse()
        .context("APP_HOST/APP_PORT do not form a socket address")?;

        let cors_origin = HeaderValue::from_str(&or_default("CORS_ORIGIN", "http://localhost:3000"))
            .context("CORS_ORIGIN is not a valid header value")?;

        Ok(Self {
            environment,
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 10)?,
            jwt,
            weather,
            listen_addr,
            cors_origin,
        })
    }
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has invalid value {raw:?}")),
        None => Ok(default),
    }
}

fn check_secret(secret: &str, environment: Environment) -> anyhow::Result<()> {
    if PLACEHOLDER_SECRETS.contains(&secret) {
        bail!("JWT_SECRET is a known placeholder; configure a real secret");
    }
    if environment.is_production() && secret.len() < MIN_PRODUCTION_SECRET_LEN {
        bail!("JWT_SECRET must be at least {MIN_PRODUCTION_SECRET_LEN} bytes in production");
    }
    Ok(())
}
