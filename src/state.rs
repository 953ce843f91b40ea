use std::sync::Arc;

use crate::{
    auth::repo::{PgUserStore, UserStore},
    config::AppConfig,
    db,
    preferences::repo::{PgPreferenceStore, PreferenceStore},
    weather::client::{OpenWeatherClient, WeatherProvider},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub weather: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = db::connect(&config).await?;
        db::migrate(&pool).await;

        let weather = Arc::new(OpenWeatherClient::new(&config.weather)?) as Arc<dyn WeatherProvider>;

        Ok(Self::from_parts(
            config,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgPreferenceStore::new(pool)),
            weather,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        preferences: Arc<dyn PreferenceStore>,
        weather: Arc<dyn WeatherProvider>,
    ) -> Self {
        Self {
            config,
            users,
            preferences,
            weather,
        }
    }
}
