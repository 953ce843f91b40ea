use serde::Deserialize;

use crate::error::AppError;

/// Raw `GET /weather` query. Kept as strings so bad numbers become our 400, not axum's.
#[derive(Debug, Default, Deserialize)]
pub struct WeatherParams {
    pub city: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl WeatherParams {
    pub fn into_query(self) -> Result<WeatherQuery, AppError> {
        match (self.city, self.lat, self.lon) {
            (Some(city), None, None) => {
                if city.trim().chars().count() < 2 {
                    return Err(invalid("city must be at least 2 characters"));
                }
                Ok(WeatherQuery::City(city.trim().to_string()))
            }
            (None, Some(lat), Some(lon)) => {
                let lat = parse_coord("lat", &lat, 90.0)?;
                let lon = parse_coord("lon", &lon, 180.0)?;
                Ok(WeatherQuery::Coordinates { lat, lon })
            }
            _ => Err(invalid("Provide either city or both lat and lon")),
        }
    }
}

fn parse_coord(name: &str, raw: &str, limit: f64) -> Result<f64, AppError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(&format!("{name} must be a number")))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(invalid(&format!("{name} must be between -{limit} and {limit}")));
    }
    Ok(value)
}

fn invalid(msg: &str) -> AppError {
    AppError::Validation(msg.to_string())
}
