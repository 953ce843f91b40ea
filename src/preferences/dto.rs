use serde::Deserialize;

use crate::error::AppError;

const MIN_CITY_LEN: usize = 2;

#[derive(Debug, Deserialize)]
pub struct AddPreferenceRequest {
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePreferenceRequest {
    #[serde(rename = "newCity")]
    pub new_city: String,
}

/// `field` is the wire name, so the message matches what the client sent.
pub fn validate_city(field: &str, city: &str) -> Result<(), AppError> {
    if city.trim().chars().count() < MIN_CITY_LEN {
        return Err(AppError::Validation(format!(
            "{field} must be at least {MIN_CITY_LEN} characters"
        )));
    }
    Ok(())
}
