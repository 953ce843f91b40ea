use tracing::{debug, info};
use uuid::Uuid;

use super::{dto::validate_city, repo::Preference};
use crate::{error::AppError, state::AppState};

const CITY_NOT_FOUND: &str = "City not found";

/// Confirms the session identity still maps to a user; `missing` is the error to surface if not.
async fn ensure_user(state: &AppState, user_id: Uuid, missing: AppError) -> Result<(), AppError> {
    match state.users.find_by_id(user_id).await? {
        Some(_) => Ok(()),
        None => {
            debug!(%user_id, "session user no longer exists");
            Err(missing)
        }
    }
}

/// Loads a preference only if `user_id` owns it. Absent and foreign records look the same.
async fn load_owned(
    state: &AppState,
    user_id: Uuid,
    preference_id: Uuid,
) -> Result<Preference, AppError> {
    match state.preferences.find_by_id(preference_id).await? {
        Some(p) if p.user_id == user_id => Ok(p),
        Some(p) => {
            debug!(%user_id, owner = %p.user_id, %preference_id, "preference owned by another user");
            Err(AppError::NotFound(CITY_NOT_FOUND))
        }
        None => Err(AppError::NotFound(CITY_NOT_FOUND)),
    }
}

pub async fn list_all(state: &AppState, user_id: Uuid) -> Result<Vec<Preference>, AppError> {
    ensure_user(state, user_id, AppError::UserNotFound).await?;
    Ok(state.preferences.list_by_user(user_id).await?)
}

pub async fn add(state: &AppState, user_id: Uuid, city: &str) -> Result<Preference, AppError> {
    validate_city("city", city)?;
    ensure_user(state, user_id, AppError::UserNotFound).await?;
    let created = state.preferences.insert(user_id, city.trim()).await?;
    info!(%user_id, preference_id = %created.id, "preference added");
    Ok(created)
}

pub async fn update(
    state: &AppState,
    user_id: Uuid,
    preference_id: Uuid,
    new_city: &str,
) -> Result<Preference, AppError> {
    validate_city("newCity", new_city)?;
    ensure_user(state, user_id, AppError::NotFound("User not found")).await?;
    let owned = load_owned(state, user_id, preference_id).await?;

    // Deleted between load and update: still a not-found to the caller.
    let updated = state
        .preferences
        .update_city(owned.id, user_id, new_city.trim())
        .await?
        .ok_or(AppError::NotFound(CITY_NOT_FOUND))?;
    info!(%user_id, %preference_id, "preference updated");
    Ok(updated)
}

pub async fn delete(state: &AppState, user_id: Uuid, preference_id: Uuid) -> Result<(), AppError> {
    ensure_user(state, user_id, AppError::NotFound("User not found")).await?;
    let owned = load_owned(state, user_id, preference_id).await?;

    if !state.preferences.delete(owned.id, user_id).await? {
        return Err(AppError::NotFound(CITY_NOT_FOUND));
    }
    info!(%user_id, %preference_id, "preference deleted");
    Ok(())
}
