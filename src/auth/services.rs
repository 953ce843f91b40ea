use axum::extract::FromRef;
use tracing::{info, warn};

use super::{
    dto::{LoginRequest, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_dummy, verify_password},
    repo::User,
};
use crate::{db::StoreError, error::AppError, state::AppState};

/// A freshly authenticated user and the session token issued for them.
pub struct Session {
    pub user: User,
    pub token: String,
}

pub async fn register(state: &AppState, payload: RegisterRequest) -> Result<Session, AppError> {
    payload.validate()?;

    if state.users.find_by_username(&payload.username).await?.is_some() {
        warn!(username = %payload.username, "username already registered");
        return Err(AppError::DuplicateIdentity);
    }

    let hash = hash_password(&payload.password)?;

    let user = match state.users.create(&payload.username, &hash).await {
        Ok(u) => u,
        Err(StoreError::Conflict) => {
            warn!(username = %payload.username, "username registered concurrently");
            return Err(AppError::DuplicateIdentity);
        }
        Err(e) => return Err(e.into()),
    };

    let token = JwtKeys::from_ref(state).issue(user.id)?;
    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(Session { user, token })
}

pub async fn login(state: &AppState, payload: LoginRequest) -> Result<Session, AppError> {
    payload.validate()?;

    let Some(user) = state.users.find_by_username(&payload.username).await? else {
        verify_dummy(&payload.password);
        warn!(username = %payload.username, "login unknown username");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(state).issue(user.id)?;
    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Session { user, token })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::{
        auth::repo::UserStore,
        testing::{test_config, MemoryPreferenceStore, StubWeather},
    };

    /// Loses the race: the lookup sees no user, the insert hits the unique index.
    struct RacingUserStore;

    #[async_trait]
    impl UserStore for RacingUserStore {
        async fn find_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
            Ok(None)
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, StoreError> {
            Ok(None)
        }

        async fn create(&self, _username: &str, _password_hash: &str) -> Result<User, StoreError> {
            Err(StoreError::Conflict)
        }
    }

    fn creds(username: &str, password: &str) -> (RegisterRequest, LoginRequest) {
        (
            RegisterRequest { username: username.into(), password: password.into() },
            LoginRequest { username: username.into(), password: password.into() },
        )
    }

    #[tokio::test]
    async fn register_issues_token_for_new_user() {
        let state = AppState::fake();
        let (reg, _) = creds("alice", "secret1");
        let session = register(&state, reg).await.expect("register");
        let claims = JwtKeys::from_ref(&state).verify(&session.token).expect("valid token");
        assert_eq!(claims.sub, session.user.id);
        assert_ne!(session.user.password_hash, "secret1");
    }

    #[tokio::test]
    async fn duplicate_username_keeps_original_user() {
        let state = AppState::fake();
        let first = register(&state, creds("alice", "secret1").0).await.expect("first register");
        let err = register(&state, creds("alice", "other-pass").0).await.err();
        assert!(matches!(err, Some(AppError::DuplicateIdentity)));

        let stored = state.users.find_by_username("alice").await.expect("lookup").expect("user");
        assert_eq!(stored.id, first.user.id);
        assert!(login(&state, creds("alice", "other-pass").1).await.is_err());
    }

    #[tokio::test]
    async fn invalid_input_rejected_before_store_access() {
        let state = AppState::fake();
        let err = register(&state, creds("al", "secret1").0).await.err();
        assert!(matches!(err, Some(AppError::Validation(_))));
        assert!(state.users.find_by_username("al").await.expect("lookup").is_none());
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let state = AppState::fake();
        register(&state, creds("alice", "secret1").0).await.expect("register");

        let wrong_pass = login(&state, creds("alice", "nope-nope").1).await.err();
        let unknown_user = login(&state, creds("bob", "secret1").1).await.err();
        assert!(matches!(wrong_pass, Some(AppError::InvalidCredentials)));
        assert!(matches!(unknown_user, Some(AppError::InvalidCredentials)));

        let ok = login(&state, creds("alice", "secret1").1).await.expect("login");
        assert_eq!(ok.user.username, "alice");
    }

    #[tokio::test]
    async fn concurrent_duplicate_maps_to_duplicate_identity() {
        let state = AppState::from_parts(
            Arc::new(test_config()),
            Arc::new(RacingUserStore),
            Arc::new(MemoryPreferenceStore::default()),
            Arc::new(StubWeather),
        );
        let err = register(&state, creds("alice", "secret1").0).await.err();
        assert!(matches!(err, Some(AppError::DuplicateIdentity)));
    }
}
