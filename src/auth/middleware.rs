use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{cookie::SESSION_COOKIE, jwt::JwtKeys};
use crate::{error::AppError, state::AppState};

/// Identity attached by [`require_session`]. Handlers take it as an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser(pub Uuid);

/// Gate for every privileged route: no cookie is 401, a cookie that fails verification is 403.
pub async fn require_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = cookies
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            warn!(uri = %request.uri(), "no session cookie");
            AppError::Unauthorized
        })?;

    let claims = JwtKeys::from_ref(&state).verify(&token).map_err(|e| {
        warn!(error = %e, uri = %request.uri(), "session token rejected");
        AppError::InvalidToken
    })?;

    debug!(user_id = %claims.sub, "session authenticated");
    request.extensions_mut().insert(SessionUser(claims.sub));

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only present when the route sits behind `require_session`.
        parts
            .extensions
            .get::<SessionUser>()
            .copied()
            .ok_or(AppError::Unauthorized)
    }
}
