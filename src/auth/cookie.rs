//! Session cookie transport.

use time::{Duration, OffsetDateTime};
use tower_cookies::{cookie::SameSite, Cookie};

pub const SESSION_COOKIE: &str = "auth_token";

/// HttpOnly, SameSite=Strict, Secure when `secure`; lives as long as the token.
pub fn session_cookie(token: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(max_age)
        .build()
}

/// Empty, already-expired session cookie with the same attributes.
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::now_utc() - Duration::days(365))
        .build()
}
