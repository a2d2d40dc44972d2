//! The `authToken` session cookie.
//!
//! Issued on login with `HttpOnly`, `SameSite=Strict`, `Path=/` and a
//! max-age equal to the token lifetime; cleared on logout with the same
//! attributes and `Max-Age=0`.

use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::config::ServerConfig;

pub const SESSION_COOKIE: &str = "authToken";

pub fn session_cookie(token: String, config: &ServerConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.cookie_secure)
        .path("/")
        .max_age(time::Duration::seconds(config.jwt.session_expiry_secs()))
        .build()
}

/// Removal cookie: empty value, `Max-Age=0` and an expiry in the past, with
/// the same attributes as the session cookie so the browser replaces it.
pub fn cleared_session_cookie(config: &ServerConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.cookie_secure)
        .path("/")
        .build();
    cookie.make_removal();
    cookie
}
