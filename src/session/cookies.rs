//! Session cookie store.
//!
//! The three auth cookies are issued and cleared as one unit within a single
//! response. Names and max-ages are the wire contract with the browser: any
//! unmodified frontend expects exactly `access_token`, `refresh_token` and
//! `user_role` with these lifetimes. Partial `Set-Cookie` delivery by the
//! transport leaves an inconsistent session; that risk is accepted here, not
//! mitigated.

use crate::domain::session::Session;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";
pub const ROLE_COOKIE: &str = "user_role";

pub const ACCESS_MAX_AGE: Duration = Duration::seconds(86_400);
pub const REFRESH_MAX_AGE: Duration = Duration::seconds(604_800);
pub const ROLE_MAX_AGE: Duration = Duration::seconds(86_400);

fn session_cookie(name: &'static str, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(max_age)
        .build()
}

/// Adds all three session cookies to the jar in one response.
pub fn set_auth_cookies(jar: CookieJar, session: &Session, secure: bool) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, session.access_token.clone(), ACCESS_MAX_AGE, secure))
        .add(session_cookie(REFRESH_COOKIE, session.refresh_token.clone(), REFRESH_MAX_AGE, secure))
        .add(session_cookie(ROLE_COOKIE, session.user_role.clone(), ROLE_MAX_AGE, secure))
}

/// Expires all three session cookies immediately.
pub fn clear_auth_cookies(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, String::new(), Duration::ZERO, secure))
        .add(session_cookie(REFRESH_COOKIE, String::new(), Duration::ZERO, secure))
        .add(session_cookie(ROLE_COOKIE, String::new(), Duration::ZERO, secure))
}
