//! Auth route handlers. These are the one place the session cookies are
//! written, always as a unit within a single response.

use crate::api::AppState;
use crate::api::schemas::auth::{AuthTokens, Login, Logout, RequestOtp, SessionInfo, VerifyOtp};
use crate::error::{AppError, Result};
use crate::session::cookies;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<Login>,
) -> Result<impl IntoResponse> {
    let session = state.auth_service.login(payload.email, payload.password).await?;
    let info = SessionInfo { user_role: session.user_role.clone() };
    let jar = cookies::set_auth_cookies(jar, &session, state.config.cookies.secure);
    Ok((jar, Json(info)))
}

pub async fn request_otp(State(state): State<AppState>, Json(payload): Json<RequestOtp>) -> Result<impl IntoResponse> {
    state.auth_service.request_otp(payload.email).await?;
    Ok(StatusCode::ACCEPTED)
}

pub async fn verify_otp(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<VerifyOtp>,
) -> Result<impl IntoResponse> {
    let session = state.auth_service.verify_otp(payload.email, payload.code).await?;
    let info = SessionInfo { user_role: session.user_role.clone() };
    let jar = cookies::set_auth_cookies(jar, &session, state.config.cookies.secure);
    Ok((jar, Json(info)))
}

/// Rotates the session. Empty request body; the refresh token rides in its
/// cookie. Returns the new pair in the body as well for callers that track it.
pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> Result<impl IntoResponse> {
    let refresh_token = jar
        .get(cookies::REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::AuthError)?;

    let session = state.auth_service.refresh(refresh_token).await?;
    let tokens =
        AuthTokens { access_token: session.access_token.clone(), refresh_token: session.refresh_token.clone() };
    let jar = cookies::set_auth_cookies(jar, &session, state.config.cookies.secure);
    Ok((jar, Json(tokens)))
}

/// Ends the session. The cookies are cleared even when the upstream revoke
/// fails, as long as the caller asked for a forced logout.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<Logout>,
) -> Result<impl IntoResponse> {
    let access_token = jar.get(cookies::ACCESS_COOKIE).map(|c| c.value().to_string());
    state.auth_service.logout(access_token.as_deref(), payload.force).await?;
    let jar = cookies::clear_auth_cookies(jar, state.config.cookies.secure);
    Ok((jar, StatusCode::OK))
}
