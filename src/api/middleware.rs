use crate::api::AppState;
use crate::error::AppError;
use crate::session::cookies::{ACCESS_COOKIE, ROLE_COOKIE};
use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, Request, request::Parts},
};
use axum_extra::extract::CookieJar;
use tower_http::request_id::{MakeRequestId, RequestId};

/// Authenticated caller context, extracted from the session cookies.
///
/// The BFF does not validate the access token; the upstream backend is the
/// authority. A missing or empty cookie means there is no session.
#[derive(Debug)]
pub struct SessionUser {
    pub access_token: String,
    pub user_role: String,
}

impl SessionUser {
    pub fn require_role(&self, role: &str) -> Result<(), AppError> {
        if self.user_role == role { Ok(()) } else { Err(AppError::Forbidden) }
    }
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let access_token = jar
            .get(ACCESS_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(AppError::AuthError)?;

        // The role cookie expires independently of the access cookie; treat a
        // missing role as the empty role rather than rejecting the session.
        let user_role = jar.get(ROLE_COOKIE).map(|c| c.value().to_string()).unwrap_or_default();

        Ok(SessionUser { access_token, user_role })
    }
}

/// Propagates an incoming `x-request-id` or mints a fresh UUID.
#[derive(Clone, Copy, Debug)]
pub struct MakeRequestUuidOrHeader;

impl MakeRequestId for MakeRequestUuidOrHeader {
    fn make_request_id<B>(&mut self, request: &Request<B>) -> Option<RequestId> {
        if let Some(id) = request.headers().get("x-request-id") {
            return Some(RequestId::new(id.clone()));
        }
        HeaderValue::from_str(&uuid::Uuid::new_v4().to_string()).ok().map(RequestId::new)
    }
}
