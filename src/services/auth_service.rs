use crate::domain::session::Session;
use crate::error::Result;
use crate::upstream::Backend;
use opentelemetry::{global, metrics::Counter};
use serde::Deserialize;
use serde_json::json;

#[derive(Clone, Debug)]
struct Metrics {
    login_total: Counter<u64>,
    otp_total: Counter<u64>,
    refresh_total: Counter<u64>,
    logout_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("boxoffice");
        Self {
            login_total: meter
                .u64_counter("auth_login_total")
                .with_description("Total number of successful logins")
                .build(),
            otp_total: meter
                .u64_counter("auth_otp_verify_total")
                .with_description("Total number of successful OTP verifications")
                .build(),
            refresh_total: meter
                .u64_counter("auth_refresh_total")
                .with_description("Total number of successful token rotations")
                .build(),
            logout_total: meter
                .u64_counter("auth_logout_total")
                .with_description("Total number of successful logouts")
                .build(),
        }
    }
}

/// Token triple as the upstream auth endpoints return it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenGrant {
    access_token: String,
    refresh_token: String,
    user_role: String,
}

impl From<TokenGrant> for Session {
    fn from(grant: TokenGrant) -> Self {
        Self { access_token: grant.access_token, refresh_token: grant.refresh_token, user_role: grant.user_role }
    }
}

#[derive(Clone, Debug)]
pub struct AuthService {
    backend: Backend,
    metrics: Metrics,
}

impl AuthService {
    pub fn new(backend: Backend) -> Self {
        Self { backend, metrics: Metrics::new() }
    }

    #[tracing::instrument(skip(self, email, password), err(level = "warn"))]
    pub async fn login(&self, email: String, password: String) -> Result<Session> {
        let grant: TokenGrant =
            self.backend.post("auth/login", &json!({ "email": email, "password": password }), None).await?;
        self.metrics.login_total.add(1, &[]);
        Ok(grant.into())
    }

    #[tracing::instrument(skip(self, email), err(level = "warn"))]
    pub async fn request_otp(&self, email: String) -> Result<()> {
        let _: serde_json::Value = self.backend.post("auth/request-otp", &json!({ "email": email }), None).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, email, code), err(level = "warn"))]
    pub async fn verify_otp(&self, email: String, code: String) -> Result<Session> {
        let grant: TokenGrant =
            self.backend.post("auth/verify-otp", &json!({ "email": email, "code": code }), None).await?;
        self.metrics.otp_total.add(1, &[]);
        Ok(grant.into())
    }

    #[tracing::instrument(skip(self, refresh_token), err(level = "warn"))]
    pub async fn refresh(&self, refresh_token: String) -> Result<Session> {
        let grant: TokenGrant =
            self.backend.post("auth/refresh", &json!({ "refreshToken": refresh_token }), None).await?;
        tracing::info!("Session tokens rotated");
        self.metrics.refresh_total.add(1, &[]);
        Ok(grant.into())
    }

    /// Revokes the upstream session. With `force` set, upstream failures are
    /// logged and swallowed so the cookies can still be cleared.
    #[tracing::instrument(skip(self, access_token))]
    pub async fn logout(&self, access_token: Option<&str>, force: bool) -> Result<()> {
        let result: Result<serde_json::Value> =
            self.backend.post("auth/logout", &json!({ "force": force }), access_token).await;

        match result {
            Ok(_) => {
                self.metrics.logout_total.add(1, &[]);
                Ok(())
            }
            Err(e) if force => {
                tracing::warn!(error = %e, "Forced logout: upstream revoke failed");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
