//! API client for the boxoffice surface, used by scanner devices, CLI tooling
//! and the integration tests.
//!
//! Tokens ride as cookies in the client's own jar, so a successful call to
//! the refresh endpoint re-arms the session purely through its `Set-Cookie`
//! side effect. On a 401 the client coordinates a single refresh across every
//! concurrently failing request, retries each of them exactly once, and on an
//! irrecoverable refresh failure tears the session down and hard-navigates to
//! a login surface.

pub mod refresh;
pub mod transport;

use crate::client::refresh::{GateTicket, RefreshFailure, RefreshGate};
use crate::client::transport::SessionTransport;
use reqwest::{Method, StatusCode, Url};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REFRESH_PATH: &str = "/api/auth/refresh-token";
pub const LOGOUT_PATH: &str = "/api/auth/logout";

/// Session-store key under which the pre-expiry location is parked so the
/// post-login flow can send the user back.
pub const DESTINATION_KEY: &str = "destination";

pub const SCANNER_ROUTE: &str = "/ticket/scanner";
pub const SCANNER_LOGIN_PATH: &str = "/ticket/auth";
pub const GENERIC_LOGIN_PATH: &str = "/login";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("session expired: {0}")]
    SessionExpired(#[from] RefreshFailure),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Everything needed to re-issue a request after a refresh.
#[derive(Debug, Clone)]
struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Value>,
}

impl ApiRequest {
    /// A 401 from the login endpoint is a login failure, never session
    /// expiry.
    fn is_login(&self) -> bool {
        self.path == LOGIN_PATH
    }
}

#[derive(Debug)]
pub struct ApiClient<T: SessionTransport> {
    http: reqwest::Client,
    base_url: Url,
    gate: RefreshGate,
    transport: T,
}

impl<T: SessionTransport> ApiClient<T> {
    pub fn new(base_url: &str, transport: T) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .cookie_provider(Arc::new(reqwest::cookie::Jar::default()))
            .build()?;

        Ok(Self { http, base_url, gate: RefreshGate::default(), transport })
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.execute(ApiRequest { method: Method::GET, path: path.to_string(), body: None }).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.execute(ApiRequest { method: Method::POST, path: path.to_string(), body: Some(body) }).await
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn execute(&self, request: ApiRequest) -> Result<Value> {
        match self.issue(&request).await {
            Err(ClientError::Status { status, .. }) if status == StatusCode::UNAUTHORIZED && !request.is_login() => {
                self.refresh_and_retry(request).await
            }
            other => other,
        }
    }

    /// One request, one response. Non-2xx statuses become [`ClientError::Status`]
    /// so the retry path can inspect them; transport failures pass through
    /// untouched and are never retried.
    async fn issue(&self, request: &ApiRequest) -> Result<Value> {
        let url = self.join(&request.path)?;
        let mut builder = self.http.request(request.method.clone(), url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&text).unwrap_or(Value::Null));
        }

        Err(ClientError::Status { status, message: text })
    }

    /// Joins the refresh already in flight, or starts one, then retries the
    /// original request exactly once. At most one refresh call is outstanding
    /// at any time, no matter how many requests hit a 401 together.
    async fn refresh_and_retry(&self, request: ApiRequest) -> Result<Value> {
        match self.gate.join() {
            // The guard settles the gate even if this future is dropped
            // mid-refresh; waiters then see a cancellation failure instead of
            // parking forever behind a leader that no longer exists.
            GateTicket::Leader(guard) => {
                let outcome = self.call_refresh().await.map_err(|e| RefreshFailure::from_error(&e));
                guard.settle(outcome.clone());

                if let Err(failure) = outcome {
                    self.recover_session().await;
                    return Err(failure.into());
                }
            }
            GateTicket::Follower(waiter) => match waiter.await {
                Ok(Ok(())) => {}
                Ok(Err(failure)) => return Err(failure.into()),
                // Unreachable while the gate holds the sender, but a closed
                // channel still must not be treated as a refreshed session.
                Err(_) => return Err(RefreshFailure::canceled().into()),
            },
        }

        // Exactly one retry. A second 401 is surfaced as-is and never
        // re-enters the refresh path; anything else would risk a loop when
        // the server revokes the session between refresh and retry.
        self.issue(&request).await
    }

    /// Empty body; the refresh cookie rides in the jar. The response body is
    /// not inspected beyond the `Set-Cookie` side effect.
    async fn call_refresh(&self) -> Result<()> {
        let url = self.join(REFRESH_PATH)?;
        let response = self.http.post(url).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(ClientError::Status { status, message })
    }

    /// Session-expiry recovery: best-effort forced logout, park the current
    /// location for the post-login flow, then hard-navigate to the login
    /// surface matching the route the user was on. Runs once per failed
    /// refresh, on the leader only.
    async fn recover_session(&self) {
        if let Err(e) = self.post_logout().await {
            tracing::warn!(error = %e, "Forced logout failed during session recovery");
        }

        let location = self.transport.current_location();
        self.transport.persist(DESTINATION_KEY, &location);

        let target = if location.contains(SCANNER_ROUTE) { SCANNER_LOGIN_PATH } else { GENERIC_LOGIN_PATH };
        self.transport.navigate(target);
    }

    async fn post_logout(&self) -> Result<()> {
        let url = self.join(LOGOUT_PATH)?;
        self.http.post(url).json(&serde_json::json!({ "force": true })).send().await?;
        Ok(())
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }
}
