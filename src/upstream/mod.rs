//! Server-side gateway to the upstream ticketing backend.
//!
//! Every BFF route is a thin proxy through this client: it forwards the
//! request, unwraps the `{ data, message }` envelope and maps failure
//! statuses onto [`AppError`]. The BFF never mints or validates credentials;
//! the upstream is the authority.

use crate::config::UpstreamConfig;
use crate::error::{AppError, Result};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Response envelope used by every upstream endpoint. The success-path
/// `message` is never surfaced, so only `data` is deserialized.
#[derive(Debug, serde::Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Backend {
    http: reqwest::Client,
    base_url: Url,
}

impl Backend {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(config.request_timeout_secs)).build()?;

        // Url::join treats a base without a trailing slash as a file path and
        // would drop its last segment.
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| AppError::BadRequest(format!("invalid upstream URL: {e}")))?;

        Ok(Self { http, base_url })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, bearer: Option<&str>) -> Result<T> {
        self.send(Method::GET, path, None::<&()>, bearer).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B, bearer: Option<&str>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, Some(body), bearer).await
    }

    /// Reachability probe for the readiness endpoint; no envelope expected.
    pub async fn ping(&self) -> Result<()> {
        let url = self.join("health")?;
        let response = self.http.get(url).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::UpstreamRejected(response.status(), "upstream health check failed".to_string()))
        }
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>, bearer: Option<&str>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.join(path)?;
        let mut request = self.http.request(method, url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let envelope: Envelope<T> = response.json().await?;
            return Ok(envelope.data);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .unwrap_or_default()
            .message
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("upstream error").to_string());

        Err(match status {
            StatusCode::UNAUTHORIZED => AppError::AuthError,
            StatusCode::NOT_FOUND => AppError::NotFound,
            s if s.is_client_error() => AppError::UpstreamRejected(s, message),
            _ => AppError::UpstreamRejected(StatusCode::BAD_GATEWAY, message),
        })
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::BadRequest(format!("invalid upstream path: {e}")))
    }
}
