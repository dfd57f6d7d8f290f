#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use boxoffice::api::{self, AppState, MgmtState};
use boxoffice::config::{
    Config, CookieConfig, LogFormat, RateLimitConfig, ServerConfig, TelemetryConfig, UpstreamConfig,
};
use boxoffice::services::auth_service::AuthService;
use boxoffice::services::catalog_service::CatalogService;
use boxoffice::services::health_service::HealthService;
use boxoffice::services::order_service::OrderService;
use boxoffice::upstream::Backend;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("boxoffice=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

/// Scripted stand-in for the upstream ticketing backend.
#[derive(Debug, Default)]
pub struct UpstreamState {
    pub refresh_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub fail_refresh: AtomicBool,
    pub fail_logout: AtomicBool,
}

pub struct MockUpstream {
    pub url: String,
    pub state: Arc<UpstreamState>,
}

fn grant(role: &str, access: &str, refresh: &str) -> Value {
    json!({ "data": { "accessToken": access, "refreshToken": refresh, "userRole": role } })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer A1" || v == "Bearer A2")
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
}

async fn upstream_login(Json(payload): Json<Value>) -> Response {
    if payload["password"] == "password123" {
        let role = if payload["email"].as_str().unwrap_or("").starts_with("gate@") { "scanner" } else { "customer" };
        Json(grant(role, "A1", "R1")).into_response()
    } else {
        unauthorized("invalid credentials")
    }
}

async fn upstream_verify_otp(Json(payload): Json<Value>) -> Response {
    if payload["code"] == "123456" {
        Json(grant("customer", "A1", "R1")).into_response()
    } else {
        unauthorized("invalid code")
    }
}

async fn upstream_refresh(State(state): State<Arc<UpstreamState>>, Json(payload): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    if state.fail_refresh.load(Ordering::SeqCst) {
        return unauthorized("refresh token revoked");
    }
    if payload["refreshToken"].as_str().unwrap_or("").is_empty() {
        return unauthorized("missing refresh token");
    }
    Json(grant("customer", "A2", "R2")).into_response()
}

async fn upstream_logout(State(state): State<Arc<UpstreamState>>) -> Response {
    state.logout_calls.fetch_add(1, Ordering::SeqCst);
    if state.fail_logout.load(Ordering::SeqCst) {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "session store offline" }))).into_response()
    } else {
        Json(json!({ "data": null })).into_response()
    }
}

async fn upstream_events() -> Response {
    Json(json!({ "data": [ { "id": "e1", "name": "RustConf", "venue": "Main Hall" } ] })).into_response()
}

async fn upstream_event(axum::extract::Path(id): axum::extract::Path<String>) -> Response {
    if id == "e1" {
        Json(json!({ "data": { "id": "e1", "name": "RustConf", "venue": "Main Hall" } })).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "message": "event not found" }))).into_response()
    }
}

async fn upstream_create_order(headers: HeaderMap, Json(payload): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized("missing bearer");
    }
    Json(json!({ "data": { "id": "o1", "eventId": payload["eventId"], "status": "paid" } })).into_response()
}

async fn upstream_orders(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized("missing bearer");
    }
    Json(json!({ "data": [ { "id": "o1", "status": "paid" } ] })).into_response()
}

async fn upstream_tickets(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized("missing bearer");
    }
    Json(json!({ "data": [ { "code": "T-100", "eventId": "e1" } ] })).into_response()
}

async fn upstream_redeem(headers: HeaderMap, Json(payload): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized("missing bearer");
    }
    Json(json!({ "data": { "code": payload["code"], "redeemed": true } })).into_response()
}

impl MockUpstream {
    pub async fn spawn() -> Self {
        let state = Arc::new(UpstreamState::default());

        let router = Router::new()
            .route("/health", get(|| async { Json(json!({ "data": "ok" })) }))
            .route("/auth/login", post(upstream_login))
            .route("/auth/request-otp", post(|| async { Json(json!({ "data": null, "message": "sent" })) }))
            .route("/auth/verify-otp", post(upstream_verify_otp))
            .route("/auth/refresh", post(upstream_refresh))
            .route("/auth/logout", post(upstream_logout))
            .route("/events", get(upstream_events))
            .route("/events/{id}", get(upstream_event))
            .route("/orders", post(upstream_create_order).get(upstream_orders))
            .route("/tickets", get(upstream_tickets))
            .route("/tickets/redeem", post(upstream_redeem))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { url: format!("http://{addr}"), state }
    }
}

pub fn test_config(upstream_url: &str) -> Config {
    Config {
        server: ServerConfig { host: "127.0.0.1".to_string(), port: 0, mgmt_port: 0 },
        upstream: UpstreamConfig {
            base_url: upstream_url.to_string(),
            request_timeout_secs: 5,
            health_timeout_ms: 500,
        },
        cookies: CookieConfig { secure: false },
        rate_limit: RateLimitConfig { per_second: 10_000, burst: 10_000, auth_per_second: 10_000, auth_burst: 10_000 },
        telemetry: TelemetryConfig { otlp_endpoint: None, log_format: LogFormat::Text },
    }
}

/// The real application router plus its management listener, bound to
/// ephemeral ports and backed by a scripted upstream.
pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub upstream: MockUpstream,
}

impl TestApp {
    pub async fn spawn() -> Self {
        setup_tracing();

        let upstream = MockUpstream::spawn().await;
        let config = test_config(&upstream.url);
        let backend = Backend::new(&config.upstream).expect("backend should build");

        let state = AppState {
            config: config.clone(),
            auth_service: AuthService::new(backend.clone()),
            catalog_service: CatalogService::new(backend.clone()),
            order_service: OrderService::new(backend.clone()),
        };

        let app_router = api::app_router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app_router.into_make_service_with_connect_info::<SocketAddr>()).await.unwrap();
        });

        let mgmt_app = api::mgmt_router(MgmtState { health_service: HealthService::new(backend, &config.upstream) });
        let mgmt_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_addr = mgmt_listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt_app.into_make_service_with_connect_info::<SocketAddr>()).await.unwrap();
        });

        Self {
            server_url: format!("http://{addr}"),
            mgmt_url: format!("http://{mgmt_addr}"),
            client: Self::new_client(),
            upstream,
        }
    }

    /// A cookie-holding client, for driving a second independent session.
    pub fn new_client() -> reqwest::Client {
        reqwest::Client::builder().cookie_store(true).build().unwrap()
    }

    pub async fn login(&self, client: &reqwest::Client, email: &str) -> reqwest::Response {
        client
            .post(format!("{}/api/auth/login", self.server_url))
            .json(&json!({ "email": email, "password": "password123" }))
            .send()
            .await
            .unwrap()
    }
}
