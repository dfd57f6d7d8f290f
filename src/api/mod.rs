use crate::config::Config;
use crate::services::auth_service::AuthService;
use crate::services::catalog_service::CatalogService;
use crate::services::health_service::HealthService;
use crate::services::order_service::OrderService;
use axum::body::Body;
use axum::http::Request;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod events;
pub mod health;
pub mod middleware;
pub mod orders;
pub mod schemas;
pub mod tickets;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub order_service: OrderService,
}

#[derive(Clone, Debug)]
pub struct MgmtState {
    pub health_service: HealthService,
}

/// Configures and returns the primary application router.
///
/// # Panics
/// Panics if the rate limiter configuration cannot be constructed.
pub fn app_router(state: AppState) -> Router {
    let std_interval_ns = 1_000_000_000 / state.config.rate_limit.per_second.max(1);
    let standard_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_nanosecond(u64::from(std_interval_ns))
            .burst_size(state.config.rate_limit.burst)
            .finish()
            .expect("Failed to build standard rate limiter config"),
    );

    // Auth tier: stricter limits for credential and token endpoints
    let auth_interval_ns = 1_000_000_000 / state.config.rate_limit.auth_per_second.max(1);
    let auth_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_nanosecond(u64::from(auth_interval_ns))
            .burst_size(state.config.rate_limit.auth_burst)
            .finish()
            .expect("Failed to build auth rate limiter config"),
    );

    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/request-otp", post(auth::request_otp))
        .route("/auth/verify-otp", post(auth::verify_otp))
        .route("/auth/refresh-token", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .layer(GovernorLayer::new(auth_conf));

    let api_routes = Router::new()
        .route("/events", get(events::list_events))
        .route("/events/{id}", get(events::get_event))
        .route("/orders", post(orders::create_order).get(orders::list_orders))
        .route("/tickets", get(tickets::list_tickets))
        .route("/tickets/redeem", post(tickets::redeem))
        .layer(GovernorLayer::new(standard_conf));

    Router::new()
        .nest("/api", auth_routes.merge(api_routes))
        .layer(PropagateRequestIdLayer::new(axum::http::HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(move |request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "otel.kind" = "server",
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(
            axum::http::HeaderName::from_static("x-request-id"),
            middleware::MakeRequestUuidOrHeader,
        ))
        .with_state(state)
}

pub fn mgmt_router(state: MgmtState) -> Router {
    Router::new().route("/livez", get(health::livez)).route("/readyz", get(health::readyz)).with_state(state)
}
