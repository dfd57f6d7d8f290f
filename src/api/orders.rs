use crate::api::AppState;
use crate::api::middleware::SessionUser;
use crate::error::Result;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::Value;

pub async fn create_order(
    State(state): State<AppState>,
    user: SessionUser,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse> {
    let order = state.order_service.create_order(&user.access_token, payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_orders(State(state): State<AppState>, user: SessionUser) -> Result<impl IntoResponse> {
    let orders = state.order_service.list_orders(&user.access_token).await?;
    Ok(Json(orders))
}
