use crate::api::AppState;
use crate::api::middleware::SessionUser;
use crate::api::schemas::tickets::RedeemTicket;
use crate::domain::session::SCANNER_ROLE;
use crate::error::Result;
use axum::{Json, extract::State, response::IntoResponse};

pub async fn list_tickets(State(state): State<AppState>, user: SessionUser) -> Result<impl IntoResponse> {
    let tickets = state.order_service.list_tickets(&user.access_token).await?;
    Ok(Json(tickets))
}

pub async fn redeem(
    State(state): State<AppState>,
    user: SessionUser,
    Json(payload): Json<RedeemTicket>,
) -> Result<impl IntoResponse> {
    user.require_role(SCANNER_ROLE)?;
    let outcome = state.order_service.redeem_ticket(&user.access_token, payload.code).await?;
    Ok(Json(outcome))
}
