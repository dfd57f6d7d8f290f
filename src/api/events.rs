use crate::api::AppState;
use crate::api::schemas::events::EventsQuery;
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<impl IntoResponse> {
    let events = state.catalog_service.list_events(query.search.as_deref()).await?;
    Ok(Json(events))
}

pub async fn get_event(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse> {
    let event = state.catalog_service.get_event(&id).await?;
    Ok(Json(event))
}
