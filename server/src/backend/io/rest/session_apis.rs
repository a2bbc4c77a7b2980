//! # REST API for Training Sessions
//!
//! `POST /api/sessions/preview` runs the date calculator without storing
//! anything; the other endpoints manage scheduled sessions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use shared::{CreateTrainingSessionRequest, SessionDatesRequest};
use tracing::info;

use super::extract::{ApiJson, ApiQuery};
use super::error_response;
use super::mappers::SessionMapper;
use crate::backend::AppState;

#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    pub lead_id: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/sessions/preview", post(preview_session_dates))
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
}

pub async fn preview_session_dates(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SessionDatesRequest>,
) -> impl IntoResponse {
    info!("POST /api/sessions/preview - request: {:?}", request);

    match state
        .session_service
        .preview_dates(request.format, request.weekday.as_deref(), &request.anchor_date)
    {
        Ok(dates) => (StatusCode::OK, Json(SessionMapper::to_dates_dto(dates))).into_response(),
        Err(e) => error_response("Failed to compute session dates", e),
    }
}

pub async fn create_session(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateTrainingSessionRequest>,
) -> impl IntoResponse {
    info!("POST /api/sessions - request: {:?}", request);

    match state.session_service.create_session(request).await {
        Ok(session) => (
            StatusCode::CREATED,
            Json(SessionMapper::to_response(session, "Session scheduled")),
        )
            .into_response(),
        Err(e) => error_response("Failed to create session", e),
    }
}

pub async fn list_sessions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SessionListQuery>,
) -> impl IntoResponse {
    info!("GET /api/sessions - query: {:?}", query);

    let lead_id = query.lead_id.as_deref().filter(|id| !id.is_empty());
    match state.session_service.list_sessions(lead_id).await {
        Ok(sessions) => (StatusCode::OK, Json(SessionMapper::to_list_dto(sessions))).into_response(),
        Err(e) => error_response("Failed to list sessions", e),
    }
}

pub async fn get_session(State(state): State<AppState>, Path(session_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/sessions/{}", session_id);

    match state.session_service.get_session(&session_id).await {
        Ok(session) => (StatusCode::OK, Json(SessionMapper::to_dto(session))).into_response(),
        Err(e) => error_response("Failed to get session", e),
    }
}

pub async fn delete_session(State(state): State<AppState>, Path(session_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/sessions/{}", session_id);

    match state.session_service.delete_session(&session_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("Failed to delete session", e),
    }
}
