//! # REST API for Lead Management
//!
//! Endpoints for capturing leads and moving them along the sales pipeline.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use shared::{CreateLeadRequest, LeadStatus, UpdateLeadRequest, UpdateLeadStatusRequest};
use tracing::info;

use super::extract::{ApiJson, ApiQuery};
use super::mappers::LeadMapper;
use super::{bad_request, error_response};
use crate::backend::AppState;

#[derive(Debug, Deserialize)]
pub struct LeadListQuery {
    pub status: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/leads", get(list_leads).post(create_lead))
        .route("/api/leads/:id", get(get_lead).put(update_lead).delete(delete_lead))
        .route("/api/leads/:id/status", put(update_lead_status))
}

pub async fn create_lead(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateLeadRequest>,
) -> impl IntoResponse {
    info!("POST /api/leads - request: {:?}", request);

    match state.lead_service.create_lead(request).await {
        Ok(lead) => (
            StatusCode::CREATED,
            Json(LeadMapper::to_response(lead, "Lead created successfully")),
        )
            .into_response(),
        Err(e) => error_response("Failed to create lead", e),
    }
}

pub async fn list_leads(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LeadListQuery>,
) -> impl IntoResponse {
    info!("GET /api/leads - query: {:?}", query);

    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => match raw.parse::<LeadStatus>() {
            Ok(status) => Some(status),
            Err(e) => return bad_request(e),
        },
        None => None,
    };

    match state.lead_service.list_leads(status).await {
        Ok(leads) => (StatusCode::OK, Json(LeadMapper::to_list_dto(leads))).into_response(),
        Err(e) => error_response("Failed to list leads", e),
    }
}

pub async fn get_lead(State(state): State<AppState>, Path(lead_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/leads/{}", lead_id);

    match state.lead_service.get_lead(&lead_id).await {
        Ok(lead) => (StatusCode::OK, Json(LeadMapper::to_dto(lead))).into_response(),
        Err(e) => error_response("Failed to get lead", e),
    }
}

pub async fn update_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<String>,
    ApiJson(request): ApiJson<UpdateLeadRequest>,
) -> impl IntoResponse {
    info!("PUT /api/leads/{} - request: {:?}", lead_id, request);

    match state.lead_service.update_lead(&lead_id, request).await {
        Ok(lead) => (
            StatusCode::OK,
            Json(LeadMapper::to_response(lead, "Lead updated successfully")),
        )
            .into_response(),
        Err(e) => error_response("Failed to update lead", e),
    }
}

pub async fn update_lead_status(
    State(state): State<AppState>,
    Path(lead_id): Path<String>,
    ApiJson(request): ApiJson<UpdateLeadStatusRequest>,
) -> impl IntoResponse {
    info!("PUT /api/leads/{}/status - status: {}", lead_id, request.status);

    match state.lead_service.update_status(&lead_id, request.status).await {
        Ok(lead) => (
            StatusCode::OK,
            Json(LeadMapper::to_response(lead, "Lead status updated")),
        )
            .into_response(),
        Err(e) => error_response("Failed to update lead status", e),
    }
}

pub async fn delete_lead(State(state): State<AppState>, Path(lead_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/leads/{}", lead_id);

    match state.lead_service.delete_lead(&lead_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("Failed to delete lead", e),
    }
}
