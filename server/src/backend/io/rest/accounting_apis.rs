//! # REST API for the Accounting Ledger

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::{CreateAccountingEntryRequest, UpdateEntryFieldRequest};
use tracing::info;

use super::extract::{ApiJson, ApiQuery};
use super::error_response;
use super::mappers::AccountingMapper;
use crate::backend::AppState;

#[derive(Debug, Deserialize)]
pub struct EntryListQuery {
    pub lead_id: Option<String>,
    /// "YYYY-MM", filters on payment date
    pub month: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/accounting", get(list_entries).post(create_entry))
        .route(
            "/api/accounting/:id",
            get(get_entry).patch(update_entry_field).delete(delete_entry),
        )
}

pub async fn create_entry(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateAccountingEntryRequest>,
) -> impl IntoResponse {
    info!("POST /api/accounting - request: {:?}", request);

    match state.accounting_service.create_entry(request).await {
        Ok(entry) => (
            StatusCode::CREATED,
            Json(AccountingMapper::to_response(entry, "Payment recorded")),
        )
            .into_response(),
        Err(e) => error_response("Failed to create accounting entry", e),
    }
}

pub async fn list_entries(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EntryListQuery>,
) -> impl IntoResponse {
    info!("GET /api/accounting - query: {:?}", query);

    let lead_id = query.lead_id.filter(|id| !id.is_empty());
    let month = query.month.as_deref().filter(|month| !month.is_empty());

    match state.accounting_service.list_entries(lead_id, month).await {
        Ok(entries) => (StatusCode::OK, Json(AccountingMapper::to_list_dto(entries))).into_response(),
        Err(e) => error_response("Failed to list accounting entries", e),
    }
}

pub async fn get_entry(State(state): State<AppState>, Path(entry_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/accounting/{}", entry_id);

    match state.accounting_service.get_entry(&entry_id).await {
        Ok(entry) => (StatusCode::OK, Json(AccountingMapper::to_dto(entry))).into_response(),
        Err(e) => error_response("Failed to get accounting entry", e),
    }
}

/// Edit one field; editing `amount` recomputes commissions and remaining balance
pub async fn update_entry_field(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    ApiJson(request): ApiJson<UpdateEntryFieldRequest>,
) -> impl IntoResponse {
    info!("PATCH /api/accounting/{} - request: {:?}", entry_id, request);

    match state.accounting_service.update_entry_field(&entry_id, request).await {
        Ok(entry) => (
            StatusCode::OK,
            Json(AccountingMapper::to_response(entry, "Entry updated")),
        )
            .into_response(),
        Err(e) => error_response("Failed to update accounting entry", e),
    }
}

pub async fn delete_entry(State(state): State<AppState>, Path(entry_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/accounting/{}", entry_id);

    match state.accounting_service.delete_entry(&entry_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("Failed to delete accounting entry", e),
    }
}
