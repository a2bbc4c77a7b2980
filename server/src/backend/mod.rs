//! # Backend Module
//!
//! Everything behind the HTTP port of the music-training CRM.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (axum handlers, DTO mappers)
//!     ↓
//! Domain Layer (date calculator, payment recompute, services)
//!     ↓
//! Storage Layer (SQLite repositories, report cache)
//! ```
//!
//! This module wires the layers together: it builds the services over a
//! database connection and assembles the router with CORS and request tracing.

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::backend::domain::{AccountingService, LeadService, ReportService, SessionService};
use crate::backend::io::rest::{accounting_apis, health_apis, lead_apis, report_apis, session_apis};
use crate::backend::storage::{DbConnection, InMemoryReportCache, ReportCache};
use crate::config::Config;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub lead_service: LeadService<DbConnection>,
    pub accounting_service: AccountingService<DbConnection>,
    pub session_service: SessionService<DbConnection>,
    pub report_service: ReportService<DbConnection>,
}

impl AppState {
    pub fn new(connection: Arc<DbConnection>, report_cache: Arc<dyn ReportCache>) -> Self {
        Self {
            lead_service: LeadService::new(connection.clone()),
            accounting_service: AccountingService::new(connection.clone()),
            session_service: SessionService::new(connection.clone()),
            report_service: ReportService::new(connection, report_cache),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let connection = Arc::new(DbConnection::new(&config.database_url).await?);

    info!(
        "Setting up report cache (ttl {}s)",
        config.report_cache_ttl_secs
    );
    let report_cache: Arc<dyn ReportCache> = Arc::new(InMemoryReportCache::new(config.report_cache_ttl()));

    Ok(AppState::new(connection, report_cache))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    Ok(Router::new()
        .merge(health_apis::router())
        .merge(lead_apis::router())
        .merge(accounting_apis::router())
        .merge(session_apis::router())
        .merge(report_apis::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}
