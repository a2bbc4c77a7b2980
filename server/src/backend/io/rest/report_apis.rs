//! # REST API for Reports

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::PipelineReportResponse;
use tracing::info;

use super::extract::ApiQuery;
use super::error_response;
use crate::backend::AppState;

#[derive(Debug, Deserialize)]
pub struct PipelineReportQuery {
    /// "YYYY-MM"; all time when absent
    pub month: Option<String>,
    /// Bypass the report cache
    #[serde(default)]
    pub refresh: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/reports/pipeline", get(get_pipeline_report))
}

pub async fn get_pipeline_report(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PipelineReportQuery>,
) -> impl IntoResponse {
    info!("GET /api/reports/pipeline - query: {:?}", query);

    let month = query.month.as_deref().filter(|month| !month.is_empty());
    match state.report_service.pipeline_report(month, query.refresh).await {
        Ok((report, cached)) => (StatusCode::OK, Json(PipelineReportResponse { report, cached })).into_response(),
        Err(e) => error_response("Failed to build pipeline report", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_utils::{send, test_state};
    use axum::http::Method;
    use serde_json::json;

    async fn setup_test_app() -> Router {
        router()
            .merge(crate::backend::io::rest::lead_apis::router())
            .with_state(test_state().await)
    }

    #[tokio::test]
    async fn test_pipeline_report_caching() {
        let app = setup_test_app().await;
        send(&app, Method::POST, "/api/leads", Some(json!({ "first_name": "Camille" }))).await;

        let (status, body) = send(&app, Method::GET, "/api/reports/pipeline", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cached"], false);
        assert_eq!(body["report"]["period"], "all");
        assert_eq!(body["report"]["lead_counts"]["new"], 1);

        let (_, body) = send(&app, Method::GET, "/api/reports/pipeline", None).await;
        assert_eq!(body["cached"], true);

        let (_, body) = send(&app, Method::GET, "/api/reports/pipeline?refresh=true", None).await;
        assert_eq!(body["cached"], false);
    }

    #[tokio::test]
    async fn test_pipeline_report_bad_month() {
        let app = setup_test_app().await;
        let (status, body) = send(&app, Method::GET, "/api/reports/pipeline?month=2025-13", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_pipeline_report_bad_refresh_flag() {
        let app = setup_test_app().await;
        let (status, body) = send(&app, Method::GET, "/api/reports/pipeline?refresh=yes", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
        assert!(body["error"].as_str().unwrap().starts_with("Invalid query string"));
    }
}
