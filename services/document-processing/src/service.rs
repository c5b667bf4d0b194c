//! COA Analysis Service
//!
//! Analyzes uploaded certificates and keeps the reports in memory for
//! later retrieval.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use coacheck_models::Report;
use coacheck_utils::{to_csv_string, CoaAnalyzer, CoaError, CoaResult, ErrorResponse};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::input::text_from_bytes;

/// Report store plus the analyzer that fills it.
#[derive(Clone)]
pub struct CoaService {
    reports: Arc<RwLock<HashMap<Uuid, Report>>>,
    analyzer: Arc<CoaAnalyzer>,
}

impl CoaService {
    pub fn new(analyzer: CoaAnalyzer) -> Self {
        Self {
            reports: Arc::new(RwLock::new(HashMap::new())),
            analyzer: Arc::new(analyzer),
        }
    }

    /// Analyze an uploaded file and store the report.
    pub async fn analyze_upload(&self, filename: &str, data: Vec<u8>) -> CoaResult<Report> {
        let analyzer = Arc::clone(&self.analyzer);
        let name = filename.to_string();

        let report = tokio::task::spawn_blocking(move || -> CoaResult<Report> {
            let text = text_from_bytes(&name, &data)?;
            Ok(analyzer.analyze(&text, &name))
        })
        .await
        .map_err(|e| CoaError::internal(format!("analysis task failed: {e}")))??;

        info!(
            report_id = %report.id,
            file = %filename,
            tests = report.verdicts.len(),
            failed = report.fail_count,
            "analyzed upload"
        );

        let mut reports = self.reports.write().await;
        reports.insert(report.id, report.clone());
        Ok(report)
    }

    pub async fn get_report(&self, id: Uuid) -> CoaResult<Report> {
        let reports = self.reports.read().await;
        reports
            .get(&id)
            .cloned()
            .ok_or_else(|| CoaError::not_found(format!("report {id}")))
    }

    pub async fn report_count(&self) -> usize {
        self.reports.read().await.len()
    }
}

/// `CoaError` as an HTTP response with an [`ErrorResponse`] body.
pub struct ApiError(CoaError);

impl From<CoaError> for ApiError {
    fn from(error: CoaError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}

pub fn router(service: CoaService, max_request_size: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/coa/analyze", post(analyze_document))
        .route("/api/v1/reports/:id", get(get_report))
        .route("/api/v1/reports/:id/csv", get(get_report_csv))
        .layer(DefaultBodyLimit::max(max_request_size))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn health_check(State(service): State<CoaService>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "coacheck",
        "version": env!("CARGO_PKG_VERSION"),
        "reports": service.report_count().await
    }))
}

/// Upload a COA (PDF or text) and analyze it
async fn analyze_document(
    State(service): State<CoaService>,
    mut multipart: Multipart,
) -> Result<Json<Report>, ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| CoaError::validation("file", format!("upload error: {e}")))?
        .ok_or_else(|| CoaError::validation("file", "no file provided"))?;

    let filename = field
        .file_name()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "upload.txt".to_string());

    let data = field
        .bytes()
        .await
        .map_err(|e| CoaError::validation("file", format!("read error: {e}")))?;

    let report = service.analyze_upload(&filename, data.to_vec()).await?;
    Ok(Json(report))
}

async fn get_report(
    State(service): State<CoaService>,
    Path(id): Path<Uuid>,
) -> Result<Json<Report>, ApiError> {
    Ok(Json(service.get_report(id).await?))
}

async fn get_report_csv(
    State(service): State<CoaService>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let report = service.get_report(id).await?;
    let csv = to_csv_string(&report)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"coa-{id}.csv\""),
            ),
        ],
        csv,
    )
        .into_response())
}
