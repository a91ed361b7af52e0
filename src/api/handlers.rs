//! API request handlers
//!
//! Handlers for all REST API endpoints. Data endpoints read the cached
//! snapshot; a failed load is reported in the envelope, never as a panic.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::server::AppState;
use crate::core::cache::CachedSnapshot;
use crate::core::filter::{filter_options, FilterOptions, FilterSet, RoleFilter};
use crate::error::StaffingResult;
use crate::excel::{detailed_file_name, summary_file_name, ExcelExporter};
use crate::types::{AggregateMetrics, AreaBreakdown, DetailedRoleRow, RoleCounts, SummaryRow};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }

    /// Wrap a result, mapping load failures to 503 with the error text
    fn from_result(result: StaffingResult<T>) -> (StatusCode, Json<Self>) {
        match result {
            Ok(data) => (StatusCode::OK, Json(Self::ok(data))),
            Err(e) => {
                warn!(error = %e, "request failed");
                let message = match e.hint() {
                    Some(hint) => format!("{} ({})", e, hint),
                    None => e.to_string(),
                };
                (StatusCode::SERVICE_UNAVAILABLE, Json(Self::err(message)))
            }
        }
    }
}

/// Root endpoint response
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(method: &str, path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Staffing Dashboard API".to_string(),
        version: state.version.clone(),
        description: "Technology staffing plan metrics from the staffing workbook".to_string(),
        endpoints: vec![
            EndpointInfo::new("GET", "/health", "Health check endpoint"),
            EndpointInfo::new("GET", "/version", "Get server version"),
            EndpointInfo::new("GET", "/api/v1/metrics", "Overall staffing metrics"),
            EndpointInfo::new("GET", "/api/v1/summary", "Summary rows and per-area breakdown"),
            EndpointInfo::new(
                "GET",
                "/api/v1/roles",
                "Detailed roles, filtered by ?status=&tech=&team= (comma-separated)",
            ),
            EndpointInfo::new("GET", "/api/v1/filters", "Available filter values"),
            EndpointInfo::new("POST", "/api/v1/refresh", "Reload the workbook now"),
            EndpointInfo::new("GET", "/api/v1/export/summary", "Download the summary as .xlsx"),
            EndpointInfo::new("GET", "/api/v1/export/detailed", "Download detailed roles as .xlsx"),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: ["metrics", "summary", "roles", "filters", "refresh", "export"]
            .iter()
            .map(|f| f.to_string())
            .collect(),
    }))
}

/// Metrics response
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub loaded_at: DateTime<Utc>,
    pub metrics: AggregateMetrics,
}

impl From<&CachedSnapshot> for MetricsResponse {
    fn from(cached: &CachedSnapshot) -> Self {
        Self {
            loaded_at: cached.loaded_at,
            metrics: cached.snapshot.metrics.clone(),
        }
    }
}

/// GET /api/v1/metrics - Overall metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ApiResponse::from_result(state.snapshot().map(|c| MetricsResponse::from(&c)))
}

/// Summary response
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub loaded_at: DateTime<Utc>,
    pub rows: Vec<SummaryRow>,
    pub areas: Vec<AreaBreakdown>,
}

/// GET /api/v1/summary - Summary rows with per-area figures
pub async fn summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ApiResponse::from_result(state.snapshot().map(|c| SummaryResponse {
        loaded_at: c.loaded_at,
        rows: c.snapshot.summary.clone(),
        areas: c.snapshot.area_breakdown(),
    }))
}

/// Roles query: each field is a comma-separated selection, `All` or absent
/// for no restriction
#[derive(Debug, Default, Deserialize)]
pub struct RolesQuery {
    pub status: Option<String>,
    pub tech: Option<String>,
    pub team: Option<String>,
}

impl RolesQuery {
    pub fn to_filter(&self) -> RoleFilter {
        let parse = |v: &Option<String>| v.as_deref().map(FilterSet::parse).unwrap_or_default();
        RoleFilter {
            status: parse(&self.status),
            technology_area: parse(&self.tech),
            team: parse(&self.team),
        }
    }
}

/// Roles response
#[derive(Debug, Serialize, Deserialize)]
pub struct RolesResponse {
    pub counts: RoleCounts,
    pub roles: Vec<DetailedRoleRow>,
}

/// GET /api/v1/roles - Filtered detailed roles
pub async fn roles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RolesQuery>,
) -> impl IntoResponse {
    let filter = query.to_filter();
    ApiResponse::from_result(state.snapshot().map(|c| {
        let roles = filter.apply(&c.snapshot.detailed);
        RolesResponse {
            counts: RoleCounts::from_rows(&roles),
            roles,
        }
    }))
}

/// GET /api/v1/filters - Filter choices for the roles table
pub async fn filters(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ApiResponse::<FilterOptions>::from_result(
        state.snapshot().map(|c| filter_options(&c.snapshot.detailed)),
    )
}

/// POST /api/v1/refresh - Reload the workbook regardless of age
pub async fn refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ApiResponse::from_result(state.refresh().map(|c| MetricsResponse::from(&c)))
}

fn xlsx_download(file_name: String, result: StaffingResult<Vec<u8>>) -> Response {
    match result {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file_name),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => ApiResponse::<()>::from_result(Err(e)).into_response(),
    }
}

/// GET /api/v1/export/summary - Styled summary workbook
pub async fn export_summary(State(state): State<Arc<AppState>>) -> Response {
    let today = Utc::now().date_naive();
    let result = state
        .snapshot()
        .and_then(|c| ExcelExporter::new(&c.snapshot).summary_bytes());
    xlsx_download(summary_file_name(today), result)
}

/// GET /api/v1/export/detailed - Styled detailed roles workbook
pub async fn export_detailed(State(state): State<Arc<AppState>>) -> Response {
    let today = Utc::now().date_naive();
    let result = state
        .snapshot()
        .and_then(|c| ExcelExporter::new(&c.snapshot).detailed_bytes());
    xlsx_download(detailed_file_name(today), result)
}
