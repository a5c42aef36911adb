use super::error::GatewayError;
use super::AppState;
use crate::client::{RawResponse, Relayed, UploadedFile};
use crate::models::{FieldErrors, NewProcurementRequest, StatusUpdate};
use crate::service::catalog::{self, CategoryColors};
use crate::service::request_view::{self, CategoryFilter, SortDirection, StatusFilter, ViewParams};
use crate::service::{DashboardSummary, OrderLineEditor, UploadOrigin};
use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Json, Multipart, Path, Query, State},
    http::{header::CONTENT_TYPE, Method},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

const FETCH_FAILED: &str = "Failed to fetch requests";
const CREATE_FAILED: &str = "Failed to create request";
const STATUS_FAILED: &str = "Failed to update status";
const DELETE_FAILED: &str = "Failed to delete request";
const PROCESS_FAILED: &str = "Failed to process document";
const DOCS_FAILED: &str = "Failed to load API documentation";

const REQUESTS: [&str; 2] = ["api", "requests"];

/// 列表视图查询参数, 全部可选
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl ViewQuery {
    pub fn into_params(self) -> Result<ViewParams, String> {
        let mut params = ViewParams::default();
        if let Some(status) = self.status.as_deref() {
            params.status = status.parse::<StatusFilter>().map_err(|e| e.to_string())?;
        }
        if let Some(category) = self.category.as_deref() {
            params.category = CategoryFilter::parse(category);
        }
        if let Some(sort) = self.sort.as_deref() {
            params.sort_field = sort.parse().map_err(|e: request_view::UnknownSortField| e.to_string())?;
        }
        if let Some(direction) = self.direction.as_deref() {
            params.sort_direction = SortDirection::parse(direction)
                .ok_or_else(|| format!("unknown sort direction: {direction}"))?;
        }
        Ok(params)
    }
}

/// 分类及其配色
#[derive(Debug, Serialize)]
pub struct CategoryEntry {
    pub name: &'static str,
    pub colors: CategoryColors,
    pub commodity_groups: Vec<&'static str>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 后端成功响应原样返回 (状态码 + JSON)
fn relay_response(relayed: Relayed) -> Response {
    match relayed.body {
        Some(body) => (relayed.status, Json(body)).into_response(),
        None => relayed.status.into_response(),
    }
}

fn raw_response(raw: RawResponse) -> Response {
    match raw.content_type {
        Some(content_type) => (raw.status, [(CONTENT_TYPE, content_type)], raw.body).into_response(),
        None => (raw.status, raw.body).into_response(),
    }
}

/// GET /api/requests
pub async fn list_requests(State(state): State<AppState>) -> Result<Response, GatewayError> {
    let relayed = state
        .backend
        .relay(Method::GET, &REQUESTS, None)
        .await
        .map_err(|e| GatewayError::backend(e, FETCH_FAILED))?;
    Ok(relay_response(relayed))
}

/// POST /api/requests
///
/// 请求体在网关解析并校验; 订单行小计和总额在转发前按单价 x 数量重算.
pub async fn create_request(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let mut request: NewProcurementRequest = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::bad_request(format!("Invalid request body: {e}")))?;

    if let Ok(editor) = OrderLineEditor::from_lines(std::mem::take(&mut request.order_lines)) {
        request.total_cost = editor.grand_total();
        request.order_lines = editor.into_lines();
    }
    request
        .validate()
        .map_err(|e| GatewayError::bad_request(FieldErrors::from(e).to_string()))?;

    info!(title = %request.title, lines = request.order_lines.len(), "creating procurement request");
    let payload = serde_json::to_value(&request)
        .map_err(|e| {
            tracing::error!(error = %e, "failed to encode request");
            GatewayError::internal(CREATE_FAILED)
        })?;
    let relayed = state
        .backend
        .relay(Method::POST, &REQUESTS, Some(&payload))
        .await
        .map_err(|e| GatewayError::backend(e, CREATE_FAILED))?;
    Ok(relay_response(relayed))
}

/// PATCH /api/requests/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let update: StatusUpdate = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::bad_request(format!("Invalid status update: {e}")))?;

    info!(%id, status = %update.status, "updating request status");
    let payload = serde_json::json!({ "status": update.status });
    let relayed = state
        .backend
        .relay(Method::PATCH, &["api", "requests", id.as_str(), "status"], Some(&payload))
        .await
        .map_err(|e| GatewayError::backend(e, STATUS_FAILED))?;
    Ok(relay_response(relayed))
}

/// DELETE /api/requests/:id
pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, GatewayError> {
    info!(%id, "deleting request");
    let relayed = state
        .backend
        .relay(Method::DELETE, &["api", "requests", id.as_str()], None)
        .await
        .map_err(|e| GatewayError::backend(e, DELETE_FAILED))?;
    Ok(relay_response(relayed))
}

/// GET /api/requests/view: 拉取列表后按参数筛选排序
pub async fn view_requests(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Response, GatewayError> {
    let params = query.into_params().map_err(GatewayError::bad_request)?;
    let requests = state
        .backend
        .list_requests()
        .await
        .map_err(|e| GatewayError::backend(e, FETCH_FAILED))?;

    let visible = request_view::view(&requests, &params);
    info!(shown = visible.len(), total = requests.len(), "request view");
    Ok(Json(visible).into_response())
}

/// GET /api/categories
pub async fn list_categories() -> Json<Vec<CategoryEntry>> {
    let entries = catalog::categories()
        .into_iter()
        .map(|name| CategoryEntry {
            name,
            colors: catalog::colors_of(Some(name)),
            commodity_groups: catalog::commodity_groups()
                .iter()
                .filter(|cg| cg.category == name)
                .map(|cg| cg.commodity_group)
                .collect(),
        })
        .collect();
    Json(entries)
}

/// GET /api/dashboard
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardSummary>, GatewayError> {
    let requests = state
        .backend
        .list_requests()
        .await
        .map_err(|e| GatewayError::backend(e, FETCH_FAILED))?;
    Ok(Json(DashboardSummary::from_requests(&requests)))
}

/// POST /api/process-document (multipart: `file`, 可选 `origin` = drop | picker)
pub async fn process_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, GatewayError> {
    let mut multipart =
        multipart.map_err(|_| GatewayError::bad_request("Expected a multipart file upload"))?;

    let mut file: Option<UploadedFile> = None;
    let mut origin = UploadOrigin::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| GatewayError::bad_request("Invalid multipart body"))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                if file.is_some() {
                    return Err(GatewayError::bad_request("Upload exactly one file"));
                }
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| GatewayError::bad_request("Invalid multipart body"))?;
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("origin") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| GatewayError::bad_request("Invalid multipart body"))?;
                origin = value.parse().map_err(GatewayError::bad_request)?;
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| GatewayError::bad_request("No file uploaded"))?;
    match state.intake.process(file, origin).await {
        Ok(result) => Ok(Json(result).into_response()),
        Err(err) if err.is_rejection() => Err(GatewayError::bad_request(err.to_string())),
        Err(err) => {
            tracing::warn!(error = ?err, "{}", PROCESS_FAILED);
            Err(GatewayError::internal(err.to_string()))
        }
    }
}

/// GET /docs
pub async fn docs(State(state): State<AppState>) -> Result<Response, GatewayError> {
    passthrough(&state, "docs").await
}

/// GET /openapi.json
pub async fn openapi(State(state): State<AppState>) -> Result<Response, GatewayError> {
    passthrough(&state, "openapi.json").await
}

async fn passthrough(state: &AppState, path: &str) -> Result<Response, GatewayError> {
    let raw = state
        .backend
        .fetch_raw(&[path])
        .await
        .map_err(|e| GatewayError::backend(e, DOCS_FAILED))?;
    Ok(raw_response(raw))
}
