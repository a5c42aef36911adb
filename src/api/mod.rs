pub mod error;
pub mod handlers;

pub use error::GatewayError;
pub use handlers::*;

use crate::client::BackendClient;
use crate::service::DocumentIntake;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

/// multipart 包装开销
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// 共享状态: 后端客户端 + 文档解析流程, 均为只读
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendClient>,
    pub intake: Arc<DocumentIntake>,
}

impl AppState {
    pub fn new(backend: BackendClient, intake: DocumentIntake) -> Self {
        Self {
            backend: Arc::new(backend),
            intake: Arc::new(intake),
        }
    }
}

/// 构建网关路由
pub fn router(state: AppState) -> Router {
    let upload_limit = state.intake.max_file_size_bytes() + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/api/requests",
            get(handlers::list_requests).post(handlers::create_request),
        )
        .route("/api/requests/view", get(handlers::view_requests))
        .route("/api/requests/:id", delete(handlers::delete_request))
        .route("/api/requests/:id/status", patch(handlers::update_status))
        .route(
            "/api/process-document",
            post(handlers::process_document).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/docs", get(handlers::docs))
        .route("/openapi.json", get(handlers::openapi))
        .with_state(state)
}
