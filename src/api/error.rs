use crate::client::ClientError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 统一错误响应: `{"error": message}`
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub status: StatusCode,
    pub message: String,
}

impl GatewayError {
    /// 后端失败: 固定 500; 有字符串 detail 时透出, 否则使用路由的通用提示.
    /// 网络错误/响应格式错误只记录日志, 不把内部信息返回给调用方.
    pub fn backend(err: ClientError, fallback: &'static str) -> Self {
        let message = match &err {
            ClientError::Status { status, detail } => {
                tracing::warn!(%status, detail = ?detail, "{}", fallback);
                detail.clone().unwrap_or_else(|| fallback.to_string())
            }
            other => {
                tracing::warn!(error = %other, "{}", fallback);
                fallback.to_string()
            }
        };
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_detail_is_surfaced() {
        let err = GatewayError::backend(
            ClientError::Status {
                status: StatusCode::NOT_FOUND,
                detail: Some("Request not found".into()),
            },
            "Failed to delete request",
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Request not found");
    }

    #[test]
    fn internal_failures_use_generic_message() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = GatewayError::backend(ClientError::Malformed(parse_err), "Failed to fetch requests");
        assert_eq!(err.message, "Failed to fetch requests");

        let err = GatewayError::backend(
            ClientError::Status {
                status: StatusCode::BAD_GATEWAY,
                detail: None,
            },
            "Failed to update status",
        );
        assert_eq!(err.message, "Failed to update status");
    }
}
