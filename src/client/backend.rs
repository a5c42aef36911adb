use crate::models::{NewProcurementRequest, ProcurementRequest, RequestStatus, StatusUpdate};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{multipart, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

const REQUESTS: [&str; 2] = ["api", "requests"];
const PROCESS_DOCUMENT: [&str; 2] = ["api", "process-document"];

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("backend responded with {status}")]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed backend response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// 后端给出的结构化错误说明 (`detail` 或 `error` 字段)
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// 后端成功响应, 原样转发
#[derive(Debug, Clone, PartialEq)]
pub struct Relayed {
    pub status: StatusCode,
    pub body: Option<Value>,
}

/// 透传的原始响应 (文档页面等非 JSON 内容)
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Vec<u8>,
}

/// 上传的单个文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// 后端 API 客户端
///
/// 每次调用只做一次转发: 不重试, 不覆盖默认超时.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 拼接路径段, 路径参数会被转义
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 转发一次调用; 非 2xx 转为 [`ClientError::Status`]
    pub async fn relay(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&Value>,
    ) -> Result<Relayed, ClientError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, %url, "forwarding to backend");

        let mut request = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                detail: error_detail(&bytes),
            });
        }

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            Some(serde_json::from_slice(&bytes)?)
        };
        Ok(Relayed { status, body })
    }

    pub async fn list_requests(&self) -> Result<Vec<ProcurementRequest>, ClientError> {
        let relayed = self.relay(Method::GET, &REQUESTS, None).await?;
        decode(relayed)
    }

    pub async fn create_request(
        &self,
        request: &NewProcurementRequest,
    ) -> Result<ProcurementRequest, ClientError> {
        let body = serde_json::to_value(request)?;
        let relayed = self.relay(Method::POST, &REQUESTS, Some(&body)).await?;
        decode(relayed)
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: RequestStatus,
    ) -> Result<ProcurementRequest, ClientError> {
        let body = serde_json::to_value(StatusUpdate { status })?;
        let relayed = self
            .relay(Method::PATCH, &["api", "requests", id, "status"], Some(&body))
            .await?;
        decode(relayed)
    }

    /// 删除; 返回后端的确认内容 (可能为空)
    pub async fn delete_request(&self, id: &str) -> Result<Option<Value>, ClientError> {
        let relayed = self
            .relay(Method::DELETE, &["api", "requests", id], None)
            .await?;
        Ok(relayed.body)
    }

    /// 文档浏览透传 (`/docs`, `/openapi.json`), 任何状态码原样返回
    pub async fn fetch_raw(&self, segments: &[&str]) -> Result<RawResponse, ClientError> {
        let url = self.endpoint(segments)?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.bytes().await?.to_vec();
        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }

    /// 以 multipart 上传文件到文档解析接口, 返回状态码和响应文本
    pub async fn submit_document(
        &self,
        file: UploadedFile,
    ) -> Result<(StatusCode, String), ClientError> {
        let url = self.endpoint(&PROCESS_DOCUMENT)?;
        let mut part = multipart::Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = multipart::Form::new().part("file", part);

        tracing::debug!(%url, "sending document for extraction");
        let response = self.http.post(url).multipart(form).send().await?;
        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }
}

fn decode<T: DeserializeOwned>(relayed: Relayed) -> Result<T, ClientError> {
    Ok(serde_json::from_value(relayed.body.unwrap_or(Value::Null))?)
}

/// 只取字符串形式的说明; FastAPI 的校验错误 (数组) 不透出
fn error_detail(bytes: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(bytes).ok()?;
    ["detail", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
