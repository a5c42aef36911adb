use crate::client::{BackendClient, ClientError};
use crate::models::{ProcurementRequest, RequestStatus};
use crate::service::request_view::{self, CategoryFilter, SortField, StatusFilter, ViewParams};

/// 采购申请总览页
///
/// 持有本页拉取的列表和筛选/排序状态; 每个操作独立发起并等待, 失败转为错误提示.
/// 操作期间页面被 `&mut self` 独占, 不单独维护加载中状态.
#[derive(Debug)]
pub struct ProcurementOverview {
    client: BackendClient,
    requests: Vec<ProcurementRequest>,
    params: ViewParams,
    error: Option<String>,
}

impl ProcurementOverview {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            requests: Vec::new(),
            params: ViewParams::default(),
            error: None,
        }
    }

    pub fn requests(&self) -> &[ProcurementRequest] {
        &self.requests
    }

    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// 重新拉取完整列表; 成功后清除错误提示
    pub async fn refresh(&mut self) {
        match self.client.list_requests().await {
            Ok(requests) => {
                tracing::debug!(count = requests.len(), "fetched requests");
                self.requests = requests;
                self.error = None;
            }
            Err(err) => self.fail(err, "Failed to fetch requests"),
        }
    }

    pub async fn change_status(&mut self, id: &str, status: RequestStatus) {
        tracing::info!(%id, %status, "changing request status");
        match self.client.update_status(id, status).await {
            Ok(_) => self.refresh().await,
            Err(err) => self.fail(err, "Failed to update status"),
        }
    }

    pub async fn delete(&mut self, id: &str) {
        tracing::info!(%id, "deleting request");
        match self.client.delete_request(id).await {
            Ok(_) => self.refresh().await,
            Err(err) => self.fail(err, "Failed to delete request"),
        }
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.params.status = status;
    }

    pub fn set_category_filter(&mut self, category: CategoryFilter) {
        self.params.category = category;
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.params.toggle_sort(field);
    }

    pub fn visible(&self) -> Vec<&ProcurementRequest> {
        request_view::view(&self.requests, &self.params)
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Showing {} of {} requests",
            self.visible().len(),
            self.requests.len()
        )
    }

    fn fail(&mut self, err: ClientError, fallback: &str) {
        tracing::warn!(error = %err, "{}", fallback);
        self.error = Some(err.detail().unwrap_or(fallback).to_string());
    }
}
