use crate::models::{ProcurementRequest, RequestStatus};
use bigdecimal::{BigDecimal, Zero};
use serde::Serialize;

/// 首页展示的最近申请条数
pub const RECENT_LIMIT: usize = 5;

/// 仪表盘汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
    #[serde(with = "crate::models::decimal")]
    pub total_value: BigDecimal,
    pub recent: Vec<ProcurementRequest>,
}

impl DashboardSummary {
    pub fn from_requests(requests: &[ProcurementRequest]) -> Self {
        let count = |status: RequestStatus| requests.iter().filter(|r| r.status == status).count();

        let total_value = requests
            .iter()
            .fold(BigDecimal::zero(), |sum, r| sum + &r.total_cost);

        let mut recent: Vec<&ProcurementRequest> = requests.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Self {
            total: requests.len(),
            open: count(RequestStatus::Open),
            in_progress: count(RequestStatus::InProgress),
            closed: count(RequestStatus::Closed),
            total_value,
            recent: recent.into_iter().take(RECENT_LIMIT).cloned().collect(),
        }
    }
}
