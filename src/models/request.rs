use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::{Validate, ValidationError};

use super::{decimal, timestamp};

/// 采购申请状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[default]
    Open,
    InProgress,
    Closed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 3] = [Self::Open, Self::InProgress, Self::Closed];

    /// 线上名称 (OPEN / IN_PROGRESS / CLOSED)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Closed => "CLOSED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Closed => "Closed",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown request status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for RequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// 订单行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OrderLine {
    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(with = "decimal")]
    #[validate(custom = "unit_price_non_negative")]
    pub unit_price: BigDecimal,
    #[serde(with = "decimal")]
    #[validate(custom = "amount_at_least_minimum")]
    pub amount: BigDecimal,
    #[serde(default)]
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    #[serde(with = "decimal")]
    #[validate(custom = "total_price_non_negative")]
    pub total_price: BigDecimal,
}

impl OrderLine {
    /// 新增行的初始值: 数量 1, 其余为空/零
    pub fn blank() -> Self {
        Self {
            description: String::new(),
            unit_price: decimal::zero(),
            amount: BigDecimal::from(1),
            unit: String::new(),
            total_price: decimal::zero(),
        }
    }
}

/// 已持久化的采购申请 (后端返回)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementRequest {
    #[serde(
        rename = "_id",
        alias = "id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub requestor_name: String,
    pub title: String,
    pub vendor_name: String,
    pub vat_id: String,
    pub commodity_group: String,
    #[serde(default)]
    pub order_lines: Vec<OrderLine>,
    #[serde(with = "decimal")]
    pub total_cost: BigDecimal,
    pub department: String,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(
        default,
        with = "timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// 新建申请的请求体 (不含 id / 状态 / 时间戳, 由后端分配)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewProcurementRequest {
    #[validate(length(min = 1, message = "Requestor name is required"))]
    pub requestor_name: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Vendor name is required"))]
    pub vendor_name: String,
    #[validate(length(min = 1, message = "VAT ID is required"))]
    pub vat_id: String,
    #[validate(length(min = 1, message = "Commodity group is required"))]
    pub commodity_group: String,
    #[validate(length(min = 1, message = "At least one order line is required"))]
    #[validate]
    pub order_lines: Vec<OrderLine>,
    /// 网关转发前会按订单行重算, 请求体可省略
    #[serde(default = "decimal::zero", with = "decimal")]
    #[validate(custom = "total_cost_non_negative")]
    pub total_cost: BigDecimal,
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,
}

/// 状态变更请求体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: RequestStatus,
}

fn decimal_at_least(
    value: &BigDecimal,
    minimum: BigDecimal,
    message: &'static str,
) -> Result<(), ValidationError> {
    if *value < minimum {
        let mut err = ValidationError::new("range");
        err.message = Some(Cow::Borrowed(message));
        return Err(err);
    }
    Ok(())
}

fn unit_price_non_negative(value: &BigDecimal) -> Result<(), ValidationError> {
    decimal_at_least(value, decimal::zero(), "Unit price must be positive")
}

fn amount_at_least_minimum(value: &BigDecimal) -> Result<(), ValidationError> {
    // 最小数量 0.01
    decimal_at_least(value, BigDecimal::new(1.into(), 2), "Amount must be at least 0.01")
}

fn total_price_non_negative(value: &BigDecimal) -> Result<(), ValidationError> {
    decimal_at_least(value, decimal::zero(), "Total price must be positive")
}

fn total_cost_non_negative(value: &BigDecimal) -> Result<(), ValidationError> {
    decimal_at_least(value, decimal::zero(), "Total cost must be positive")
}
