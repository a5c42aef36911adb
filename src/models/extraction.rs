use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::{decimal, OrderLine};

/// 文档解析服务的返回结果, 仅用于预填新申请
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub vendor_name: String,
    #[serde(default)]
    pub vat_id: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub order_lines: Vec<OrderLine>,
    #[serde(default = "decimal::zero", with = "decimal")]
    pub total_cost: BigDecimal,
}

impl ExtractionResult {
    /// 边界校验: 金额与数量不能为负
    pub fn check_amounts(&self) -> Result<(), String> {
        let zero = decimal::zero();
        for (index, line) in self.order_lines.iter().enumerate() {
            for (field, value) in [
                ("unit_price", &line.unit_price),
                ("amount", &line.amount),
                ("total_price", &line.total_price),
            ] {
                if *value < zero {
                    return Err(format!("order_lines[{index}].{field} is negative"));
                }
            }
        }
        if self.total_cost < zero {
            return Err("total_cost is negative".to_string());
        }
        Ok(())
    }
}
