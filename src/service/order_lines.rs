use crate::models::OrderLine;
use bigdecimal::{BigDecimal, Zero};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderLineError {
    #[error("At least one order line is required")]
    LastLine,
    #[error("order line {index} does not exist ({len} lines)")]
    OutOfRange { index: usize, len: usize },
    #[error("no order lines given")]
    Empty,
}

/// 对单行的一次编辑
#[derive(Debug, Clone, PartialEq)]
pub enum LineEdit {
    Description(String),
    UnitPrice(BigDecimal),
    Amount(BigDecimal),
    Unit(String),
}

/// 每次编辑后的结果: 完整行序列 + 重新计算的总额
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLineSnapshot {
    pub lines: Vec<OrderLine>,
    #[serde(with = "crate::models::decimal")]
    pub grand_total: BigDecimal,
}

/// 订单行编辑器
///
/// 始终至少保留一行; 总额每次从各行 `total_price` 重新求和, 不做增量缓存.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineEditor {
    lines: Vec<OrderLine>,
}

impl Default for OrderLineEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderLineEditor {
    pub fn new() -> Self {
        Self {
            lines: vec![OrderLine::blank()],
        }
    }

    /// 从已有行构建 (如文档解析结果), 逐行按单价 x 数量重算小计
    pub fn from_lines(lines: Vec<OrderLine>) -> Result<Self, OrderLineError> {
        if lines.is_empty() {
            return Err(OrderLineError::Empty);
        }
        let mut editor = Self { lines };
        editor.lines.iter_mut().for_each(recompute_line);
        Ok(editor)
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<OrderLine> {
        self.lines
    }

    pub fn grand_total(&self) -> BigDecimal {
        self.lines
            .iter()
            .fold(BigDecimal::zero(), |sum, line| sum + &line.total_price)
    }

    pub fn snapshot(&self) -> OrderLineSnapshot {
        OrderLineSnapshot {
            lines: self.lines.clone(),
            grand_total: self.grand_total(),
        }
    }

    pub fn add_line(&mut self) -> OrderLineSnapshot {
        self.lines.push(OrderLine::blank());
        self.snapshot()
    }

    /// 删除一行; 不允许删到零行, 此时序列保持不变
    pub fn remove_line(&mut self, index: usize) -> Result<OrderLineSnapshot, OrderLineError> {
        self.check_index(index)?;
        if self.lines.len() == 1 {
            return Err(OrderLineError::LastLine);
        }
        self.lines.remove(index);
        Ok(self.snapshot())
    }

    pub fn update_line(
        &mut self,
        index: usize,
        edit: LineEdit,
    ) -> Result<OrderLineSnapshot, OrderLineError> {
        self.check_index(index)?;
        let line = &mut self.lines[index];
        match edit {
            LineEdit::Description(description) => line.description = description,
            LineEdit::Unit(unit) => line.unit = unit,
            LineEdit::UnitPrice(unit_price) => {
                line.unit_price = unit_price;
                recompute_line(line);
            }
            LineEdit::Amount(amount) => {
                line.amount = amount;
                recompute_line(line);
            }
        }
        Ok(self.snapshot())
    }

    fn check_index(&self, index: usize) -> Result<(), OrderLineError> {
        if index >= self.lines.len() {
            return Err(OrderLineError::OutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        Ok(())
    }
}

fn recompute_line(line: &mut OrderLine) {
    line.total_price = &line.unit_price * &line.amount;
}
