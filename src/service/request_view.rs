use crate::models::{ProcurementRequest, RequestStatus, UnknownStatus};
use crate::service::catalog;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;

/// 状态筛选
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(RequestStatus),
}

impl StatusFilter {
    fn matches(&self, status: RequestStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// 分类筛选; 分类名按原样匹配
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    fn matches(&self, commodity_group: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => catalog::category_of(commodity_group) == Some(wanted.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    RequestorName,
    VendorName,
    Department,
    CommodityGroup,
    TotalCost,
    #[default]
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort field: {0}")]
pub struct UnknownSortField(pub String);

impl FromStr for SortField {
    type Err = UnknownSortField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "title" => Self::Title,
            "requestor_name" => Self::RequestorName,
            "vendor_name" => Self::VendorName,
            "department" => Self::Department,
            "commodity_group" => Self::CommodityGroup,
            "total_cost" => Self::TotalCost,
            "created_at" => Self::CreatedAt,
            "updated_at" => Self::UpdatedAt,
            other => return Err(UnknownSortField(other.to_string())),
        };
        Ok(field)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

/// 列表视图参数, 由页面持有
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParams {
    pub status: StatusFilter,
    pub category: CategoryFilter,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl ViewParams {
    /// 点击表头: 同一列切换方向, 换列则从升序开始
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
    }
}

/// 按筛选条件过滤并稳定排序, 不修改输入
pub fn view<'a>(
    requests: &'a [ProcurementRequest],
    params: &ViewParams,
) -> Vec<&'a ProcurementRequest> {
    let mut visible: Vec<&ProcurementRequest> = requests
        .iter()
        .filter(|r| params.status.matches(r.status) && params.category.matches(&r.commodity_group))
        .collect();

    // sort_by 为稳定排序, 相等元素保持输入顺序
    visible.sort_by(|a, b| {
        let ordering = compare(a, b, params.sort_field);
        match params.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    visible
}

fn compare(a: &ProcurementRequest, b: &ProcurementRequest, field: SortField) -> Ordering {
    match field {
        SortField::Title => collate(&a.title, &b.title),
        SortField::RequestorName => collate(&a.requestor_name, &b.requestor_name),
        SortField::VendorName => collate(&a.vendor_name, &b.vendor_name),
        SortField::Department => collate(&a.department, &b.department),
        SortField::CommodityGroup => collate(&a.commodity_group, &b.commodity_group),
        SortField::TotalCost => a.total_cost.cmp(&b.total_cost),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

/// 文本比较: 先忽略大小写, 仅大小写不同时小写在前
fn collate(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::{TimeZone, Utc};

    fn request(id: &str, title: &str, group: &str, status: RequestStatus, cost: i64) -> ProcurementRequest {
        ProcurementRequest {
            id: Some(id.to_string()),
            requestor_name: "Jane".into(),
            title: title.into(),
            vendor_name: "Acme".into(),
            vat_id: "DE1".into(),
            commodity_group: group.into(),
            order_lines: Vec::new(),
            total_cost: BigDecimal::from(cost),
            department: "IT".into(),
            status,
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, id.len() as u32, 0, 0, 0).unwrap()),
            updated_at: None,
        }
    }

    fn sample() -> Vec<ProcurementRequest> {
        vec![
            request("a", "Printer paper", "Consumables", RequestStatus::Open, 200),
            request("bb", "laptops", "Hardware", RequestStatus::Closed, 5000),
            request("ccc", "Cleaning contract", "Cleaning", RequestStatus::Open, 200),
            request("dddd", "Mystery", "unknown-group", RequestStatus::InProgress, 50),
            request("eeeee", "Antivirus", "Software", RequestStatus::Open, 900),
        ]
    }

    fn ids(view: &[&ProcurementRequest]) -> Vec<String> {
        view.iter().map(|r| r.id.clone().unwrap()).collect()
    }

    fn params(sort_field: SortField, sort_direction: SortDirection) -> ViewParams {
        ViewParams {
            sort_field,
            sort_direction,
            ..ViewParams::default()
        }
    }

    #[test]
    fn default_view_is_newest_first() {
        let requests = sample();
        let visible = view(&requests, &ViewParams::default());
        assert_eq!(ids(&visible), ["eeeee", "dddd", "ccc", "bb", "a"]);
    }

    #[test]
    fn filters_by_status_and_category() {
        let requests = sample();
        let mut p = params(SortField::Title, SortDirection::Asc);
        p.status = StatusFilter::Only(RequestStatus::Open);
        p.category = CategoryFilter::Only("Information Technology".into());

        let visible = view(&requests, &p);
        assert_eq!(ids(&visible), ["eeeee"]);
        assert!(visible
            .iter()
            .all(|r| r.status == RequestStatus::Open
                && catalog::category_of(&r.commodity_group) == Some("Information Technology")));
    }

    #[test]
    fn unknown_group_only_visible_under_all() {
        let requests = sample();
        let all = view(&requests, &ViewParams::default());
        assert!(ids(&all).contains(&"dddd".to_string()));

        for category in catalog::categories() {
            let mut p = ViewParams::default();
            p.category = CategoryFilter::Only(category.to_string());
            assert!(!ids(&view(&requests, &p)).contains(&"dddd".to_string()));
        }
    }

    #[test]
    fn text_sort_ignores_case() {
        let requests = sample();
        let visible = view(&requests, &params(SortField::Title, SortDirection::Asc));
        assert_eq!(ids(&visible), ["eeeee", "ccc", "bb", "dddd", "a"]);
    }

    #[test]
    fn case_only_difference_puts_lowercase_first() {
        assert_eq!(collate("acme", "Acme"), Ordering::Less);
        assert_eq!(collate("Acme", "acme"), Ordering::Greater);
        assert_eq!(collate("acme", "acme"), Ordering::Equal);
    }

    #[test]
    fn numeric_sort_is_stable_in_both_directions() {
        let requests = sample();
        let asc = view(&requests, &params(SortField::TotalCost, SortDirection::Asc));
        assert_eq!(ids(&asc), ["dddd", "a", "ccc", "eeeee", "bb"]);

        // 金额相同的 a / ccc 在降序中仍保持输入顺序
        let desc = view(&requests, &params(SortField::TotalCost, SortDirection::Desc));
        assert_eq!(ids(&desc), ["bb", "eeeee", "a", "ccc", "dddd"]);
    }

    #[test]
    fn view_is_idempotent() {
        let requests = sample();
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let p = params(SortField::VendorName, direction);
            let once: Vec<ProcurementRequest> =
                view(&requests, &p).into_iter().cloned().collect();
            let twice = view(&once, &p);
            assert_eq!(ids(&twice), ids(&once.iter().collect::<Vec<_>>()));
        }
    }

    #[test]
    fn view_does_not_touch_input() {
        let requests = sample();
        let before = requests.clone();
        let _ = view(&requests, &params(SortField::Title, SortDirection::Desc));
        assert_eq!(requests, before);
    }

    #[test]
    fn toggle_sort_flips_or_switches() {
        let mut p = ViewParams::default();
        p.toggle_sort(SortField::CreatedAt);
        assert_eq!(p.sort_direction, SortDirection::Asc);
        p.toggle_sort(SortField::Title);
        assert_eq!((p.sort_field, p.sort_direction), (SortField::Title, SortDirection::Asc));
        p.toggle_sort(SortField::Title);
        assert_eq!(p.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn parses_filter_values() {
        assert_eq!("ALL".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "CLOSED".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(RequestStatus::Closed))
        );
        assert!("done".parse::<StatusFilter>().is_err());
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!("total_cost".parse::<SortField>(), Ok(SortField::TotalCost));
        assert_eq!(SortDirection::parse("ASC"), Some(SortDirection::Asc));
    }
}
