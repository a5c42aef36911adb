use indexmap::IndexSet;
use serde::Serialize;

/// 商品组 -> 分类 对照表中的一行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommodityGroup {
    pub id: &'static str,
    pub commodity_group: &'static str,
    pub category: &'static str,
}

const fn group(
    id: &'static str,
    commodity_group: &'static str,
    category: &'static str,
) -> CommodityGroup {
    CommodityGroup {
        id,
        commodity_group,
        category,
    }
}

/// 分类的展示配色 (Tailwind class)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryColors {
    pub background: &'static str,
    pub text: &'static str,
    pub border: &'static str,
    pub badge: &'static str,
}

const fn palette(color: &'static [&'static str; 4]) -> CategoryColors {
    CategoryColors {
        background: color[0],
        text: color[1],
        border: color[2],
        badge: color[3],
    }
}

/// 未知分类的回退配色
pub const NEUTRAL_COLORS: CategoryColors = palette(&[
    "bg-gray-50",
    "text-gray-700",
    "border-gray-200",
    "bg-gray-100 text-gray-800",
]);

const CATEGORY_COLORS: &[(&str, CategoryColors)] = &[
    (
        "General Services",
        palette(&["bg-blue-50", "text-blue-700", "border-blue-200", "bg-blue-100 text-blue-800"]),
    ),
    (
        "Facility Management",
        palette(&["bg-green-50", "text-green-700", "border-green-200", "bg-green-100 text-green-800"]),
    ),
    (
        "Publishing Production",
        palette(&["bg-purple-50", "text-purple-700", "border-purple-200", "bg-purple-100 text-purple-800"]),
    ),
    (
        "Information Technology",
        palette(&["bg-indigo-50", "text-indigo-700", "border-indigo-200", "bg-indigo-100 text-indigo-800"]),
    ),
    (
        "Logistics",
        palette(&["bg-orange-50", "text-orange-700", "border-orange-200", "bg-orange-100 text-orange-800"]),
    ),
    (
        "Marketing & Advertising",
        palette(&["bg-pink-50", "text-pink-700", "border-pink-200", "bg-pink-100 text-pink-800"]),
    ),
    (
        "Production",
        palette(&["bg-yellow-50", "text-yellow-700", "border-yellow-200", "bg-yellow-100 text-yellow-800"]),
    ),
];

/// 固定对照表, 进程内只读
pub const COMMODITY_GROUPS: &[CommodityGroup] = &[
    group("001", "Accommodation Rentals", "General Services"),
    group("002", "Membership Fees", "General Services"),
    group("003", "Workplace Safety", "General Services"),
    group("004", "Consulting", "General Services"),
    group("005", "Financial Services", "General Services"),
    group("006", "Fleet Management", "General Services"),
    group("007", "Recruitment Services", "General Services"),
    group("008", "Professional Development", "General Services"),
    group("009", "Miscellaneous Services", "General Services"),
    group("010", "Insurance", "General Services"),
    group("011", "Electrical Engineering", "Facility Management"),
    group("012", "Facility Management Services", "Facility Management"),
    group("013", "Security", "Facility Management"),
    group("014", "Renovations", "Facility Management"),
    group("015", "Office Equipment", "Facility Management"),
    group("016", "Energy Management", "Facility Management"),
    group("017", "Maintenance", "Facility Management"),
    group("018", "Cafeteria and Kitchenettes", "Facility Management"),
    group("019", "Cleaning", "Facility Management"),
    group("020", "Audio and Visual Production", "Publishing Production"),
    group("021", "Books/Videos/CDs", "Publishing Production"),
    group("022", "Printing Costs", "Publishing Production"),
    group("023", "Software Development for Publishing", "Publishing Production"),
    group("024", "Material Costs", "Publishing Production"),
    group("025", "Shipping for Production", "Publishing Production"),
    group("026", "Digital Product Development", "Publishing Production"),
    group("027", "Pre-production", "Publishing Production"),
    group("028", "Post-production Costs", "Publishing Production"),
    group("029", "Hardware", "Information Technology"),
    group("030", "IT Services", "Information Technology"),
    group("031", "Software", "Information Technology"),
    group("032", "Courier, Express, and Postal Services", "Logistics"),
    group("033", "Warehousing and Material Handling", "Logistics"),
    group("034", "Transportation Logistics", "Logistics"),
    group("035", "Delivery Services", "Logistics"),
    group("036", "Advertising", "Marketing & Advertising"),
    group("037", "Outdoor Advertising", "Marketing & Advertising"),
    group("038", "Marketing Agencies", "Marketing & Advertising"),
    group("039", "Direct Mail", "Marketing & Advertising"),
    group("040", "Customer Communication", "Marketing & Advertising"),
    group("041", "Online Marketing", "Marketing & Advertising"),
    group("042", "Events", "Marketing & Advertising"),
    group("043", "Promotional Materials", "Marketing & Advertising"),
    group("044", "Warehouse and Operational Equipment", "Production"),
    group("045", "Production Machinery", "Production"),
    group("046", "Spare Parts", "Production"),
    group("047", "Internal Transportation", "Production"),
    group("048", "Production Materials", "Production"),
    group("049", "Consumables", "Production"),
    group("050", "Maintenance and Repairs", "Production"),
];

pub fn commodity_groups() -> &'static [CommodityGroup] {
    COMMODITY_GROUPS
}

/// 商品组所属分类, 未收录的商品组返回 None
pub fn category_of(commodity_group: &str) -> Option<&'static str> {
    COMMODITY_GROUPS
        .iter()
        .find(|cg| cg.commodity_group == commodity_group)
        .map(|cg| cg.category)
}

/// 分类配色; 缺失或未知分类使用中性配色
pub fn colors_of(category: Option<&str>) -> CategoryColors {
    category
        .and_then(|name| CATEGORY_COLORS.iter().find(|(known, _)| *known == name))
        .map(|(_, colors)| *colors)
        .unwrap_or(NEUTRAL_COLORS)
}

/// 去重后的分类名, 按首次出现顺序
pub fn categories() -> Vec<&'static str> {
    COMMODITY_GROUPS
        .iter()
        .map(|cg| cg.category)
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
