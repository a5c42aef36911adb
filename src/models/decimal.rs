//! BigDecimal 的 JSON 编解码
//!
//! 后端把金额建模为浮点数, 所以输出写成 JSON number; 输入同时接受 number 和数字字符串.

use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use serde::{de, Deserialize, Deserializer, Serializer};
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Number(serde_json::Number),
    Text(String),
}

pub fn serialize<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value.to_f64() {
        Some(v) if v.is_finite() => serializer.serialize_f64(v),
        _ => serializer.serialize_str(&value.to_string()),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match RawDecimal::deserialize(deserializer)? {
        RawDecimal::Number(n) => n.to_string(),
        RawDecimal::Text(s) => s,
    };
    BigDecimal::from_str(text.trim())
        .map_err(|_| de::Error::custom(format!("invalid decimal value: {text}")))
}

pub fn zero() -> BigDecimal {
    BigDecimal::zero()
}
