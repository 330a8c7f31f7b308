// ==========================================
// Indicador Carimbadeira - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 分组键 (Group Key)
// ==========================================
// 汇总视图按哪个字段分组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupKey {
    Carimbadeira, // 按贴标机
    Componente,   // 按部件
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Carimbadeira => write!(f, "CARIMBADEIRA"),
            GroupKey::Componente => write!(f, "COMPONENTE"),
        }
    }
}

impl GroupKey {
    /// 从配置/前端字符串解析（大小写不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CARIMBADEIRA" => Some(GroupKey::Carimbadeira),
            "COMPONENTE" => Some(GroupKey::Componente),
            _ => None,
        }
    }
}

// ==========================================
// 生产订单号格式 (Order Code Style)
// ==========================================
// SEPARATED: DDD.DDD/DD.DD 分隔格式
// DIGITS_ONLY: 仅保留数字，按位数上限截断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderCodeStyle {
    Separated,
    DigitsOnly { max_digits: usize },
}

impl Default for OrderCodeStyle {
    fn default() -> Self {
        OrderCodeStyle::Separated
    }
}

impl fmt::Display for OrderCodeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderCodeStyle::Separated => write!(f, "SEPARATED"),
            OrderCodeStyle::DigitsOnly { max_digits } => write!(f, "DIGITS_ONLY({})", max_digits),
        }
    }
}
