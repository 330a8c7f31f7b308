// ==========================================
// Indicador Carimbadeira - 目录配置
// ==========================================
// 机台与部件是“有序命名集合”，属于配置数据而非代码分支；
// 新增类别只需追加配置值。
// ==========================================

use crate::domain::types::{GroupKey, OrderCodeStyle};
use serde::{Deserialize, Serialize};

/// 默认贴标机目录
pub const DEFAULT_CARIMBADEIRAS: &[&str] = &["CB-01", "CB-02", "CB-03", "CB-04"];

/// 默认部件目录
pub const DEFAULT_COMPONENTES: &[&str] = &["ABA", "VÁLVULA", "FUNDO", "TAMPA"];

/// 默认订单号最大位数（DIGITS_ONLY 模式）
pub const DEFAULT_ORDER_CODE_MAX_DIGITS: usize = 10;

/// 录入/汇总所需的完整目录快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub carimbadeiras: Vec<String>,
    pub componentes: Vec<String>,
    pub order_code_style: OrderCodeStyle,
    pub componente_obrigatorio: bool,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            carimbadeiras: to_owned_list(DEFAULT_CARIMBADEIRAS),
            componentes: to_owned_list(DEFAULT_COMPONENTES),
            order_code_style: OrderCodeStyle::Separated,
            componente_obrigatorio: true,
        }
    }
}

impl Catalog {
    /// 取某个分组字段的目录
    pub fn values(&self, key: GroupKey) -> &[String] {
        match key {
            GroupKey::Carimbadeira => &self.carimbadeiras,
            GroupKey::Componente => &self.componentes,
        }
    }

    /// 判断值是否在目录中（精确匹配）
    pub fn contains(&self, key: GroupKey, value: &str) -> bool {
        self.values(key).iter().any(|v| v == value)
    }
}

fn to_owned_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// 解析逗号分隔的有序列表：去空白、去空项、去重（保留首次出现顺序）
pub fn parse_ordered_list(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !out.iter().any(|v| v == item) {
            out.push(item.to_string());
        }
    }
    out
}

/// 序列化有序列表（parse_ordered_list 的逆操作）
pub fn join_ordered_list(values: &[String]) -> String {
    values.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ordered_list_keeps_order_and_dedupes() {
        assert_eq!(
            parse_ordered_list(" CB-02, CB-01 ,,CB-02,CB-03 "),
            vec!["CB-02", "CB-01", "CB-03"]
        );
        assert!(parse_ordered_list(" , ").is_empty());
    }

    #[test]
    fn test_default_catalog_contains_defaults() {
        let catalog = Catalog::default();
        assert!(catalog.contains(GroupKey::Carimbadeira, "CB-01"));
        assert!(catalog.contains(GroupKey::Componente, "VÁLVULA"));
        assert!(!catalog.contains(GroupKey::Componente, "valvula"));
    }
}
