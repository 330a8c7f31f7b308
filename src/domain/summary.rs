// ==========================================
// Indicador Carimbadeira - 汇总结果模型
// ==========================================

use serde::{Deserialize, Serialize};

/// 单个分组值的平均误差
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMean {
    pub value: String, // 分组值 (机台代码 / 部件名称)
    pub mean: f64,     // 平均误差百分比，无记录时为 0.0
    pub count: usize,  // 参与计算的记录数
}

/// 汇总视图输出
///
/// by_carimbadeira / by_componente 的顺序与配置目录的声明顺序一致，
/// 且每个目录值都会出现（无记录时 mean = 0.0）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub overall_mean: f64,
    pub total_records: usize,
    pub by_carimbadeira: Vec<GroupMean>,
    pub by_componente: Vec<GroupMean>,
}

impl ErrorSummary {
    /// 空汇总（无记录时的默认值）
    pub fn empty() -> Self {
        Self {
            overall_mean: 0.0,
            total_records: 0,
            by_carimbadeira: Vec::new(),
            by_componente: Vec::new(),
        }
    }
}
