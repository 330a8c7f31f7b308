// ==========================================
// Indicador Carimbadeira - 汇总引擎
// ==========================================
// 输入: 完整的有序记录序列（只读）
// 输出: 总体平均误差 + 按机台/部件分组平均误差
// 规则: 空集合平均值为 0.0；目录中每个值都出现在输出中，顺序与目录一致
// 规则: 每次记录变化后全量重算，不做增量
// ==========================================

use crate::domain::etiqueta::Etiqueta;
use crate::domain::summary::{ErrorSummary, GroupMean};
use crate::domain::types::GroupKey;
use tracing::instrument;

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregationEngine;

impl AggregationEngine {
    pub fn new() -> Self {
        Self
    }

    /// 所有记录 percentual_erro 的算术平均值（空集合为 0.0）
    pub fn overall_mean(&self, records: &[Etiqueta]) -> f64 {
        mean_of(records.iter().map(|r| r.percentual_erro)).0
    }

    /// 按分组字段计算平均误差
    ///
    /// # 参数
    /// - records: 记录序列
    /// - key: 分组字段
    /// - known_values: 目录（有序）
    ///
    /// # 返回
    /// 与 known_values 一一对应、顺序一致的 GroupMean 列表
    pub fn mean_by_group(
        &self,
        records: &[Etiqueta],
        key: GroupKey,
        known_values: &[String],
    ) -> Vec<GroupMean> {
        known_values
            .iter()
            .map(|value| {
                let (mean, count) = mean_of(
                    records
                        .iter()
                        .filter(|r| r.group_value(key) == Some(value.as_str()))
                        .map(|r| r.percentual_erro),
                );
                GroupMean {
                    value: value.clone(),
                    mean,
                    count,
                }
            })
            .collect()
    }

    /// 生成完整汇总
    #[instrument(skip_all, fields(count = records.len()))]
    pub fn summarize(
        &self,
        records: &[Etiqueta],
        carimbadeiras: &[String],
        componentes: &[String],
    ) -> ErrorSummary {
        let summary = ErrorSummary {
            overall_mean: self.overall_mean(records),
            total_records: records.len(),
            by_carimbadeira: self.mean_by_group(records, GroupKey::Carimbadeira, carimbadeiras),
            by_componente: self.mean_by_group(records, GroupKey::Componente, componentes),
        };

        tracing::debug!(overall_mean = summary.overall_mean, "汇总完成");
        summary
    }
}

/// 平均值与样本数；空序列返回 (0.0, 0)
fn mean_of(values: impl Iterator<Item = f64>) -> (f64, usize) {
    let (sum, count) = values.fold((0.0_f64, 0_usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        (0.0, 0)
    } else {
        (sum / count as f64, count)
    }
}
