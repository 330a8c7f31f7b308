// ==========================================
// Indicador Carimbadeira - 标签记录领域模型
// ==========================================
// 对齐: etiquetas 表
// 红线: percentual_erro 只能由两项数量推导，不接受外部输入
// 红线: 记录创建后不可修改、不可删除
// ==========================================

use crate::domain::types::GroupKey;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Etiqueta - 已持久化的标签批次记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Etiqueta {
    // ===== 主键 (存储分配) =====
    pub id: i64,

    // ===== 业务字段 =====
    pub op: String,                 // 生产订单号 (Ordem de Produção)
    pub carimbadeira: String,       // 贴标机代码
    pub componente: Option<String>, // 部件名称 (早期记录为空)

    // ===== 数量 =====
    pub quantidade_etiqueta: i64, // 期望标签数量
    pub quantidade_maquina: i64,  // 机器计数

    // ===== 派生字段 =====
    pub percentual_erro: f64, // (maquina / etiqueta - 1) * 100

    // ===== 时间戳 (存储分配) =====
    pub created_at: NaiveDateTime,
}

impl Etiqueta {
    /// 取分组字段的值
    ///
    /// # 返回
    /// - Some(&str): 该记录在分组字段上的值
    /// - None: 记录缺少该字段 (例如早期无部件的记录)
    pub fn group_value(&self, key: GroupKey) -> Option<&str> {
        match key {
            GroupKey::Carimbadeira => Some(self.carimbadeira.as_str()),
            GroupKey::Componente => self.componente.as_deref(),
        }
    }
}

// ==========================================
// NovaEtiqueta - 插入载荷
// ==========================================
// id 与 created_at 由存储分配，不在载荷中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NovaEtiqueta {
    pub op: String,
    pub carimbadeira: String,
    pub componente: Option<String>,
    pub quantidade_etiqueta: i64,
    pub quantidade_maquina: i64,
    pub percentual_erro: f64,
}

// ==========================================
// EntryForm - 录入表单原始状态
// ==========================================
// 所有字段均为自由文本，由调用方持有；
// 仅在提交成功后清空，失败时保留以便重试
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryForm {
    pub op: String,
    pub carimbadeira: String,
    pub componente: String,
    pub quantidade_etiqueta: String,
    pub quantidade_maquina: String,
}

impl EntryForm {
    /// 清空表单
    pub fn clear(&mut self) {
        *self = EntryForm::default();
    }

    /// 表单是否全部为空
    pub fn is_blank(&self) -> bool {
        [
            &self.op,
            &self.carimbadeira,
            &self.componente,
            &self.quantidade_etiqueta,
            &self.quantidade_maquina,
        ]
        .iter()
        .all(|v| v.trim().is_empty())
    }
}
