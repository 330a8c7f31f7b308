// ==========================================
// Indicador Carimbadeira - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod etiqueta;
pub mod summary;
pub mod types;

// 重导出核心类型
pub use etiqueta::{EntryForm, Etiqueta, NovaEtiqueta};
pub use summary::{ErrorSummary, GroupMean};
pub use types::{GroupKey, OrderCodeStyle};
