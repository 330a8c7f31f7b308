// ==========================================
// Indicador Carimbadeira - 引擎层
// ==========================================
// 职责: 输入规范化、误差计算、汇总统计
// 红线: Engine 不拼 SQL, 不持有存储
// ==========================================

pub mod aggregation;
pub mod error;
pub mod error_percent;
pub mod order_code;
pub mod quantity;

// 重导出核心引擎
pub use aggregation::AggregationEngine;
pub use error::{ValidationError, ValidationResult};
pub use error_percent::{format_percent, ErrorPercentCalculator};
pub use order_code::{format_order_code, strip_non_digits, OrderCodeFormatter};
pub use quantity::to_quantity;

pub use crate::domain::types::OrderCodeStyle;
