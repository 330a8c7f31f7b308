// ==========================================
// Indicador Carimbadeira - 校验错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::GroupKey;
use thiserror::Error;

/// 输入校验错误
///
/// 任何一种校验错误都必须在计算误差百分比之前拦截，不产生部分提交。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("字段不能为空: {field}")]
    MissingField { field: String },

    #[error("字段不是有效整数 (field={field}): {raw}")]
    NotANumber { field: String, raw: String },

    #[error("数量不能为负数 (field={field}): {value}")]
    NegativeQuantity { field: String, value: i64 },

    #[error("期望标签数量必须大于0: {expected}")]
    NonPositiveExpected { expected: i64 },

    #[error("生产订单号不含数字: {raw}")]
    OrderCodeWithoutDigits { raw: String },

    #[error("未知的分组值 (key={key}): {value}")]
    UnknownCategory { key: GroupKey, value: String },
}

impl ValidationError {
    /// 出错的表单字段名（用于前端行内提示）
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::NotANumber { field, .. }
            | ValidationError::NegativeQuantity { field, .. } => field,
            ValidationError::NonPositiveExpected { .. } => "quantidade_etiqueta",
            ValidationError::OrderCodeWithoutDigits { .. } => "op",
            ValidationError::UnknownCategory { key, .. } => match key {
                GroupKey::Carimbadeira => "carimbadeira",
                GroupKey::Componente => "componente",
            },
        }
    }

    /// 国际化消息键
    pub fn i18n_key(&self) -> &'static str {
        match self {
            ValidationError::MissingField { .. } => "validation.missing_field",
            ValidationError::NotANumber { .. } => "validation.not_a_number",
            ValidationError::NegativeQuantity { .. } => "validation.negative_quantity",
            ValidationError::NonPositiveExpected { .. } => "validation.non_positive_expected",
            ValidationError::OrderCodeWithoutDigits { .. } => "validation.order_code_without_digits",
            ValidationError::UnknownCategory { .. } => "validation.unknown_category",
        }
    }
}

/// Result 类型别名
pub type ValidationResult<T> = Result<T, ValidationError>;
