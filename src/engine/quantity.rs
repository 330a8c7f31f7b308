// ==========================================
// Indicador Carimbadeira - 数量字段解析
// ==========================================

use crate::engine::error::{ValidationError, ValidationResult};

/// 将自由文本解析为数量（十进制整数）
///
/// # 参数
/// - field: 表单字段名（用于错误提示）
/// - raw: 原始输入
///
/// # 返回
/// - Ok(i64): 非负整数
/// - Err(ValidationError): 空值 / 非数字 / 负数
pub fn to_quantity(field: &str, raw: &str) -> ValidationResult<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField {
            field: field.to_string(),
        });
    }

    let value = trimmed
        .parse::<i64>()
        .map_err(|_| ValidationError::NotANumber {
            field: field.to_string(),
            raw: raw.to_string(),
        })?;

    if value < 0 {
        return Err(ValidationError::NegativeQuantity {
            field: field.to_string(),
            value,
        });
    }

    Ok(value)
}
