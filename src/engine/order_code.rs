// ==========================================
// Indicador Carimbadeira - 生产订单号规范化
// ==========================================
// 输入: 操作员键入的自由文本
// 输出: 规范显示字符串
// 规则 (SEPARATED):
//   ≤3 位      DDD
//   4-6 位     DDD.DDD
//   7-8 位     DDD.DDD/DD
//   9 位以上   DDD.DDD/DD.DD (第 10 位之后的数字并入最后一组)
// 规则 (DIGITS_ONLY): 仅保留数字，截断到 max_digits 位
// ==========================================

use crate::domain::types::OrderCodeStyle;
use crate::engine::error::{ValidationError, ValidationResult};

/// 去除所有非数字字符
pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// 按位数阈值插入分隔符
///
/// 纯函数：对输出再次去除非数字字符，可还原输入的数字序列。
///
/// # 示例
/// ```
/// use indicador_carimbadeira::format_order_code;
/// assert_eq!(format_order_code("1234567890"), "123.456/78.90");
/// ```
pub fn format_order_code(raw: &str) -> String {
    let digits = strip_non_digits(raw);
    // 只含 ASCII 数字，按字节切片安全
    let d = digits.as_str();

    match d.len() {
        0..=3 => digits,
        4..=6 => format!("{}.{}", &d[..3], &d[3..]),
        7..=8 => format!("{}.{}/{}", &d[..3], &d[3..6], &d[6..]),
        _ => format!("{}.{}/{}.{}", &d[..3], &d[3..6], &d[6..8], &d[8..]),
    }
}

// ==========================================
// OrderCodeFormatter - 可配置的订单号格式化器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderCodeFormatter {
    style: OrderCodeStyle,
}

impl OrderCodeFormatter {
    pub fn new(style: OrderCodeStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> OrderCodeStyle {
        self.style
    }

    /// 键入时的格式化（不校验）
    pub fn format(&self, raw: &str) -> String {
        match self.style {
            OrderCodeStyle::Separated => format_order_code(raw),
            OrderCodeStyle::DigitsOnly { max_digits } => {
                strip_non_digits(raw).chars().take(max_digits).collect()
            }
        }
    }

    /// 提交时的规范化：格式化并要求至少包含一位数字
    pub fn normalize(&self, raw: &str) -> ValidationResult<String> {
        if raw.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "op".to_string(),
            });
        }

        let formatted = self.format(raw);
        if formatted.is_empty() {
            return Err(ValidationError::OrderCodeWithoutDigits {
                raw: raw.to_string(),
            });
        }

        Ok(formatted)
    }
}
