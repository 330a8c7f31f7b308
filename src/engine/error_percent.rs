// ==========================================
// Indicador Carimbadeira - 误差百分比计算
// ==========================================
// 公式: percent = (actual / expected - 1) * 100
// 符号: 负数 = 机器少计, 正数 = 机器多计
// 结果不做舍入；两位小数的显示舍入见 format_percent
// ==========================================

use crate::engine::error::{ValidationError, ValidationResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorPercentCalculator;

impl ErrorPercentCalculator {
    pub fn new() -> Self {
        Self
    }

    /// 计算带符号的误差百分比
    ///
    /// # 参数
    /// - expected: 期望标签数量，必须 > 0
    /// - actual: 机器计数，必须 ≥ 0
    ///
    /// # 返回
    /// - Ok(f64): 误差百分比（有限值）
    /// - Err(ValidationError): expected ≤ 0 或 actual < 0
    pub fn compute(&self, expected: i64, actual: i64) -> ValidationResult<f64> {
        if expected <= 0 {
            return Err(ValidationError::NonPositiveExpected { expected });
        }
        if actual < 0 {
            return Err(ValidationError::NegativeQuantity {
                field: "quantidade_maquina".to_string(),
                value: actual,
            });
        }

        // 与 (actual / expected - 1) * 100 代数等价，先做减法以减少舍入误差
        let expected_f = expected as f64;
        Ok((actual as f64 - expected_f) / expected_f * 100.0)
    }
}

/// 显示用格式：两位小数加百分号
pub fn format_percent(percent: f64) -> String {
    format!("{:.2}%", percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_undercount_is_negative() {
        let p = ErrorPercentCalculator::new().compute(100, 95).unwrap();
        assert!((p - (-5.0)).abs() < EPS);
    }

    #[test]
    fn test_overcount_is_positive() {
        let p = ErrorPercentCalculator::new().compute(100, 110).unwrap();
        assert!((p - 10.0).abs() < EPS);
    }

    #[test]
    fn test_matches_ratio_formula() {
        let calc = ErrorPercentCalculator::new();
        for (expected, actual) in [(1, 1), (3, 7), (7, 3), (1000, 999), (12345, 67890), (9, 0)] {
            let p = calc.compute(expected, actual).unwrap();
            let reference = (actual as f64 / expected as f64 - 1.0) * 100.0;
            assert!((p - reference).abs() < EPS, "{} / {}", actual, expected);
        }
    }

    #[test]
    fn test_zero_expected_is_rejected() {
        let calc = ErrorPercentCalculator::new();
        assert_eq!(
            calc.compute(0, 50),
            Err(ValidationError::NonPositiveExpected { expected: 0 })
        );
        assert_eq!(
            calc.compute(0, 0),
            Err(ValidationError::NonPositiveExpected { expected: 0 })
        );
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(-5.0), "-5.00%");
        assert_eq!(format_percent(33.3333), "33.33%");
    }
}
