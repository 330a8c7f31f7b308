// ==========================================
// Indicador Carimbadeira - 配置管理 API
// ==========================================
// 职责: 目录查询与覆写、录入选项设置
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::catalog::Catalog;
use crate::config::config_manager::{config_keys, ConfigManager};
use crate::domain::types::{GroupKey, OrderCodeStyle};

/// 配置管理API
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 查询完整目录
    pub fn get_catalog(&self) -> ApiResult<Catalog> {
        self.config_manager
            .load_catalog()
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 覆写某个分组字段的目录
    ///
    /// # 参数
    /// - key: 分组字段（"CARIMBADEIRA" / "COMPONENTE"）
    /// - values: 新目录（有序）
    ///
    /// # 返回
    /// - Ok(Vec<String>): 规范化后实际保存的目录
    pub fn update_catalog(&self, key: &str, values: Vec<String>) -> ApiResult<Vec<String>> {
        let group = GroupKey::parse(key)
            .ok_or_else(|| ApiError::InvalidInput(format!("未知的目录类型: {}", key)))?;

        if values.iter().all(|v| v.trim().is_empty()) {
            return Err(ApiError::InvalidInput(format!("目录不能为空: {}", group)));
        }
        if let Some(bad) = values.iter().find(|v| v.contains(',')) {
            return Err(ApiError::InvalidInput(format!(
                "目录值不能包含逗号: {}",
                bad.trim()
            )));
        }

        self.config_manager
            .set_category_values(group, &values)
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 设置订单号格式
    pub fn set_order_code_style(&self, style: OrderCodeStyle) -> ApiResult<()> {
        let (style_value, max_digits) = match style {
            OrderCodeStyle::Separated => ("SEPARATED", None),
            OrderCodeStyle::DigitsOnly { max_digits } => {
                if max_digits == 0 {
                    return Err(ApiError::InvalidInput("订单号位数上限必须大于0".to_string()));
                }
                ("DIGITS_ONLY", Some(max_digits))
            }
        };

        let set = |key: &str, value: &str| {
            self.config_manager
                .set_global_config_value(key, value)
                .map_err(|e| ApiError::ConfigError(e.to_string()))
        };

        set(config_keys::ORDER_CODE_STYLE, style_value)?;
        if let Some(n) = max_digits {
            set(config_keys::ORDER_CODE_MAX_DIGITS, &n.to_string())?;
        }
        Ok(())
    }

    /// 设置部件是否必填
    pub fn set_componente_obrigatorio(&self, required: bool) -> ApiResult<()> {
        self.config_manager
            .set_global_config_value(
                config_keys::COMPONENTE_OBRIGATORIO,
                if required { "true" } else { "false" },
            )
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }
}
