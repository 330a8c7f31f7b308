use crate::api::error::ApiError;
use crate::engine::error::ValidationError;
use serde::{Deserialize, Serialize};

// ==========================================
// 公共工具：错误映射、序列化
// ==========================================

/// 错误响应（返回给前端）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

/// 将ApiError转换为JSON字符串（Tauri要求）
pub(super) fn map_api_error(err: ApiError) -> String {
    let details = match &err {
        ApiError::ValidationFailed(v) => Some(validation_details(v)),
        _ => None,
    };

    let error_response = ErrorResponse {
        code: err.code().to_string(),
        message: err.to_string(),
        details,
    };

    serde_json::to_string(&error_response).unwrap_or_else(|_| err.to_string())
}

fn validation_details(v: &ValidationError) -> serde_json::Value {
    serde_json::json!({ "field": v.field(), "i18n_key": v.i18n_key() })
}

/// 序列化响应
pub(super) fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("序列化失败: {}", e))
}
