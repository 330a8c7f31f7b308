// ==========================================
// Indicador Carimbadeira - 用户通知
// ==========================================
// 所有结果（成功 / 校验失败 / 存储失败）都转为一条本地化通知，
// 不向上抛出未处理错误
// ==========================================

use crate::api::error::ApiError;
use crate::engine::error::ValidationError;
use crate::i18n::{t, t_with_args};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    /// 校验失败时对应的表单字段（行内提示）
    pub field: Option<String>,
    /// 错误代码（成功时为空）
    pub code: Option<String>,
}

impl Notification {
    /// 保存成功
    pub fn saved() -> Self {
        Self {
            kind: NotificationKind::Success,
            title: t("notification.saved_title"),
            description: t("notification.saved_description"),
            field: None,
            code: None,
        }
    }

    /// 提交失败
    pub fn submit_failed(err: &ApiError) -> Self {
        match err {
            ApiError::ValidationFailed(v) => Self::invalid(v),
            ApiError::SubmissionInProgress => Self::error(err, t("notification.in_progress")),
            _ => Self::error(err, t("notification.save_failed")),
        }
    }

    /// 列表加载失败
    pub fn load_failed(err: &ApiError) -> Self {
        Self::error(err, t("notification.load_failed"))
    }

    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }

    fn invalid(v: &ValidationError) -> Self {
        let value = match v {
            ValidationError::NotANumber { raw, .. } => raw.clone(),
            ValidationError::NegativeQuantity { value, .. } => value.to_string(),
            ValidationError::OrderCodeWithoutDigits { raw } => raw.clone(),
            ValidationError::UnknownCategory { value, .. } => value.clone(),
            ValidationError::NonPositiveExpected { expected } => expected.to_string(),
            ValidationError::MissingField { .. } => String::new(),
        };

        Self {
            kind: NotificationKind::Error,
            title: t("notification.validation_title"),
            description: t_with_args(v.i18n_key(), &[("field", v.field()), ("value", value.as_str())]),
            field: Some(v.field().to_string()),
            code: Some("VALIDATION_ERROR".to_string()),
        }
    }

    fn error(err: &ApiError, description: String) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: t("notification.error_title"),
            description,
            field: None,
            code: Some(err.code().to_string()),
        }
    }
}
