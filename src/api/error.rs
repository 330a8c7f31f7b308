// ==========================================
// Indicador Carimbadeira - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository/校验错误
// 约定: 没有任何错误是致命的，所有失败都回到可重试状态
// ==========================================

use crate::engine::error::ValidationError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误（提交前拦截）
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("数据验证失败: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("已有记录正在保存，请勿重复提交")]
    SubmissionInProgress,

    // ==========================================
    // 存储错误（非致命，可重试）
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("约束违反: {0}")]
    ConstraintViolation(String),

    // ==========================================
    // 其他
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("导出失败: {0}")]
    ExportError(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::ConstraintViolation(msg) => ApiError::ConstraintViolation(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl ApiError {
    /// 前端使用的错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::ValidationFailed(_) => "VALIDATION_ERROR",
            ApiError::SubmissionInProgress => "SUBMISSION_IN_PROGRESS",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::DatabaseConnectionError(_) => "DATABASE_CONNECTION_ERROR",
            ApiError::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            ApiError::ConfigError(_) => "CONFIG_ERROR",
            ApiError::ExportError(_) => "EXPORT_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "OTHER_ERROR",
        }
    }

    /// 是否为存储层错误（连接/约束/查询）
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            ApiError::DatabaseError(_)
                | ApiError::DatabaseConnectionError(_)
                | ApiError::ConstraintViolation(_)
        )
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
