// ==========================================
// 医院产能看板 - API层错误类型
// ==========================================
// 职责: 把引擎/仓储错误转换为调用方可展示的错误
// 重试、错误页、降级提示属于展示层，不在此处理
// ==========================================

use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("无效日期: {0}")]
    InvalidDate(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据源不可用: {0}")]
    StoreUnavailable(String),

    // ==========================================
    // 导出错误
    // ==========================================
    #[error("导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
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
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::StoreUnavailable(msg),
            RepositoryError::LockError(msg) => {
                ApiError::StoreUnavailable(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::StoreUnavailable(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::StoreUnavailable(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidDate { .. } => ApiError::InvalidDate(err.to_string()),
            EngineError::StoreUnavailable(inner) => match ApiError::from(inner) {
                ApiError::InternalError(msg) => ApiError::StoreUnavailable(msg),
                other => other,
            },
        }
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
