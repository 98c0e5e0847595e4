// ==========================================
// 医院产能看板 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    // ===== 数据质量错误 =====
    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, msg) => {
                if code.code == rusqlite::ErrorCode::CannotOpen {
                    RepositoryError::DatabaseConnectionError(
                        msg.unwrap_or_else(|| code.to_string()),
                    )
                } else {
                    RepositoryError::DatabaseQueryError(msg.unwrap_or_else(|| code.to_string()))
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_rows_maps_to_not_found() {
        let err: RepositoryError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[test]
    fn test_missing_table_maps_to_query_error() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err: RepositoryError = conn
            .execute("SELECT * FROM no_such_table", [])
            .unwrap_err()
            .into();
        match err {
            RepositoryError::DatabaseQueryError(msg) => assert!(msg.contains("no_such_table")),
            other => panic!("Expected DatabaseQueryError, got {:?}", other),
        }
    }
}
