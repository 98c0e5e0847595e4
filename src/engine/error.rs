// ==========================================
// 医院产能看板 - 引擎层错误类型
// ==========================================
// InvalidDate: 日历工具抛出，引擎内部从不静默纠正
// StoreUnavailable: 批量加载失败，整个请求硬失败（不降级为合成数据）
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("无效日期: year={year}, month={month}, day={day:?}")]
    InvalidDate {
        year: i32,
        month: u32,
        day: Option<u32>,
    },

    #[error("数据源不可用: {0}")]
    StoreUnavailable(#[from] RepositoryError),
}

impl EngineError {
    pub fn invalid_month(year: i32, month: u32) -> Self {
        EngineError::InvalidDate {
            year,
            month,
            day: None,
        }
    }

    pub fn invalid_day(year: i32, month: u32, day: u32) -> Self {
        EngineError::InvalidDate {
            year,
            month,
            day: Some(day),
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
