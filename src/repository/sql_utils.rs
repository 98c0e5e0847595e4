// ==========================================
// 医院产能看板 - SQL 工具
// ==========================================
// 职责: IN 子句构建 / 语句计数 / 日期字段解析
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// 构建 IN 子句的 SQL 片段
///
/// # 参数
/// - `column_name`: IN 子句应用的列名
/// - `count`: 占位符数量
///
/// # 返回
/// - 生成的 IN 子句片段，例如: "service_id IN (?, ?, ?)"
/// - count = 0 时返回永假条件 "1 = 0"，确保 SQL 语法正确
///
/// # 示例
/// ```
/// use hospital_productivity::repository::sql_utils::build_in_clause;
///
/// assert_eq!(build_in_clause("service_id", 2), "service_id IN (?, ?)");
/// assert_eq!(build_in_clause("service_id", 0), "1 = 0");
/// ```
pub fn build_in_clause(column_name: &str, count: usize) -> String {
    if count == 0 {
        return "1 = 0".to_string();
    }

    let placeholders = vec!["?"; count].join(", ");
    format!("{} IN ({})", column_name, placeholders)
}

/// 解析可空日期字段（接受 "YYYY-MM-DD" 或以其开头的时间戳文本）
pub fn parse_optional_date(
    field: &str,
    value: Option<String>,
) -> RepositoryResult<Option<NaiveDate>> {
    let raw = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => return Ok(None),
    };

    let date_part = raw.trim().get(..10).unwrap_or(raw.trim());
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| RepositoryError::FieldValueError {
            field: field.to_string(),
            message: format!("无法解析日期 '{}': {}", raw, e),
        })
}

// ==========================================
// QueryCounter - 语句计数器
// ==========================================
// 多个仓储共享同一计数器，用于验证批量加载的查询数上界
#[derive(Debug, Clone, Default)]
pub struct QueryCounter {
    count: Arc<AtomicU64>,
}

impl QueryCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次查询
    pub fn record(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// 当前累计查询数
    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}
