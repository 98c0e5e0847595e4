// ==========================================
// 医院产能看板 - 目标覆盖 (meta / PDT) 数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（优先级判定在 TargetResolver）
// 查询层只做单元/服务过滤 + 确定性排序；有效期在解析后过滤
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::production::TargetOverride;
use crate::domain::types::OverrideKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{build_in_clause, parse_optional_date, QueryCounter};
use chrono::NaiveDate;
use rusqlite::{Connection, Result as SqliteResult, ToSql};
use std::sync::{Arc, Mutex};

/// 目标覆盖仓储
/// 职责: 读取 target_override 表
pub struct TargetOverrideRepository {
    conn: Arc<Mutex<Connection>>,
    counter: QueryCounter,
}

/// 原始行（日期/类型尚未解析）
struct RawOverrideRow {
    id: i64,
    service_id: i64,
    unit_id: i64,
    kind: String,
    target_value: i64,
    validity_start: Option<String>,
    validity_end: Option<String>,
    active: i64,
}

impl TargetOverrideRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            counter: QueryCounter::new(),
        }
    }

    pub fn with_counter(mut self, counter: QueryCounter) -> Self {
        self.counter = counter;
        self
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量查询有效期包含参考日期的目标覆盖
    ///
    /// # 参数
    /// - unit_id: 单元 ID
    /// - service_ids: 服务 ID 集合（为空时不发出查询）
    /// - reference_date: 参考日期（报表月第一天）
    ///
    /// # 返回
    /// - Ok(Vec<TargetOverride>): 按 service_id, id 排序；NULL 边界视为开区间
    pub fn find_effective_for_services(
        &self,
        unit_id: i64,
        service_ids: &[i64],
        reference_date: NaiveDate,
    ) -> RepositoryResult<Vec<TargetOverride>> {
        if service_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT
                id, service_id, unit_id, kind, target_value,
                validity_start, validity_end, active
            FROM target_override
            WHERE unit_id = ?
              AND {}
            ORDER BY service_id, id
            "#,
            build_in_clause("service_id", service_ids.len())
        );

        let mut params_vec: Vec<&dyn ToSql> = vec![&unit_id];
        for id in service_ids {
            params_vec.push(id);
        }

        self.counter.record();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_vec.as_slice(), |row| {
                Ok(RawOverrideRow {
                    id: row.get(0)?,
                    service_id: row.get(1)?,
                    unit_id: row.get(2)?,
                    kind: row.get(3)?,
                    target_value: row.get(4)?,
                    validity_start: row.get(5)?,
                    validity_end: row.get(6)?,
                    active: row.get(7)?,
                })
            })?
            .collect::<SqliteResult<Vec<RawOverrideRow>>>()?;

        Ok(rows
            .into_iter()
            .filter_map(Self::convert_row)
            .filter(|o| o.interval_contains(reference_date))
            .collect())
    }

    /// 行转换；类型或日期无法解析的行跳过并告警，不影响其他服务
    fn convert_row(row: RawOverrideRow) -> Option<TargetOverride> {
        let Some(kind) = OverrideKind::parse(&row.kind) else {
            tracing::warn!(
                override_id = row.id,
                service_id = row.service_id,
                kind = %row.kind,
                "未知覆盖类型，已跳过"
            );
            return None;
        };

        let start = parse_optional_date("validity_start", row.validity_start);
        let end = parse_optional_date("validity_end", row.validity_end);
        let (validity_start, validity_end) = match (start, end) {
            (Ok(start), Ok(end)) => (start, end),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(
                    override_id = row.id,
                    service_id = row.service_id,
                    error = %e,
                    "覆盖有效期无法解析，已跳过"
                );
                return None;
            }
        };

        Some(TargetOverride {
            id: row.id,
            service_id: row.service_id,
            unit_id: row.unit_id,
            kind,
            target_value: row.target_value,
            validity_start,
            validity_end,
            active: row.active != 0,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: &str, start: Option<&str>, end: Option<&str>) -> RawOverrideRow {
        RawOverrideRow {
            id: 9,
            service_id: 11,
            unit_id: 1,
            kind: kind.to_string(),
            target_value: 40,
            validity_start: start.map(str::to_string),
            validity_end: end.map(str::to_string),
            active: 1,
        }
    }

    #[test]
    fn test_convert_row_accepts_clean_row() {
        let o = TargetOverrideRepository::convert_row(raw("PDT", Some("2024-01-01"), None)).unwrap();
        assert_eq!(o.kind, OverrideKind::Pdt);
        assert_eq!(o.validity_start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(o.validity_end, None);
    }

    #[test]
    fn test_convert_row_skips_dirty_rows() {
        assert!(TargetOverrideRepository::convert_row(raw("XYZ", None, None)).is_none());
        assert!(TargetOverrideRepository::convert_row(raw("PDT", Some("01/02/2024"), None)).is_none());
        assert!(TargetOverrideRepository::convert_row(raw("META", None, Some("2024-3-1"))).is_none());
    }
}
