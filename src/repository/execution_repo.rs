// ==========================================
// 医院产能看板 - 每日执行数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 整个服务集合一次 IN 查询，不按服务循环
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::production::DailyExecutionRecord;
use crate::domain::types::ReportPeriod;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{build_in_clause, QueryCounter};
use rusqlite::{Connection, Result as SqliteResult, ToSql};
use std::sync::{Arc, Mutex};

/// 每日执行仓储
/// 职责: 读取 daily_execution 表
pub struct DailyExecutionRepository {
    conn: Arc<Mutex<Connection>>,
    counter: QueryCounter,
}

impl DailyExecutionRepository {
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

    /// 批量查询一组服务在指定月份的每日执行记录
    ///
    /// # 参数
    /// - unit_id: 单元 ID
    /// - service_ids: 服务 ID 集合（为空时不发出查询）
    /// - period: 报表年月
    ///
    /// # 返回
    /// - Ok(Vec<DailyExecutionRecord>): 按 service_id, day 排序
    /// - Err: 数据库错误
    pub fn find_by_services_in_month(
        &self,
        unit_id: i64,
        service_ids: &[i64],
        period: ReportPeriod,
    ) -> RepositoryResult<Vec<DailyExecutionRecord>> {
        if service_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT
                unit_id, service_id, year, month, day,
                scheduled_count, executed_count, executed_walkin_count
            FROM daily_execution
            WHERE unit_id = ? AND year = ? AND month = ?
              AND {}
            ORDER BY service_id, day
            "#,
            build_in_clause("service_id", service_ids.len())
        );

        let mut params_vec: Vec<&dyn ToSql> = vec![&unit_id, &period.year, &period.month];
        for id in service_ids {
            params_vec.push(id);
        }

        self.counter.record();
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_vec.as_slice(), |row| {
                Ok(DailyExecutionRecord {
                    unit_id: row.get(0)?,
                    service_id: row.get(1)?,
                    year: row.get(2)?,
                    month: row.get(3)?,
                    day: row.get(4)?,
                    scheduled_count: row.get(5)?,
                    executed_count: row.get(6)?,
                    executed_walkin_count: row.get(7)?,
                })
            })?
            .collect::<SqliteResult<Vec<DailyExecutionRecord>>>()?;

        Ok(records)
    }
}
