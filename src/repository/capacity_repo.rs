// ==========================================
// 医院产能看板 - 星期产能 (agenda) 数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（标签归一化在引擎层）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::production::WeekdayCapacityEntry;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{build_in_clause, QueryCounter};
use rusqlite::{Connection, Result as SqliteResult, ToSql};
use std::sync::{Arc, Mutex};

/// 星期产能仓储
/// 职责: 读取 weekday_capacity 表（原始标签，不做归一化）
pub struct WeekdayCapacityRepository {
    conn: Arc<Mutex<Connection>>,
    counter: QueryCounter,
}

impl WeekdayCapacityRepository {
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

    /// 批量查询一组服务的星期产能条目
    ///
    /// # 参数
    /// - unit_id: 单元 ID
    /// - service_ids: 服务 ID 集合（为空时不发出查询）
    ///
    /// # 返回
    /// - Ok(Vec<WeekdayCapacityEntry>): 按 service_id, id 排序
    pub fn find_by_services(
        &self,
        unit_id: i64,
        service_ids: &[i64],
    ) -> RepositoryResult<Vec<WeekdayCapacityEntry>> {
        if service_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT unit_id, service_id, weekday_label, consultations_per_day
            FROM weekday_capacity
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
        let entries = stmt
            .query_map(params_vec.as_slice(), |row| {
                Ok(WeekdayCapacityEntry {
                    unit_id: row.get(0)?,
                    service_id: row.get(1)?,
                    weekday_label: row.get(2)?,
                    consultations_per_day: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<WeekdayCapacityEntry>>>()?;

        Ok(entries)
    }
}
