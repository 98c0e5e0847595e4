// ==========================================
// 医院产能看板 - 单元/服务/分组数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::service::{Service, ServiceGroup, Unit};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::QueryCounter;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// ServiceRepository - 服务主数据仓储
// ==========================================

/// 服务主数据仓储
/// 职责: 读取 unit / service / service_group 表
pub struct ServiceRepository {
    conn: Arc<Mutex<Connection>>,
    counter: QueryCounter,
}

impl ServiceRepository {
    /// 创建新的服务仓储实例（独立连接）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            counter: QueryCounter::new(),
        }
    }

    /// 共享查询计数器
    pub fn with_counter(mut self, counter: QueryCounter) -> Self {
        self.counter = counter;
        self
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按 ID 查询单元
    ///
    /// # 返回
    /// - Ok(Some(Unit)): 找到单元
    /// - Ok(None): 未找到
    pub fn find_unit(&self, unit_id: i64) -> RepositoryResult<Option<Unit>> {
        let conn = self.get_conn()?;
        self.counter.record();

        let unit = conn
            .query_row(
                "SELECT id, name FROM unit WHERE id = ?1",
                params![unit_id],
                |row| {
                    Ok(Unit {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(unit)
    }

    /// 查询所有单元（按名称排序）
    pub fn list_units(&self) -> RepositoryResult<Vec<Unit>> {
        let conn = self.get_conn()?;
        self.counter.record();

        let mut stmt = conn.prepare("SELECT id, name FROM unit ORDER BY name, id")?;
        let units = stmt
            .query_map([], |row| {
                Ok(Unit {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<Unit>>>()?;

        Ok(units)
    }

    /// 查询单元下的所有服务（按名称排序）
    ///
    /// static_target 为 NULL 时视为 0
    pub fn find_by_unit(&self, unit_id: i64) -> RepositoryResult<Vec<Service>> {
        let conn = self.get_conn()?;
        self.counter.record();

        let mut stmt = conn.prepare(
            r#"
            SELECT id, unit_id, group_id, name, COALESCE(static_target, 0)
            FROM service
            WHERE unit_id = ?1
            ORDER BY name, id
            "#,
        )?;

        let services = stmt
            .query_map(params![unit_id], |row| {
                Ok(Service {
                    id: row.get(0)?,
                    unit_id: row.get(1)?,
                    group_id: row.get(2)?,
                    name: row.get(3)?,
                    static_target: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<Service>>>()?;

        Ok(services)
    }

    /// 查询所有启用的服务分组
    ///
    /// color 为 NULL 时返回空串，由分组组装器填充默认色
    pub fn find_active_groups(&self) -> RepositoryResult<Vec<ServiceGroup>> {
        let conn = self.get_conn()?;
        self.counter.record();

        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, COALESCE(color, '')
            FROM service_group
            WHERE active = 1
            ORDER BY name, id
            "#,
        )?;

        let groups = stmt
            .query_map([], |row| {
                Ok(ServiceGroup {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    color: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<ServiceGroup>>>()?;

        Ok(groups)
    }
}
