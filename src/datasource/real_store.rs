// ==========================================
// 医院产能看板 - RealStore (SQLite 数据源)
// ==========================================
// 每个仓储持有独立连接，批量加载的两条查询可在阻塞线程上并发执行
// 所有仓储共享一个 QueryCounter
// ==========================================

use crate::datasource::ProductivityDataSource;
use crate::domain::production::{DailyExecutionRecord, TargetOverride, WeekdayCapacityEntry};
use crate::domain::service::{Service, ServiceGroup, Unit};
use crate::domain::types::{DataSourceKind, ReportPeriod};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{
    DailyExecutionRepository, QueryCounter, ServiceRepository, TargetOverrideRepository,
    WeekdayCapacityRepository,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// SQLite 数据源
pub struct RealStore {
    service_repo: Arc<ServiceRepository>,
    execution_repo: Arc<DailyExecutionRepository>,
    capacity_repo: Arc<WeekdayCapacityRepository>,
    target_repo: Arc<TargetOverrideRepository>,
    counter: QueryCounter,
}

impl RealStore {
    /// 打开数据库，每个仓储一条独立连接
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let counter = QueryCounter::new();

        Ok(Self {
            service_repo: Arc::new(ServiceRepository::new(db_path)?.with_counter(counter.clone())),
            execution_repo: Arc::new(
                DailyExecutionRepository::new(db_path)?.with_counter(counter.clone()),
            ),
            capacity_repo: Arc::new(
                WeekdayCapacityRepository::new(db_path)?.with_counter(counter.clone()),
            ),
            target_repo: Arc::new(
                TargetOverrideRepository::new(db_path)?.with_counter(counter.clone()),
            ),
            counter,
        })
    }

    /// 从共享连接创建（查询在连接锁上串行）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        let counter = QueryCounter::new();

        Self {
            service_repo: Arc::new(
                ServiceRepository::from_connection(conn.clone()).with_counter(counter.clone()),
            ),
            execution_repo: Arc::new(
                DailyExecutionRepository::from_connection(conn.clone())
                    .with_counter(counter.clone()),
            ),
            capacity_repo: Arc::new(
                WeekdayCapacityRepository::from_connection(conn.clone())
                    .with_counter(counter.clone()),
            ),
            target_repo: Arc::new(
                TargetOverrideRepository::from_connection(conn).with_counter(counter.clone()),
            ),
            counter,
        }
    }
}

/// 在阻塞线程池上执行同步仓储调用
async fn run_blocking<T, F>(f: F) -> RepositoryResult<T>
where
    F: FnOnce() -> RepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RepositoryError::InternalError(format!("阻塞查询任务失败: {}", e)))?
}

#[async_trait]
impl ProductivityDataSource for RealStore {
    fn kind(&self) -> DataSourceKind {
        DataSourceKind::Real
    }

    fn queries_issued(&self) -> u64 {
        self.counter.get()
    }

    async fn list_units(&self) -> RepositoryResult<Vec<Unit>> {
        let repo = self.service_repo.clone();
        run_blocking(move || repo.list_units()).await
    }

    async fn find_unit(&self, unit_id: i64) -> RepositoryResult<Option<Unit>> {
        let repo = self.service_repo.clone();
        run_blocking(move || repo.find_unit(unit_id)).await
    }

    async fn find_services(&self, unit_id: i64) -> RepositoryResult<Vec<Service>> {
        let repo = self.service_repo.clone();
        run_blocking(move || repo.find_by_unit(unit_id)).await
    }

    async fn find_groups(&self) -> RepositoryResult<Vec<ServiceGroup>> {
        let repo = self.service_repo.clone();
        run_blocking(move || repo.find_active_groups()).await
    }

    async fn find_daily_executions(
        &self,
        unit_id: i64,
        service_ids: &[i64],
        period: ReportPeriod,
    ) -> RepositoryResult<Vec<DailyExecutionRecord>> {
        let repo = self.execution_repo.clone();
        let ids = service_ids.to_vec();
        run_blocking(move || repo.find_by_services_in_month(unit_id, &ids, period)).await
    }

    async fn find_weekday_capacity(
        &self,
        unit_id: i64,
        service_ids: &[i64],
    ) -> RepositoryResult<Vec<WeekdayCapacityEntry>> {
        let repo = self.capacity_repo.clone();
        let ids = service_ids.to_vec();
        run_blocking(move || repo.find_by_services(unit_id, &ids)).await
    }

    async fn find_target_overrides(
        &self,
        unit_id: i64,
        service_ids: &[i64],
        reference_date: NaiveDate,
    ) -> RepositoryResult<Vec<TargetOverride>> {
        let repo = self.target_repo.clone();
        let ids = service_ids.to_vec();
        run_blocking(move || repo.find_effective_for_services(unit_id, &ids, reference_date))
            .await
    }
}
