// ==========================================
// 医院产能看板 - 数据源能力
// ==========================================
// 两种实现，由调用方显式选择:
// - RealStore: SQLite 仓储
// - SyntheticStore: 确定性的演示数据
// 聚合逻辑从不自行探测数据并切换数据源
// ==========================================

pub mod real_store;
pub mod synthetic_store;

use crate::domain::production::{DailyExecutionRecord, TargetOverride, WeekdayCapacityEntry};
use crate::domain::service::{Service, ServiceGroup, Unit};
use crate::domain::types::{DataSourceKind, ReportPeriod};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

pub use real_store::RealStore;
pub use synthetic_store::SyntheticStore;

/// 报表数据源
///
/// 每个方法对应一条查询；批量方法一次覆盖整个服务集合。
#[async_trait]
pub trait ProductivityDataSource: Send + Sync {
    /// 数据源类型
    fn kind(&self) -> DataSourceKind;

    /// 已发出的查询总数（用于验证查询数上界）
    fn queries_issued(&self) -> u64;

    async fn list_units(&self) -> RepositoryResult<Vec<Unit>>;

    async fn find_unit(&self, unit_id: i64) -> RepositoryResult<Option<Unit>>;

    /// 单元下的服务（按名称排序）
    async fn find_services(&self, unit_id: i64) -> RepositoryResult<Vec<Service>>;

    /// 启用的服务分组
    async fn find_groups(&self) -> RepositoryResult<Vec<ServiceGroup>>;

    /// 一组服务在指定月份的每日执行记录（单条查询）
    async fn find_daily_executions(
        &self,
        unit_id: i64,
        service_ids: &[i64],
        period: ReportPeriod,
    ) -> RepositoryResult<Vec<DailyExecutionRecord>>;

    /// 一组服务的星期产能条目（单条查询，原始标签）
    async fn find_weekday_capacity(
        &self,
        unit_id: i64,
        service_ids: &[i64],
    ) -> RepositoryResult<Vec<WeekdayCapacityEntry>>;

    /// 一组服务在参考日期有效的目标覆盖（单条查询）
    async fn find_target_overrides(
        &self,
        unit_id: i64,
        service_ids: &[i64],
        reference_date: NaiveDate,
    ) -> RepositoryResult<Vec<TargetOverride>>;
}

/// 共享数据源句柄
pub type SharedDataSource = Arc<dyn ProductivityDataSource>;
