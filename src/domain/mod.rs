// ==========================================
// 医院产能看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、报表结构
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod production;
pub mod report;
pub mod service;
pub mod types;

// 重导出核心类型
pub use production::{DailyExecutionRecord, TargetOverride, WeekdayCapacityEntry, WeeklyCapacity};
pub use report::{
    DailyMetric, GroupReport, GroupTotals, MonthlyAggregate, ProductivityReport, ServiceReport,
    UnitSummary,
};
pub use service::{Service, ServiceGroup, Unit};
pub use types::{DataSourceKind, OverrideKind, ReportPeriod, TargetSource, Weekday};
