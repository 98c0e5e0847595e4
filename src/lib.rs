// ==========================================
// 医院产能看板 - 核心库
// ==========================================
// 技术栈: Rust + SQLite (只读报表)
// 核心: 月度生产率聚合引擎
// - 批量加载（查询数与服务数量无关）
// - 日历对账（执行 / 星期产能 / 目标覆盖）
// - 生产率指标（钳制 + 除零规则）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 数据源层 - RealStore / SyntheticStore
pub mod datasource;

// 引擎层 - 聚合规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计（SQL 计数 / 慢 SQL）
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 依赖组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DataSourceKind, OverrideKind, ReportPeriod, TargetSource, Weekday};

// 领域实体
pub use domain::{
    DailyExecutionRecord, DailyMetric, GroupReport, MonthlyAggregate, ProductivityReport,
    Service, ServiceGroup, ServiceReport, TargetOverride, Unit, WeekdayCapacityEntry,
};

// 数据源
pub use datasource::{ProductivityDataSource, RealStore, SharedDataSource, SyntheticStore};

// 引擎
pub use engine::{BatchLoader, EngineError, MonthCalendar, ProductivityEngine};

// API
pub use api::{ApiError, DashboardApi, ReportRequest};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Painel de Produtividade Hospitalar";
