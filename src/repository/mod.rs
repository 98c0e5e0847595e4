// ==========================================
// 医院产能看板 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod capacity_repo;
pub mod error;
pub mod execution_repo;
pub mod service_repo;
pub mod sql_utils;
pub mod target_repo;

// 重导出核心仓储
pub use capacity_repo::WeekdayCapacityRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use execution_repo::DailyExecutionRepository;
pub use service_repo::ServiceRepository;
pub use sql_utils::QueryCounter;
pub use target_repo::TargetOverrideRepository;
