// ==========================================
// 医院产能看板 - 引擎层
// ==========================================
// 依赖顺序（叶子在前）:
// calendar / weekday → batch_loader → reconciler
// → target_resolver → metrics → group_assembler → productivity
// ==========================================
// 职责: 聚合规则，不拼 SQL；数据只经由 ProductivityDataSource 获取
// ==========================================

pub mod batch_loader;
pub mod calendar;
pub mod error;
pub mod group_assembler;
pub mod metrics;
pub mod productivity;
pub mod reconciler;
pub mod target_resolver;
pub mod weekday;

// 重导出核心组件
pub use batch_loader::{BatchLoader, MonthlyBatch};
pub use calendar::{business_day_count, days_in_month, weekday_of, MonthCalendar};
pub use error::{EngineError, EngineResult};
pub use group_assembler::{assemble_groups, UngroupedBucket, DEFAULT_UNGROUPED_COLOR};
pub use metrics::{productivity_percent, scheduled_percent};
pub use productivity::ProductivityEngine;
pub use reconciler::reconcile;
pub use target_resolver::{resolve_target, ResolvedTarget};
pub use weekday::{normalize_weekday_label, NormalizedWeekday};
