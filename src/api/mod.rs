// ==========================================
// 医院产能看板 - API 层
// ==========================================
// 职责: 请求归一化 + 报表查询 + 导出，供展示层调用
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod report_export;

// 重导出核心类型
pub use dashboard_api::{normalize_request, DashboardApi, NormalizedRequest, ReportRequest};
pub use error::{ApiError, ApiResult};
pub use report_export::{report_to_csv, write_report_csv};
