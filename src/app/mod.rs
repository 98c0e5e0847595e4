// ==========================================
// 医院产能看板 - 应用层
// ==========================================
// 职责: 读取配置、按配置显式选择数据源、组装 API
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
