// ==========================================
// 医院产能看板 - 配置层
// ==========================================
// 存储: config_kv 表（scope_id = 'global'）
// 覆写: 环境变量优先于数据库配置
// 读取时机: 构建 AppState 时读取一次，不做热更新
// ==========================================

pub mod config_manager;
pub mod report_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use report_config::ReportConfig;
