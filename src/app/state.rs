// ==========================================
// 医院产能看板 - 应用状态
// ==========================================
// 职责: 依赖注入，所有组件在启动时创建一次
// 数据源选择: 只在这里根据配置决定 RealStore / SyntheticStore
// ==========================================

use std::sync::Arc;

use crate::api::DashboardApi;
use crate::config::{ConfigManager, ReportConfig};
use crate::config::config_manager::env_keys;
use crate::datasource::{RealStore, SharedDataSource, SyntheticStore};
use crate::db::{open_sqlite_connection, warn_if_schema_outdated};
use crate::domain::types::DataSourceKind;
use crate::engine::{ProductivityEngine, UngroupedBucket};
use crate::i18n::ungrouped_label;

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 生效的报表配置
    pub config: ReportConfig,

    /// 看板 API
    pub dashboard_api: Arc<DashboardApi>,
}

impl AppState {
    /// 创建应用状态（从 config_kv + 环境变量读取配置）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let config = match ConfigManager::new(&db_path).and_then(|m| m.load_report_config()) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("读取报表配置失败，使用默认配置: {}", e);
                ReportConfig::default()
            }
        };

        Self::with_config(db_path, config)
    }

    /// 使用指定配置创建应用状态
    pub fn with_config(db_path: String, config: ReportConfig) -> Result<Self, String> {
        let source: SharedDataSource = match config.data_source {
            DataSourceKind::Real => {
                match open_sqlite_connection(&db_path) {
                    Ok(conn) => {
                        if let Err(e) = warn_if_schema_outdated(&conn) {
                            tracing::warn!("schema_version 读取失败(将继续启动): {}", e);
                        }
                    }
                    Err(e) => return Err(format!("无法打开数据库: {}", e)),
                }
                Arc::new(
                    RealStore::open(&db_path)
                        .map_err(|e| format!("无法创建RealStore: {}", e))?,
                )
            }
            DataSourceKind::Synthetic => {
                tracing::warn!("使用合成数据源 (SYNTHETIC)，报表数据仅供演示");
                Arc::new(SyntheticStore::new())
            }
        };

        let engine = Arc::new(ProductivityEngine::new(source).with_ungrouped(
            UngroupedBucket::new(ungrouped_label(&config.locale), config.ungrouped_color.clone()),
        ));
        let dashboard_api = Arc::new(DashboardApi::new(engine, config.clone()));

        tracing::info!(data_source = %config.data_source, locale = %config.locale, "AppState初始化完成");

        Ok(Self {
            db_path,
            config,
            dashboard_api,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

// ==========================================
// 默认数据库路径辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 HOSPITAL_PRODUCTIVITY_DB_PATH（非空时）
/// - 否则: 用户数据目录/hospital-productivity/hospital_productivity.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(env_keys::DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./hospital_productivity.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("hospital-productivity");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("hospital_productivity.db");
        }
    }

    path.to_string_lossy().to_string()
}
