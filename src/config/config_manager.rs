// ==========================================
// 医院产能看板 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、环境变量覆写
// 存储: config_kv 表 (key-value + scope)
// 缺失或格式错误的配置回退默认值并记录告警
// ==========================================

use crate::config::report_config::ReportConfig;
use crate::db::open_sqlite_connection;
use crate::domain::types::DataSourceKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> RepositoryResult<HashMap<String, String>> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    /// 读取报表配置（数据库 + 进程环境变量覆写）
    pub fn load_report_config(&self) -> RepositoryResult<ReportConfig> {
        self.load_report_config_with_env(|key| std::env::var(key).ok())
    }

    /// 读取报表配置，环境变量通过 env 查询
    ///
    /// # 参数
    /// - env: 环境变量读取函数（测试中可替换）
    pub fn load_report_config_with_env<F>(&self, env: F) -> RepositoryResult<ReportConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ReportConfig::default();
        let mut config = defaults.clone();

        config.min_year = self.get_i32_or_default(config_keys::MIN_YEAR, defaults.min_year)?;
        config.max_year = self.get_i32_or_default(config_keys::MAX_YEAR, defaults.max_year)?;
        if config.min_year > config.max_year {
            tracing::warn!(
                min_year = config.min_year,
                max_year = config.max_year,
                "年份范围配置无效，使用默认值"
            );
            config.min_year = defaults.min_year;
            config.max_year = defaults.max_year;
        }

        let data_source_raw = env(env_keys::DATA_SOURCE)
            .filter(|v| !v.trim().is_empty())
            .or(self.get_global_config_value(config_keys::DATA_SOURCE)?);
        if let Some(raw) = data_source_raw {
            match DataSourceKind::parse(&raw) {
                Some(kind) => config.data_source = kind,
                None => tracing::warn!(value = %raw, "数据源配置无法识别，使用 REAL"),
            }
        }

        if let Some(color) = self.get_global_config_value(config_keys::UNGROUPED_COLOR)? {
            if is_hex_color(&color) {
                config.ungrouped_color = color.trim().to_string();
            } else {
                tracing::warn!(value = %color, "未分组颜色配置无效，使用默认值");
            }
        }

        if let Some(locale) = self.get_global_config_value(config_keys::LOCALE)? {
            let locale = locale.trim();
            if SUPPORTED_LOCALES.contains(&locale) {
                config.locale = locale.to_string();
            } else {
                tracing::warn!(value = %locale, "语言配置不受支持，使用默认值");
            }
        }

        Ok(config)
    }

    fn get_i32_or_default(&self, key: &str, default: i32) -> RepositoryResult<i32> {
        let value = match self.get_global_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };
        match value.trim().parse::<i32>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(key, value = %value, default, "配置值无法解析为整数，使用默认值");
                Ok(default)
            }
        }
    }
}

/// 支持的展示语言
const SUPPORTED_LOCALES: &[&str] = &["pt-BR", "en"];

fn is_hex_color(value: &str) -> bool {
    let value = value.trim();
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 请求年份范围
    pub const MIN_YEAR: &str = "report_min_year";
    pub const MAX_YEAR: &str = "report_max_year";

    // 数据源
    pub const DATA_SOURCE: &str = "report_data_source";

    // 展示
    pub const UNGROUPED_COLOR: &str = "report_ungrouped_color";
    pub const LOCALE: &str = "report_locale";
}

/// 环境变量
pub mod env_keys {
    pub const DATA_SOURCE: &str = "HOSPITAL_PRODUCTIVITY_DATA_SOURCE";
    pub const DB_PATH: &str = "HOSPITAL_PRODUCTIVITY_DB_PATH";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = manager().load_report_config_with_env(|_| None).unwrap();
        assert_eq!(config, ReportConfig::default());
    }

    #[test]
    fn test_reads_values_from_config_kv() {
        let manager = manager();
        manager.set_global_config_value(config_keys::MIN_YEAR, "2018").unwrap();
        manager.set_global_config_value(config_keys::DATA_SOURCE, "synthetic").unwrap();
        manager.set_global_config_value(config_keys::UNGROUPED_COLOR, "#123abc").unwrap();
        manager.set_global_config_value(config_keys::LOCALE, "en").unwrap();

        let config = manager.load_report_config_with_env(|_| None).unwrap();
        assert_eq!(config.min_year, 2018);
        assert_eq!(config.max_year, 2030);
        assert_eq!(config.data_source, DataSourceKind::Synthetic);
        assert_eq!(config.ungrouped_color, "#123abc");
        assert_eq!(config.locale, "en");
        assert_eq!(manager.get_config_snapshot().unwrap().len(), 4);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let manager = manager();
        manager.set_global_config_value(config_keys::MAX_YEAR, "abc").unwrap();
        manager.set_global_config_value(config_keys::DATA_SOURCE, "mock").unwrap();
        manager.set_global_config_value(config_keys::UNGROUPED_COLOR, "grey").unwrap();
        manager.set_global_config_value(config_keys::LOCALE, "fr").unwrap();

        let config = manager.load_report_config_with_env(|_| None).unwrap();
        assert_eq!(config, ReportConfig::default());
    }

    #[test]
    fn test_env_overrides_data_source() {
        let manager = manager();
        manager.set_global_config_value(config_keys::DATA_SOURCE, "REAL").unwrap();

        let config = manager
            .load_report_config_with_env(|key| {
                (key == env_keys::DATA_SOURCE).then(|| "SYNTHETIC".to_string())
            })
            .unwrap();
        assert_eq!(config.data_source, DataSourceKind::Synthetic);
    }

    #[test]
    fn test_inverted_year_range_falls_back() {
        let manager = manager();
        manager.set_global_config_value(config_keys::MIN_YEAR, "2035").unwrap();
        let config = manager.load_report_config_with_env(|_| None).unwrap();
        assert_eq!((config.min_year, config.max_year), (2020, 2030));
    }
}
