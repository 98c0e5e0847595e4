// ==========================================
// 医院产能看板 - 报表配置
// ==========================================

use crate::domain::types::DataSourceKind;
use crate::engine::group_assembler::DEFAULT_UNGROUPED_COLOR;
use crate::i18n::DEFAULT_LOCALE;
use serde::{Deserialize, Serialize};

/// 报表配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// 允许请求的最小年份
    pub min_year: i32,
    /// 允许请求的最大年份
    pub max_year: i32,
    /// 数据源（由展示层显式选择）
    pub data_source: DataSourceKind,
    /// "未分组" 桶的颜色
    pub ungrouped_color: String,
    /// 展示语言
    pub locale: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            min_year: 2020,
            max_year: 2030,
            data_source: DataSourceKind::Real,
            ungrouped_color: DEFAULT_UNGROUPED_COLOR.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl ReportConfig {
    /// 年份是否在允许范围内
    pub fn year_in_range(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.data_source, DataSourceKind::Real);
        assert_eq!(config.ungrouped_color, "#6c757d");
        assert!(config.year_in_range(2020));
        assert!(config.year_in_range(2030));
        assert!(!config.year_in_range(2031));
    }
}
