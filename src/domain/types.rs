// ==========================================
// 医院产能看板 - 领域类型定义
// ==========================================
// 星期枚举 / 数据源类型 / 目标来源 / 报表周期
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 星期 (Weekday)
// ==========================================
// 封闭枚举: 所有星期标签在进入对账前必须归一到这 7 个值
// 序列化格式: 小写无重音的葡语全称 (与归一化同义词表一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "domingo")]
    Sunday,
    #[serde(rename = "segunda-feira")]
    Monday,
    #[serde(rename = "terca-feira")]
    Tuesday,
    #[serde(rename = "quarta-feira")]
    Wednesday,
    #[serde(rename = "quinta-feira")]
    Thursday,
    #[serde(rename = "sexta-feira")]
    Friday,
    #[serde(rename = "sabado")]
    Saturday,
}

impl Weekday {
    /// 按 Sunday..Saturday 顺序排列
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// 规范名称（归一化器的输出值，也是同义词表中的键）
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Weekday::Sunday => "domingo",
            Weekday::Monday => "segunda-feira",
            Weekday::Tuesday => "terca-feira",
            Weekday::Wednesday => "quarta-feira",
            Weekday::Thursday => "quinta-feira",
            Weekday::Friday => "sexta-feira",
            Weekday::Saturday => "sabado",
        }
    }

    /// 0 = Sunday .. 6 = Saturday
    pub fn index(&self) -> usize {
        match self {
            Weekday::Sunday => 0,
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
        }
    }

    /// 周一至周五
    pub fn is_business_day(&self) -> bool {
        !matches!(self, Weekday::Saturday | Weekday::Sunday)
    }

    /// i18n 键（weekday.monday 等）
    pub fn i18n_key(&self) -> &'static str {
        match self {
            Weekday::Sunday => "weekday.sunday",
            Weekday::Monday => "weekday.monday",
            Weekday::Tuesday => "weekday.tuesday",
            Weekday::Wednesday => "weekday.wednesday",
            Weekday::Thursday => "weekday.thursday",
            Weekday::Friday => "weekday.friday",
            Weekday::Saturday => "weekday.saturday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(value: chrono::Weekday) -> Self {
        match value {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

// ==========================================
// 数据源类型 (Data Source Kind)
// ==========================================
// 由调用方显式选择，聚合逻辑内部从不自行切换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSourceKind {
    Real,      // SQLite 真实数据
    Synthetic, // 演示用合成数据
}

impl DataSourceKind {
    /// 解析配置值（大小写不敏感），无法识别返回 None
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "REAL" => Some(DataSourceKind::Real),
            "SYNTHETIC" => Some(DataSourceKind::Synthetic),
            _ => None,
        }
    }
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceKind::Real => write!(f, "REAL"),
            DataSourceKind::Synthetic => write!(f, "SYNTHETIC"),
        }
    }
}

// ==========================================
// 目标覆盖类型 (Override Kind)
// ==========================================
// PDT: 严格有效期区间覆盖
// META: active 标记 + 自身有效期的覆盖
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverrideKind {
    Pdt,
    Meta,
}

impl OverrideKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "PDT" => Some(OverrideKind::Pdt),
            "META" => Some(OverrideKind::Meta),
            _ => None,
        }
    }
}

impl fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideKind::Pdt => write!(f, "PDT"),
            OverrideKind::Meta => write!(f, "META"),
        }
    }
}

// ==========================================
// 目标来源 (Target Source)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind", content = "override_id")]
pub enum TargetSource {
    Pdt(i64),  // 区间覆盖
    Meta(i64), // active 标记覆盖
    Pactuado,  // 服务静态 pactuado
    None,      // 无目标 (目标 = 0)
}

// ==========================================
// 报表周期 (Report Period)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub year: i32,
    pub month: u32,
}

impl ReportPeriod {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
