// ==========================================
// 医院产能看板 - 生产数据记录
// ==========================================
// 三类异构数据源:
// - daily_execution: 按日 (day-of-month) 记录
// - weekday_capacity: 按星期标签 (可带班次后缀) 记录
// - target_override: 按有效期区间记录
// ==========================================

use crate::domain::types::{OverrideKind, Weekday};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DailyExecutionRecord - 每日执行记录
// ==========================================
// 无活动的日期没有记录（缺失 = 0）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyExecutionRecord {
    pub unit_id: i64,
    pub service_id: i64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub scheduled_count: i64,
    pub executed_count: i64,
    pub executed_walkin_count: i64,
}

impl DailyExecutionRecord {
    /// 执行总数 = 预约执行 + 现场 (walk-in) 执行
    pub fn total_executed(&self) -> i64 {
        self.executed_count + self.executed_walkin_count
    }
}

// ==========================================
// WeekdayCapacityEntry - 星期产能条目
// ==========================================
// weekday_label 为原始自由文本，例如 "segunda-feira-manhã" / "Sábado tarde"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayCapacityEntry {
    pub unit_id: i64,
    pub service_id: i64,
    pub weekday_label: String,
    pub consultations_per_day: i64,
}

// ==========================================
// WeeklyCapacity - 归一化后的星期产能
// ==========================================
// 同一星期的上午/下午条目累加
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCapacity {
    per_weekday: [i64; 7],
    pub unmatched_labels: Vec<String>,
}

impl WeeklyCapacity {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加某星期的产能（负值按 0 处理）
    pub fn add(&mut self, weekday: Weekday, consultations: i64) {
        self.per_weekday[weekday.index()] += consultations.max(0);
    }

    /// 记录无法归一的标签（视为该条目无产能）
    pub fn add_unmatched(&mut self, label: impl Into<String>) {
        self.unmatched_labels.push(label.into());
    }

    pub fn for_weekday(&self, weekday: Weekday) -> i64 {
        self.per_weekday[weekday.index()]
    }

    /// 是否存在任何产能数据
    pub fn is_empty(&self) -> bool {
        self.per_weekday.iter().all(|v| *v == 0)
    }
}

// ==========================================
// TargetOverride - 目标覆盖 (meta / PDT)
// ==========================================
// 有效期边界为 NULL 时视为开区间
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOverride {
    pub id: i64,
    pub service_id: i64,
    pub unit_id: i64,
    pub kind: OverrideKind,
    pub target_value: i64,
    pub validity_start: Option<NaiveDate>,
    pub validity_end: Option<NaiveDate>,
    pub active: bool,
}

impl TargetOverride {
    /// 有效期区间 [start, end] 是否包含指定日期
    pub fn interval_contains(&self, date: NaiveDate) -> bool {
        let after_start = self.validity_start.map_or(true, |start| start <= date);
        let before_end = self.validity_end.map_or(true, |end| date <= end);
        after_start && before_end
    }
}
