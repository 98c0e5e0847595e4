// ==========================================
// 医院产能看板 - 报表结构
// ==========================================
// 每次请求重新计算，不持久化、不缓存
// 输出供展示层消费: 分组 → 服务 → 每日指标 + 月度汇总
// ==========================================

use crate::domain::types::{DataSourceKind, TargetSource, Weekday};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// DailyMetric - 单服务单日指标
// ==========================================
// 不变量: day ∈ [1, days_in_month]，contracted >= 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMetric {
    pub day: u32,
    pub weekday: Weekday,
    pub contracted: i64,       // 当日 agenda 产能
    pub scheduled: i64,
    pub executed: i64,         // 含 walk-in
    pub executed_walk_in: i64,
}

// ==========================================
// MonthlyAggregate - 单服务月度汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub contracted: i64,
    pub scheduled: i64,
    pub executed: i64,
    pub target: i64,
    pub target_source: TargetSource,
    pub productivity_percent: f64, // executed / target，[0, 100]
    pub scheduled_percent: f64,    // scheduled / contracted，[0, 100]
    pub daily_target: f64,
}

// ==========================================
// ServiceReport - 服务报表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceReport {
    pub service_id: i64,
    pub service_name: String,
    pub daily_metrics: Vec<DailyMetric>,
    pub totals: MonthlyAggregate,
}

// ==========================================
// GroupTotals - 分组汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupTotals {
    pub contracted: i64,
    pub scheduled: i64,
    pub executed: i64,
    pub target: i64,
    pub productivity_percent: f64,
}

// ==========================================
// GroupReport - 分组报表
// ==========================================
// group_id = None 表示 "未分组" 合成分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupReport {
    pub group_id: Option<i64>,
    pub group_name: String,
    pub group_color: String,
    pub services: Vec<ServiceReport>,
    pub totals: GroupTotals,
}

// ==========================================
// UnitSummary - 单元汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub service_count: usize,
    pub services_with_target: usize,
    pub contracted: i64,
    pub scheduled: i64,
    pub executed: i64,
    pub target: i64,
    pub productivity_percent: f64,
}

// ==========================================
// ProductivityReport - 报表信封
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityReport {
    pub report_id: String,
    pub unit_id: i64,
    pub unit_name: Option<String>,
    pub year: i32,
    pub month: u32,
    pub days_in_month: u32,
    pub business_days: u32,
    pub data_source: DataSourceKind,
    pub groups: Vec<GroupReport>,
    pub summary: UnitSummary,
    pub generated_at: NaiveDateTime,
}

impl ProductivityReport {
    /// 遍历所有服务报表（按分组顺序）
    pub fn services(&self) -> impl Iterator<Item = &ServiceReport> {
        self.groups.iter().flat_map(|g| g.services.iter())
    }

    /// 按服务 ID 查找
    pub fn find_service(&self, service_id: i64) -> Option<&ServiceReport> {
        self.services().find(|s| s.service_id == service_id)
    }
}
