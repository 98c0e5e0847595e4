// ==========================================
// 医院产能看板 - 指标计算
// ==========================================
// 百分比规则:
// - 分母 > 0: min(100, 分子 / 分母 * 100)，下限 0
// - 分母 <= 0: 0（不做除零）
// 单元/分组平均: 仅对目标 > 0 的服务取算术平均
// ==========================================

use crate::domain::report::{DailyMetric, GroupTotals, MonthlyAggregate, ServiceReport, UnitSummary};
use crate::engine::target_resolver::ResolvedTarget;

/// 百分比（钳制到 [0, 100]）
pub fn clamped_percent(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    let percent = numerator as f64 / denominator as f64 * 100.0;
    percent.clamp(0.0, 100.0)
}

/// 生产率 = 执行 / 目标
pub fn productivity_percent(executed: i64, target: i64) -> f64 {
    clamped_percent(executed, target)
}

/// 预约占用率 = 预约 / agenda 产能
pub fn scheduled_percent(scheduled: i64, contracted: i64) -> f64 {
    clamped_percent(scheduled, contracted)
}

/// 日目标
///
/// 分母为有产能的天数；服务没有任何产能数据时改用当月工作日数
pub fn daily_target(target: i64, daily_metrics: &[DailyMetric], business_days: u32) -> f64 {
    if target <= 0 {
        return 0.0;
    }
    let capacity_days = daily_metrics.iter().filter(|m| m.contracted > 0).count() as u32;
    let denominator = if capacity_days > 0 {
        capacity_days
    } else {
        business_days
    };
    if denominator == 0 {
        return 0.0;
    }
    target as f64 / denominator as f64
}

/// 单服务月度汇总
pub fn monthly_aggregate(
    daily_metrics: &[DailyMetric],
    target: ResolvedTarget,
    business_days: u32,
) -> MonthlyAggregate {
    let contracted: i64 = daily_metrics.iter().map(|m| m.contracted).sum();
    let scheduled: i64 = daily_metrics.iter().map(|m| m.scheduled).sum();
    let executed: i64 = daily_metrics.iter().map(|m| m.executed).sum();

    MonthlyAggregate {
        contracted,
        scheduled,
        executed,
        target: target.value,
        target_source: target.source,
        productivity_percent: productivity_percent(executed, target.value),
        scheduled_percent: scheduled_percent(scheduled, contracted),
        daily_target: daily_target(target.value, daily_metrics, business_days),
    }
}

/// 目标 > 0 的服务的生产率平均值；无此类服务时为 0
pub fn mean_productivity<'a, I>(aggregates: I) -> (f64, usize)
where
    I: IntoIterator<Item = &'a MonthlyAggregate>,
{
    let (sum, count) = aggregates
        .into_iter()
        .filter(|a| a.target > 0)
        .fold((0.0, 0usize), |(sum, count), a| (sum + a.productivity_percent, count + 1));

    if count == 0 {
        (0.0, 0)
    } else {
        (sum / count as f64, count)
    }
}

/// 分组汇总
pub fn group_totals(services: &[ServiceReport]) -> GroupTotals {
    let (productivity_percent, _) = mean_productivity(services.iter().map(|s| &s.totals));
    GroupTotals {
        contracted: services.iter().map(|s| s.totals.contracted).sum(),
        scheduled: services.iter().map(|s| s.totals.scheduled).sum(),
        executed: services.iter().map(|s| s.totals.executed).sum(),
        target: services.iter().map(|s| s.totals.target).sum(),
        productivity_percent,
    }
}

/// 单元汇总
pub fn unit_summary<'a, I>(services: I) -> UnitSummary
where
    I: IntoIterator<Item = &'a ServiceReport>,
{
    let services: Vec<&ServiceReport> = services.into_iter().collect();
    let (productivity_percent, services_with_target) =
        mean_productivity(services.iter().map(|s| &s.totals));

    UnitSummary {
        service_count: services.len(),
        services_with_target,
        contracted: services.iter().map(|s| s.totals.contracted).sum(),
        scheduled: services.iter().map(|s| s.totals.scheduled).sum(),
        executed: services.iter().map(|s| s.totals.executed).sum(),
        target: services.iter().map(|s| s.totals.target).sum(),
        productivity_percent,
    }
}
