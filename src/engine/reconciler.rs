// ==========================================
// 医院产能看板 - 日历对账器
// ==========================================
// 三类异构数据 → 按日指标序列:
// - 执行记录: 按 day 键
// - 星期产能: 按 Weekday 键，展开到当月每个同星期日期
// 输出: 恰好 days_in_month 条，缺失数据补 0，从不省略
// ==========================================

use crate::domain::production::{DailyExecutionRecord, WeeklyCapacity};
use crate::domain::report::DailyMetric;
use crate::engine::calendar::MonthCalendar;

/// 对账单个服务
///
/// # 参数
/// - calendar: 请求级日历（已预计算每日星期）
/// - executions: 该服务当月执行记录（顺序无关）
/// - capacity: 该服务归一化后的星期产能（None = 无产能数据）
///
/// # 返回
/// 按 day 升序的 DailyMetric，长度 = calendar.days_in_month()
pub fn reconcile(
    calendar: &MonthCalendar,
    executions: &[DailyExecutionRecord],
    capacity: Option<&WeeklyCapacity>,
) -> Vec<DailyMetric> {
    let days = calendar.days_in_month() as usize;

    // day → (scheduled, executed, walk_in)；index 0 = 第 1 天
    let mut by_day = vec![(0i64, 0i64, 0i64); days];
    for record in executions {
        let slot = record
            .day
            .checked_sub(1)
            .and_then(|idx| by_day.get_mut(idx as usize));

        match slot {
            Some((scheduled, executed, walk_in)) => {
                // 同一天重复记录累加
                *scheduled += record.scheduled_count;
                *executed += record.total_executed();
                *walk_in += record.executed_walkin_count;
            }
            None => {
                tracing::warn!(
                    service_id = record.service_id,
                    period = %calendar.period(),
                    day = record.day,
                    "执行记录日期超出当月范围，已忽略"
                );
            }
        }
    }

    calendar
        .days()
        .zip(by_day)
        .map(|((day, weekday), (scheduled, executed, walk_in))| DailyMetric {
            day,
            weekday,
            contracted: capacity.map_or(0, |c| c.for_weekday(weekday)),
            scheduled,
            executed,
            executed_walk_in: walk_in,
        })
        .collect()
}
