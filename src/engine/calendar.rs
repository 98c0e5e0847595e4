// ==========================================
// 医院产能看板 - 日历工具
// ==========================================
// 职责: 给定 (month, year) 的纯日期运算
// - 当月天数
// - 每日星期（公历外推）
// - 工作日（周一至周五）数量
// ==========================================
// 请求级缓存: MonthCalendar 作为值显式传入对账器，不使用进程级单例
// ==========================================

use crate::domain::types::{ReportPeriod, Weekday};
use crate::engine::error::{EngineError, EngineResult};
use chrono::{Datelike, NaiveDate};

/// 当月天数
///
/// # 错误
/// - month 不在 1..=12 时返回 InvalidDate
pub fn days_in_month(month: u32, year: i32) -> EngineResult<u32> {
    let first = first_day_of_month(month, year)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| EngineError::invalid_month(year, month))?;

    Ok((next_first - first).num_days() as u32)
}

/// 指定日期的星期
///
/// # 错误
/// - 不存在的日期（如 4 月 31 日）返回 InvalidDate
pub fn weekday_of(day: u32, month: u32, year: i32) -> EngineResult<Weekday> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::invalid_month(year, month));
    }
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|date| Weekday::from(date.weekday()))
        .ok_or_else(|| EngineError::invalid_day(year, month, day))
}

/// 当月工作日（周一至周五）数量
pub fn business_day_count(month: u32, year: i32) -> EngineResult<u32> {
    Ok(MonthCalendar::new(ReportPeriod::new(year, month))?.business_day_count())
}

/// 当月第一天
pub fn first_day_of_month(month: u32, year: i32) -> EngineResult<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::invalid_month(year, month));
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| EngineError::invalid_month(year, month))
}

// ==========================================
// MonthCalendar - 单月日历（请求级）
// ==========================================

/// 单月日历
///
/// 构造时一次性计算每日星期，之后对同一 (month, year) 的查询不再做日期运算。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCalendar {
    period: ReportPeriod,
    first_day: NaiveDate,
    weekdays: Vec<Weekday>, // index 0 = 第 1 天
}

impl MonthCalendar {
    /// 构造单月日历
    ///
    /// # 错误
    /// - month 不在 1..=12 时返回 InvalidDate
    pub fn new(period: ReportPeriod) -> EngineResult<Self> {
        let first_day = first_day_of_month(period.month, period.year)?;
        let days = days_in_month(period.month, period.year)?;

        let weekdays = first_day
            .iter_days()
            .take(days as usize)
            .map(|date| Weekday::from(date.weekday()))
            .collect();

        Ok(Self {
            period,
            first_day,
            weekdays,
        })
    }

    pub fn period(&self) -> ReportPeriod {
        self.period
    }

    /// 当月第一天（目标覆盖有效期判定的参考日）
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn days_in_month(&self) -> u32 {
        self.weekdays.len() as u32
    }

    /// 指定日的星期
    ///
    /// # 错误
    /// - day 超出 [1, days_in_month] 返回 InvalidDate
    pub fn weekday_of(&self, day: u32) -> EngineResult<Weekday> {
        day.checked_sub(1)
            .and_then(|idx| self.weekdays.get(idx as usize))
            .copied()
            .ok_or_else(|| EngineError::invalid_day(self.period.year, self.period.month, day))
    }

    /// 按日序遍历 (day, weekday)
    pub fn days(&self) -> impl Iterator<Item = (u32, Weekday)> + '_ {
        self.weekdays
            .iter()
            .enumerate()
            .map(|(idx, weekday)| (idx as u32 + 1, *weekday))
    }

    pub fn business_day_count(&self) -> u32 {
        self.weekdays.iter().filter(|w| w.is_business_day()).count() as u32
    }

    /// 某星期在当月出现的次数
    pub fn occurrences(&self, weekday: Weekday) -> u32 {
        self.weekdays.iter().filter(|w| **w == weekday).count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_february_2024() {
        assert_eq!(days_in_month(2, 2024).unwrap(), 29);
        assert_eq!(weekday_of(1, 2, 2024).unwrap(), Weekday::Thursday);
    }

    #[test]
    fn test_non_leap_february() {
        assert_eq!(days_in_month(2, 2023).unwrap(), 28);
        assert_eq!(days_in_month(2, 1900).unwrap(), 28);
        assert_eq!(days_in_month(2, 2000).unwrap(), 29);
    }

    #[test]
    fn test_days_in_month_all_months() {
        let expected = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (idx, days) in expected.iter().enumerate() {
            assert_eq!(days_in_month(idx as u32 + 1, 2025).unwrap(), *days);
        }
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(
            days_in_month(13, 2024),
            Err(EngineError::InvalidDate { month: 13, day: None, .. })
        ));
        assert!(days_in_month(0, 2024).is_err());
        assert!(MonthCalendar::new(ReportPeriod::new(2024, 0)).is_err());
    }

    #[test]
    fn test_impossible_day() {
        assert!(matches!(
            weekday_of(31, 4, 2024),
            Err(EngineError::InvalidDate { day: Some(31), .. })
        ));
        assert!(weekday_of(0, 4, 2024).is_err());
    }

    #[test]
    fn test_business_day_count() {
        // 2024-02: 29 天，周四开始 → 21 个工作日
        assert_eq!(business_day_count(2, 2024).unwrap(), 21);
        // 2025-06: 30 天，周日开始 → 21 个工作日
        assert_eq!(business_day_count(6, 2025).unwrap(), 21);
    }

    #[test]
    fn test_month_calendar_matches_free_functions() {
        let calendar = MonthCalendar::new(ReportPeriod::new(2024, 9)).unwrap();
        assert_eq!(calendar.days_in_month(), 30);
        for (day, weekday) in calendar.days() {
            assert_eq!(weekday_of(day, 9, 2024).unwrap(), weekday);
        }
        assert!(calendar.weekday_of(31).is_err());
        assert_eq!(calendar.first_day(), NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
    }

    #[test]
    fn test_occurrences() {
        // 2024-07-01 是周一，31 天 → 周一/周二/周三各 5 次
        let calendar = MonthCalendar::new(ReportPeriod::new(2024, 7)).unwrap();
        assert_eq!(calendar.occurrences(Weekday::Monday), 5);
        assert_eq!(calendar.occurrences(Weekday::Wednesday), 5);
        assert_eq!(calendar.occurrences(Weekday::Thursday), 4);
        let total: u32 = Weekday::ALL.iter().map(|w| calendar.occurrences(*w)).sum();
        assert_eq!(total, 31);
    }
}
