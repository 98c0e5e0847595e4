// ==========================================
// 医院产能看板 - 批量加载器
// ==========================================
// 替代旧的 "每个服务一轮查询" 循环 (N+1)
// 输入: (unit_id, service_ids, 年月)
// 输出: 按 service_id 分组的
//   - 每日执行序列
//   - 归一化 + 上下午累加后的星期产能
// 查询数: 与服务数量无关，最多 2 条；服务集合为空时 0 条
// ==========================================

use crate::datasource::ProductivityDataSource;
use crate::domain::production::{DailyExecutionRecord, WeekdayCapacityEntry, WeeklyCapacity};
use crate::domain::types::ReportPeriod;
use crate::engine::error::EngineResult;
use crate::engine::weekday::{normalize_weekday_label, NormalizedWeekday};
use std::collections::{BTreeSet, HashMap};

/// 批量加载结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyBatch {
    /// service_id → 当月每日执行记录（按 day 排序）
    pub executions: HashMap<i64, Vec<DailyExecutionRecord>>,
    /// service_id → 归一化后的星期产能
    pub capacity: HashMap<i64, WeeklyCapacity>,
}

impl MonthlyBatch {
    /// 某服务的执行记录（无记录返回空切片）
    pub fn executions_for(&self, service_id: i64) -> &[DailyExecutionRecord] {
        self.executions
            .get(&service_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// 某服务的星期产能（无记录返回 None）
    pub fn capacity_for(&self, service_id: i64) -> Option<&WeeklyCapacity> {
        self.capacity.get(&service_id)
    }
}

/// 批量加载器
pub struct BatchLoader<'a> {
    source: &'a dyn ProductivityDataSource,
}

impl<'a> BatchLoader<'a> {
    pub fn new(source: &'a dyn ProductivityDataSource) -> Self {
        Self { source }
    }

    /// 批量加载一组服务的当月执行数据与星期产能
    ///
    /// 两条查询并发发出，两者都完成后合并；任一失败则整体失败。
    ///
    /// # 参数
    /// - unit_id: 单元 ID
    /// - service_ids: 服务 ID 集合（重复 ID 自动去重）
    /// - period: 报表年月
    ///
    /// # 返回
    /// - Ok(MonthlyBatch): 每个请求的服务在两个 map 中都有条目
    /// - Err(StoreUnavailable): 数据源查询失败
    pub async fn load(
        &self,
        unit_id: i64,
        service_ids: &[i64],
        period: ReportPeriod,
    ) -> EngineResult<MonthlyBatch> {
        let ids: Vec<i64> = service_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if ids.is_empty() {
            return Ok(MonthlyBatch::default());
        }

        let (execution_rows, capacity_rows) = futures::try_join!(
            self.source.find_daily_executions(unit_id, &ids, period),
            self.source.find_weekday_capacity(unit_id, &ids),
        )?;

        tracing::debug!(
            unit_id,
            period = %period,
            services = ids.len(),
            execution_rows = execution_rows.len(),
            capacity_rows = capacity_rows.len(),
            "批量加载完成"
        );

        Ok(MonthlyBatch {
            executions: group_executions(&ids, execution_rows),
            capacity: merge_capacity(&ids, capacity_rows),
        })
    }
}

/// 按服务分组执行记录；仅保留请求集合内的服务
fn group_executions(
    ids: &[i64],
    rows: Vec<DailyExecutionRecord>,
) -> HashMap<i64, Vec<DailyExecutionRecord>> {
    let mut grouped: HashMap<i64, Vec<DailyExecutionRecord>> =
        ids.iter().map(|id| (*id, Vec::new())).collect();

    for row in rows {
        if let Some(series) = grouped.get_mut(&row.service_id) {
            series.push(row);
        }
    }

    for series in grouped.values_mut() {
        series.sort_by_key(|r| r.day);
    }

    grouped
}

/// 归一化星期标签，同一星期的条目（上午/下午）累加
///
/// 无法归一的标签按该条目无产能处理，并记录告警
pub fn merge_capacity(
    ids: &[i64],
    rows: Vec<WeekdayCapacityEntry>,
) -> HashMap<i64, WeeklyCapacity> {
    let mut merged: HashMap<i64, WeeklyCapacity> =
        ids.iter().map(|id| (*id, WeeklyCapacity::new())).collect();

    for row in rows {
        let capacity = match merged.get_mut(&row.service_id) {
            Some(c) => c,
            None => continue,
        };

        match normalize_weekday_label(&row.weekday_label) {
            NormalizedWeekday::Known(weekday) => capacity.add(weekday, row.consultations_per_day),
            NormalizedWeekday::Unmatched(label) => {
                tracing::warn!(
                    unit_id = row.unit_id,
                    service_id = row.service_id,
                    weekday_label = %label,
                    "星期标签无法识别，该条目按无产能处理"
                );
                capacity.add_unmatched(label);
            }
        }
    }

    merged
}
