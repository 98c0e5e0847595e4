// ==========================================
// 医院产能看板 - 月度生产率引擎
// ==========================================
// 流程（单次请求，无跨请求状态）:
// 1. 日历（请求级值）
// 2. 单元 / 服务 / 分组（并发）
// 3. 批量加载执行 + 产能（≤ 2 条查询）
// 4. 目标覆盖（1 条查询）
// 5. 对账 → 目标解析 → 指标 → 分组组装
// 查询总数与服务数量无关
// ==========================================

use crate::datasource::{ProductivityDataSource, SharedDataSource};
use crate::domain::production::TargetOverride;
use crate::domain::report::{
    DailyMetric, GroupReport, ProductivityReport, ServiceReport, UnitSummary,
};
use crate::domain::service::Service;
use crate::domain::types::ReportPeriod;
use crate::engine::batch_loader::{BatchLoader, MonthlyBatch};
use crate::engine::calendar::MonthCalendar;
use crate::engine::error::EngineResult;
use crate::engine::group_assembler::{assemble_groups, UngroupedBucket};
use crate::engine::metrics::{monthly_aggregate, unit_summary};
use crate::engine::reconciler::reconcile;
use crate::engine::target_resolver::resolve_target;
use crate::perf::PerfGuard;
use chrono::Local;
use std::sync::Arc;
use uuid::Uuid;

/// 月度生产率引擎
pub struct ProductivityEngine {
    source: SharedDataSource,
    ungrouped: UngroupedBucket,
}

impl ProductivityEngine {
    pub fn new(source: SharedDataSource) -> Self {
        Self {
            source,
            ungrouped: UngroupedBucket::default(),
        }
    }

    /// 以数据源的语句计数为 SQL 数来源的 PerfGuard（只统计本次请求）
    fn perf_guard(&self, op: &'static str, unit_id: i64, period: ReportPeriod) -> PerfGuard {
        let source = Arc::clone(&self.source);
        PerfGuard::new(op)
            .with_detail(format!("unit_id={} period={}", unit_id, period))
            .with_sql_counter(move || source.queries_issued())
    }

    /// 设置 "未分组" 桶的展示名与颜色
    pub fn with_ungrouped(mut self, ungrouped: UngroupedBucket) -> Self {
        self.ungrouped = ungrouped;
        self
    }

    pub fn source(&self) -> &dyn ProductivityDataSource {
        self.source.as_ref()
    }

    /// 生成单元月度报表
    ///
    /// # 参数
    /// - unit_id: 单元 ID（<= 0 时返回空报表，不访问数据源）
    /// - period: 报表年月（调用方已归一化）
    ///
    /// # 错误
    /// - InvalidDate: month 不在 1..=12
    /// - StoreUnavailable: 任一查询失败，不返回部分结果
    pub async fn build_report(
        &self,
        unit_id: i64,
        period: ReportPeriod,
    ) -> EngineResult<ProductivityReport> {
        let perf = self.perf_guard("engine.build_report", unit_id, period);

        let calendar = MonthCalendar::new(period)?;

        if unit_id <= 0 {
            tracing::debug!(unit_id, "单元 ID 非正数，返回空报表");
            return Ok(self.envelope(unit_id, None, &calendar, Vec::new(), UnitSummary::default()));
        }

        let (unit, services, groups) = futures::try_join!(
            self.source.find_unit(unit_id),
            self.source.find_services(unit_id),
            self.source.find_groups(),
        )?;

        let service_ids: Vec<i64> = services.iter().map(|s| s.id).collect();
        let batch = BatchLoader::new(self.source.as_ref())
            .load(unit_id, &service_ids, period)
            .await?;
        let overrides = self.load_overrides(unit_id, &service_ids, &calendar).await?;

        let reports: Vec<(Option<i64>, ServiceReport)> = services
            .iter()
            .map(|service| {
                (
                    service.group_id,
                    service_report(service, &calendar, &batch, &overrides),
                )
            })
            .collect();

        let summary = unit_summary(reports.iter().map(|(_, r)| r));
        let grouped = assemble_groups(reports, &groups, &self.ungrouped);

        tracing::info!(
            unit_id,
            period = %period,
            services = summary.service_count,
            groups = grouped.len(),
            productivity = summary.productivity_percent,
            queries_issued = perf.sql_count(),
            "月度报表生成完成"
        );

        Ok(self.envelope(
            unit_id,
            unit.map(|u| u.name),
            &calendar,
            grouped,
            summary,
        ))
    }

    /// 单服务路径: 只加载一个服务的数据并对账
    ///
    /// 与 build_report 中该服务的 daily_metrics 逐项一致
    pub async fn daily_series_for_service(
        &self,
        unit_id: i64,
        service_id: i64,
        period: ReportPeriod,
    ) -> EngineResult<Vec<DailyMetric>> {
        let calendar = MonthCalendar::new(period)?;
        let batch = BatchLoader::new(self.source.as_ref())
            .load(unit_id, &[service_id], period)
            .await?;

        Ok(reconcile(
            &calendar,
            batch.executions_for(service_id),
            batch.capacity_for(service_id),
        ))
    }

    async fn load_overrides(
        &self,
        unit_id: i64,
        service_ids: &[i64],
        calendar: &MonthCalendar,
    ) -> EngineResult<Vec<TargetOverride>> {
        if service_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .source
            .find_target_overrides(unit_id, service_ids, calendar.first_day())
            .await?)
    }

    fn envelope(
        &self,
        unit_id: i64,
        unit_name: Option<String>,
        calendar: &MonthCalendar,
        groups: Vec<GroupReport>,
        summary: UnitSummary,
    ) -> ProductivityReport {
        let period = calendar.period();
        ProductivityReport {
            report_id: Uuid::new_v4().to_string(),
            unit_id,
            unit_name,
            year: period.year,
            month: period.month,
            days_in_month: calendar.days_in_month(),
            business_days: calendar.business_day_count(),
            data_source: self.source.kind(),
            groups,
            summary,
            generated_at: Local::now().naive_local(),
        }
    }
}

/// 单服务: 对账 + 目标解析 + 汇总
fn service_report(
    service: &Service,
    calendar: &MonthCalendar,
    batch: &MonthlyBatch,
    overrides: &[TargetOverride],
) -> ServiceReport {
    let daily_metrics = reconcile(
        calendar,
        batch.executions_for(service.id),
        batch.capacity_for(service.id),
    );
    let target = resolve_target(service, overrides, calendar.first_day());
    let totals = monthly_aggregate(&daily_metrics, target, calendar.business_day_count());

    ServiceReport {
        service_id: service.id,
        service_name: service.name.clone(),
        daily_metrics,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::SyntheticStore;
    use crate::domain::types::{DataSourceKind, TargetSource};
    use crate::engine::error::EngineError;

    fn engine() -> ProductivityEngine {
        ProductivityEngine::new(Arc::new(SyntheticStore::new()))
            .with_ungrouped(UngroupedBucket::new("Sem grupo", "#6c757d"))
    }

    #[tokio::test]
    async fn test_synthetic_report_shape() {
        let engine = engine();
        let report = engine.build_report(2, ReportPeriod::new(2024, 2)).await.unwrap();

        assert_eq!(report.data_source, DataSourceKind::Synthetic);
        assert_eq!(report.days_in_month, 29);
        assert_eq!(report.business_days, 21);
        assert_eq!(report.summary.service_count, 6);
        // Ultrassonografia 的 pactuado 为 0，不计入平均
        assert_eq!(report.summary.services_with_target, 5);
        for service in report.services() {
            assert_eq!(service.daily_metrics.len(), 29);
        }
        assert_eq!(report.groups.last().unwrap().group_id, None);

        let pdt = report.find_service(201).unwrap();
        assert_eq!(pdt.totals.target, 550);
        assert_eq!(pdt.totals.target_source, TargetSource::Pdt(1));
    }

    #[tokio::test]
    async fn test_query_count_is_constant() {
        let engine = engine();
        engine.build_report(1, ReportPeriod::new(2024, 3)).await.unwrap();
        // unit + services + groups + executions + capacity + overrides
        assert_eq!(engine.source().queries_issued(), 6);
    }

    #[tokio::test]
    async fn test_perf_sql_count_is_per_request() {
        let engine = engine();
        let period = ReportPeriod::new(2024, 3);

        for _ in 0..2 {
            let guard = engine.perf_guard("test", 1, period);
            engine.build_report(1, period).await.unwrap();
            assert_eq!(guard.sql_count(), 6);
        }
        assert_eq!(engine.source().queries_issued(), 12);
    }

    #[tokio::test]
    async fn test_non_positive_unit_skips_store() {
        let engine = engine();
        let report = engine.build_report(0, ReportPeriod::new(2024, 3)).await.unwrap();
        assert!(report.groups.is_empty());
        assert_eq!(report.summary, UnitSummary::default());
        assert_eq!(engine.source().queries_issued(), 0);
    }

    #[tokio::test]
    async fn test_invalid_month_is_rejected() {
        let err = engine().build_report(1, ReportPeriod::new(2024, 13)).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidDate { month: 13, .. }));
    }

    #[tokio::test]
    async fn test_single_service_path_matches_batch() {
        let engine = engine();
        let period = ReportPeriod::new(2024, 8);
        let report = engine.build_report(4, period).await.unwrap();
        for service in report.services() {
            let single = engine
                .daily_series_for_service(4, service.service_id, period)
                .await
                .unwrap();
            assert_eq!(single, service.daily_metrics);
        }
    }
}
