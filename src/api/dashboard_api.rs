// ==========================================
// 医院产能看板 - 看板 API
// ==========================================
// 职责:
// 1. 请求参数归一化（越界月份/年份 → 当前月/年）
// 2. 委托 ProductivityEngine 生成月度报表
// 3. 单元列表、CSV 导出
// 架构: API 层 → Engine 层 → DataSource
// ==========================================

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::report_export::report_to_csv;
use crate::config::ReportConfig;
use crate::domain::report::ProductivityReport;
use crate::domain::service::Unit;
use crate::domain::types::ReportPeriod;
use crate::engine::ProductivityEngine;
use crate::i18n::t_in_with_args;

// ==========================================
// 请求 DTO
// ==========================================

/// 月度报表请求（原始参数，未校验）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub unit_id: Option<i64>,
    pub month: Option<i64>,
    pub year: Option<i64>,
}

impl ReportRequest {
    pub fn new(unit_id: i64, month: i64, year: i64) -> Self {
        Self {
            unit_id: Some(unit_id),
            month: Some(month),
            year: Some(year),
        }
    }
}

/// 归一化后的请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedRequest {
    pub unit_id: i64,
    pub period: ReportPeriod,
}

/// 请求归一化
///
/// - month 缺失或不在 1..=12 → today 所在月
/// - year 缺失或不在 [min_year, max_year] → today 所在年
/// - unit_id 缺失 → 0（得到空报表）
pub fn normalize_request(
    request: &ReportRequest,
    config: &ReportConfig,
    today: NaiveDate,
) -> NormalizedRequest {
    let month = request
        .month
        .filter(|m| (1..=12).contains(m))
        .map(|m| m as u32)
        .unwrap_or_else(|| today.month());

    let year = request
        .year
        .and_then(|y| i32::try_from(y).ok())
        .filter(|y| config.year_in_range(*y))
        .unwrap_or_else(|| today.year());

    NormalizedRequest {
        unit_id: request.unit_id.unwrap_or(0),
        period: ReportPeriod::new(year, month),
    }
}

// ==========================================
// DashboardApi - 看板 API
// ==========================================

/// 看板 API
pub struct DashboardApi {
    engine: Arc<ProductivityEngine>,
    config: ReportConfig,
}

impl DashboardApi {
    /// 创建新的 DashboardApi 实例
    ///
    /// # 参数
    /// - engine: 已绑定数据源的生产率引擎
    /// - config: 报表配置（年份范围、语言）
    pub fn new(engine: Arc<ProductivityEngine>, config: ReportConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// 查询月度生产率报表
    ///
    /// # 返回
    /// - Ok(ProductivityReport): unit_id <= 0 时为空报表
    /// - Err(NotFound): 单元不存在
    /// - Err(StoreUnavailable): 数据源失败（不返回部分结果）
    pub async fn get_monthly_report(&self, request: &ReportRequest) -> ApiResult<ProductivityReport> {
        let today = Local::now().date_naive();
        self.get_monthly_report_at(request, today).await
    }

    /// 查询月度报表（指定"今天"，用于归一化）
    pub async fn get_monthly_report_at(
        &self,
        request: &ReportRequest,
        today: NaiveDate,
    ) -> ApiResult<ProductivityReport> {
        let normalized = normalize_request(request, &self.config, today);
        if normalized.period.month as i64 != request.month.unwrap_or_default()
            || normalized.period.year as i64 != request.year.unwrap_or_default()
        {
            tracing::debug!(
                requested_month = ?request.month,
                requested_year = ?request.year,
                period = %normalized.period,
                "请求年月已归一化"
            );
        }

        let report = self
            .engine
            .build_report(normalized.unit_id, normalized.period)
            .await?;

        if normalized.unit_id > 0 && report.unit_name.is_none() {
            let unit_id = normalized.unit_id.to_string();
            return Err(ApiError::NotFound(t_in_with_args(
                "report.unit_not_found",
                &self.config.locale,
                &[("unit_id", &unit_id)],
            )));
        }

        Ok(report)
    }

    /// 单元列表
    pub async fn list_units(&self) -> ApiResult<Vec<Unit>> {
        Ok(self.engine.source().list_units().await?)
    }

    /// 导出月度报表的每日明细（CSV，按配置语言输出星期名）
    pub async fn export_monthly_csv(&self, request: &ReportRequest) -> ApiResult<String> {
        let report = self.get_monthly_report(request).await?;
        report_to_csv(&report, &self.config.locale)
    }
}
