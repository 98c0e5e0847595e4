// ==========================================
// 医院产能看板 - 报表 CSV 导出
// ==========================================
// 每行 = 一个服务的一天；星期名按语言本地化
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::report::ProductivityReport;
use crate::i18n::weekday_label;
use serde::Serialize;
use std::io::Write;

/// CSV 行
#[derive(Debug, Serialize)]
struct DailyRow<'a> {
    group: &'a str,
    service_id: i64,
    service: &'a str,
    date: String,
    weekday: String,
    contracted: i64,
    scheduled: i64,
    executed: i64,
    executed_walk_in: i64,
}

/// 把报表每日明细写入 writer
pub fn write_report_csv<W: Write>(
    report: &ProductivityReport,
    locale: &str,
    writer: W,
) -> ApiResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for group in &report.groups {
        for service in &group.services {
            for metric in &service.daily_metrics {
                csv_writer.serialize(DailyRow {
                    group: &group.group_name,
                    service_id: service.service_id,
                    service: &service.service_name,
                    date: format!("{:04}-{:02}-{:02}", report.year, report.month, metric.day),
                    weekday: weekday_label(metric.weekday, locale),
                    contracted: metric.contracted,
                    scheduled: metric.scheduled,
                    executed: metric.executed,
                    executed_walk_in: metric.executed_walk_in,
                })?;
            }
        }
    }

    csv_writer
        .flush()
        .map_err(|e| ApiError::ExportError(e.to_string()))?;
    Ok(())
}

/// 导出为 CSV 字符串
pub fn report_to_csv(report: &ProductivityReport, locale: &str) -> ApiResult<String> {
    let mut buffer = Vec::new();
    write_report_csv(report, locale, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ApiError::ExportError(e.to_string()))
}
