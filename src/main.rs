// ==========================================
// 医院产能看板 - 命令行入口
// ==========================================
// 用法:
//   hospital-productivity [--synthetic] [--csv] [db_path] <unit_id> [month] [year]
// 输出: 月度报表 JSON（或 --csv 时的每日明细）到 stdout，日志到 stderr
// ==========================================

use anyhow::Context;
use hospital_productivity::api::ReportRequest;
use hospital_productivity::app::{get_default_db_path, AppState};
use hospital_productivity::config::{ConfigManager, ReportConfig};
use hospital_productivity::DataSourceKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hospital_productivity::logging::init();

    let mut synthetic = false;
    let mut csv = false;
    let mut positional: Vec<String> = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--synthetic" => synthetic = true,
            "--csv" => csv = true,
            _ => positional.push(arg),
        }
    }

    // 第一个参数不是数字时视为 db_path
    let db_path = match positional.first() {
        Some(first) if first.parse::<i64>().is_err() => positional.remove(0),
        _ => get_default_db_path(),
    };

    let mut numbers = positional.iter().map(|s| {
        s.parse::<i64>()
            .with_context(|| format!("参数不是整数: {}", s))
    });
    let unit_id = numbers.next().transpose()?;
    let month = numbers.next().transpose()?;
    let year = numbers.next().transpose()?;

    tracing::info!("==================================================");
    tracing::info!("{} v{}", hospital_productivity::APP_NAME, hospital_productivity::VERSION);
    tracing::info!("使用数据库: {}", db_path);
    tracing::info!("==================================================");

    let state = if synthetic {
        let mut config = ConfigManager::new(&db_path)
            .and_then(|m| m.load_report_config())
            .unwrap_or_else(|_| ReportConfig::default());
        config.data_source = DataSourceKind::Synthetic;
        AppState::with_config(db_path, config)
    } else {
        AppState::new(db_path)
    }
    .map_err(anyhow::Error::msg)?;

    let request = ReportRequest {
        unit_id,
        month,
        year,
    };

    if csv {
        let body = state.dashboard_api.export_monthly_csv(&request).await?;
        print!("{}", body);
    } else {
        let report = state.dashboard_api.get_monthly_report(&request).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
