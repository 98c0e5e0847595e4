// ==========================================
// 医院产能看板 - SyntheticStore (演示数据源)
// ==========================================
// 用途: 无真实数据时由展示层显式选择，生成占位数据
// 约束: 同一 (unit, service, year, month, day) 输出恒定，便于截图/演示复现
// ==========================================

use crate::datasource::ProductivityDataSource;
use crate::domain::production::{DailyExecutionRecord, TargetOverride, WeekdayCapacityEntry};
use crate::domain::service::{Service, ServiceGroup, Unit};
use crate::domain::types::{DataSourceKind, OverrideKind, ReportPeriod};
use crate::repository::error::RepositoryResult;
use crate::repository::QueryCounter;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday as ChronoWeekday};

/// 演示服务模板: (序号, 名称, 分组, 静态 pactuado, 每日产能)
const SERVICE_TEMPLATES: &[(i64, &str, Option<i64>, i64, i64)] = &[
    (1, "Consulta Médica", Some(1), 600, 30),
    (2, "Consulta de Enfermagem", Some(1), 400, 20),
    (3, "Raio-X", Some(2), 300, 14),
    (4, "Ultrassonografia", Some(2), 0, 8),
    (5, "Pequena Cirurgia", Some(3), 80, 4),
    (6, "Curativo", None, 200, 10),
];

/// 演示分组: (id, 名称, 颜色)
const GROUP_TEMPLATES: &[(i64, &str, &str)] = &[
    (1, "Ambulatório", "#0d6efd"),
    (2, "Diagnóstico por Imagem", "#198754"),
    (3, "Centro Cirúrgico", "#dc3545"),
];

/// 工作日 agenda 标签（上午/下午拆分，验证累加路径）
const CAPACITY_LABELS: &[&str] = &[
    "segunda-manhã",
    "segunda-tarde",
    "terça-manhã",
    "terça-tarde",
    "quarta-manhã",
    "quarta-tarde",
    "quinta-manhã",
    "quinta-tarde",
    "sexta-manhã",
    "sexta-tarde",
];

/// 合成数据源
#[derive(Debug, Default)]
pub struct SyntheticStore {
    counter: QueryCounter,
}

impl SyntheticStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn service_id(unit_id: i64, seq: i64) -> i64 {
        unit_id * 100 + seq
    }

    /// 反查模板（id 不属于该单元时返回 None）
    fn template_for(unit_id: i64, service_id: i64) -> Option<&'static (i64, &'static str, Option<i64>, i64, i64)> {
        SERVICE_TEMPLATES
            .iter()
            .find(|t| Self::service_id(unit_id, t.0) == service_id)
    }
}

/// splitmix64 混合函数，输出只依赖输入
fn mix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

fn seed(parts: &[i64]) -> u64 {
    parts
        .iter()
        .fold(0u64, |acc, part| mix(acc ^ (*part as u64)))
}

#[async_trait]
impl ProductivityDataSource for SyntheticStore {
    fn kind(&self) -> DataSourceKind {
        DataSourceKind::Synthetic
    }

    fn queries_issued(&self) -> u64 {
        self.counter.get()
    }

    async fn list_units(&self) -> RepositoryResult<Vec<Unit>> {
        self.counter.record();
        Ok(vec![Unit {
            id: 1,
            name: "Unidade Demonstrativa".to_string(),
        }])
    }

    async fn find_unit(&self, unit_id: i64) -> RepositoryResult<Option<Unit>> {
        self.counter.record();
        if unit_id <= 0 {
            return Ok(None);
        }
        Ok(Some(Unit {
            id: unit_id,
            name: format!("Unidade Demonstrativa {}", unit_id),
        }))
    }

    async fn find_services(&self, unit_id: i64) -> RepositoryResult<Vec<Service>> {
        self.counter.record();
        if unit_id <= 0 {
            return Ok(Vec::new());
        }

        let mut services: Vec<Service> = SERVICE_TEMPLATES
            .iter()
            .map(|(seq, name, group_id, static_target, _)| Service {
                id: Self::service_id(unit_id, *seq),
                unit_id,
                group_id: *group_id,
                name: name.to_string(),
                static_target: *static_target,
            })
            .collect();
        services.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(services)
    }

    async fn find_groups(&self) -> RepositoryResult<Vec<ServiceGroup>> {
        self.counter.record();
        Ok(GROUP_TEMPLATES
            .iter()
            .map(|(id, name, color)| ServiceGroup {
                id: *id,
                name: name.to_string(),
                color: color.to_string(),
            })
            .collect())
    }

    async fn find_daily_executions(
        &self,
        unit_id: i64,
        service_ids: &[i64],
        period: ReportPeriod,
    ) -> RepositoryResult<Vec<DailyExecutionRecord>> {
        if service_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.counter.record();

        let first = match NaiveDate::from_ymd_opt(period.year, period.month, 1) {
            Some(d) => d,
            None => return Ok(Vec::new()),
        };

        let mut records = Vec::new();
        for service_id in service_ids {
            let daily_capacity = match Self::template_for(unit_id, *service_id) {
                Some(t) => t.4,
                None => continue,
            };

            for date in first.iter_days().take_while(|d| d.month() == period.month) {
                if matches!(date.weekday(), ChronoWeekday::Sat | ChronoWeekday::Sun) {
                    continue;
                }
                let day = date.day();
                let h = seed(&[unit_id, *service_id, period.year as i64, period.month as i64, day as i64]);

                // 预约在产能的 70%~110% 之间，执行在预约的 75%~100% 之间
                let scheduled = daily_capacity * (70 + (h % 41) as i64) / 100;
                let executed = scheduled * (75 + ((h >> 8) % 26) as i64) / 100;
                let walk_in = ((h >> 16) % 3) as i64;

                records.push(DailyExecutionRecord {
                    unit_id,
                    service_id: *service_id,
                    year: period.year,
                    month: period.month,
                    day,
                    scheduled_count: scheduled,
                    executed_count: executed,
                    executed_walkin_count: walk_in,
                });
            }
        }

        Ok(records)
    }

    async fn find_weekday_capacity(
        &self,
        unit_id: i64,
        service_ids: &[i64],
    ) -> RepositoryResult<Vec<WeekdayCapacityEntry>> {
        if service_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.counter.record();

        let mut entries = Vec::new();
        for service_id in service_ids {
            let daily_capacity = match Self::template_for(unit_id, *service_id) {
                Some(t) => t.4,
                None => continue,
            };
            let morning = (daily_capacity + 1) / 2;
            let afternoon = daily_capacity - morning;

            for (idx, label) in CAPACITY_LABELS.iter().enumerate() {
                entries.push(WeekdayCapacityEntry {
                    unit_id,
                    service_id: *service_id,
                    weekday_label: label.to_string(),
                    consultations_per_day: if idx % 2 == 0 { morning } else { afternoon },
                });
            }
        }

        Ok(entries)
    }

    async fn find_target_overrides(
        &self,
        unit_id: i64,
        service_ids: &[i64],
        _reference_date: NaiveDate,
    ) -> RepositoryResult<Vec<TargetOverride>> {
        if service_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.counter.record();

        // 第一个模板服务带一条常驻 PDT 覆盖
        let pdt_service = Self::service_id(unit_id, 1);
        Ok(service_ids
            .iter()
            .filter(|id| **id == pdt_service)
            .map(|id| TargetOverride {
                id: 1,
                service_id: *id,
                unit_id,
                kind: OverrideKind::Pdt,
                target_value: 550,
                validity_start: None,
                validity_end: None,
                active: true,
            })
            .collect())
    }
}
