// ==========================================
// 医院产能看板 - 分组组装
// ==========================================
// 规则:
// - 按 group_id 分桶；无分组 / 分组不存在或未启用 → "未分组" 桶
// - 分组按名称升序；"未分组" 桶固定排在最后
// - 组内服务按名称升序（同名按 service_id）
// ==========================================

use crate::domain::report::{GroupReport, ServiceReport};
use crate::domain::service::ServiceGroup;
use crate::engine::metrics::group_totals;
use std::collections::{BTreeMap, HashMap};

/// 默认 "未分组" 颜色
pub const DEFAULT_UNGROUPED_COLOR: &str = "#6c757d";

/// "未分组" 桶的展示信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UngroupedBucket {
    pub name: String,
    pub color: String,
}

impl UngroupedBucket {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

impl Default for UngroupedBucket {
    fn default() -> Self {
        Self::new(
            crate::i18n::ungrouped_label(crate::i18n::DEFAULT_LOCALE),
            DEFAULT_UNGROUPED_COLOR,
        )
    }
}

/// 组装分组报表
///
/// # 参数
/// - reports: (group_id, 服务报表) 列表
/// - groups: 启用的分组
/// - ungrouped: "未分组" 桶展示信息
pub fn assemble_groups(
    reports: Vec<(Option<i64>, ServiceReport)>,
    groups: &[ServiceGroup],
    ungrouped: &UngroupedBucket,
) -> Vec<GroupReport> {
    let known: HashMap<i64, &ServiceGroup> = groups.iter().map(|g| (g.id, g)).collect();

    let mut buckets: BTreeMap<i64, Vec<ServiceReport>> = BTreeMap::new();
    let mut orphans: Vec<ServiceReport> = Vec::new();

    for (group_id, report) in reports {
        match group_id.filter(|id| known.contains_key(id)) {
            Some(id) => buckets.entry(id).or_default().push(report),
            None => orphans.push(report),
        }
    }

    let mut assembled: Vec<GroupReport> = buckets
        .into_iter()
        .filter_map(|(id, services)| {
            known.get(&id).map(|group| {
                let color = if group.color.trim().is_empty() {
                    ungrouped.color.clone()
                } else {
                    group.color.clone()
                };
                build_group(Some(id), group.name.clone(), color, services)
            })
        })
        .collect();

    assembled.sort_by(|a, b| {
        a.group_name
            .cmp(&b.group_name)
            .then(a.group_id.cmp(&b.group_id))
    });

    if !orphans.is_empty() {
        assembled.push(build_group(
            None,
            ungrouped.name.clone(),
            ungrouped.color.clone(),
            orphans,
        ));
    }

    assembled
}

fn build_group(
    group_id: Option<i64>,
    group_name: String,
    group_color: String,
    mut services: Vec<ServiceReport>,
) -> GroupReport {
    services.sort_by(|a, b| {
        a.service_name
            .cmp(&b.service_name)
            .then(a.service_id.cmp(&b.service_id))
    });
    let totals = group_totals(&services);
    GroupReport {
        group_id,
        group_name,
        group_color,
        services,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::MonthlyAggregate;
    use crate::domain::types::TargetSource;

    fn report(id: i64, name: &str, target: i64, productivity: f64) -> ServiceReport {
        ServiceReport {
            service_id: id,
            service_name: name.to_string(),
            daily_metrics: Vec::new(),
            totals: MonthlyAggregate {
                contracted: 0,
                scheduled: 0,
                executed: 10,
                target,
                target_source: TargetSource::Pactuado,
                productivity_percent: productivity,
                scheduled_percent: 0.0,
                daily_target: 0.0,
            },
        }
    }

    fn group(id: i64, name: &str, color: &str) -> ServiceGroup {
        ServiceGroup {
            id,
            name: name.to_string(),
            color: color.to_string(),
        }
    }

    #[test]
    fn test_groups_and_services_sorted_by_name() {
        let groups = [group(1, "Imagem", "#111"), group(2, "Ambulatório", "#222")];
        let reports = vec![
            (Some(1), report(10, "Tomografia", 100, 50.0)),
            (Some(2), report(11, "Enfermagem", 100, 20.0)),
            (Some(1), report(12, "Raio-X", 100, 70.0)),
            (None, report(13, "Curativo", 0, 0.0)),
            (Some(99), report(14, "Acolhimento", 0, 0.0)),
        ];
        let ungrouped = UngroupedBucket::new("Sem grupo", "#6c757d");
        let assembled = assemble_groups(reports, &groups, &ungrouped);

        let names: Vec<&str> = assembled.iter().map(|g| g.group_name.as_str()).collect();
        assert_eq!(names, vec!["Ambulatório", "Imagem", "Sem grupo"]);

        let imaging: Vec<&str> = assembled[1]
            .services
            .iter()
            .map(|s| s.service_name.as_str())
            .collect();
        assert_eq!(imaging, vec!["Raio-X", "Tomografia"]);
        assert!((assembled[1].totals.productivity_percent - 60.0).abs() < 1e-9);
        assert_eq!(assembled[1].totals.executed, 20);

        let orphans = &assembled[2];
        assert_eq!(orphans.group_id, None);
        assert_eq!(orphans.group_color, "#6c757d");
        assert_eq!(orphans.services.len(), 2);
        assert_eq!(orphans.services[0].service_name, "Acolhimento");
        assert_eq!(orphans.totals.productivity_percent, 0.0);
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        let assembled = assemble_groups(Vec::new(), &[group(1, "Imagem", "#111")], &UngroupedBucket::default());
        assert!(assembled.is_empty());
    }

    #[test]
    fn test_blank_group_color_falls_back() {
        let assembled = assemble_groups(
            vec![(Some(1), report(1, "A", 0, 0.0))],
            &[group(1, "Imagem", "  ")],
            &UngroupedBucket::new("Ungrouped", "#abcdef"),
        );
        assert_eq!(assembled[0].group_color, "#abcdef");
    }
}
