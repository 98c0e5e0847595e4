// ==========================================
// 医院产能看板 - 目标解析器
// ==========================================
// 参考日: 报表月第一天
// 优先级（固定、可复现）:
// 1. PDT 覆盖（有效期区间包含参考日）
// 2. META 覆盖（active = 1 且有效期区间包含参考日）
// 3. 服务静态 pactuado（> 0）
// 4. 无目标（0）
// 同一类型多条命中: validity_start 最晚者优先（NULL 视为最早），再按 id 最大者
// ==========================================

use crate::domain::production::TargetOverride;
use crate::domain::service::Service;
use crate::domain::types::{OverrideKind, TargetSource};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTarget {
    pub value: i64,
    pub source: TargetSource,
}

impl ResolvedTarget {
    pub fn none() -> Self {
        Self {
            value: 0,
            source: TargetSource::None,
        }
    }

    pub fn has_target(&self) -> bool {
        self.value > 0
    }
}

/// 覆盖在参考日是否生效
pub fn is_effective(candidate: &TargetOverride, reference_date: NaiveDate) -> bool {
    let flag_ok = match candidate.kind {
        OverrideKind::Pdt => true,
        OverrideKind::Meta => candidate.active,
    };
    flag_ok && candidate.interval_contains(reference_date)
}

/// 同类型覆盖的比较: 更"新"者排后
fn recency(a: &TargetOverride, b: &TargetOverride) -> Ordering {
    a.validity_start
        .cmp(&b.validity_start)
        .then(a.id.cmp(&b.id))
}

fn pick(
    overrides: &[TargetOverride],
    service_id: i64,
    kind: OverrideKind,
    reference_date: NaiveDate,
) -> Option<&TargetOverride> {
    overrides
        .iter()
        .filter(|o| o.service_id == service_id && o.kind == kind)
        .filter(|o| is_effective(o, reference_date))
        .max_by(|a, b| recency(a, b))
}

/// 解析单个服务的有效目标
///
/// # 参数
/// - service: 服务（提供静态 pactuado）
/// - overrides: 候选覆盖（可包含其他服务的记录，内部按 service_id 过滤）
/// - reference_date: 报表月第一天
pub fn resolve_target(
    service: &Service,
    overrides: &[TargetOverride],
    reference_date: NaiveDate,
) -> ResolvedTarget {
    if let Some(pdt) = pick(overrides, service.id, OverrideKind::Pdt, reference_date) {
        return ResolvedTarget {
            value: pdt.target_value.max(0),
            source: TargetSource::Pdt(pdt.id),
        };
    }

    if let Some(meta) = pick(overrides, service.id, OverrideKind::Meta, reference_date) {
        return ResolvedTarget {
            value: meta.target_value.max(0),
            source: TargetSource::Meta(meta.id),
        };
    }

    if service.static_target > 0 {
        return ResolvedTarget {
            value: service.static_target,
            source: TargetSource::Pactuado,
        };
    }

    ResolvedTarget::none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(static_target: i64) -> Service {
        Service {
            id: 7,
            unit_id: 1,
            group_id: None,
            name: "Consulta".to_string(),
            static_target,
        }
    }

    fn over(
        id: i64,
        kind: OverrideKind,
        value: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        active: bool,
    ) -> TargetOverride {
        TargetOverride {
            id,
            service_id: 7,
            unit_id: 1,
            kind,
            target_value: value,
            validity_start: start,
            validity_end: end,
            active,
        }
    }

    #[test]
    fn test_static_fallback_and_none() {
        let reference = ymd(2024, 3, 1);
        let resolved = resolve_target(&service(120), &[], reference);
        assert_eq!(resolved, ResolvedTarget { value: 120, source: TargetSource::Pactuado });

        let resolved = resolve_target(&service(0), &[], reference);
        assert_eq!(resolved, ResolvedTarget::none());
        assert!(!resolved.has_target());
    }

    #[test]
    fn test_open_interval_override_always_active() {
        let overrides = [over(3, OverrideKind::Pdt, 90, None, None, true)];
        for (y, m) in [(2020, 1), (2024, 2), (2030, 12)] {
            let resolved = resolve_target(&service(120), &overrides, ymd(y, m, 1));
            assert_eq!(resolved, ResolvedTarget { value: 90, source: TargetSource::Pdt(3) });
        }
    }

    #[test]
    fn test_interval_must_contain_first_day() {
        // 从 3 月 2 日开始 → 3 月报表不生效
        let overrides = [over(3, OverrideKind::Pdt, 90, Some(ymd(2024, 3, 2)), None, true)];
        let resolved = resolve_target(&service(120), &overrides, ymd(2024, 3, 1));
        assert_eq!(resolved.source, TargetSource::Pactuado);

        let resolved = resolve_target(&service(120), &overrides, ymd(2024, 4, 1));
        assert_eq!(resolved.value, 90);
    }

    #[test]
    fn test_pdt_beats_meta_and_inactive_meta_is_ignored() {
        let reference = ymd(2024, 5, 1);
        let overrides = [
            over(1, OverrideKind::Meta, 300, None, None, true),
            over(2, OverrideKind::Pdt, 200, Some(ymd(2024, 1, 1)), Some(ymd(2024, 12, 31)), true),
        ];
        assert_eq!(resolve_target(&service(0), &overrides, reference).source, TargetSource::Pdt(2));

        let overrides = [over(1, OverrideKind::Meta, 300, None, None, false)];
        assert_eq!(resolve_target(&service(50), &overrides, reference).source, TargetSource::Pactuado);

        let overrides = [over(1, OverrideKind::Meta, 300, None, None, true)];
        let resolved = resolve_target(&service(50), &overrides, reference);
        assert_eq!(resolved, ResolvedTarget { value: 300, source: TargetSource::Meta(1) });
    }

    #[test]
    fn test_latest_start_then_highest_id_wins() {
        let reference = ymd(2024, 6, 1);
        let overrides = [
            over(9, OverrideKind::Pdt, 10, None, None, true),
            over(4, OverrideKind::Pdt, 20, Some(ymd(2024, 1, 1)), None, true),
            over(5, OverrideKind::Pdt, 30, Some(ymd(2024, 1, 1)), None, true),
        ];
        let resolved = resolve_target(&service(0), &overrides, reference);
        assert_eq!(resolved, ResolvedTarget { value: 30, source: TargetSource::Pdt(5) });
    }

    #[test]
    fn test_other_service_overrides_are_ignored() {
        let mut other = over(1, OverrideKind::Pdt, 999, None, None, true);
        other.service_id = 8;
        let resolved = resolve_target(&service(40), &[other], ymd(2024, 6, 1));
        assert_eq!(resolved.source, TargetSource::Pactuado);
    }
}
