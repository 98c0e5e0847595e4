// ==========================================
// 医院产能看板 - 星期标签归一化
// ==========================================
// 输入: agenda 表中的自由文本星期标签
//       例如 "Segunda-feira-manhã" / "sábado tarde" / "QUA"
// 步骤:
// 1. 小写 + 去首尾空白
// 2. 去重音（固定替换表，不依赖 locale）
// 3. 分隔符统一为 '-'
// 4. 去掉班次后缀（manha / tarde）
// 5. 同义词表匹配 → Weekday
// 无法匹配: 原样返回，由调用方按 "该条目无产能" 处理并记录日志
// ==========================================

use crate::domain::types::Weekday;

/// 去重音替换表
const DIACRITICS: &[(char, char)] = &[
    ('á', 'a'),
    ('à', 'a'),
    ('â', 'a'),
    ('ã', 'a'),
    ('ä', 'a'),
    ('é', 'e'),
    ('è', 'e'),
    ('ê', 'e'),
    ('ë', 'e'),
    ('í', 'i'),
    ('ì', 'i'),
    ('î', 'i'),
    ('ï', 'i'),
    ('ó', 'o'),
    ('ò', 'o'),
    ('ô', 'o'),
    ('õ', 'o'),
    ('ö', 'o'),
    ('ú', 'u'),
    ('ù', 'u'),
    ('û', 'u'),
    ('ü', 'u'),
    ('ç', 'c'),
    ('ñ', 'n'),
];

/// 班次后缀（分隔符已统一为 '-' 之后匹配）
const SHIFT_SUFFIXES: &[&str] = &["-manha", "-tarde"];

/// 同义词表: 归一化后的标签 → 星期
///
/// 规范名称（Weekday::canonical_name）必须在表中，保证幂等。
const SYNONYMS: &[(&str, Weekday)] = &[
    ("domingo", Weekday::Sunday),
    ("dom", Weekday::Sunday),
    ("sunday", Weekday::Sunday),
    ("segunda-feira", Weekday::Monday),
    ("segunda", Weekday::Monday),
    ("seg", Weekday::Monday),
    ("monday", Weekday::Monday),
    ("terca-feira", Weekday::Tuesday),
    ("terca", Weekday::Tuesday),
    ("ter", Weekday::Tuesday),
    ("tuesday", Weekday::Tuesday),
    ("quarta-feira", Weekday::Wednesday),
    ("quarta", Weekday::Wednesday),
    ("qua", Weekday::Wednesday),
    ("wednesday", Weekday::Wednesday),
    ("quinta-feira", Weekday::Thursday),
    ("quinta", Weekday::Thursday),
    ("qui", Weekday::Thursday),
    ("thursday", Weekday::Thursday),
    ("sexta-feira", Weekday::Friday),
    ("sexta", Weekday::Friday),
    ("sex", Weekday::Friday),
    ("friday", Weekday::Friday),
    ("sabado", Weekday::Saturday),
    ("sab", Weekday::Saturday),
    ("saturday", Weekday::Saturday),
];

/// 归一化结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedWeekday {
    /// 匹配到规范星期
    Known(Weekday),
    /// 无法匹配，保留原始输入
    Unmatched(String),
}

impl NormalizedWeekday {
    pub fn weekday(&self) -> Option<Weekday> {
        match self {
            NormalizedWeekday::Known(w) => Some(*w),
            NormalizedWeekday::Unmatched(_) => None,
        }
    }
}

/// 去重音（固定替换表）
pub fn strip_diacritics(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            DIACRITICS
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

/// 标签清洗: 小写 → 去重音 → 分隔符统一 → 去班次后缀
///
/// 返回用于查同义词表的键
pub fn clean_label(raw: &str) -> String {
    let lowered = strip_diacritics(&raw.trim().to_lowercase());

    // 空白 / 下划线 / 连字符统一为单个 '-'
    let mut key = lowered
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    for suffix in SHIFT_SUFFIXES {
        if let Some(stripped) = key.strip_suffix(suffix) {
            key = stripped.to_string();
            break;
        }
    }

    key
}

/// 归一化星期标签
pub fn normalize_weekday_label(raw: &str) -> NormalizedWeekday {
    let key = clean_label(raw);
    SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == key)
        .map(|(_, weekday)| NormalizedWeekday::Known(*weekday))
        .unwrap_or_else(|| NormalizedWeekday::Unmatched(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_are_idempotent() {
        for weekday in Weekday::ALL {
            assert_eq!(
                normalize_weekday_label(weekday.canonical_name()),
                NormalizedWeekday::Known(weekday),
                "{} 应映射回自身",
                weekday.canonical_name()
            );
        }
    }

    #[test]
    fn test_shift_variants_match_same_monday() {
        let a = normalize_weekday_label("Segunda-feira-manhã");
        let b = normalize_weekday_label("segunda manha");
        assert_eq!(a, NormalizedWeekday::Known(Weekday::Monday));
        assert_eq!(a, b);
        assert_eq!(
            normalize_weekday_label("segunda-tarde"),
            NormalizedWeekday::Known(Weekday::Monday)
        );
    }

    #[test]
    fn test_accented_and_spaced_labels() {
        assert_eq!(normalize_weekday_label("Sábado tarde").weekday(), Some(Weekday::Saturday));
        assert_eq!(normalize_weekday_label("TERÇA-FEIRA").weekday(), Some(Weekday::Tuesday));
        assert_eq!(normalize_weekday_label("  quinta  feira ").weekday(), Some(Weekday::Thursday));
        assert_eq!(normalize_weekday_label("sexta_feira_tarde").weekday(), Some(Weekday::Friday));
        assert_eq!(normalize_weekday_label("Domingo").weekday(), Some(Weekday::Sunday));
    }

    #[test]
    fn test_unmatched_returns_input_unchanged() {
        assert_eq!(
            normalize_weekday_label("Feriado-manhã"),
            NormalizedWeekday::Unmatched("Feriado-manhã".to_string())
        );
        assert_eq!(normalize_weekday_label("").weekday(), None);
    }

    #[test]
    fn test_clean_label() {
        assert_eq!(clean_label("Segunda-feira-manhã"), "segunda-feira");
        assert_eq!(clean_label("quarta tarde"), "quarta");
        assert_eq!(strip_diacritics("ação"), "acao");
    }
}
