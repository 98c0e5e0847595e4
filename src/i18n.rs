// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库，支持 pt-BR（默认）和 en
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::types::Weekday;

/// 默认语言
pub const DEFAULT_LOCALE: &str = "pt-BR";

/// 翻译消息（指定语言，不改动全局 locale）
pub fn t_in(key: &str, locale: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 翻译消息（指定语言，带参数）
pub fn t_in_with_args(key: &str, locale: &str, args: &[(&str, &str)]) -> String {
    let mut result = t_in(key, locale);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 星期展示名
pub fn weekday_label(weekday: Weekday, locale: &str) -> String {
    t_in(weekday.i18n_key(), locale)
}

/// "未分组" 合成分组的展示名
pub fn ungrouped_label(locale: &str) -> String {
    t_in("group.ungrouped", locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_label_with_explicit_locale() {
        assert_eq!(weekday_label(Weekday::Saturday, "pt-BR"), "Sábado");
        assert_eq!(weekday_label(Weekday::Saturday, "en"), "Saturday");
        assert_eq!(ungrouped_label("pt-BR"), "Sem grupo");
        assert_eq!(
            t_in_with_args("report.unit_not_found", "pt-BR", &[("unit_id", "3")]),
            "Unidade 3 não encontrada"
        );
    }

    #[test]
    fn test_translate_with_args_in_english() {
        assert_eq!(
            t_in_with_args("report.unit_not_found", "en", &[("unit_id", "42")]),
            "Unit 42 not found"
        );
        assert_eq!(t_in("group.ungrouped", "en"), "Ungrouped");
    }
}
