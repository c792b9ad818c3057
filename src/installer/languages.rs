//! Language names and their NSIS identifiers.
//!
//! Package descriptions name languages by a canonical name (`English`,
//! `SimplifiedChinese`), an ISO tag (`zh-CN`) or a legacy NSIS spelling
//! (`SimpChinese`). [`resolve_language_name`] folds all of them onto the
//! canonical name; [`nsis_language`] supplies the MUI name and `LANG_*`
//! constant used in generated scripts.

/// Canonical name, ISO tag, NSIS MUI name, Windows LCID.
const LANGUAGES: &[(&str, &str, &str, u32)] = &[
    ("English", "en", "English", 1033),
    ("French", "fr", "French", 1036),
    ("German", "de", "German", 1031),
    ("Spanish", "es", "Spanish", 1034),
    ("SpanishInternational", "es-419", "SpanishInternational", 3082),
    ("Portuguese", "pt", "Portuguese", 2070),
    ("BrazilianPortuguese", "pt-BR", "PortugueseBR", 1046),
    ("Italian", "it", "Italian", 1040),
    ("Dutch", "nl", "Dutch", 1043),
    ("Swedish", "sv", "Swedish", 1053),
    ("Norwegian", "nb", "Norwegian", 1044),
    ("NorwegianNynorsk", "nn", "NorwegianNynorsk", 2068),
    ("Danish", "da", "Danish", 1030),
    ("Finnish", "fi", "Finnish", 1035),
    ("Polish", "pl", "Polish", 1045),
    ("Czech", "cs", "Czech", 1029),
    ("Hungarian", "hu", "Hungarian", 1038),
    ("Ukrainian", "uk", "Ukrainian", 1058),
    ("Russian", "ru", "Russian", 1049),
    ("SimplifiedChinese", "zh-CN", "SimpChinese", 2052),
    ("TraditionalChinese", "zh-TW", "TradChinese", 1028),
    ("Japanese", "ja", "Japanese", 1041),
    ("Korean", "ko", "Korean", 1042),
    ("Thai", "th", "Thai", 1054),
    ("Vietnamese", "vi", "Vietnamese", 1066),
    ("Turkish", "tr", "Turkish", 1055),
    ("Arabic", "ar", "Arabic", 1025),
    ("Hebrew", "he", "Hebrew", 1037),
    ("Farsi", "fa", "Farsi", 1065),
    ("Greek", "el", "Greek", 1032),
];

/// Shorthand and legacy spellings, lowercase.
const ALIASES: &[(&str, &str)] = &[
    ("chinese", "SimplifiedChinese"),
    ("zh", "SimplifiedChinese"),
    ("simpchinese", "SimplifiedChinese"),
    ("tradchinese", "TraditionalChinese"),
    ("portuguesebr", "BrazilianPortuguese"),
];

/// NSIS identifiers of one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsisLanguage {
    /// Name passed to `!insertmacro MUI_LANGUAGE`
    pub mui_name: String,
    /// `LANG_*` constant used with `LangString`
    pub lang_constant: String,
    /// Windows locale id, 0 when unknown
    pub lcid: u32,
}

/// Canonical language name for `name`.
///
/// Matching is case-insensitive over canonical names, ISO tags and aliases.
/// Unknown names come back unchanged so tool-native language names still
/// flow through.
pub fn resolve_language_name(name: &str) -> String {
    let wanted = name.trim();
    LANGUAGES
        .iter()
        .find(|(canonical, iso, _, _)| {
            canonical.eq_ignore_ascii_case(wanted) || iso.eq_ignore_ascii_case(wanted)
        })
        .map(|(canonical, ..)| *canonical)
        .or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(wanted))
                .map(|(_, canonical)| *canonical)
        })
        .unwrap_or(wanted)
        .to_string()
}

/// NSIS identifiers for `name`, synthesised from the name when unknown.
pub fn nsis_language(name: &str) -> NsisLanguage {
    let canonical = resolve_language_name(name);
    match LANGUAGES.iter().find(|(c, ..)| *c == canonical) {
        Some((_, _, mui, lcid)) => NsisLanguage {
            mui_name: (*mui).to_string(),
            lang_constant: format!("LANG_{}", mui.to_ascii_uppercase()),
            lcid: *lcid,
        },
        None => NsisLanguage {
            lang_constant: format!("LANG_{}", canonical.to_ascii_uppercase()),
            mui_name: canonical,
            lcid: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_aliases() {
        assert_eq!(resolve_language_name("chinese"), "SimplifiedChinese");
        assert_eq!(resolve_language_name("zh-cn"), "SimplifiedChinese");
        assert_eq!(resolve_language_name("english"), "English");
        assert_eq!(resolve_language_name("PortugueseBR"), "BrazilianPortuguese");
        assert_eq!(resolve_language_name("Klingon"), "Klingon");
    }

    #[test]
    fn test_nsis_mapping() {
        let zh = nsis_language("SimplifiedChinese");
        assert_eq!(zh.mui_name, "SimpChinese");
        assert_eq!(zh.lang_constant, "LANG_SIMPCHINESE");
        assert_eq!(zh.lcid, 2052);

        let en = nsis_language("en");
        assert_eq!(en.lang_constant, "LANG_ENGLISH");
    }

    #[test]
    fn test_nsis_mapping_fallback() {
        let unknown = nsis_language("Esperanto");
        assert_eq!(unknown.mui_name, "Esperanto");
        assert_eq!(unknown.lang_constant, "LANG_ESPERANTO");
        assert_eq!(unknown.lcid, 0);
    }
}
