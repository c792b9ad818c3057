//! Text that is either language-neutral or translated per language.

use crate::installer::languages::resolve_language_name;
use indexmap::IndexMap;
use serde::Deserialize;

/// A plain string or a `language → string` mapping.
///
/// ```yaml
/// description: "Core files"
/// description:
///   English: "Core files"
///   SimplifiedChinese: "核心文件"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LangText {
    /// Same text for every language
    Plain(String),
    /// Per-language text keyed by any accepted language spelling
    Translated(IndexMap<String, String>),
}

impl Default for LangText {
    fn default() -> Self {
        LangText::Plain(String::new())
    }
}

impl LangText {
    pub fn is_empty(&self) -> bool {
        match self {
            LangText::Plain(text) => text.is_empty(),
            LangText::Translated(map) => map.values().all(String::is_empty),
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self, LangText::Translated(_))
    }

    /// Text for `language`, falling back to the first translation.
    pub fn text_for(&self, language: &str) -> &str {
        match self {
            LangText::Plain(text) => text,
            LangText::Translated(map) => {
                let wanted = resolve_language_name(language);
                map.iter()
                    .find(|(key, _)| resolve_language_name(key) == wanted)
                    .map(|(_, text)| text.as_str())
                    .unwrap_or_else(|| {
                        log::warn!("no `{wanted}` translation, using the first one");
                        self.first()
                    })
            }
        }
    }

    /// Language-neutral text: the plain string or the first translation.
    pub fn first(&self) -> &str {
        match self {
            LangText::Plain(text) => text,
            LangText::Translated(map) => map.values().next().map(String::as_str).unwrap_or(""),
        }
    }
}

impl From<&str> for LangText {
    fn from(text: &str) -> Self {
        LangText::Plain(text.to_string())
    }
}
