//! Update, logging and language settings.

use super::RegistryHive;
use crate::installer::languages::resolve_language_name;
use serde::Deserialize;

/// The `update:` section: values recorded for an external updater.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub update_url: String,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub backup_on_upgrade: bool,
    #[serde(default)]
    pub repair_enabled: bool,
    /// Default: true
    #[serde(default = "super::entries::default_true")]
    pub check_on_startup: bool,
    /// Default: HKLM
    #[serde(default)]
    pub registry_hive: RegistryHive,
    /// Default: the product registry key
    #[serde(default)]
    pub registry_key: Option<String>,
}

/// The `logging:` section: an install log written by the installer.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Default: `$INSTDIR\install.log`
    #[serde(default = "default_log_path")]
    pub path: String,
    /// Default: `INFO`
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_path() -> String {
    "$INSTDIR\\install.log".to_string()
}

fn default_log_level() -> String {
    "INFO".to_string()
}

/// One entry of `languages:`, a name or `{name: ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "LanguageRepr")]
pub struct LanguageConfig {
    /// Canonical language name
    pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LanguageRepr {
    Name(String),
    Full { name: String },
}

impl From<LanguageRepr> for LanguageConfig {
    fn from(repr: LanguageRepr) -> Self {
        let (LanguageRepr::Name(name) | LanguageRepr::Full { name }) = repr;
        LanguageConfig {
            name: resolve_language_name(&name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_languages_are_canonicalised() {
        let langs: Vec<LanguageConfig> =
            serde_json::from_value(json!(["english", {"name": "zh-CN"}])).unwrap();
        assert_eq!(langs[0].name, "English");
        assert_eq!(langs[1].name, "SimplifiedChinese");
    }

    #[test]
    fn test_update_defaults() {
        let update: UpdateConfig = serde_json::from_value(json!({"enabled": true})).unwrap();
        assert!(update.check_on_startup);
        assert_eq!(update.registry_hive, RegistryHive::Hklm);
        assert!(update.registry_key.is_none());
    }

    #[test]
    fn test_logging_defaults() {
        let logging: LoggingConfig = serde_json::from_value(json!({"enabled": true})).unwrap();
        assert_eq!(logging.path, "$INSTDIR\\install.log");
        assert_eq!(logging.level, "INFO");
    }
}
