//! Package description model.
//!
//! A package description is loaded twice over: once into the typed
//! [`PackageConfig`] tree the converters walk, and once as the raw
//! [`serde_json::Value`] document that `${a.b.c}` references are resolved
//! against. Both come from the same parse and are read-only afterwards.

mod app;
mod de;
mod entries;
mod files;
mod install;
mod lang_text;
mod packages;
mod policy;

pub use app::AppInfo;
pub use entries::{
    EnvScope, EnvVarEntry, FileAssociation, RegistryEntry, RegistryHive, RegistryValueType,
    RegistryView, ShortcutConfig,
};
pub use files::FileEntry;
pub(crate) use files::{is_recursive, is_remote};
pub use install::{
    Compression, ExistingInstallConfig, ExistingInstallMode, InstallConfig, SystemRequirements,
};
pub use lang_text::LangText;
pub use packages::{PackageEntry, PackageSource};
pub use policy::{LanguageConfig, LoggingConfig, UpdateConfig};

use crate::installer::error::{Context, ErrorExt, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Typed view of a package description.
///
/// `variables` and `signing` are not modelled here; references to them are
/// resolved through the raw document.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageConfig {
    pub app: AppInfo,

    #[serde(default)]
    pub install: InstallConfig,

    #[serde(default)]
    pub files: Vec<FileEntry>,

    /// Components, in document order.
    #[serde(default, deserialize_with = "packages::named_packages")]
    pub packages: Vec<PackageEntry>,

    #[serde(default)]
    pub update: Option<UpdateConfig>,

    #[serde(default)]
    pub logging: Option<LoggingConfig>,

    /// Installer UI languages.
    ///
    /// Default: English only
    #[serde(default)]
    pub languages: Vec<LanguageConfig>,

    /// Tool name → extra script files included verbatim.
    #[serde(default)]
    pub custom_includes: IndexMap<String, Vec<String>>,
}

impl PackageConfig {
    /// Builds the typed tree from a raw document.
    pub fn from_document(document: &Value) -> Result<Self> {
        let config = Self::deserialize(document)?;
        if config.app.name.trim().is_empty() {
            crate::bail!("app.name must not be empty");
        }
        Ok(config)
    }

    /// Every package including nested children, depth first.
    pub fn all_packages(&self) -> Vec<&PackageEntry> {
        self.packages.iter().flat_map(PackageEntry::walk).collect()
    }

    /// Product registry key before resolution.
    pub fn registry_key(&self) -> String {
        if !self.install.registry_key.is_empty() {
            return self.install.registry_key.clone();
        }
        if self.app.publisher.is_empty() {
            format!("Software\\{}", self.app.name)
        } else {
            format!("Software\\{}\\{}", self.app.publisher, self.app.name)
        }
    }

    /// Whether any environment variable appends to a delimited list.
    pub fn needs_path_helpers(&self) -> bool {
        self.install.env_vars.iter().any(|e| e.append)
            || self
                .all_packages()
                .iter()
                .any(|p| p.env_vars.iter().any(|e| e.append))
    }

    pub fn logging_enabled(&self) -> bool {
        self.logging.as_ref().is_some_and(|l| l.enabled)
    }

    pub fn update_enabled(&self) -> bool {
        self.update.as_ref().is_some_and(|u| u.enabled)
    }
}

/// Parses a YAML package description into the typed tree and raw document.
pub fn from_yaml_str(text: &str) -> Result<(PackageConfig, Value)> {
    let document: Value = serde_yaml::from_str(text)?;
    let config = PackageConfig::from_document(&document)?;
    Ok((config, document))
}

/// Parses a JSON package description into the typed tree and raw document.
pub fn from_json_str(text: &str) -> Result<(PackageConfig, Value)> {
    let document: Value = serde_json::from_str(text)?;
    let config = PackageConfig::from_document(&document)?;
    Ok((config, document))
}

/// Loads a package description file.
///
/// `.json` files are parsed as JSON, everything else as YAML.
pub fn load(path: &Path) -> Result<(PackageConfig, Value)> {
    let text = std::fs::read_to_string(path).fs_context("reading package description", path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    log::debug!(
        "parsing {} as {}",
        path.display(),
        if is_json { "JSON" } else { "YAML" }
    );
    let parsed = if is_json {
        from_json_str(&text)
    } else {
        from_yaml_str(&text)
    };
    parsed.with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::error::Error;

    const SAMPLE: &str = r#"
app:
  name: Demo
  version: 2.1
  publisher: ACME
install:
  env_vars:
    - name: PATH
      value: $INSTDIR\bin
      append: true
files:
  - bin/demo.exe
packages:
  Extras:
    optional: true
    source: extras/**
variables:
  HOME: ${install.install_dir}
"#;

    #[test]
    fn test_from_yaml_str() {
        let (config, document) = from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.app.name, "Demo");
        assert_eq!(config.app.version, "2.1");
        assert_eq!(config.files.len(), 1);
        assert_eq!(config.all_packages().len(), 1);
        assert!(config.needs_path_helpers());
        assert_eq!(config.registry_key(), "Software\\ACME\\Demo");
        assert_eq!(document["variables"]["HOME"], "${install.install_dir}");
    }

    #[test]
    fn test_from_json_str_requires_app() {
        assert!(from_json_str(r#"{"files": []}"#).is_err());
        let (config, _) = from_json_str(r#"{"app": {"name": "J"}}"#).unwrap();
        assert_eq!(config.registry_key(), "Software\\J");
        assert!(!config.logging_enabled());
        assert!(!config.update_enabled());
    }

    #[test]
    fn test_empty_app_name_is_rejected() {
        let err = from_yaml_str("app: {name: '  '}").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "app.name must not be empty"));
    }

    #[test]
    fn test_yaml_mapping_order_is_kept() {
        let (config, document) = from_yaml_str(
            "app: {name: Demo}\npackages:\n  Zeta: {source: z}\n  Alpha: {source: a}\n  Mid: {source: m}",
        )
        .unwrap();
        let names: Vec<_> = config.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);
        let keys: Vec<_> = document["packages"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["Zeta", "Alpha", "Mid"]);
    }
}
