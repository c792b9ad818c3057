//! Installation behaviour.

use super::{
    EnvVarEntry, FileAssociation, RegistryEntry, RegistryView, ShortcutConfig, de,
    entries::default_true,
};
use serde::Deserialize;

/// The `install:` section.
#[derive(Debug, Clone, Deserialize)]
pub struct InstallConfig {
    /// Default installation directory.
    ///
    /// Default: `$PROGRAMFILES64\${app.name}`
    #[serde(default = "default_install_dir")]
    pub install_dir: String,

    /// Desktop shortcut to the application.
    #[serde(default)]
    pub desktop_shortcut: Option<ShortcutConfig>,

    /// Start menu shortcut, placed in a folder named after the application
    /// together with an uninstall link.
    #[serde(default)]
    pub start_menu_shortcut: Option<ShortcutConfig>,

    /// Additional shortcuts in arbitrary locations.
    #[serde(default)]
    pub shortcuts: Vec<ShortcutConfig>,

    #[serde(default)]
    pub registry_entries: Vec<RegistryEntry>,

    #[serde(default)]
    pub env_vars: Vec<EnvVarEntry>,

    #[serde(default)]
    pub file_associations: Vec<FileAssociation>,

    #[serde(default)]
    pub system_requirements: Option<SystemRequirements>,

    /// Program offered on the finish page.
    #[serde(default)]
    pub launch_on_finish: String,

    #[serde(default)]
    pub silent_install: bool,

    /// Output file name of the installer.
    ///
    /// Default: `${APP_NAME}-${APP_VERSION}-Setup.exe`
    #[serde(default)]
    pub installer_name: String,

    /// Product registry key under the selected hive.
    ///
    /// Default: `Software\<publisher>\<name>`
    #[serde(default)]
    pub registry_key: String,

    /// Registry view for the product and uninstall keys.
    ///
    /// Default: auto
    #[serde(default)]
    pub registry_view: RegistryView,

    /// What to do when a previous installation is found.
    #[serde(default)]
    pub existing_install: ExistingInstallConfig,

    /// Default: lzma
    #[serde(default)]
    pub compression: Compression,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            install_dir: default_install_dir(),
            desktop_shortcut: None,
            start_menu_shortcut: None,
            shortcuts: Vec::new(),
            registry_entries: Vec::new(),
            env_vars: Vec::new(),
            file_associations: Vec::new(),
            system_requirements: None,
            launch_on_finish: String::new(),
            silent_install: false,
            installer_name: String::new(),
            registry_key: String::new(),
            registry_view: RegistryView::Auto,
            existing_install: ExistingInstallConfig::default(),
            compression: Compression::default(),
        }
    }
}

fn default_install_dir() -> String {
    "$PROGRAMFILES64\\${app.name}".to_string()
}

/// Compression algorithm of the installer payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
    Zlib,
    Bzip2,
    #[default]
    Lzma,
}

/// Checks run before installation starts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SystemRequirements {
    /// `7`, `8`, `8.1`, `10` or `11`
    #[serde(deserialize_with = "de::stringly")]
    pub min_windows_version: String,
    pub min_free_space_mb: u64,
    pub min_ram_mb: u64,
    pub require_admin: bool,
}

/// Handling of a previous installation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistingInstallMode {
    /// Ask before running the old uninstaller
    #[default]
    PromptUninstall,
    /// Run the old uninstaller silently
    AutoUninstall,
    /// Install on top of the old files
    Overwrite,
    /// Refuse to continue
    Abort,
    /// No detection at all
    None,
}

/// The `existing_install:` setting, a mode string or a mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "ExistingInstallRepr")]
pub struct ExistingInstallConfig {
    pub mode: ExistingInstallMode,
    /// Arguments passed to the old uninstaller.
    ///
    /// Default: `/S`
    pub uninstaller_args: String,
    /// How long to wait for the old uninstaller to disappear.
    ///
    /// Default: 15000
    pub uninstall_wait_ms: u64,
    /// Leave an installation of the same version alone.
    pub version_check: bool,
    /// Only look for a previous installation in the directory the user
    /// picks, so several copies can live side by side.
    pub allow_multiple: bool,
    /// Name the installed version in the prompt.
    ///
    /// Default: true
    pub show_version_info: bool,
}

impl ExistingInstallConfig {
    /// Whether any detection code is generated.
    pub fn detects(&self) -> bool {
        !matches!(
            self.mode,
            ExistingInstallMode::Overwrite | ExistingInstallMode::None
        )
    }

    /// Detection runs when leaving the directory page instead of in `.onInit`.
    pub fn checks_selected_dir(&self) -> bool {
        self.allow_multiple && self.detects()
    }

    pub fn reads_version(&self) -> bool {
        self.version_check || self.show_version_info
    }
}

impl Default for ExistingInstallConfig {
    fn default() -> Self {
        Self {
            mode: ExistingInstallMode::default(),
            uninstaller_args: default_uninstaller_args(),
            uninstall_wait_ms: default_wait_ms(),
            version_check: false,
            allow_multiple: false,
            show_version_info: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExistingInstallRepr {
    Mode(ExistingInstallMode),
    Full {
        #[serde(default)]
        mode: ExistingInstallMode,
        #[serde(default = "default_uninstaller_args")]
        uninstaller_args: String,
        #[serde(default = "default_wait_ms")]
        uninstall_wait_ms: u64,
        #[serde(default)]
        version_check: bool,
        #[serde(default)]
        allow_multiple: bool,
        #[serde(default = "default_true")]
        show_version_info: bool,
    },
}

impl From<ExistingInstallRepr> for ExistingInstallConfig {
    fn from(repr: ExistingInstallRepr) -> Self {
        match repr {
            ExistingInstallRepr::Mode(mode) => Self {
                mode,
                ..Self::default()
            },
            ExistingInstallRepr::Full {
                mode,
                uninstaller_args,
                uninstall_wait_ms,
                version_check,
                allow_multiple,
                show_version_info,
            } => Self {
                mode,
                uninstaller_args,
                uninstall_wait_ms,
                version_check,
                allow_multiple,
                show_version_info,
            },
        }
    }
}

fn default_uninstaller_args() -> String {
    "/S".to_string()
}

fn default_wait_ms() -> u64 {
    15_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let install: InstallConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(install.install_dir, "$PROGRAMFILES64\\${app.name}");
        assert_eq!(install.compression, Compression::Lzma);
        assert_eq!(install.existing_install.mode, ExistingInstallMode::PromptUninstall);
        assert_eq!(install.existing_install.uninstaller_args, "/S");
    }

    #[test]
    fn test_existing_install_shorthand() {
        let install: InstallConfig =
            serde_json::from_value(json!({"existing_install": "auto_uninstall"})).unwrap();
        assert_eq!(install.existing_install.mode, ExistingInstallMode::AutoUninstall);
        assert_eq!(install.existing_install.uninstall_wait_ms, 15_000);

        let install: InstallConfig = serde_json::from_value(
            json!({"existing_install": {"mode": "abort", "uninstall_wait_ms": 500}}),
        )
        .unwrap();
        assert_eq!(install.existing_install.mode, ExistingInstallMode::Abort);
        assert_eq!(install.existing_install.uninstall_wait_ms, 500);
        assert!(install.existing_install.show_version_info);
        assert!(!install.existing_install.checks_selected_dir());
    }

    #[test]
    fn test_existing_install_flags() {
        let install: InstallConfig = serde_json::from_value(json!({"existing_install": {
            "version_check": true,
            "allow_multiple": true,
            "show_version_info": false,
        }}))
        .unwrap();
        let existing = &install.existing_install;
        assert_eq!(existing.mode, ExistingInstallMode::PromptUninstall);
        assert!(existing.version_check && existing.reads_version());
        assert!(existing.checks_selected_dir());

        let install: InstallConfig = serde_json::from_value(
            json!({"existing_install": {"mode": "overwrite", "allow_multiple": true}}),
        )
        .unwrap();
        assert!(!install.existing_install.checks_selected_dir());
    }

    #[test]
    fn test_system_requirements_numeric_version() {
        let req: SystemRequirements =
            serde_json::from_value(json!({"min_windows_version": 10, "require_admin": true})).unwrap();
        assert_eq!(req.min_windows_version, "10");
        assert!(req.require_admin);
        assert_eq!(req.min_ram_mb, 0);
    }
}
