//! Entries shared by the install section and packages: shortcuts, registry
//! values, environment variables and file associations.

use super::{LangText, de};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Registry root key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegistryHive {
    #[default]
    #[serde(alias = "HKEY_LOCAL_MACHINE")]
    Hklm,
    #[serde(alias = "HKEY_CURRENT_USER")]
    Hkcu,
    #[serde(alias = "HKEY_CLASSES_ROOT")]
    Hkcr,
    #[serde(alias = "HKEY_USERS")]
    Hku,
    #[serde(alias = "HKEY_CURRENT_CONFIG")]
    Hkcc,
    /// HKLM or HKCU depending on the installer's execution context
    Shctx,
}

impl fmt::Display for RegistryHive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RegistryHive::Hklm => "HKLM",
            RegistryHive::Hkcu => "HKCU",
            RegistryHive::Hkcr => "HKCR",
            RegistryHive::Hku => "HKU",
            RegistryHive::Hkcc => "HKCC",
            RegistryHive::Shctx => "SHCTX",
        })
    }
}

/// Registry value kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryValueType {
    /// `REG_SZ`
    #[default]
    String,
    /// `REG_EXPAND_SZ`
    Expand,
    /// `REG_DWORD`
    Dword,
}

/// 32/64-bit registry view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegistryView {
    /// Derived from the install directory
    #[default]
    Auto,
    View32,
    View64,
}

impl RegistryView {
    /// Argument of NSIS `SetRegView`.
    pub fn as_str(self) -> &'static str {
        match self {
            RegistryView::Auto => "auto",
            RegistryView::View32 => "32",
            RegistryView::View64 => "64",
        }
    }
}

impl<'de> Deserialize<'de> for RegistryView {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // `view: 64` arrives as a number, `view: "64"` as a string.
        let raw = de::stringly(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(RegistryView::Auto),
            "32" => Ok(RegistryView::View32),
            "64" => Ok(RegistryView::View64),
            other => Err(serde::de::Error::custom(format!(
                "invalid registry view `{other}`, expected auto, 32 or 64"
            ))),
        }
    }
}

/// One registry value written on install and removed on uninstall.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryEntry {
    /// Default: HKLM
    #[serde(default)]
    pub hive: RegistryHive,
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::stringly")]
    pub value: String,
    #[serde(default, rename = "type")]
    pub value_type: RegistryValueType,
    /// Default: auto (installer's effective view)
    #[serde(default)]
    pub view: RegistryView,
}

/// Environment variable scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvScope {
    /// Machine-wide, needs elevation
    #[default]
    System,
    User,
}

/// An environment variable set on install.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvVarEntry {
    pub name: String,
    #[serde(default, deserialize_with = "de::stringly")]
    pub value: String,
    #[serde(default)]
    pub scope: EnvScope,
    /// Default: true
    #[serde(default = "default_true")]
    pub remove_on_uninstall: bool,
    /// Append `value` to a `;`-delimited list (PATH style) instead of replacing it.
    #[serde(default)]
    pub append: bool,
}

/// A file extension registered to the application.
#[derive(Debug, Clone, Deserialize)]
pub struct FileAssociation {
    /// Extension including the dot (`.myext`)
    pub extension: String,
    pub prog_id: String,
    #[serde(default)]
    pub description: LangText,
    /// Executable that opens the file
    #[serde(default)]
    pub application: String,
    #[serde(default)]
    pub default_icon: String,
    /// Verb name → command line
    #[serde(default)]
    pub verbs: IndexMap<String, String>,
    /// HKCR when true, the user's `Software\Classes` otherwise.
    ///
    /// Default: true
    #[serde(default = "default_true")]
    pub register_for_all_users: bool,
}

/// A shortcut, written either as a target string or a full mapping.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "ShortcutRepr")]
pub struct ShortcutConfig {
    /// Link name without `.lnk`. Empty means the application name.
    pub name: String,
    pub target: String,
    /// `Desktop`, `StartMenu`, `Startup` or a directory
    pub location: String,
    pub icon: String,
    pub args: String,
    pub workdir: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ShortcutRepr {
    Target(String),
    Full {
        #[serde(default)]
        name: String,
        #[serde(default)]
        target: String,
        #[serde(default = "default_location")]
        location: String,
        #[serde(default)]
        icon: String,
        #[serde(default)]
        args: String,
        #[serde(default)]
        workdir: String,
    },
}

impl From<ShortcutRepr> for ShortcutConfig {
    fn from(repr: ShortcutRepr) -> Self {
        match repr {
            ShortcutRepr::Target(target) => ShortcutConfig {
                target,
                location: default_location(),
                ..Default::default()
            },
            ShortcutRepr::Full {
                name,
                target,
                location,
                icon,
                args,
                workdir,
            } => ShortcutConfig {
                name,
                target,
                location,
                icon,
                args,
                workdir,
            },
        }
    }
}

fn default_location() -> String {
    "Desktop".to_string()
}

pub(crate) fn default_true() -> bool {
    true
}
