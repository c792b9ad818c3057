//! Application metadata.

use super::{LangText, de};
use serde::Deserialize;

/// The `app:` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AppInfo {
    /// Product name shown in the installer and Add/Remove Programs.
    pub name: String,

    /// Product version.
    ///
    /// Numbers are accepted and stringified (`version: 1.0`).
    ///
    /// Default: `"1.0.0"`
    #[serde(default = "default_version", deserialize_with = "de::stringly")]
    pub version: String,

    /// Publisher (company) name.
    ///
    /// Default: empty
    #[serde(default)]
    pub publisher: String,

    /// Text shown at the bottom of installer pages.
    ///
    /// Default: the publisher
    #[serde(default)]
    pub branding: Option<String>,

    /// Short product description, optionally per language.
    #[serde(default)]
    pub description: LangText,

    /// Installer icon (.ico).
    #[serde(default)]
    pub install_icon: String,

    /// Uninstaller icon (.ico).
    ///
    /// Default: `install_icon`
    #[serde(default)]
    pub uninstall_icon: Option<String>,

    /// License file shown on its own page, optionally per language.
    #[serde(default)]
    pub license: LangText,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl AppInfo {
    /// Branding text: explicit branding, else the publisher, else none.
    pub fn branding_text(&self) -> Option<&str> {
        self.branding
            .as_deref()
            .filter(|b| !b.is_empty())
            .or_else(|| Some(self.publisher.as_str()).filter(|p| !p.is_empty()))
    }

    pub fn uninstall_icon(&self) -> &str {
        self.uninstall_icon.as_deref().unwrap_or(&self.install_icon)
    }
}
