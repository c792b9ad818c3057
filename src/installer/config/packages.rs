//! Selectable installer components.

use super::{
    EnvVarEntry, FileAssociation, LangText, RegistryEntry, ShortcutConfig, de,
    files::default_destination,
};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// One source of a package with its resolved destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSource {
    pub source: String,
    pub destination: String,
}

/// A component the user can select on the components page.
///
/// Packages are written as a mapping keyed by component name; document order
/// is kept.
///
/// ```yaml
/// packages:
///   Core:
///     sources: [bin/app.exe, bin/app.dll]
///   Plugins:
///     optional: true
///     children:
///       Git:
///         source: plugins/git/**
///         destination: $INSTDIR\plugins\git
/// ```
#[derive(Debug, Clone)]
pub struct PackageEntry {
    pub name: String,
    pub sources: Vec<PackageSource>,
    /// Default: false
    pub optional: bool,
    /// Selected by default when optional.
    ///
    /// Default: true
    pub default: bool,
    pub description: LangText,
    pub children: Vec<PackageEntry>,
    /// Commands executed after the package's files are installed
    pub post_install: Vec<String>,
    pub desktop_shortcut: Option<ShortcutConfig>,
    pub start_menu_shortcut: Option<ShortcutConfig>,
    pub shortcuts: Vec<ShortcutConfig>,
    pub registry_entries: Vec<RegistryEntry>,
    pub env_vars: Vec<EnvVarEntry>,
    pub file_associations: Vec<FileAssociation>,
}

impl PackageEntry {
    /// This package and all descendants, depth first.
    pub fn walk(&self) -> Vec<&PackageEntry> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SourceItem {
    Path(String),
    Detailed {
        #[serde(deserialize_with = "de::one_or_many")]
        source: Vec<String>,
        #[serde(default)]
        destination: Option<String>,
    },
}

#[derive(Deserialize)]
struct PackageRepr {
    #[serde(default, alias = "source")]
    sources: de::OneOrMany<SourceItem>,
    #[serde(default = "default_destination")]
    destination: String,
    #[serde(default)]
    optional: bool,
    #[serde(default = "super::entries::default_true")]
    default: bool,
    #[serde(default)]
    description: LangText,
    #[serde(default, deserialize_with = "named_packages")]
    children: Vec<PackageEntry>,
    #[serde(default, deserialize_with = "de::one_or_many")]
    post_install: Vec<String>,
    #[serde(default)]
    desktop_shortcut: Option<ShortcutConfig>,
    #[serde(default)]
    start_menu_shortcut: Option<ShortcutConfig>,
    #[serde(default)]
    shortcuts: Vec<ShortcutConfig>,
    #[serde(default)]
    registry_entries: Vec<RegistryEntry>,
    #[serde(default)]
    env_vars: Vec<EnvVarEntry>,
    #[serde(default)]
    file_associations: Vec<FileAssociation>,
}

impl PackageRepr {
    fn into_entry(self, name: String) -> PackageEntry {
        let fallback = self.destination;
        let sources = Vec::from(self.sources)
            .into_iter()
            .flat_map(|item| match item {
                SourceItem::Path(source) => vec![PackageSource {
                    source,
                    destination: fallback.clone(),
                }],
                SourceItem::Detailed {
                    source,
                    destination,
                } => {
                    let destination = destination.unwrap_or_else(|| fallback.clone());
                    source
                        .into_iter()
                        .map(|source| PackageSource {
                            source,
                            destination: destination.clone(),
                        })
                        .collect()
                }
            })
            .collect();

        PackageEntry {
            name,
            sources,
            optional: self.optional,
            default: self.default,
            description: self.description,
            children: self.children,
            post_install: self.post_install,
            desktop_shortcut: self.desktop_shortcut,
            start_menu_shortcut: self.start_menu_shortcut,
            shortcuts: self.shortcuts,
            registry_entries: self.registry_entries,
            env_vars: self.env_vars,
            file_associations: self.file_associations,
        }
    }
}

/// Deserializes a `name → package` mapping into ordered entries.
pub(crate) fn named_packages<'de, D>(deserializer: D) -> Result<Vec<PackageEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<IndexMap<String, PackageRepr>>::deserialize(deserializer)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .map(|(name, repr)| repr.into_entry(name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "named_packages")]
        packages: Vec<PackageEntry>,
    }

    fn parse(value: serde_json::Value) -> Vec<PackageEntry> {
        serde_json::from_value::<Holder>(json!({ "packages": value }))
            .unwrap()
            .packages
    }

    #[test]
    fn test_source_shapes() {
        let packages = parse(json!({
            "Single": {"source": "a.exe"},
            "List": {"sources": ["b.dll", "c.dll"], "destination": "$INSTDIR\\lib"},
            "Detailed": {"sources": [
                {"source": "d/**", "destination": "$INSTDIR\\d"},
                {"source": ["e.txt", "f.txt"]}
            ]}
        }));

        assert_eq!(packages.len(), 3);
        assert_eq!(packages[0].name, "Single");
        assert_eq!(packages[0].sources[0].destination, "$INSTDIR");
        assert_eq!(packages[1].sources[1].source, "c.dll");
        assert_eq!(packages[1].sources[1].destination, "$INSTDIR\\lib");
        assert_eq!(packages[2].sources[0].source, "d/**");
        assert_eq!(packages[2].sources.len(), 3);
        assert_eq!(packages[2].sources[2].destination, "$INSTDIR");
    }

    #[test]
    fn test_children_keep_order_and_defaults() {
        let packages = parse(json!({
            "Plugins": {
                "optional": true,
                "post_install": "plugins.exe --register",
                "children": {"Zeta": {"source": "z"}, "Alpha": {"source": "a", "default": false}}
            }
        }));
        let plugins = &packages[0];
        assert!(plugins.optional);
        assert_eq!(plugins.post_install, vec!["plugins.exe --register"]);
        let names: Vec<_> = plugins.walk().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Plugins", "Zeta", "Alpha"]);
        assert!(plugins.children[0].default);
        assert!(!plugins.children[1].default);
    }
}
