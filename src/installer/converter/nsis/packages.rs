//! Component sections, their descriptions and their cleanup.
//!
//! Packages are numbered depth first starting at 1. A leaf package becomes
//! `Section ... SEC_PKG_<n>`; a package with children becomes
//! `SectionGroup ... SEC_GROUP_<n>`, with its own content (if any) in a
//! nested `SEC_PKG_<n>` section.

use super::{
    entries::{self, Labels},
    files::FileCopier,
    shortcuts::ShortcutSet,
    utils::{block, escape_nsis_string, field},
};
use crate::installer::{
    config::PackageEntry,
    context::BuildContext,
    error::Result,
    languages::nsis_language,
};

/// Section flags for a required component: selected and read-only.
const SF_SELECTED_RO: u32 = 17;

/// A package with its depth-first number.
#[derive(Debug, Clone, Copy)]
pub struct NumberedPackage<'a> {
    pub number: usize,
    pub package: &'a PackageEntry,
}

impl NumberedPackage<'_> {
    fn is_group(&self) -> bool {
        !self.package.children.is_empty()
    }

    /// Whether the package installs anything itself.
    fn has_content(&self) -> bool {
        let p = self.package;
        !self.is_group()
            || !p.sources.is_empty()
            || !p.post_install.is_empty()
            || !p.registry_entries.is_empty()
            || !p.env_vars.is_empty()
            || !p.file_associations.is_empty()
            || !p.shortcuts.is_empty()
            || p.desktop_shortcut.is_some()
            || p.start_menu_shortcut.is_some()
    }

    /// `SEC_PKG_<n>` when the package has its own section.
    pub fn section_id(&self) -> Option<String> {
        self.has_content().then(|| format!("SEC_PKG_{}", self.number))
    }

    /// Id shown on the components page: the group for groups.
    fn component_id(&self) -> String {
        if self.is_group() {
            format!("SEC_GROUP_{}", self.number)
        } else {
            format!("SEC_PKG_{}", self.number)
        }
    }

    /// Flags set in `.onInit`, `None` when the default applies.
    pub fn initial_flags(&self) -> Option<u32> {
        let p = self.package;
        match (p.optional, p.default) {
            (false, _) => Some(SF_SELECTED_RO),
            (true, false) => Some(0),
            (true, true) => None,
        }
    }
}

/// Every package, numbered depth first.
pub fn numbered_packages<'a>(ctx: &BuildContext<'a>) -> Vec<NumberedPackage<'a>> {
    ctx.config()
        .all_packages()
        .into_iter()
        .enumerate()
        .map(|(i, package)| NumberedPackage {
            number: i + 1,
            package,
        })
        .collect()
}

pub fn shortcuts_of(ctx: &BuildContext<'_>, package: &PackageEntry) -> Result<ShortcutSet> {
    ShortcutSet::collect(
        ctx,
        package.desktop_shortcut.as_ref(),
        package.start_menu_shortcut.as_ref(),
        &package.shortcuts,
    )
}

fn content_section(
    ctx: &BuildContext<'_>,
    numbered: NumberedPackage<'_>,
    id: String,
    labels: &mut Labels,
) -> Result<Vec<String>> {
    let package = numbered.package;
    let name = field(ctx, &package.name)?;
    let mut body = Vec::new();
    if ctx.config().logging_enabled() {
        body.push(format!("!insertmacro LogWrite \"Installing component {name}\""));
    }

    let mut copier = FileCopier::new(true);
    for source in &package.sources {
        copier.copy(ctx, &source.source, &source.destination, &mut body)?;
    }
    body.extend(entries::registry_writes(ctx, &package.registry_entries)?);
    body.extend(entries::env_writes(ctx, &package.env_vars, labels)?);
    body.extend(shortcuts_of(ctx, package)?.install(false, copier.outpath()));
    body.extend(entries::association_writes(ctx, &package.file_associations)?);
    for command in &package.post_install {
        body.push(format!("ExecWait \"{}\"", escape_nsis_string(&ctx.resolve(command)?)));
    }

    Ok(block(format!("Section \"{name}\" {id}"), body, "SectionEnd"))
}

fn emit(
    ctx: &BuildContext<'_>,
    package: &PackageEntry,
    counter: &mut usize,
    labels: &mut Labels,
    lines: &mut Vec<String>,
) -> Result<()> {
    *counter += 1;
    let numbered = NumberedPackage {
        number: *counter,
        package,
    };
    let section = numbered
        .section_id()
        .map(|id| content_section(ctx, numbered, id, labels))
        .transpose()?;

    if !numbered.is_group() {
        lines.extend(section.unwrap_or_default());
        return Ok(());
    }

    let expanded = if package.description.is_empty() { "" } else { "/e " };
    let mut body = section.unwrap_or_default();
    for child in &package.children {
        emit(ctx, child, counter, labels, &mut body)?;
    }
    lines.extend(block(
        format!(
            "SectionGroup {expanded}\"{}\" {}",
            field(ctx, &package.name)?,
            numbered.component_id()
        ),
        body,
        "SectionGroupEnd",
    ));
    Ok(())
}

/// All component sections in document order.
pub fn package_sections(ctx: &BuildContext<'_>, labels: &mut Labels) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut counter = 0;
    for package in &ctx.config().packages {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        emit(ctx, package, &mut counter, labels, &mut lines)?;
    }
    Ok(lines)
}

/// Per-language `LangString`s and the components page description table.
pub fn component_descriptions(ctx: &BuildContext<'_>) -> Result<Vec<String>> {
    let described: Vec<_> = numbered_packages(ctx)
        .into_iter()
        .filter(|n| !n.package.description.is_empty())
        .collect();
    if described.is_empty() {
        return Ok(Vec::new());
    }

    let languages = ctx.language_names();
    let mut lines = vec!["; Component descriptions".to_string()];
    for numbered in &described {
        let id = numbered.component_id();
        for language in &languages {
            lines.push(format!(
                "LangString DESC_{id} ${{{}}} \"{}\"",
                nsis_language(language).lang_constant,
                field(ctx, numbered.package.description.text_for(language))?
            ));
        }
    }
    lines.push("!insertmacro MUI_FUNCTION_DESCRIPTION_BEGIN".to_string());
    for numbered in &described {
        let id = numbered.component_id();
        lines.push(format!("  !insertmacro MUI_DESCRIPTION_TEXT ${{{id}}} $(DESC_{id})"));
    }
    lines.push("!insertmacro MUI_FUNCTION_DESCRIPTION_END".to_string());
    Ok(lines)
}

/// Uninstall lines for per-package shortcuts, registry, associations and
/// environment, last package first.
pub fn package_cleanup(ctx: &BuildContext<'_>, labels: &mut Labels) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for package in ctx.config().all_packages().into_iter().rev() {
        lines.extend(entries::registry_deletes(ctx, &package.registry_entries)?);
        lines.extend(entries::association_deletes(ctx, &package.file_associations)?);
        lines.extend(entries::env_deletes(ctx, &package.env_vars, labels)?);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::{config::from_yaml_str, variables::ToolId};

    const PACKAGES: &str = r#"
app: {name: Demo}
languages: [English, French]
packages:
  Core:
    sources: [bin/demo.exe, bin/demo.dll]
    description:
      English: Core files
      French: Fichiers de base
  Plugins:
    optional: true
    description: Extra plugins
    children:
      Git:
        optional: true
        default: false
        source: plugins/git/**
        destination: $INSTDIR\plugins\git
        post_install: '"$INSTDIR\plugins\git\setup.exe" /quiet'
"#;

    fn with_ctx(test: impl FnOnce(&BuildContext<'_>)) {
        let (config, document) = from_yaml_str(PACKAGES).unwrap();
        let ctx = BuildContext::new(ToolId::Nsis, &config, &document);
        test(&ctx);
    }

    #[test]
    fn test_sections_and_groups() {
        with_ctx(|ctx| {
            let lines = package_sections(ctx, &mut Labels::new()).unwrap();
            assert_eq!(lines[0], "Section \"Core\" SEC_PKG_1");
            assert_eq!(
                lines.iter().filter(|l| l.trim() == "SetOutPath \"$INSTDIR\"").count(),
                2
            );
            assert!(lines.contains(&"SectionGroup /e \"Plugins\" SEC_GROUP_2".to_string()));
            assert!(lines.contains(&"  Section \"Git\" SEC_PKG_3".to_string()));
            assert!(lines.contains(&"    File /r \"plugins\\git\\**\"".to_string()));
            assert!(lines.contains(
                &"    ExecWait \"$\\\"$INSTDIR\\plugins\\git\\setup.exe$\\\" /quiet\"".to_string()
            ));
            assert_eq!(lines.last().unwrap(), "SectionGroupEnd");
            assert!(!lines.iter().any(|l| l.contains("SEC_PKG_2")));
        });
    }

    #[test]
    fn test_descriptions_per_language() {
        with_ctx(|ctx| {
            let lines = component_descriptions(ctx).unwrap();
            assert!(lines.contains(&"LangString DESC_SEC_PKG_1 ${LANG_ENGLISH} \"Core files\"".to_string()));
            assert!(lines.contains(
                &"LangString DESC_SEC_PKG_1 ${LANG_FRENCH} \"Fichiers de base\"".to_string()
            ));
            assert!(lines.contains(
                &"LangString DESC_SEC_GROUP_2 ${LANG_FRENCH} \"Extra plugins\"".to_string()
            ));
            assert!(lines.contains(
                &"  !insertmacro MUI_DESCRIPTION_TEXT ${SEC_GROUP_2} $(DESC_SEC_GROUP_2)".to_string()
            ));
            assert_eq!(lines.last().unwrap(), "!insertmacro MUI_FUNCTION_DESCRIPTION_END");
        });
    }

    #[test]
    fn test_initial_flags() {
        with_ctx(|ctx| {
            let flags: Vec<_> = numbered_packages(ctx)
                .iter()
                .map(|n| (n.section_id(), n.initial_flags()))
                .collect();
            assert_eq!(
                flags,
                vec![
                    (Some("SEC_PKG_1".to_string()), Some(17)),
                    (None, None),
                    (Some("SEC_PKG_3".to_string()), Some(0)),
                ]
            );
        });
    }
}
