//! Main install, finalize and uninstall sections.

use super::{
    entries::{self, Labels},
    files::{FileCopier, FileRemoval},
    packages,
    shortcuts::ShortcutSet,
    update,
    utils::{UNINSTALLER, block, field, product_hive},
};
use crate::installer::{context::BuildContext, error::Result};

/// Value name and value of the Add/Remove Programs entry.
const UNINSTALL_VALUES: &[(&str, &str)] = &[
    ("DisplayName", "\"${APP_NAME}\""),
    ("DisplayVersion", "\"${APP_VERSION}\""),
    ("Publisher", "\"${APP_PUBLISHER}\""),
    ("UninstallString", "\"$\\\"$INSTDIR\\Uninstall.exe$\\\"\""),
    ("QuietUninstallString", "\"$\\\"$INSTDIR\\Uninstall.exe$\\\" /S\""),
    ("InstallLocation", "\"$INSTDIR\""),
    ("DisplayIcon", "\"$INSTDIR\\Uninstall.exe\""),
];

fn top_level_shortcuts(ctx: &BuildContext<'_>) -> Result<ShortcutSet> {
    let install = &ctx.config().install;
    ShortcutSet::collect(
        ctx,
        install.desktop_shortcut.as_ref(),
        install.start_menu_shortcut.as_ref(),
        &install.shortcuts,
    )
}

/// Product key and Add/Remove Programs values.
fn product_registry(ctx: &BuildContext<'_>) -> Result<Vec<String>> {
    let hive = product_hive(ctx)?;
    let mut lines = vec![
        format!("SetRegView {}", ctx.effective_registry_view()?.as_str()),
        format!("WriteRegStr {hive} \"${{REG_KEY}}\" \"InstallPath\" \"$INSTDIR\""),
        format!("WriteRegStr {hive} \"${{REG_KEY}}\" \"Version\" \"${{APP_VERSION}}\""),
    ];
    lines.extend(UNINSTALL_VALUES.iter().map(|(name, value)| {
        format!("WriteRegStr {hive} \"${{UNINSTALL_KEY}}\" \"{name}\" {value}")
    }));
    lines.push(format!("WriteRegDWORD {hive} \"${{UNINSTALL_KEY}}\" \"NoModify\" 1"));
    lines.push(format!("WriteRegDWORD {hive} \"${{UNINSTALL_KEY}}\" \"NoRepair\" 1"));
    lines.push("SetRegView default".to_string());
    Ok(lines)
}

/// `Section "-Install"`: top-level files, uninstaller, registry,
/// environment, shortcuts and associations.
pub fn install_section(ctx: &BuildContext<'_>, labels: &mut Labels) -> Result<Vec<String>> {
    let config = ctx.config();
    let install = &config.install;
    let mut body = Vec::new();
    if config.logging_enabled() {
        body.push("!insertmacro LogInit".to_string());
        body.push("!insertmacro LogWrite \"Installing ${APP_NAME} ${APP_VERSION}\"".to_string());
    }
    body.push("SetOutPath \"$INSTDIR\"".to_string());

    let mut copier = FileCopier::new(false);
    for file in &config.files {
        copier.copy(ctx, &file.source, &file.destination, &mut body)?;
    }
    copier.set_outpath("$INSTDIR".to_string(), &mut body);
    body.push(format!("WriteUninstaller \"{UNINSTALLER}\""));

    body.extend(product_registry(ctx)?);
    body.extend(entries::registry_writes(ctx, &install.registry_entries)?);
    body.extend(entries::env_writes(ctx, &install.env_vars, labels)?);
    body.extend(top_level_shortcuts(ctx)?.install(true, "$INSTDIR"));
    body.extend(entries::association_writes(ctx, &install.file_associations)?);

    Ok(block("Section \"-Install\" SEC_INSTALL", body, "SectionEnd"))
}

/// `Section "-Finalize"`: runs after every package section so the
/// estimated size covers all installed files.
pub fn finalize_section(ctx: &BuildContext<'_>) -> Result<Vec<String>> {
    let hive = product_hive(ctx)?;
    let mut body = vec![
        format!("SetRegView {}", ctx.effective_registry_view()?.as_str()),
        "${GetSize} \"$INSTDIR\" \"/S=0K\" $0 $1 $2".to_string(),
        "IntFmt $0 \"0x%08X\" $0".to_string(),
        format!("WriteRegDWORD {hive} \"${{UNINSTALL_KEY}}\" \"EstimatedSize\" \"$0\""),
        "SetRegView default".to_string(),
    ];
    if ctx.config().logging_enabled() {
        body.push("!insertmacro LogWrite \"Installation complete\"".to_string());
    }
    Ok(block("Section \"-Finalize\"", body, "SectionEnd"))
}

/// `Section "Uninstall"`: reverses everything the install side wrote.
///
/// Shortcut links go first, then files, then the folders both left behind,
/// registry and environment, and finally the log, the uninstaller and
/// `$INSTDIR`.
pub fn uninstall_section(ctx: &BuildContext<'_>, labels: &mut Labels) -> Result<Vec<String>> {
    let config = ctx.config();
    let install = &config.install;
    let logging = config.logging.as_ref().filter(|l| l.enabled);

    let mut body = Vec::new();
    if logging.is_some() {
        body.push("!insertmacro LogInit".to_string());
        body.push("!insertmacro LogWrite \"Uninstalling ${APP_NAME} ${APP_VERSION}\"".to_string());
    }

    let mut shortcut_sets = vec![top_level_shortcuts(ctx)?];
    for package in config.all_packages().into_iter().rev() {
        shortcut_sets.push(packages::shortcuts_of(ctx, package)?);
    }
    for (index, set) in shortcut_sets.iter().enumerate() {
        body.extend(set.delete_links(index == 0));
    }

    let mut removal = FileRemoval::new();
    removal.remove_group(
        ctx,
        config
            .files
            .iter()
            .map(|f| (f.source.as_str(), f.destination.as_str())),
    )?;
    for package in config.all_packages().into_iter().rev() {
        removal.remove_group(
            ctx,
            package
                .sources
                .iter()
                .map(|s| (s.source.as_str(), s.destination.as_str())),
        )?;
    }
    let install_dir_removal = removal.install_dir_removal();
    body.extend(removal.into_lines());
    body.extend(ShortcutSet::remove_dirs(&shortcut_sets));

    let hive = product_hive(ctx)?;
    body.extend([
        format!("SetRegView {}", ctx.effective_registry_view()?.as_str()),
        format!("DeleteRegKey {hive} \"${{UNINSTALL_KEY}}\""),
        format!("DeleteRegKey {hive} \"${{REG_KEY}}\""),
        "SetRegView default".to_string(),
    ]);
    body.extend(entries::registry_deletes(ctx, &install.registry_entries)?);
    body.extend(entries::association_deletes(ctx, &install.file_associations)?);
    body.extend(entries::env_deletes(ctx, &install.env_vars, labels)?);
    body.extend(packages::package_cleanup(ctx, labels)?);
    body.extend(update::update_cleanup(ctx)?);

    if let Some(logging) = logging {
        body.push("!insertmacro LogWrite \"Uninstallation complete\"".to_string());
        body.push("!insertmacro LogClose".to_string());
        body.push(format!("Delete \"{}\"", field(ctx, &logging.path)?));
    }
    body.push(format!("Delete \"{UNINSTALLER}\""));
    body.push(install_dir_removal);

    Ok(block("Section \"Uninstall\"", body, "SectionEnd"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::{config::from_yaml_str, variables::ToolId};

    fn sections(yaml: &str) -> (Vec<String>, Vec<String>) {
        let (config, document) = from_yaml_str(yaml).unwrap();
        let ctx = BuildContext::new(ToolId::Nsis, &config, &document);
        let mut labels = Labels::new();
        (
            install_section(&ctx, &mut labels).unwrap(),
            uninstall_section(&ctx, &mut labels).unwrap(),
        )
    }

    #[test]
    fn test_outpath_per_destination() {
        let (install, _) = sections(
            r#"
app: {name: Demo}
files:
  - bin/demo.exe
  - {source: docs/**, destination: $INSTDIR\docs}
"#,
        );
        let outpaths: Vec<_> = install.iter().filter(|l| l.contains("SetOutPath")).collect();
        assert_eq!(
            outpaths,
            vec![
                "  SetOutPath \"$INSTDIR\"",
                "  SetOutPath \"$INSTDIR\\docs\"",
                "  SetOutPath \"$INSTDIR\"",
            ]
        );
        assert!(install.contains(&"  WriteUninstaller \"$INSTDIR\\Uninstall.exe\"".to_string()));
    }

    #[test]
    fn test_product_registry_view_is_restored() {
        let (install, uninstall) = sections("app: {name: Demo, publisher: ACME}");
        let set_view = install.iter().position(|l| l == "  SetRegView 64").unwrap();
        let restore = install.iter().position(|l| l == "  SetRegView default").unwrap();
        assert!(set_view < restore);
        assert!(install[set_view..restore]
            .iter()
            .any(|l| l.contains("\"${UNINSTALL_KEY}\" \"UninstallString\"")));
        assert!(uninstall.contains(&"  DeleteRegKey HKLM \"${REG_KEY}\"".to_string()));
        assert!(uninstall.contains(&"  DeleteRegKey HKLM \"${UNINSTALL_KEY}\"".to_string()));
    }

    #[test]
    fn test_uninstall_order() {
        let (_, uninstall) = sections(
            r#"
app: {name: Demo}
files: [a.exe, b.exe]
logging: {enabled: true}
packages:
  Extras:
    source: extras/tool.exe
    destination: $INSTDIR\extras
"#,
        );
        let position = |needle: &str| uninstall.iter().position(|l| l.trim() == needle).unwrap();
        assert!(position("Delete \"$INSTDIR\\b.exe\"") < position("Delete \"$INSTDIR\\a.exe\""));
        assert!(position("Delete \"$INSTDIR\\a.exe\"") < position("Delete \"$INSTDIR\\extras\\tool.exe\""));
        assert!(position("RMDir \"$INSTDIR\\extras\"") < position("Delete \"$INSTDIR\\Uninstall.exe\""));
        assert!(position("Delete \"$INSTDIR\\install.log\"") < position("RMDir \"$INSTDIR\""));
    }

    #[test]
    fn test_shortcut_folders_removed_after_every_link() {
        let (_, uninstall) = sections(
            r#"
app: {name: Demo}
files: [bin/demo.exe]
install:
  start_menu_shortcut: bin/demo.exe
  shortcuts:
    - {name: Docs, target: docs/index.html, location: $INSTDIR\links}
packages:
  Tools:
    source: tools/tool.exe
    destination: $INSTDIR\tools
    start_menu_shortcut: {name: Tool, target: $INSTDIR\tools\tool.exe}
"#,
        );
        let position = |needle: &str| {
            uninstall
                .iter()
                .position(|l| l.trim() == needle)
                .unwrap_or_else(|| panic!("missing `{needle}`"))
        };
        let start_menu = position("RMDir \"$SMPROGRAMS\\${APP_NAME}\"");
        let links_dir = position("RMDir \"$INSTDIR\\links\"");
        let install_dir = position("RMDir \"$INSTDIR\"");

        for link in [
            "Delete \"$SMPROGRAMS\\${APP_NAME}\\${APP_NAME}.lnk\"",
            "Delete \"$SMPROGRAMS\\${APP_NAME}\\Uninstall.lnk\"",
            "Delete \"$SMPROGRAMS\\${APP_NAME}\\Tool.lnk\"",
            "Delete \"$INSTDIR\\links\\Docs.lnk\"",
        ] {
            let deleted = position(link);
            assert!(deleted < start_menu && deleted < links_dir && deleted < install_dir, "{link}");
        }
        assert!(links_dir < install_dir);
        assert!(position("RMDir \"$INSTDIR\\tools\"") < install_dir);
        assert_eq!(
            uninstall.iter().filter(|l| l.trim() == "RMDir \"$SMPROGRAMS\\${APP_NAME}\"").count(),
            1
        );
        assert_eq!(uninstall.iter().rev().nth(1).unwrap().trim(), "RMDir \"$INSTDIR\"");
    }

    #[test]
    fn test_log_opens_before_any_work() {
        let (install, uninstall) = sections("app: {name: Demo}\nlogging: {enabled: true}");
        assert_eq!(install[1], "  !insertmacro LogInit");
        assert!(install[2].contains("LogWrite"));
        assert_eq!(install[3], "  SetOutPath \"$INSTDIR\"");

        assert_eq!(uninstall[1], "  !insertmacro LogInit");
        let position = |needle: &str| uninstall.iter().position(|l| l.trim() == needle).unwrap();
        let close = position("!insertmacro LogClose");
        assert!(position("DeleteRegKey HKLM \"${REG_KEY}\"") < close);
        assert!(close < position("Delete \"$INSTDIR\\install.log\""));
    }

    #[test]
    fn test_finalize_writes_estimated_size() {
        let (config, document) = from_yaml_str("app: {name: Demo}").unwrap();
        let ctx = BuildContext::new(ToolId::Nsis, &config, &document);
        let lines = finalize_section(&ctx).unwrap();
        assert!(lines.contains(&"  IntFmt $0 \"0x%08X\" $0".to_string()));
        assert!(lines.contains(
            &"  WriteRegDWORD HKLM \"${UNINSTALL_KEY}\" \"EstimatedSize\" \"$0\"".to_string()
        ));
    }
}
