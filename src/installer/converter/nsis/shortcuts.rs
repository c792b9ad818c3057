//! Shortcut creation and removal.

use super::utils::{START_MENU_DIR, UNINSTALLER, field, install_path_field, path_field};
use crate::installer::{
    config::ShortcutConfig,
    context::BuildContext,
    error::{Error, Result},
};

/// Where a shortcut lands.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    Desktop,
    StartMenu,
    Startup,
    Directory(String),
}

impl Location {
    fn parse(ctx: &BuildContext<'_>, location: &str) -> Result<Self> {
        let normalized: String = location
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        Ok(match normalized.as_str() {
            "" | "desktop" => Location::Desktop,
            "startmenu" | "programs" | "smprograms" => Location::StartMenu,
            "startup" => Location::Startup,
            _ => Location::Directory(path_field(ctx, location)?),
        })
    }

    fn directory(&self) -> &str {
        match self {
            Location::Desktop => "$DESKTOP",
            Location::StartMenu => START_MENU_DIR,
            Location::Startup => "$SMSTARTUP",
            Location::Directory(dir) => dir,
        }
    }
}

/// A shortcut with every field resolved for the script.
#[derive(Debug, Clone)]
struct ResolvedShortcut {
    location: Location,
    link: String,
    target: String,
    args: String,
    icon: String,
    workdir: String,
}

impl ResolvedShortcut {
    fn new(ctx: &BuildContext<'_>, shortcut: &ShortcutConfig, location: Location) -> Result<Self> {
        if shortcut.target.trim().is_empty() {
            return Err(Error::InvalidConfig(format!(
                "shortcut `{}` has no target",
                shortcut.name
            )));
        }
        let name = if shortcut.name.is_empty() {
            ctx.define_reference("APP_NAME")
        } else {
            field(ctx, &shortcut.name)?
        };
        let icon = if shortcut.icon.is_empty() {
            String::new()
        } else {
            install_path_field(ctx, &shortcut.icon)?
        };
        let workdir = if shortcut.workdir.is_empty() {
            String::new()
        } else {
            install_path_field(ctx, &shortcut.workdir)?
        };
        Ok(Self {
            link: format!("{}\\{name}.lnk", location.directory()),
            location,
            target: install_path_field(ctx, &shortcut.target)?,
            args: field(ctx, &shortcut.args)?,
            icon,
            workdir,
        })
    }

    fn create(&self, lines: &mut Vec<String>) {
        if !self.workdir.is_empty() {
            lines.push(format!("SetOutPath \"{}\"", self.workdir));
        }
        let mut command = format!("CreateShortCut \"{}\" \"{}\"", self.link, self.target);
        if !self.icon.is_empty() {
            command.push_str(&format!(" \"{}\" \"{}\" 0", self.args, self.icon));
        } else if !self.args.is_empty() {
            command.push_str(&format!(" \"{}\"", self.args));
        }
        lines.push(command);
    }
}

/// Shortcuts of one install scope, in creation order.
#[derive(Debug, Default)]
pub struct ShortcutSet {
    shortcuts: Vec<ResolvedShortcut>,
}

impl ShortcutSet {
    /// Collects the desktop, start menu and extra shortcuts of one scope.
    pub fn collect(
        ctx: &BuildContext<'_>,
        desktop: Option<&ShortcutConfig>,
        start_menu: Option<&ShortcutConfig>,
        extra: &[ShortcutConfig],
    ) -> Result<Self> {
        let mut shortcuts = Vec::new();
        if let Some(shortcut) = desktop {
            shortcuts.push(ResolvedShortcut::new(ctx, shortcut, Location::Desktop)?);
        }
        if let Some(shortcut) = start_menu {
            shortcuts.push(ResolvedShortcut::new(ctx, shortcut, Location::StartMenu)?);
        }
        for shortcut in extra {
            let location = Location::parse(ctx, &shortcut.location)?;
            shortcuts.push(ResolvedShortcut::new(ctx, shortcut, location)?);
        }
        Ok(Self { shortcuts })
    }

    fn uses_start_menu(&self) -> bool {
        self.shortcuts.iter().any(|s| s.location == Location::StartMenu)
    }

    /// Install lines. The start menu folder also gets an uninstall link.
    ///
    /// `restore_outpath` is the directory to return to after a shortcut
    /// changed the working directory.
    pub fn install(&self, with_uninstall_link: bool, restore_outpath: &str) -> Vec<String> {
        let mut lines = Vec::new();
        let mut created_dirs: Vec<&str> = Vec::new();
        let mut changed_outpath = false;
        for shortcut in &self.shortcuts {
            let dir = shortcut.location.directory();
            if matches!(shortcut.location, Location::StartMenu | Location::Directory(_))
                && !created_dirs.contains(&dir)
            {
                lines.push(format!("CreateDirectory \"{dir}\""));
                created_dirs.push(dir);
            }
            shortcut.create(&mut lines);
            changed_outpath |= !shortcut.workdir.is_empty();
        }
        if with_uninstall_link && self.uses_start_menu() {
            lines.push(format!(
                "CreateShortCut \"{START_MENU_DIR}\\Uninstall.lnk\" \"{UNINSTALLER}\""
            ));
        }
        if changed_outpath {
            lines.push(format!("SetOutPath \"{restore_outpath}\""));
        }
        lines
    }

    /// Link deletions. Folders are left to [`ShortcutSet::remove_dirs`].
    pub fn delete_links(&self, with_uninstall_link: bool) -> Vec<String> {
        let mut lines: Vec<String> = self
            .shortcuts
            .iter()
            .map(|s| format!("Delete \"{}\"", s.link))
            .collect();
        if with_uninstall_link && self.uses_start_menu() {
            lines.push(format!("Delete \"{START_MENU_DIR}\\Uninstall.lnk\""));
        }
        lines
    }

    /// `RMDir` for every folder `install` created across `sets`, deepest
    /// first. Must run after all links are gone.
    pub fn remove_dirs<'s>(sets: impl IntoIterator<Item = &'s ShortcutSet>) -> Vec<String> {
        let mut dirs: Vec<&str> = Vec::new();
        for shortcut in sets.into_iter().flat_map(|set| &set.shortcuts) {
            let dir = shortcut.location.directory();
            if matches!(shortcut.location, Location::StartMenu | Location::Directory(_))
                && dir != "$INSTDIR"
                && !dirs.contains(&dir)
            {
                dirs.push(dir);
            }
        }
        dirs.sort_by(|a, b| {
            let depth = |d: &str| d.matches('\\').count();
            depth(b)
                .cmp(&depth(a))
                .then_with(|| b.len().cmp(&a.len()))
                .then_with(|| a.cmp(b))
        });
        dirs.into_iter().map(|dir| format!("RMDir \"{dir}\"")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::{config::from_yaml_str, variables::ToolId};

    fn collect(yaml: &str, test: impl FnOnce(&ShortcutSet)) {
        let (config, document) = from_yaml_str(yaml).unwrap();
        let ctx = BuildContext::new(ToolId::Nsis, &config, &document);
        let install = &config.install;
        let set = ShortcutSet::collect(
            &ctx,
            install.desktop_shortcut.as_ref(),
            install.start_menu_shortcut.as_ref(),
            &install.shortcuts,
        )
        .unwrap();
        test(&set);
    }

    #[test]
    fn test_desktop_and_start_menu() {
        collect(
            "app: {name: Demo}\ninstall: {desktop_shortcut: bin/demo.exe, start_menu_shortcut: bin/demo.exe}",
            |set| {
                let lines = set.install(true, "$INSTDIR");
                assert_eq!(
                    lines,
                    vec![
                        "CreateShortCut \"$DESKTOP\\${APP_NAME}.lnk\" \"$INSTDIR\\bin\\demo.exe\"",
                        "CreateDirectory \"$SMPROGRAMS\\${APP_NAME}\"",
                        "CreateShortCut \"$SMPROGRAMS\\${APP_NAME}\\${APP_NAME}.lnk\" \"$INSTDIR\\bin\\demo.exe\"",
                        "CreateShortCut \"$SMPROGRAMS\\${APP_NAME}\\Uninstall.lnk\" \"$INSTDIR\\Uninstall.exe\"",
                    ]
                );
                let links = set.delete_links(true);
                assert_eq!(links.len(), 3);
                assert!(links.iter().all(|l| l.starts_with("Delete ")));
                assert_eq!(
                    ShortcutSet::remove_dirs([set]),
                    vec!["RMDir \"$SMPROGRAMS\\${APP_NAME}\""]
                );
            },
        );
    }

    #[test]
    fn test_extra_shortcuts() {
        collect(
            r#"
app: {name: Demo}
install:
  shortcuts:
    - name: Demo Tools
      target: $INSTDIR\tools.exe
      location: Startup
      args: --tray
    - name: Docs
      target: docs/index.html
      location: $INSTDIR\links
      icon: assets/doc.ico
      workdir: docs
"#,
            |set| {
                let lines = set.install(false, "$INSTDIR");
                assert_eq!(
                    lines,
                    vec![
                        "CreateShortCut \"$SMSTARTUP\\Demo Tools.lnk\" \"$INSTDIR\\tools.exe\" \"--tray\"",
                        "CreateDirectory \"$INSTDIR\\links\"",
                        "SetOutPath \"$INSTDIR\\docs\"",
                        "CreateShortCut \"$INSTDIR\\links\\Docs.lnk\" \"$INSTDIR\\docs\\index.html\" \"\" \"$INSTDIR\\assets\\doc.ico\" 0",
                        "SetOutPath \"$INSTDIR\"",
                    ]
                );
                assert_eq!(
                    set.delete_links(false),
                    vec![
                        "Delete \"$SMSTARTUP\\Demo Tools.lnk\"",
                        "Delete \"$INSTDIR\\links\\Docs.lnk\"",
                    ]
                );
                assert_eq!(ShortcutSet::remove_dirs([set]), vec!["RMDir \"$INSTDIR\\links\""]);
            },
        );
    }

    #[test]
    fn test_missing_target_is_rejected() {
        let (config, document) =
            from_yaml_str("app: {name: Demo}\ninstall: {shortcuts: [{name: Broken}]}").unwrap();
        let ctx = BuildContext::new(ToolId::Nsis, &config, &document);
        let err = ShortcutSet::collect(&ctx, None, None, &config.install.shortcuts).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
