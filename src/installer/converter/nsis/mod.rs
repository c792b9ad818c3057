//! NSIS script generation.
//!
//! Renders a package description as a Modern UI NSIS script. The script is
//! assembled from independent sub-generators, each producing one labelled
//! fragment of a [`GeneratedScript`].
//!
//! # Module Organization
//!
//! - `template` - Header template constant
//! - `header` - Defines, includes, installer attributes and Modern UI pages
//! - `helpers` - PATH list functions and install log macros
//! - `files` - File copy and removal
//! - `entries` - Registry values, environment variables, file associations
//! - `shortcuts` - Shortcut creation and removal
//! - `packages` - Component sections and descriptions
//! - `sections` - Main install, finalize and uninstall sections
//! - `functions` - `.onInit` and friends
//! - `update` - Update settings
//! - `utils` - Escaping, paths, version formatting

mod entries;
mod files;
mod functions;
mod header;
mod helpers;
mod packages;
mod sections;
mod shortcuts;
mod template;
mod update;
mod utils;

pub use utils::{escape_nsis_string, format_version_for_nsis};

use super::{Converter, GeneratedScript};
use crate::installer::{context::BuildContext, error::Result, variables::ToolId};
use entries::Labels;

/// NSIS backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NsisConverter;

impl NsisConverter {
    pub fn new() -> Self {
        Self
    }

    /// Generates the script as labelled fragments.
    ///
    /// Fragment order: `header`, `ui`, `update`, `log`, `helpers`, `install`,
    /// `packages`, `finalize`, `descriptions`, `uninstall`, `dir_leave`, `init`,
    /// `un_init`, `callbacks`. Fragments with nothing to say are omitted.
    pub fn generate(&self, ctx: &BuildContext<'_>) -> Result<GeneratedScript> {
        let config = ctx.config();
        let mut labels = Labels::new();
        let mut script = GeneratedScript::new();

        script.push("header", header::header(ctx)?);
        script.push("ui", header::modern_ui(ctx)?);
        script.push("update", update::update_section(ctx)?);
        script.push("log", helpers::log_macros(ctx)?);
        if config.needs_path_helpers() {
            script.push("helpers", helpers::path_helpers());
        }
        script.push("install", sections::install_section(ctx, &mut labels)?);
        script.push("packages", packages::package_sections(ctx, &mut labels)?);
        script.push("finalize", sections::finalize_section(ctx)?);
        script.push("descriptions", packages::component_descriptions(ctx)?);
        script.push("uninstall", sections::uninstall_section(ctx, &mut labels)?);
        script.push("dir_leave", functions::existing_install_dir_leave(ctx));
        script.push("init", functions::on_init(ctx)?);
        script.push("un_init", functions::un_on_init(ctx));
        script.push("callbacks", functions::on_inst_end(ctx));

        log::debug!(
            "generated NSIS script for {} with {} fragments",
            config.app.name,
            script.labels().count()
        );
        Ok(script)
    }
}

impl Converter for NsisConverter {
    fn tool(&self) -> ToolId {
        ToolId::Nsis
    }

    fn convert(&self, ctx: &BuildContext<'_>) -> Result<String> {
        log::info!("converting {} to NSIS", ctx.config().app.name);
        Ok(self.generate(ctx)?.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::config::from_yaml_str;

    const FULL: &str = r#"
app:
  name: Demo
  version: 1.2.3
  publisher: ACME
  description: Demo application
install:
  install_dir: $PROGRAMFILES64\${app.name}
  desktop_shortcut: bin/demo.exe
  start_menu_shortcut: bin/demo.exe
  registry_entries:
    - {hive: HKLM, key: 'Software\ACME\Demo\Settings', name: Theme, value: dark}
    - {hive: HKCU, key: 'Software\ACME\Demo', name: Level, value: 2, type: dword, view: 32}
  env_vars:
    - {name: DEMO_HOME, value: $INSTDIR}
    - {name: PATH, value: '$INSTDIR\bin', append: true, scope: user}
  file_associations:
    - {extension: .demo, prog_id: Demo.File, application: bin/demo.exe}
files:
  - bin/demo.exe
  - {source: docs/**, destination: $INSTDIR\docs}
packages:
  Tools:
    optional: true
    source: tools/**
    destination: $INSTDIR\tools
    description: Command line tools
    registry_entries:
      - {key: 'Software\ACME\Tools', name: Enabled, value: 1, type: dword}
update:
  enabled: true
  update_url: https://example.com/update.json
logging:
  enabled: true
"#;

    fn generate(yaml: &str) -> GeneratedScript {
        let (config, document) = from_yaml_str(yaml).unwrap();
        let ctx = BuildContext::new(ToolId::Nsis, &config, &document);
        NsisConverter::new().generate(&ctx).unwrap()
    }

    /// `(hive, key)` of a registry instruction.
    fn hive_and_key(line: &str) -> (String, String) {
        let mut parts = line.trim().splitn(2, ' ').nth(1).unwrap_or("").trim_start();
        if let Some(rest) = parts.strip_prefix("/ifempty ") {
            parts = rest;
        }
        let (hive, rest) = parts.split_once(' ').unwrap();
        let key = rest.trim_start_matches('"').split('"').next().unwrap();
        (hive.to_string(), key.to_string())
    }

    #[test]
    fn test_fragment_order() {
        let script = generate(FULL);
        assert_eq!(
            script.labels().collect::<Vec<_>>(),
            vec![
                "header",
                "ui",
                "update",
                "log",
                "helpers",
                "install",
                "packages",
                "finalize",
                "descriptions",
                "uninstall",
                "init",
                "callbacks",
            ]
        );
    }

    #[test]
    fn test_every_registry_write_is_undone() {
        let script = generate(FULL);
        let uninstall = script.fragment("uninstall").unwrap();
        let deletes: Vec<(bool, String, String)> = uninstall
            .iter()
            .filter(|l| l.trim().starts_with("DeleteReg"))
            .map(|l| {
                let (hive, key) = hive_and_key(l);
                (l.trim().starts_with("DeleteRegKey"), hive, key)
            })
            .collect();

        for label in ["install", "packages", "update"] {
            for line in script.fragment(label).unwrap() {
                if !line.trim().starts_with("WriteReg") {
                    continue;
                }
                let (hive, key) = hive_and_key(line);
                let undone = deletes.iter().any(|(is_key, h, k)| {
                    *h == hive && (*k == key || (*is_key && key.starts_with(&format!("{k}\\"))))
                });
                assert!(undone, "no uninstall counterpart for `{}`", line.trim());
            }
        }
    }

    #[test]
    fn test_path_helpers_only_when_needed() {
        let script = generate("app: {name: Demo}\ninstall: {env_vars: [{name: X, value: y}]}");
        assert!(script.fragment("helpers").is_none());
        assert!(!script.render().contains("_StrContains"));
        assert!(generate(FULL).render().contains("Call un._RemovePathEntry"));
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let (config, document) = from_yaml_str(FULL).unwrap();
        let ctx = BuildContext::new(ToolId::Nsis, &config, &document);
        let converter = NsisConverter::new();
        assert_eq!(converter.convert(&ctx).unwrap(), converter.convert(&ctx).unwrap());
    }

    #[test]
    fn test_references_are_resolved() {
        let rendered = generate(FULL).render();
        assert!(rendered.contains("InstallDir \"$PROGRAMFILES64\\Demo\""));
        assert!(!rendered.contains("${app.name}"));
    }

    #[test]
    fn test_minimal_script() {
        let script = generate("app: {name: Demo}");
        let rendered = script.render();
        assert!(rendered.starts_with("; Generated by ypack"));
        assert!(rendered.contains("Section \"-Install\" SEC_INSTALL"));
        assert!(rendered.contains("Section \"Uninstall\""));
        assert!(script.fragment("packages").is_none());
        assert!(script.fragment("descriptions").is_none());
        assert!(!rendered.contains("BrandingText"));
    }
}
