//! Script header and Modern UI page setup.

use super::{
    functions::EXISTING_INSTALL_LEAVE,
    template::NSI_HEADER_TEMPLATE,
    utils::{self, field, path_field},
};
use crate::installer::{
    context::BuildContext,
    error::Result,
    languages::nsis_language,
};
use handlebars::Handlebars;
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Defines, includes and global installer attributes.
pub fn header(ctx: &BuildContext<'_>) -> Result<Vec<String>> {
    let config = ctx.config();
    let app = &config.app;

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.register_template_string("header.nsi", NSI_HEADER_TEMPLATE)?;

    let primary_language = ctx.language_names().into_iter().next().unwrap_or_default();
    let out_file = if config.install.installer_name.is_empty() {
        format!(
            "{}-{}-Setup.exe",
            ctx.define_reference("APP_NAME"),
            ctx.define_reference("APP_VERSION")
        )
    } else {
        field(ctx, &config.install.installer_name)?
    };
    let branding = app
        .branding_text()
        .map(|text| field(ctx, text))
        .transpose()?;
    let custom_includes = config
        .custom_includes
        .get(ctx.tool().name())
        .map(|includes| {
            includes
                .iter()
                .map(|include| path_field(ctx, include))
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?
        .unwrap_or_default();
    let needs_winver = config
        .install
        .system_requirements
        .as_ref()
        .is_some_and(|r| !r.min_windows_version.is_empty());
    let execution_level = if utils::is_per_user(ctx)? { "user" } else { "admin" };

    let mut data: BTreeMap<&str, Value> = BTreeMap::new();
    data.insert("generator_version", json!(env!("CARGO_PKG_VERSION")));
    data.insert("app_name", json!(field(ctx, &app.name)?));
    data.insert("app_version", json!(field(ctx, &app.version)?));
    data.insert("app_publisher", json!(field(ctx, &app.publisher)?));
    data.insert(
        "app_description",
        json!(field(ctx, app.description.text_for(&primary_language))?),
    );
    data.insert("reg_key", json!(field(ctx, &config.registry_key())?));
    data.insert(
        "version_nsis",
        json!(utils::format_version_for_nsis(&ctx.resolve(&app.version)?)),
    );
    data.insert("needs_winver", json!(needs_winver));
    data.insert("custom_includes", json!(custom_includes));
    data.insert("out_file", json!(out_file));
    data.insert("install_dir", json!(path_field(ctx, &config.install.install_dir)?));
    data.insert("product_hive", json!(utils::product_hive(ctx)?.to_string()));
    data.insert("execution_level", json!(execution_level));
    data.insert(
        "compression",
        json!(utils::map_compression(config.install.compression)),
    );
    data.insert("silent_install", json!(config.install.silent_install));
    data.insert("branding", json!(branding));

    let rendered = handlebars.render("header.nsi", &data)?;
    let mut lines: Vec<String> = rendered.lines().map(str::to_string).collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    Ok(lines)
}

/// Modern UI settings, wizard pages and languages.
pub fn modern_ui(ctx: &BuildContext<'_>) -> Result<Vec<String>> {
    let config = ctx.config();
    let app = &config.app;
    let languages = ctx.language_names();
    let mut lines = vec!["; Modern UI".to_string(), "!define MUI_ABORTWARNING".to_string()];

    if !app.install_icon.is_empty() {
        lines.push(format!("!define MUI_ICON \"{}\"", path_field(ctx, &app.install_icon)?));
    }
    if !app.uninstall_icon().is_empty() {
        lines.push(format!(
            "!define MUI_UNICON \"{}\"",
            path_field(ctx, app.uninstall_icon())?
        ));
    }
    lines.push(String::new());

    lines.push("!insertmacro MUI_PAGE_WELCOME".to_string());
    if !app.license.is_empty() {
        if app.license.is_translated() {
            lines.push("!insertmacro MUI_PAGE_LICENSE \"$(LICENSE_FILE)\"".to_string());
        } else {
            lines.push(format!(
                "!insertmacro MUI_PAGE_LICENSE \"{}\"",
                path_field(ctx, app.license.first())?
            ));
        }
    }
    if !config.packages.is_empty() {
        lines.push("!insertmacro MUI_PAGE_COMPONENTS".to_string());
    }
    if config.install.existing_install.checks_selected_dir() {
        lines.push(format!("!define MUI_PAGE_CUSTOMFUNCTION_LEAVE {EXISTING_INSTALL_LEAVE}"));
    }
    lines.push("!insertmacro MUI_PAGE_DIRECTORY".to_string());
    lines.push("!insertmacro MUI_PAGE_INSTFILES".to_string());
    if !config.install.launch_on_finish.is_empty() {
        lines.push(format!(
            "!define MUI_FINISHPAGE_RUN \"{}\"",
            utils::install_path_field(ctx, &config.install.launch_on_finish)?
        ));
    }
    lines.push("!insertmacro MUI_PAGE_FINISH".to_string());
    lines.push(String::new());
    lines.push("!insertmacro MUI_UNPAGE_CONFIRM".to_string());
    lines.push("!insertmacro MUI_UNPAGE_INSTFILES".to_string());
    lines.push(String::new());

    for language in &languages {
        lines.push(format!(
            "!insertmacro MUI_LANGUAGE \"{}\"",
            nsis_language(language).mui_name
        ));
    }
    if app.license.is_translated() {
        for language in &languages {
            lines.push(format!(
                "LicenseLangString LICENSE_FILE ${{{}}} \"{}\"",
                nsis_language(language).lang_constant,
                path_field(ctx, app.license.text_for(language))?
            ));
        }
    }
    if languages.len() > 1 {
        lines.push("!insertmacro MUI_RESERVEFILE_LANGDLL".to_string());
    }
    Ok(lines)
}
