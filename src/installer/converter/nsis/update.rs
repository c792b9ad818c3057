//! Update and repair settings stored in the registry.

use super::utils::{block, field};
use crate::installer::{
    config::{RegistryHive, UpdateConfig},
    context::BuildContext,
    error::Result,
};

fn enabled_update<'a>(ctx: &BuildContext<'a>) -> Option<&'a UpdateConfig> {
    let config = ctx.config();
    config.update.as_ref().filter(|_| config.update_enabled())
}

fn update_key(ctx: &BuildContext<'_>, update: &UpdateConfig) -> Result<String> {
    match update.registry_key.as_deref() {
        Some(key) if !key.is_empty() => field(ctx, key),
        _ => Ok(ctx.define_reference("REG_KEY")),
    }
}

fn flag(value: bool) -> u8 {
    u8::from(value)
}

/// Value name, define and whether the value is a DWORD.
const UPDATE_VALUES: &[(&str, &str, bool)] = &[
    ("UpdateURL", "UPDATE_URL", false),
    ("DownloadURL", "UPDATE_DOWNLOAD_URL", false),
    ("CheckOnStartup", "UPDATE_CHECK_ON_STARTUP", true),
    ("BackupOnUpgrade", "UPDATE_BACKUP_ON_UPGRADE", true),
    ("RepairEnabled", "UPDATE_REPAIR_ENABLED", true),
];

/// `!define`s and the hidden section writing the update settings.
pub fn update_section(ctx: &BuildContext<'_>) -> Result<Vec<String>> {
    let Some(update) = enabled_update(ctx) else {
        return Ok(Vec::new());
    };
    let hive: RegistryHive = update.registry_hive;
    let key = update_key(ctx, update)?;
    let view = ctx.effective_registry_view()?;

    let mut lines = vec![
        "; Update configuration".to_string(),
        format!("!define UPDATE_URL \"{}\"", field(ctx, &update.update_url)?),
        format!("!define UPDATE_DOWNLOAD_URL \"{}\"", field(ctx, &update.download_url)?),
        format!("!define UPDATE_CHECK_ON_STARTUP {}", flag(update.check_on_startup)),
        format!("!define UPDATE_BACKUP_ON_UPGRADE {}", flag(update.backup_on_upgrade)),
        format!("!define UPDATE_REPAIR_ENABLED {}", flag(update.repair_enabled)),
        String::new(),
    ];

    let mut body = vec![format!("SetRegView {}", view.as_str())];
    for (name, define, is_dword) in UPDATE_VALUES {
        body.push(if *is_dword {
            format!("WriteRegDWORD {hive} \"{key}\" \"{name}\" ${{{define}}}")
        } else {
            format!("WriteRegStr {hive} \"{key}\" \"{name}\" \"${{{define}}}\"")
        });
    }
    body.push("SetRegView default".to_string());
    lines.extend(block("Section \"-Update Configuration\"", body, "SectionEnd"));
    Ok(lines)
}

/// Uninstall lines removing the update settings.
pub fn update_cleanup(ctx: &BuildContext<'_>) -> Result<Vec<String>> {
    let Some(update) = enabled_update(ctx) else {
        return Ok(Vec::new());
    };
    let hive = update.registry_hive;
    let key = update_key(ctx, update)?;

    let mut lines = vec![format!("SetRegView {}", ctx.effective_registry_view()?.as_str())];
    lines.extend(
        UPDATE_VALUES
            .iter()
            .map(|(name, ..)| format!("DeleteRegValue {hive} \"{key}\" \"{name}\"")),
    );
    lines.push(format!("DeleteRegKey /ifempty {hive} \"{key}\""));
    lines.push("SetRegView default".to_string());
    Ok(lines)
}
