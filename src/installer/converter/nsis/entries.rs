//! Registry values, environment variables and file associations.
//!
//! Every emitter comes in a pair: the install half writes, the uninstall half
//! removes exactly what was written (same hive, same key), or an ancestor key.

use super::utils::{
    self, ASSOC_CHANGED, ENV_BROADCAST, association_root, env_location, escape_nsis_string, field,
};
use crate::installer::{
    config::{EnvVarEntry, FileAssociation, RegistryEntry, RegistryValueType, RegistryView},
    context::BuildContext,
    error::{Error, Result},
};

/// Hands out script-unique label suffixes.
#[derive(Debug, Default)]
pub struct Labels {
    next: usize,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next free index; labels built from it never collide.
    pub fn next_index(&mut self) -> usize {
        self.next += 1;
        self.next
    }
}

fn effective_view(ctx: &BuildContext<'_>, view: RegistryView) -> Result<RegistryView> {
    match view {
        RegistryView::Auto => ctx.effective_registry_view(),
        explicit => Ok(explicit),
    }
}

/// Runs `emit` over `entries`, wrapping each run of equal views in
/// `SetRegView <view>` / `SetRegView default`.
fn with_views<F>(ctx: &BuildContext<'_>, entries: &[RegistryEntry], mut emit: F) -> Result<Vec<String>>
where
    F: FnMut(&RegistryEntry, &mut Vec<String>) -> Result<()>,
{
    let mut lines = Vec::new();
    let mut current: Option<RegistryView> = None;
    for entry in entries {
        let view = effective_view(ctx, entry.view)?;
        if current != Some(view) {
            if current.is_some() {
                lines.push("SetRegView default".to_string());
            }
            lines.push(format!("SetRegView {}", view.as_str()));
            current = Some(view);
        }
        emit(entry, &mut lines)?;
    }
    if current.is_some() {
        lines.push("SetRegView default".to_string());
    }
    Ok(lines)
}

/// Decimal or `0x` hex DWORD value; empty means 0.
fn parse_dword(text: &str) -> Result<u32> {
    let text = text.trim();
    let parsed = if text.is_empty() {
        Ok(0)
    } else if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        text.parse::<u32>()
    };
    parsed.map_err(|_| Error::InvalidConfig(format!("`{text}` is not a valid DWORD value")))
}

/// Install half of custom registry entries.
pub fn registry_writes(ctx: &BuildContext<'_>, entries: &[RegistryEntry]) -> Result<Vec<String>> {
    with_views(ctx, entries, |entry, lines| {
        let key = field(ctx, &entry.key)?;
        let name = field(ctx, &entry.name)?;
        let value = ctx.resolve(&entry.value)?;
        lines.push(match entry.value_type {
            RegistryValueType::String => format!(
                "WriteRegStr {} \"{key}\" \"{name}\" \"{}\"",
                entry.hive,
                escape_nsis_string(&value)
            ),
            RegistryValueType::Expand => format!(
                "WriteRegExpandStr {} \"{key}\" \"{name}\" \"{}\"",
                entry.hive,
                escape_nsis_string(&value)
            ),
            RegistryValueType::Dword => format!(
                "WriteRegDWORD {} \"{key}\" \"{name}\" {}",
                entry.hive,
                parse_dword(&value)?
            ),
        });
        Ok(())
    })
}

/// Uninstall half of custom registry entries.
pub fn registry_deletes(ctx: &BuildContext<'_>, entries: &[RegistryEntry]) -> Result<Vec<String>> {
    with_views(ctx, entries, |entry, lines| {
        let key = field(ctx, &entry.key)?;
        lines.push(format!(
            "DeleteRegValue {} \"{key}\" \"{}\"",
            entry.hive,
            field(ctx, &entry.name)?
        ));
        lines.push(format!("DeleteRegKey /ifempty {} \"{key}\"", entry.hive));
        Ok(())
    })
}

/// Install half of environment variables.
///
/// Appends skip the write when the entry is already in the list, so repeated
/// installs never duplicate it.
pub fn env_writes(
    ctx: &BuildContext<'_>,
    vars: &[EnvVarEntry],
    labels: &mut Labels,
) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for var in vars {
        let (hive, key) = env_location(var.scope);
        let name = field(ctx, &var.name)?;
        let value = field(ctx, &var.value)?;
        if !var.append {
            lines.push(format!("WriteRegExpandStr {hive} \"{key}\" \"{name}\" \"{value}\""));
            lines.push(ENV_BROADCAST.to_string());
            continue;
        }

        let n = labels.next_index();
        let done = utils::label("env_done", n);
        let empty = utils::label("env_empty", n);
        let notify = utils::label("env_notify", n);
        lines.extend([
            format!("ReadRegStr $0 {hive} \"{key}\" \"{name}\""),
            "Push \"$0\"".to_string(),
            format!("Push \"{value}\""),
            "Call _StrContains".to_string(),
            format!("StrCmp $R9 \"1\" {done}"),
            format!("StrCmp $0 \"\" {empty}"),
            format!("WriteRegExpandStr {hive} \"{key}\" \"{name}\" \"$0;{value}\""),
            format!("Goto {notify}"),
            format!("{empty}:"),
            format!("WriteRegExpandStr {hive} \"{key}\" \"{name}\" \"{value}\""),
            format!("{notify}:"),
            ENV_BROADCAST.to_string(),
            format!("{done}:"),
        ]);
    }
    Ok(lines)
}

/// Uninstall half of environment variables.
///
/// Entries with `remove_on_uninstall: false` are left in place.
pub fn env_deletes(
    ctx: &BuildContext<'_>,
    vars: &[EnvVarEntry],
    labels: &mut Labels,
) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for var in vars.iter().filter(|v| v.remove_on_uninstall) {
        let (hive, key) = env_location(var.scope);
        let name = field(ctx, &var.name)?;
        if !var.append {
            lines.push(format!("DeleteRegValue {hive} \"{key}\" \"{name}\""));
            lines.push(ENV_BROADCAST.to_string());
            continue;
        }

        let n = labels.next_index();
        let empty = utils::label("env_un_empty", n);
        let notify = utils::label("env_un_notify", n);
        lines.extend([
            format!("ReadRegStr $0 {hive} \"{key}\" \"{name}\""),
            format!("StrCpy $1 \"{}\"", field(ctx, &var.value)?),
            "Call un._RemovePathEntry".to_string(),
            format!("StrCmp $0 \"\" {empty}"),
            format!("WriteRegExpandStr {hive} \"{key}\" \"{name}\" \"$0\""),
            format!("Goto {notify}"),
            format!("{empty}:"),
            format!("DeleteRegValue {hive} \"{key}\" \"{name}\""),
            format!("{notify}:"),
            ENV_BROADCAST.to_string(),
        ]);
    }
    Ok(lines)
}

fn extension_key(assoc: &FileAssociation) -> String {
    let ext = assoc.extension.trim();
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

/// Install half of file associations.
pub fn association_writes(
    ctx: &BuildContext<'_>,
    assocs: &[FileAssociation],
) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let language = ctx.language_names().into_iter().next().unwrap_or_default();
    for assoc in assocs {
        let (hive, prefix) = association_root(assoc);
        let ext = format!("{prefix}{}", field(ctx, &extension_key(assoc))?);
        let prog_id = format!("{prefix}{}", field(ctx, &assoc.prog_id)?);
        let application = utils::install_path_field(ctx, &assoc.application)?;
        let icon = if assoc.default_icon.is_empty() {
            format!("{application},0")
        } else {
            utils::install_path_field(ctx, &assoc.default_icon)?
        };

        lines.push(format!(
            "WriteRegStr {hive} \"{ext}\" \"\" \"{}\"",
            field(ctx, &assoc.prog_id)?
        ));
        lines.push(format!(
            "WriteRegStr {hive} \"{prog_id}\" \"\" \"{}\"",
            field(ctx, assoc.description.text_for(&language))?
        ));
        lines.push(format!("WriteRegStr {hive} \"{prog_id}\\DefaultIcon\" \"\" \"{icon}\""));
        if assoc.verbs.is_empty() {
            lines.push(format!(
                "WriteRegStr {hive} \"{prog_id}\\shell\\open\\command\" \"\" \"$\\\"{application}$\\\" $\\\"%1$\\\"\""
            ));
        } else {
            for (verb, command) in &assoc.verbs {
                lines.push(format!(
                    "WriteRegStr {hive} \"{prog_id}\\shell\\{}\\command\" \"\" \"{}\"",
                    field(ctx, verb)?,
                    field(ctx, command)?
                ));
            }
        }
    }
    if !lines.is_empty() {
        lines.push(ASSOC_CHANGED.to_string());
    }
    Ok(lines)
}

/// Uninstall half of file associations.
pub fn association_deletes(
    ctx: &BuildContext<'_>,
    assocs: &[FileAssociation],
) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for assoc in assocs {
        let (hive, prefix) = association_root(assoc);
        let ext = format!("{prefix}{}", field(ctx, &extension_key(assoc))?);
        lines.push(format!(
            "DeleteRegKey {hive} \"{prefix}{}\"",
            field(ctx, &assoc.prog_id)?
        ));
        lines.push(format!("DeleteRegValue {hive} \"{ext}\" \"\""));
        lines.push(format!("DeleteRegKey /ifempty {hive} \"{ext}\""));
    }
    if !lines.is_empty() {
        lines.push(ASSOC_CHANGED.to_string());
    }
    Ok(lines)
}
