//! NSIS utility functions.
//!
//! String escaping, path normalisation, version formatting and the fixed
//! registry locations shared by the install and uninstall generators.

use crate::installer::{
    config::{Compression, EnvScope, FileAssociation, RegistryHive},
    context::BuildContext,
    error::{Context, Result},
};
use url::Url;

/// Uninstaller path inside the installation directory.
pub const UNINSTALLER: &str = "$INSTDIR\\Uninstall.exe";

/// Start menu folder created for the application.
pub const START_MENU_DIR: &str = "$SMPROGRAMS\\${APP_NAME}";

/// Broadcast telling running processes the environment changed.
pub const ENV_BROADCAST: &str =
    "SendMessage ${HWND_BROADCAST} ${WM_SETTINGCHANGE} 0 \"STR:Environment\" /TIMEOUT=500";

/// Tells the shell that file associations changed.
pub const ASSOC_CHANGED: &str = "System::Call 'shell32::SHChangeNotify(i 0x08000000, i 0, p 0, p 0)'";

/// Escape text for use inside a double-quoted NSIS string.
///
/// - `"` becomes `$\"`
/// - CR LF, LF and CR become `$\r$\n`, `$\n` and `$\r`
pub fn escape_nsis_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("$\\\""),
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                out.push_str("$\\r$\\n");
            }
            '\r' => out.push_str("$\\r"),
            '\n' => out.push_str("$\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Resolves `text` and escapes it for a quoted NSIS string.
pub fn field(ctx: &BuildContext<'_>, text: &str) -> Result<String> {
    Ok(escape_nsis_string(&ctx.resolve(text)?))
}

/// Converts glob-style and forward-slash paths to the tool's separator.
///
/// `a/**/b` collapses to `a\b` and a leading `**/` is dropped; a trailing
/// `**` is kept as the recursive wildcard.
pub fn normalize_path(ctx: &BuildContext<'_>, path: &str) -> String {
    let separator = ctx.path_separator().to_string();
    path.replace("/**/", "/")
        .replace("**/", "")
        .replace(['/', '\\'], &separator)
}

/// Resolved, normalised and escaped local path.
pub fn path_field(ctx: &BuildContext<'_>, path: &str) -> Result<String> {
    Ok(escape_nsis_string(&normalize_path(ctx, &ctx.resolve(path)?)))
}

/// Like [`path_field`], anchoring relative paths at `$INSTDIR`.
pub fn install_path_field(ctx: &BuildContext<'_>, path: &str) -> Result<String> {
    let resolved = path_field(ctx, path)?;
    if resolved.is_empty() || is_anchored(&resolved) {
        Ok(resolved)
    } else {
        Ok(format!("$INSTDIR\\{resolved}"))
    }
}

/// Whether a resolved path already starts at a variable, drive or share.
fn is_anchored(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('$')
        || path.starts_with("\\\\")
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// Last path component of a local source (`bin/app.exe` → `app.exe`).
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// File name a remote source is saved under.
pub fn remote_file_name(source: &str) -> Result<String> {
    let url = Url::parse(source)?;
    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string);
    if name.is_none() {
        log::warn!("remote source {source} has no file name, saving as `download`");
    }
    Ok(name.unwrap_or_else(|| "download".to_string()))
}

/// Format version string for NSIS VIProductVersion.
///
/// NSIS requires exactly 4 numeric parts (major.minor.patch.build):
/// - "1" -> "1.0.0.0"
/// - "1.2.3" -> "1.2.3.0"
/// - "1.2.3-beta.1" -> "1.2.3.1"
/// - "1.2.3.4.5" -> "1.2.3.4" (truncates to first 4)
pub fn format_version_for_nsis(version: &str) -> String {
    let mut parts: Vec<String> = version
        .trim_start_matches(['v', 'V'])
        .split(['.', '-', '+'])
        .filter_map(|part| {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            (!digits.is_empty()).then_some(digits)
        })
        .take(4)
        .collect();
    while parts.len() < 4 {
        parts.push("0".to_string());
    }
    parts.join(".")
}

/// Map compression setting to NSIS compression string.
pub fn map_compression(compression: Compression) -> &'static str {
    match compression {
        Compression::None => "none",
        Compression::Zlib => "zlib",
        Compression::Bzip2 => "bzip2",
        Compression::Lzma => "lzma",
    }
}

/// Registry location of environment variables for a scope.
pub fn env_location(scope: EnvScope) -> (RegistryHive, &'static str) {
    match scope {
        EnvScope::System => (
            RegistryHive::Hklm,
            "SYSTEM\\CurrentControlSet\\Control\\Session Manager\\Environment",
        ),
        EnvScope::User => (RegistryHive::Hkcu, "Environment"),
    }
}

/// Registry root and key prefix for a file association.
pub fn association_root(assoc: &FileAssociation) -> (RegistryHive, &'static str) {
    if assoc.register_for_all_users {
        (RegistryHive::Hkcr, "")
    } else {
        (RegistryHive::Hkcu, "Software\\Classes\\")
    }
}

/// Hive of the product and uninstall keys.
///
/// Per-user installs (under `$LOCALAPPDATA` or `$APPDATA`) cannot write HKLM.
pub fn product_hive(ctx: &BuildContext<'_>) -> Result<RegistryHive> {
    Ok(if is_per_user(ctx)? {
        RegistryHive::Hkcu
    } else {
        RegistryHive::Hklm
    })
}

/// Whether the installer runs without elevation.
pub fn is_per_user(ctx: &BuildContext<'_>) -> Result<bool> {
    let config = ctx.config();
    if config
        .install
        .system_requirements
        .as_ref()
        .is_some_and(|r| r.require_admin)
    {
        return Ok(false);
    }
    let install_dir = ctx
        .resolver()
        .expand_references(&config.install.install_dir)
        .context("expanding install_dir")?;
    Ok(["$LOCALAPPDATA", "$APPDATA"]
        .iter()
        .any(|root| install_dir.starts_with(root)))
}

/// Wraps `body` between `open` and `close`, indented two spaces.
pub fn block(open: impl Into<String>, body: Vec<String>, close: &str) -> Vec<String> {
    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(open.into());
    lines.extend(body.into_iter().map(|line| {
        if line.is_empty() {
            line
        } else {
            format!("  {line}")
        }
    }));
    lines.push(close.to_string());
    lines
}

/// A valid NSIS label derived from `prefix` and an index.
pub fn label(prefix: &str, index: usize) -> String {
    format!("{prefix}_{index}")
}
