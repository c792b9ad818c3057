//! Installer callbacks: `.onInit`, `un.onInit` and `.onInstSuccess`.

use super::{
    packages::numbered_packages,
    utils::{UNINSTALLER, block, escape_nsis_string, product_hive},
};
use crate::installer::{
    config::{ExistingInstallConfig, ExistingInstallMode, SystemRequirements},
    context::BuildContext,
    error::{Error, Result},
};

/// Directory page leave callback installed when `allow_multiple` is set.
pub const EXISTING_INSTALL_LEAVE: &str = "ExistingInstallDirLeave";

/// Suffix of the WinVer.nsh `AtLeastWin*` test for a version spelling.
fn winver_suffix(version: &str) -> Result<&'static str> {
    let normalized = version.trim().to_ascii_lowercase();
    let normalized = normalized
        .strip_prefix("windows")
        .unwrap_or(&normalized)
        .trim();
    Ok(match normalized {
        "11" => "11",
        "10" => "10",
        "8.1" => "8.1",
        "8" => "8",
        "7" => "7",
        "vista" | "6.0" => "Vista",
        "xp" | "5.1" => "XP",
        other => {
            return Err(Error::InvalidConfig(format!(
                "unsupported min_windows_version `{other}`"
            )));
        }
    })
}

fn abort_with(message: &str) -> [String; 2] {
    [
        format!("MessageBox MB_OK|MB_ICONSTOP \"{message}\" /SD IDOK"),
        "Abort".to_string(),
    ]
}

fn requirement_checks(requirements: &SystemRequirements) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    if requirements.require_admin {
        lines.extend([
            "UserInfo::GetAccountType".to_string(),
            "Pop $0".to_string(),
            "${If} $0 != \"admin\"".to_string(),
        ]);
        lines.extend(abort_with("Administrator rights are required to install ${APP_NAME}.").map(indent));
        lines.push("${EndIf}".to_string());
    }
    if !requirements.min_windows_version.is_empty() {
        let suffix = winver_suffix(&requirements.min_windows_version)?;
        lines.push(format!("${{IfNot}} ${{AtLeastWin{suffix}}}"));
        lines.extend(
            abort_with(&format!("${{APP_NAME}} requires Windows {suffix} or later.")).map(indent),
        );
        lines.push("${EndIf}".to_string());
    }
    if requirements.min_free_space_mb > 0 {
        let required = requirements.min_free_space_mb;
        lines.extend([
            "${GetRoot} \"$INSTDIR\" $0".to_string(),
            "${DriveSpace} \"$0\\\" \"/D=F /S=M\" $1".to_string(),
            format!("${{If}} $1 < {required}"),
        ]);
        lines.extend(
            abort_with(&format!("At least {required} MB of free disk space is required."))
                .map(indent),
        );
        lines.push("${EndIf}".to_string());
    }
    if requirements.min_ram_mb > 0 {
        let required = requirements.min_ram_mb;
        lines.extend([
            "System::Alloc 64".to_string(),
            "Pop $1".to_string(),
            "System::Call \"*$1(i 64)\"".to_string(),
            "System::Call \"kernel32::GlobalMemoryStatusEx(p r1)\"".to_string(),
            "System::Call \"*$1(i, i, l .r2)\"".to_string(),
            "System::Free $1".to_string(),
            "System::Int64Op $2 / 1048576".to_string(),
            "Pop $2".to_string(),
            format!("${{If}} $2 < {required}"),
        ]);
        lines.extend(
            abort_with(&format!("At least {required} MB of memory is required.")).map(indent),
        );
        lines.push("${EndIf}".to_string());
    }
    Ok(lines)
}

fn indent(line: String) -> String {
    format!("  {line}")
}

/// Numeric version of `$R1\Uninstall.exe` in `$R5`, empty when the file
/// has no version resource.
fn installed_version() -> Vec<String> {
    let mut lines = vec![
        "StrCpy $R5 \"\"".to_string(),
        "ClearErrors".to_string(),
        "GetDLLVersion \"$R1\\Uninstall.exe\" $R3 $R4".to_string(),
        "${IfNot} ${Errors}".to_string(),
    ];
    lines.extend(
        [
            "IntOp $R6 $R3 >> 16",
            "IntOp $R7 $R3 & 0xFFFF",
            "IntOp $R8 $R4 >> 16",
            "IntOp $R9 $R4 & 0xFFFF",
            "StrCpy $R5 \"$R6.$R7.$R8.$R9\"",
        ]
        .map(|line| indent(line.to_string())),
    );
    lines.push("${EndIf}".to_string());
    lines
}

/// Handling of a previous installation found at `$R1`. Every path that
/// keeps going ends at `existing_done`.
fn handle_existing(existing: &ExistingInstallConfig) -> Vec<String> {
    let mut lines = Vec::new();
    if existing.reads_version() {
        lines.extend(installed_version());
    }
    if existing.version_check {
        lines.push("StrCmp $R5 \"${APP_VERSION_VI}\" existing_done".to_string());
    }
    lines.push("StrCpy $R6 \"${APP_NAME}\"".to_string());
    if existing.show_version_info {
        lines.extend([
            "${If} $R5 != \"\"".to_string(),
            indent("StrCpy $R6 \"${APP_NAME} $R5\"".to_string()),
            "${EndIf}".to_string(),
        ]);
    }

    let old_uninstaller = UNINSTALLER.replace("$INSTDIR", "$R1");
    let run_uninstaller = [
        format!(
            "ExecWait \"$\\\"{old_uninstaller}$\\\" {}\"",
            escape_nsis_string(&existing.uninstaller_args)
        ),
        "StrCpy $R2 0".to_string(),
        "existing_wait:".to_string(),
        format!("IfFileExists \"{old_uninstaller}\" 0 existing_done"),
        format!(
            "IntCmp $R2 {} existing_done 0 existing_done",
            existing.uninstall_wait_ms
        ),
        "Sleep 500".to_string(),
        "IntOp $R2 $R2 + 500".to_string(),
        "Goto existing_wait".to_string(),
    ];

    match existing.mode {
        ExistingInstallMode::PromptUninstall => {
            lines.push(
                "MessageBox MB_YESNO|MB_ICONQUESTION \"$R6 is already installed in $R1. Uninstall it first?\" /SD IDYES IDNO existing_done".to_string(),
            );
            lines.extend(run_uninstaller);
        }
        ExistingInstallMode::AutoUninstall => lines.extend(run_uninstaller),
        _ => lines.extend(abort_with(
            "$R6 is already installed in $R1. Uninstall it before installing this version.",
        )),
    }
    lines.push("existing_done:".to_string());
    lines
}

/// Detects a previous installation through `InstallPath`, unless
/// detection waits for the directory page.
fn existing_install(ctx: &BuildContext<'_>, existing: &ExistingInstallConfig) -> Result<Vec<String>> {
    if !existing.detects() || existing.checks_selected_dir() {
        return Ok(Vec::new());
    }

    let hive = product_hive(ctx)?;
    let mut lines = vec![
        format!("SetRegView {}", ctx.effective_registry_view()?.as_str()),
        format!("ReadRegStr $R1 {hive} \"${{REG_KEY}}\" \"InstallPath\""),
        "SetRegView default".to_string(),
        "StrCmp $R1 \"\" existing_done".to_string(),
        "IfFileExists \"$R1\\Uninstall.exe\" 0 existing_done".to_string(),
    ];
    lines.extend(handle_existing(existing));
    Ok(lines)
}

/// Leave callback of the directory page: looks for an installation in the
/// chosen `$INSTDIR`. `Abort` keeps the user on the page.
pub fn existing_install_dir_leave(ctx: &BuildContext<'_>) -> Vec<String> {
    let existing = &ctx.config().install.existing_install;
    if !existing.checks_selected_dir() {
        return Vec::new();
    }
    let mut body = vec![
        "StrCpy $R1 \"$INSTDIR\"".to_string(),
        "IfFileExists \"$R1\\Uninstall.exe\" 0 existing_done".to_string(),
    ];
    body.extend(handle_existing(existing));
    block(
        format!("Function {EXISTING_INSTALL_LEAVE}"),
        body,
        "FunctionEnd",
    )
}

/// `.onInit`: single instance, language, requirements, previous install
/// and initial component selection.
pub fn on_init(ctx: &BuildContext<'_>) -> Result<Vec<String>> {
    let config = ctx.config();
    let mut body = vec![
        "System::Call 'kernel32::CreateMutex(p 0, i 0, t \"${APP_NAME}_InstallerMutex\") p .r1 ?e'"
            .to_string(),
        "Pop $R0".to_string(),
        "${If} $R0 == 183".to_string(),
    ];
    body.extend(abort_with("The ${APP_NAME} installer is already running.").map(indent));
    body.push("${EndIf}".to_string());

    if ctx.language_names().len() > 1 {
        body.push("!insertmacro MUI_LANGDLL_DISPLAY".to_string());
    }
    if let Some(requirements) = &config.install.system_requirements {
        body.extend(requirement_checks(requirements)?);
    }
    body.extend(existing_install(ctx, &config.install.existing_install)?);

    for numbered in numbered_packages(ctx) {
        if let (Some(id), Some(flags)) = (numbered.section_id(), numbered.initial_flags()) {
            body.push(format!("SectionSetFlags ${{{id}}} {flags}"));
        }
    }

    Ok(block("Function .onInit", body, "FunctionEnd"))
}

/// `un.onInit`, only needed to restore the chosen language.
pub fn un_on_init(ctx: &BuildContext<'_>) -> Vec<String> {
    if ctx.language_names().len() > 1 {
        block(
            "Function un.onInit",
            vec!["!insertmacro MUI_UNGETLANGUAGE".to_string()],
            "FunctionEnd",
        )
    } else {
        Vec::new()
    }
}

/// `.onInstSuccess` and `.onInstFailed` closing the install log.
pub fn on_inst_end(ctx: &BuildContext<'_>) -> Vec<String> {
    if !ctx.config().logging_enabled() {
        return Vec::new();
    }
    let mut lines = block(
        "Function .onInstSuccess",
        vec!["!insertmacro LogClose".to_string()],
        "FunctionEnd",
    );
    lines.push(String::new());
    lines.extend(block(
        "Function .onInstFailed",
        vec!["!insertmacro LogClose".to_string()],
        "FunctionEnd",
    ));
    lines
}
